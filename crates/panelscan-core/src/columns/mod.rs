pub mod headers;
pub mod mapper;
