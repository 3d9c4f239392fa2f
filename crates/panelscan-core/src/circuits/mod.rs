pub mod builder;
pub mod metadata;
pub mod pairer;
