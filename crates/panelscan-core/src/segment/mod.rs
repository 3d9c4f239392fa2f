pub mod anchors;
pub mod regions;
pub mod rows;
