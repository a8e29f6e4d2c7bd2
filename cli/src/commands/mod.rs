pub mod mosaic;
pub mod parallel;
