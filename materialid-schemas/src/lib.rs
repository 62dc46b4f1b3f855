pub mod family;
pub mod file_formats;
pub mod lifecycle;
pub mod material;
pub mod rule;
