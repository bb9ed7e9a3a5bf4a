pub mod chapter;
pub mod photo;
