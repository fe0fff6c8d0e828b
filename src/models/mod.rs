pub mod image;
pub mod predict;
pub mod request;

pub use image::*;
pub use predict::*;
pub use request::*;
