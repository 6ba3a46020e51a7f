pub mod error;
pub mod illustrate;
pub mod math;
pub mod mesh;
pub mod render;
pub mod scene;

pub use error::{CadVectorError, Result};
