mod color;
mod columns;
mod config;
mod error;
mod expand;
mod image_utils;
mod policy;
mod raster;
mod region;
mod selectable;
mod selection;
mod session;

pub use color::*;
pub use columns::*;
pub use config::*;
pub use error::*;
pub use expand::*;
pub use image_utils::*;
pub use policy::*;
pub use raster::*;
pub use region::*;
pub use selectable::*;
pub use selection::*;
pub use session::*;
