pub mod data;
pub mod geometry;
pub mod layout;

pub use data::*;
pub use geometry::Region;
