//! Procedural generation for the tree scene: particle fields, ribbon paths,
//! curves, primitive meshes and the background starfield.

pub mod config;
pub mod curve;
pub mod error;
pub mod palette;
pub mod particle;
pub mod placement;
pub mod ribbon_path;
pub mod scatter;
pub mod shapes;
pub mod starfield;
pub mod tube;

pub use config::*;
pub use curve::*;
pub use error::*;
pub use palette::*;
pub use particle::*;
pub use placement::*;
pub use ribbon_path::*;
pub use scatter::*;
pub use shapes::*;
pub use starfield::*;
pub use tube::*;
