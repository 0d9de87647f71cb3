//! Frame-by-frame morphing of the tree scene.
//!
//! Every particle group follows the same loop: the interpolator pulls live
//! positions toward the active formation's targets, then the publisher writes
//! one instance transform per particle for the renderer to upload. The ribbon
//! morphs its control points the same way and rebuilds its tube surface.
//! The background starfield is published once and stays put.

pub mod backdrop;
pub mod group;
pub mod interpolator;
pub mod motion;
pub mod publisher;
pub mod ribbon;
pub mod scene;

pub use backdrop::*;
pub use group::*;
pub use interpolator::*;
pub use motion::*;
pub use publisher::*;
pub use ribbon::*;
pub use scene::*;
