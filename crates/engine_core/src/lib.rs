//! Core engine types and utilities for Tinsel.
//!
//! This crate provides the foundational types used across all scene systems:
//! - Transform composition and GPU instance matrices
//! - Time management for the frame loop
//! - The formation state the particle groups react to
//! - Linear RGB colors for palettes and materials

pub mod color;
pub mod formation;
pub mod time;
pub mod transform;

pub use color::*;
pub use formation::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{EulerRot, Mat4, Quat, Vec2, Vec3, Vec4};
