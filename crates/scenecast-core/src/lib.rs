//! Scenecast Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Scenecast
//! transcript-to-diagram pipeline. It includes:
//!
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Semantic**: The scene model handed to renderers ([`semantic`] module)

pub mod geometry;
pub mod semantic;
