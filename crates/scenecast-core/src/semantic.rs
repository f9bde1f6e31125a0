//! Semantic scene model types.
//!
//! These types describe the data flowing through the transcript-to-diagram
//! pipeline and the scenes handed to an external renderer.
//!
//! # Pipeline Position
//!
//! ```text
//! Timed transcript (TranscriptSegment)
//!     ↓ segment
//! Scene shells
//!     ↓ classify + extract
//! Graph drafts (unpositioned nodes, edges)
//!     ↓ layout
//! Scenes (these types) - positioned nodes, routed edges, quality block
//!     ↓ render (external)
//! Video
//! ```
//!
//! # Organization
//!
//! - [`archetype`] - The closed set of diagram archetypes: [`Archetype`]
//! - [`transcript`] - Timed transcript input: [`TranscriptSegment`]
//! - [`scene`] - Laid-out output: [`Scene`], [`Node`], [`Edge`], [`SceneQuality`]

pub mod archetype;
pub mod scene;
pub mod transcript;

pub use archetype::*;
pub use scene::*;
pub use transcript::*;
