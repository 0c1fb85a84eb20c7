//! # Scene Management Module
//!
//! Scene construction and ownership: the object model, the procedural
//! kitchen builder and the scene container tying objects, lights, materials
//! and camera together.

pub mod builder;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{DrawObject, InstanceData, Object};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;
