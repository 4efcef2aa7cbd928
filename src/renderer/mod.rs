//! wgpu rendering module
//!
//! Instanced flat-color geometry; runs on WebGL2 in the browser.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{InstancedRenderer, screen_projection};
