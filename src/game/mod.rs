//! Game runtime
//!
//! The simulation core of the platformer and the renderer over it.
//! Everything under this module except `render` is headless: updates
//! take a tilemap and an input snapshot and raise what happened through
//! a `FrameEvents` sink, so the whole frame loop runs under `cargo
//! test` without a window.
//!
//! Key concepts:
//! - Body: axis-separated tile collision shared by every entity
//! - Scene: owns the world and advances it in a fixed per-frame order
//! - FrameEvents: decoupled communication from entities back to the scene

// Allow unused code - several small helpers are exercised only by the
// test suite
#![allow(dead_code)]

pub mod animation;
pub mod background;
pub mod camera;
pub mod enemy;
pub mod events;
pub mod physics;
pub mod player;
pub mod render;
pub mod scene;
pub mod spark;
pub mod tilemap;

// Re-export main types
pub use render::Display;
pub use scene::Scene;
