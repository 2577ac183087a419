//! State Management
//!
//! Global application state and the canvas editor panel.

pub mod canvas;
pub mod global;

pub use canvas::CanvasState;
pub use global::{provide_global_state, GlobalState};
