//! Floating geometry engine.
//!
//! Computes the next position/size of a free-floating widget from drag and
//! 8-direction resize gestures, clamped to the canvas.
//!
//! # Module Structure
//!
//! - `geometry`: pure drag/resize/initial-placement functions
//! - `gesture`: per-widget `Idle → Dragging | Resizing → Idle` state machine

pub mod geometry;
pub mod gesture;

pub use geometry::{
    drag_position, initial_geometry, resize, HandleRule, InitialSizing, ResizeHandle,
};
pub use gesture::{GestureEvent, GestureState, GestureTracker};

/// Minimum widget size enforced during resizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryLimits {
    /// Minimum width in pixels.
    pub min_width: f64,
    /// Minimum height in pixels.
    pub min_height: f64,
}

impl Default for GeometryLimits {
    fn default() -> Self {
        Self {
            min_width: 200.0,
            min_height: 150.0,
        }
    }
}

#[cfg(test)]
#[path = "floating_tests.rs"]
mod tests;
