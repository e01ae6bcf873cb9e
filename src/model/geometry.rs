//! Pixel-space geometry newtypes.
//!
//! All values are CSS-style pixels relative to the canvas origin (top-left).

use serde::{Deserialize, Serialize};

/// Top-left corner of a widget, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset from the canvas left edge.
    pub x: f64,
    /// Vertical offset from the canvas top edge.
    pub y: f64,
}

impl Position {
    /// Create a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a widget, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Position plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub position: Position,
    /// Dimensions.
    pub size: Size,
}

impl Rect {
    /// Create a rect from raw coordinates.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            position: Position::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f64 {
        self.position.x + self.size.width
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> f64 {
        self.position.y + self.size.height
    }
}

/// Measured size of the canvas a floating widget lives on.
///
/// # Invariants
/// - Both dimensions are strictly positive. A canvas that has not been laid
///   out yet (or is unmounted) has no `CanvasSize` at all.
///
/// # Smart Constructor
/// Use `CanvasSize::measured(width, height)` which returns `Option<Self>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    width: f64,
    height: f64,
}

impl CanvasSize {
    /// Wrap a measurement, returning `None` when the canvas is not measurable.
    pub fn measured(width: f64, height: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Some(Self { width, height })
        } else {
            None
        }
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> f64 {
        self.height
    }
}
