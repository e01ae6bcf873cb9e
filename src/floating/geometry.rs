//! Pure drag/resize geometry.
//!
//! Every function here is total: given a measurable canvas it returns a
//! geometry that lies inside it and respects the minimum size.

use super::GeometryLimits;
use crate::model::{CanvasSize, Position, Rect, Size};

/// Which edge or corner of a widget is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    /// Top edge.
    N,
    /// Bottom edge.
    S,
    /// Right edge.
    E,
    /// Left edge.
    W,
    /// Top-right corner.
    NE,
    /// Top-left corner.
    NW,
    /// Bottom-right corner.
    SE,
    /// Bottom-left corner.
    SW,
}

impl ResizeHandle {
    /// All eight handles.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::N,
        ResizeHandle::S,
        ResizeHandle::E,
        ResizeHandle::W,
        ResizeHandle::NE,
        ResizeHandle::NW,
        ResizeHandle::SE,
        ResizeHandle::SW,
    ];

    /// Which sides of the widget this handle moves.
    pub const fn rule(self) -> HandleRule {
        //                                  left   top    width  height
        match self {
            ResizeHandle::N => HandleRule::new(false, true, false, true),
            ResizeHandle::S => HandleRule::new(false, false, false, true),
            ResizeHandle::E => HandleRule::new(false, false, true, false),
            ResizeHandle::W => HandleRule::new(true, false, true, false),
            ResizeHandle::NE => HandleRule::new(false, true, true, true),
            ResizeHandle::NW => HandleRule::new(true, true, true, true),
            ResizeHandle::SE => HandleRule::new(false, false, true, true),
            ResizeHandle::SW => HandleRule::new(true, false, true, true),
        }
    }
}

/// Per-handle resize behavior.
///
/// `affects_width`/`affects_height` say whether the dimension changes at all;
/// `affects_left`/`affects_top` say whether the change happens on the
/// origin side, in which case the delta is negated and the origin shifts so
/// the opposite edge stays put.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleRule {
    /// Origin moves horizontally (W side).
    pub affects_left: bool,
    /// Origin moves vertically (N side).
    pub affects_top: bool,
    /// Width changes.
    pub affects_width: bool,
    /// Height changes.
    pub affects_height: bool,
}

impl HandleRule {
    const fn new(affects_left: bool, affects_top: bool, affects_width: bool, affects_height: bool) -> Self {
        Self {
            affects_left,
            affects_top,
            affects_width,
            affects_height,
        }
    }
}

/// One axis of a resize computation.
struct AxisResize {
    start_pos: f64,
    start_size: f64,
    delta: f64,
    resizes: bool,
    moves_origin: bool,
    extent: f64,
    min: f64,
}

impl AxisResize {
    /// Returns `(position, size)` along this axis.
    fn apply(self) -> (f64, f64) {
        // A canvas smaller than the minimum caps the minimum.
        let min = self.min.min(self.extent);

        if !self.resizes {
            // Untouched unless the start itself breaks the limits.
            let size = self.start_size.max(min).min(self.extent);
            let pos = self.start_pos.clamp(0.0, self.extent - size);
            return (pos, size);
        }

        if self.moves_origin {
            // Far edge is anchored; the origin follows the pointer.
            let far = (self.start_pos + self.start_size).min(self.extent);
            let size = (self.start_size - self.delta).max(min);
            let pos = far - size;
            if pos < 0.0 {
                // Shrink to fit instead of pushing the origin off canvas.
                (0.0, far.max(min))
            } else {
                (pos, size)
            }
        } else {
            // The origin only gives way when the minimum no longer fits after it.
            let pos = self.start_pos.clamp(0.0, self.extent - min);
            let size = (self.start_size + self.delta).max(min).min(self.extent - pos);
            (pos, size)
        }
    }
}

/// Compute the geometry after dragging `handle` by `delta` from `start`.
///
/// `delta` is measured from the pointer position at gesture start, not from
/// the previous frame.
pub fn resize(
    start: Rect,
    delta: Position,
    handle: ResizeHandle,
    canvas: CanvasSize,
    limits: GeometryLimits,
) -> Rect {
    let rule = handle.rule();

    let (x, width) = AxisResize {
        start_pos: start.position.x,
        start_size: start.size.width,
        delta: delta.x,
        resizes: rule.affects_width,
        moves_origin: rule.affects_left,
        extent: canvas.width(),
        min: limits.min_width,
    }
    .apply();

    let (y, height) = AxisResize {
        start_pos: start.position.y,
        start_size: start.size.height,
        delta: delta.y,
        resizes: rule.affects_height,
        moves_origin: rule.affects_top,
        extent: canvas.height(),
        min: limits.min_height,
    }
    .apply();

    Rect::new(x, y, width, height)
}

/// Compute the widget origin while dragging by the header.
///
/// `grab_offset` is where inside the widget the pointer went down. The
/// result is clamped per axis to `[0, canvas - size]`, so it stays valid even
/// when the pointer leaves the canvas.
pub fn drag_position(
    pointer: Position,
    grab_offset: Position,
    size: Size,
    canvas: CanvasSize,
) -> Position {
    let max_x = (canvas.width() - size.width).max(0.0);
    let max_y = (canvas.height() - size.height).max(0.0);
    Position::new(
        (pointer.x - grab_offset.x).clamp(0.0, max_x),
        (pointer.y - grab_offset.y).clamp(0.0, max_y),
    )
}

/// Sizing policy for newly added widgets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialSizing {
    /// Fraction of the canvas width.
    pub width_ratio: f64,
    /// Width clamp range.
    pub min_width: f64,
    /// Width clamp range.
    pub max_width: f64,
    /// Fraction of the canvas height.
    pub height_ratio: f64,
    /// Height clamp range.
    pub min_height: f64,
    /// Height clamp range.
    pub max_height: f64,
}

impl Default for InitialSizing {
    fn default() -> Self {
        Self {
            width_ratio: 0.45,
            min_width: 800.0,
            max_width: 1000.0,
            height_ratio: 0.40,
            min_height: 600.0,
            max_height: 800.0,
        }
    }
}

/// Centered starting geometry for a new widget on `area` (canvas or viewport).
///
/// The position never goes negative, even if the clamped size is larger
/// than the area.
pub fn initial_geometry(area: CanvasSize, sizing: InitialSizing) -> Rect {
    let width = (area.width() * sizing.width_ratio).clamp(sizing.min_width, sizing.max_width);
    let height = (area.height() * sizing.height_ratio).clamp(sizing.min_height, sizing.max_height);
    let x = ((area.width() - width) / 2.0).max(0.0);
    let y = ((area.height() - height) / 2.0).max(0.0);
    Rect::new(x, y, width, height)
}
