//! Per-widget gesture state machine.
//!
//! ```text
//! Idle --pointer-down on header--> Dragging --pointer-up--> Idle
//! Idle --pointer-down on handle--> Resizing(handle) --pointer-up--> Idle
//! ```
//!
//! Intermediate frames yield non-committing events; only pointer-up yields a
//! committed event, which is what triggers persistence downstream.

use super::geometry::{drag_position, resize, ResizeHandle};
use super::GeometryLimits;
use crate::model::{CanvasSize, Position, Rect, Size, WidgetInstanceId};
use std::collections::HashMap;
use tracing::debug;

/// Geometry produced by one gesture frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Drag frame: new origin, not yet committed.
    Moved {
        /// Current origin.
        position: Position,
    },
    /// Resize frame: new geometry, not yet committed.
    Resized {
        /// Current geometry.
        rect: Rect,
    },
    /// Drag finished.
    PositionCommitted {
        /// Final origin.
        position: Position,
    },
    /// Resize finished. Edge and corner resizes can move the origin, so the
    /// position is reported too.
    SizeCommitted {
        /// Final size.
        size: Size,
        /// Final origin.
        position: Position,
    },
}

impl GestureEvent {
    /// Whether this event finalizes a gesture.
    pub fn is_commit(&self) -> bool {
        matches!(
            self,
            GestureEvent::PositionCommitted { .. } | GestureEvent::SizeCommitted { .. }
        )
    }
}

/// Gesture state of a single widget.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No pointer interaction.
    #[default]
    Idle,
    /// Moving by the header.
    Dragging {
        /// Pointer offset inside the widget at pointer-down.
        grab_offset: Position,
        /// Most recent geometry.
        last: Rect,
    },
    /// Resizing from an edge or corner.
    Resizing {
        /// Active handle.
        handle: ResizeHandle,
        /// Pointer position at pointer-down.
        pointer_origin: Position,
        /// Geometry at pointer-down.
        start: Rect,
        /// Most recent geometry.
        last: Rect,
    },
}

impl GestureState {
    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self, GestureState::Idle)
    }

    /// Start dragging. Ignored (returns `false`) if a gesture is active.
    pub fn begin_drag(&mut self, pointer: Position, current: Rect) -> bool {
        if self.is_active() {
            return false;
        }
        *self = GestureState::Dragging {
            grab_offset: Position::new(
                pointer.x - current.position.x,
                pointer.y - current.position.y,
            ),
            last: current,
        };
        true
    }

    /// Start resizing. Ignored (returns `false`) if a gesture is active.
    pub fn begin_resize(&mut self, handle: ResizeHandle, pointer: Position, current: Rect) -> bool {
        if self.is_active() {
            return false;
        }
        *self = GestureState::Resizing {
            handle,
            pointer_origin: pointer,
            start: current,
            last: current,
        };
        true
    }

    /// Geometry for the pointer at `pointer`, updating `last`.
    ///
    /// Returns `None` when idle or when the canvas cannot be measured.
    fn step(&mut self, pointer: Position, canvas: Option<CanvasSize>, limits: GeometryLimits) -> Option<Rect> {
        let canvas = canvas?;
        match self {
            GestureState::Idle => None,
            GestureState::Dragging { grab_offset, last } => {
                let position = drag_position(pointer, *grab_offset, last.size, canvas);
                last.position = position;
                Some(*last)
            }
            GestureState::Resizing {
                handle,
                pointer_origin,
                start,
                last,
            } => {
                let delta = Position::new(pointer.x - pointer_origin.x, pointer.y - pointer_origin.y);
                *last = resize(*start, delta, *handle, canvas, limits);
                Some(*last)
            }
        }
    }

    /// Intermediate frame. Yields a non-committing event.
    pub fn pointer_move(
        &mut self,
        pointer: Position,
        canvas: Option<CanvasSize>,
        limits: GeometryLimits,
    ) -> Option<GestureEvent> {
        let rect = self.step(pointer, canvas, limits)?;
        match self {
            GestureState::Dragging { .. } => Some(GestureEvent::Moved {
                position: rect.position,
            }),
            GestureState::Resizing { .. } => Some(GestureEvent::Resized { rect }),
            GestureState::Idle => None,
        }
    }

    /// Terminal frame. Returns to `Idle` and yields the committed event.
    ///
    /// If the canvas cannot be measured the last computed geometry is
    /// committed.
    pub fn pointer_up(
        &mut self,
        pointer: Position,
        canvas: Option<CanvasSize>,
        limits: GeometryLimits,
    ) -> Option<GestureEvent> {
        let _ = self.step(pointer, canvas, limits);
        let event = match *self {
            GestureState::Idle => None,
            GestureState::Dragging { last, .. } => Some(GestureEvent::PositionCommitted {
                position: last.position,
            }),
            GestureState::Resizing { last, .. } => Some(GestureEvent::SizeCommitted {
                size: last.size,
                position: last.position,
            }),
        };
        *self = GestureState::Idle;
        event
    }
}

/// Gesture state for every widget on a canvas.
///
/// At most one gesture per widget; widgets are independent of each other.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    limits: GeometryLimits,
    active: HashMap<WidgetInstanceId, GestureState>,
}

impl GestureTracker {
    /// Create a tracker with the given size limits.
    pub fn new(limits: GeometryLimits) -> Self {
        Self {
            limits,
            active: HashMap::new(),
        }
    }

    /// Size limits applied to resizes.
    pub fn limits(&self) -> GeometryLimits {
        self.limits
    }

    /// Current state of `id` (`Idle` if never touched).
    pub fn state(&self, id: &WidgetInstanceId) -> GestureState {
        self.active.get(id).copied().unwrap_or_default()
    }

    /// Pointer-down on the header of `id`.
    pub fn begin_drag(&mut self, id: &WidgetInstanceId, pointer: Position, current: Rect) -> bool {
        let started = self.active.entry(id.clone()).or_default().begin_drag(pointer, current);
        if started {
            debug!(widget = %id, "Drag started");
        }
        started
    }

    /// Pointer-down on a resize handle of `id`.
    pub fn begin_resize(
        &mut self,
        id: &WidgetInstanceId,
        handle: ResizeHandle,
        pointer: Position,
        current: Rect,
    ) -> bool {
        let started = self
            .active
            .entry(id.clone())
            .or_default()
            .begin_resize(handle, pointer, current);
        if started {
            debug!(widget = %id, ?handle, "Resize started");
        }
        started
    }

    /// Pointer-move for `id`.
    pub fn pointer_move(
        &mut self,
        id: &WidgetInstanceId,
        pointer: Position,
        canvas: Option<CanvasSize>,
    ) -> Option<GestureEvent> {
        let limits = self.limits;
        self.active.get_mut(id)?.pointer_move(pointer, canvas, limits)
    }

    /// Pointer-up for `id`; ends its gesture.
    pub fn pointer_up(
        &mut self,
        id: &WidgetInstanceId,
        pointer: Position,
        canvas: Option<CanvasSize>,
    ) -> Option<GestureEvent> {
        let limits = self.limits;
        let mut state = self.active.remove(id)?;
        let event = state.pointer_up(pointer, canvas, limits);
        debug!(widget = %id, ?event, "Gesture ended");
        event
    }

    /// Drop any gesture for `id` without committing (e.g. widget removed).
    pub fn cancel(&mut self, id: &WidgetInstanceId) {
        self.active.remove(id);
    }
}
