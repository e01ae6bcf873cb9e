//! Floating widget records.

use super::geometry::{Position, Rect, Size};
use super::identifiers::{BackendWidgetId, CatalogWidgetId, WidgetInstanceId};
use serde::{Deserialize, Serialize};

/// A widget content type the user can pick from the widget catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Content-type id.
    pub id: CatalogWidgetId,
    /// Human-readable title.
    pub title: String,
}

impl CatalogEntry {
    /// Create a catalog entry.
    pub fn new(id: CatalogWidgetId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// One widget placed on a free-floating canvas.
///
/// Mutated during gestures; persisted on settle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingWidgetInstance {
    /// Instance identity (provenance-tagged).
    pub id: WidgetInstanceId,
    /// Content type shown by this instance.
    pub widget_id: CatalogWidgetId,
    /// Optional display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Top-left corner in canvas pixels.
    pub position: Position,
    /// Pixel size.
    pub size: Size,
}

impl FloatingWidgetInstance {
    /// Current geometry as a rect.
    pub fn rect(&self) -> Rect {
        Rect {
            position: self.position,
            size: self.size,
        }
    }
}

/// A widget placed on a saved template, as reported by the remote store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteWidgetRecord {
    /// Server-side id.
    pub backend_id: String,
    /// Content type.
    pub catalog_id: String,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Top offset in pixels.
    pub top_pos: f64,
    /// Left offset in pixels.
    pub left_pos: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl RemoteWidgetRecord {
    /// Backend id, or `None` if the server sent an empty one.
    pub fn backend_id(&self) -> Option<BackendWidgetId> {
        BackendWidgetId::new(self.backend_id.clone()).ok()
    }
}
