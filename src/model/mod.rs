//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod geometry;
pub mod identifiers;
pub mod widget;

// Re-export for convenience
pub use error::{LayoutError, RemoteError, StoreError};
pub use geometry::{CanvasSize, Position, Rect, Size};
pub use identifiers::{
    BackendWidgetId, CatalogWidgetId, InvalidCatalogWidgetId, InvalidTemplateId, InvalidWidgetId,
    LocalInstanceId, TemplateId, WidgetInstanceId, LOCAL_ID_PREFIX,
};
pub use widget::{CatalogEntry, FloatingWidgetInstance, RemoteWidgetRecord};
