//! Local persistence of the floating-widget list.
//!
//! The list is stored as JSON under a per-template key. Reads never fail:
//! anything unreadable is treated as "no saved state".

use crate::model::{
    CatalogWidgetId, FloatingWidgetInstance, LocalInstanceId, Position, Size, TemplateId,
    WidgetInstanceId,
};
use crate::store::{floating_widgets_key, load_json, save_json, LocalStore};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// On-disk shape of one widget.
///
/// `id` is optional because lists written by older builds (or edited by
/// hand) may lack it; such entries are repaired on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredWidget {
    #[serde(default)]
    id: Option<String>,
    widget_id: CatalogWidgetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    position: Position,
    size: Size,
}

impl From<&FloatingWidgetInstance> for StoredWidget {
    fn from(widget: &FloatingWidgetInstance) -> Self {
        Self {
            id: Some(widget.id.to_string()),
            widget_id: widget.widget_id.clone(),
            title: widget.title.clone(),
            position: widget.position,
            size: widget.size,
        }
    }
}

/// Load the floating-widget list for `template_id`.
///
/// Entries without an id get a local id derived from their catalog id, the
/// load time and their index; if any entry was repaired the corrected list
/// is written back once. Read or parse failures yield an empty list.
pub fn load_widgets(
    store: &dyn LocalStore,
    template_id: &TemplateId,
    loaded_at_millis: i64,
) -> Vec<FloatingWidgetInstance> {
    let (widgets, repaired) = read_stored(store, template_id, loaded_at_millis);
    if repaired > 0 {
        info!(template = %template_id, repaired, "Assigned ids to stored floating widgets");
        save_widgets(store, template_id, &widgets);
    }
    widgets
}

/// Like [`load_widgets`], but never writes to the store. Repaired ids exist
/// only in the returned list.
pub fn peek_widgets(
    store: &dyn LocalStore,
    template_id: &TemplateId,
    loaded_at_millis: i64,
) -> Vec<FloatingWidgetInstance> {
    read_stored(store, template_id, loaded_at_millis).0
}

/// Decoded list plus the number of entries that needed a fresh id.
fn read_stored(
    store: &dyn LocalStore,
    template_id: &TemplateId,
    loaded_at_millis: i64,
) -> (Vec<FloatingWidgetInstance>, usize) {
    let key = floating_widgets_key(template_id.as_str());
    let stored: Vec<StoredWidget> = match load_json(store, &key) {
        Ok(Some(stored)) => stored,
        Ok(None) => return (Vec::new(), 0),
        Err(e) => {
            warn!(error = %e, template = %template_id, "Discarding unreadable floating widget list");
            return (Vec::new(), 0);
        }
    };

    let mut repaired = 0usize;
    let widgets = stored
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let id = match entry.id.as_deref().map(str::parse::<WidgetInstanceId>) {
                Some(Ok(id)) => id,
                _ => {
                    repaired += 1;
                    WidgetInstanceId::Local(LocalInstanceId::generate(
                        &entry.widget_id,
                        loaded_at_millis,
                        &index.to_string(),
                    ))
                }
            };
            FloatingWidgetInstance {
                id,
                widget_id: entry.widget_id,
                title: entry.title,
                position: entry.position,
                size: entry.size,
            }
        })
        .collect();

    (widgets, repaired)
}

/// Persist the full floating-widget list for `template_id`.
///
/// Failures are logged; the in-memory list stays authoritative.
pub fn save_widgets(
    store: &dyn LocalStore,
    template_id: &TemplateId,
    widgets: &[FloatingWidgetInstance],
) {
    let key = floating_widgets_key(template_id.as_str());
    let stored: Vec<StoredWidget> = widgets.iter().map(StoredWidget::from).collect();
    if let Err(e) = save_json(store, &key, &stored) {
        warn!(error = %e, template = %template_id, "Failed to persist floating widget list");
    }
}
