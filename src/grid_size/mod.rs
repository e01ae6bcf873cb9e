//! Percentage conversion and grid-size persistence.
//!
//! Pane dividers report transient pixel sizes while the user drags them.
//! When the drag settles the sizes are converted into percentages of the
//! container and stored per template, tagged with the layout they were taken
//! under. A vector saved under one layout is never applied to another.
//!
//! Persistence failures are logged and swallowed; resizing is never
//! interrupted by storage trouble.

use crate::catalog::{round_percentage, GridLayout, LayoutCatalog, SplitDirection};
use crate::model::{Size, TemplateId};
use crate::store::{grid_sizes_key, load_json, save_json, LocalStore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Stored percentages for one template.
///
/// One record per template; overwritten on every commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateGridSizeRecord {
    /// Owning template.
    pub template_id: TemplateId,
    /// Layout the percentages were taken under.
    pub layout_id: String,
    /// One percentage per area, canonical area order.
    pub percentages: Vec<f64>,
}

/// Tracks pane sizes for the active (template, layout) pair.
pub struct GridSizeTracker {
    store: Box<dyn LocalStore>,
    catalog: &'static LayoutCatalog,
    recorded: HashMap<String, Size>,
    active_pair: Option<(TemplateId, String)>,
    active: Vec<f64>,
}

impl GridSizeTracker {
    /// Create a tracker over the built-in catalog.
    pub fn new(store: Box<dyn LocalStore>) -> Self {
        Self::with_catalog(store, LayoutCatalog::builtin())
    }

    /// Create a tracker over an explicit catalog.
    pub fn with_catalog(store: Box<dyn LocalStore>, catalog: &'static LayoutCatalog) -> Self {
        Self {
            store,
            catalog,
            recorded: HashMap::new(),
            active_pair: None,
            active: Vec::new(),
        }
    }

    /// Make a (template, layout) pair active.
    ///
    /// Clears recorded pixel sizes and returns the effective percentage
    /// vector: the stored one if it was taken under this layout, otherwise the
    /// layout's default ratios.
    pub fn activate(&mut self, template_id: &TemplateId, layout_id: &str) -> Vec<f64> {
        self.recorded.clear();
        self.active_pair = Some((template_id.clone(), layout_id.to_string()));
        self.active = self.effective_percentages(template_id, layout_id);
        self.active.clone()
    }

    fn effective_percentages(&self, template_id: &TemplateId, layout_id: &str) -> Vec<f64> {
        let stored = self.load_sizes(template_id, layout_id);
        if stored.is_empty() {
            self.catalog
                .get_layout(layout_id)
                .map(GridLayout::default_percentages)
                .unwrap_or_default()
        } else {
            stored
        }
    }

    fn is_active(&self, template_id: &TemplateId, layout_id: &str) -> bool {
        self.active_pair
            .as_ref()
            .is_some_and(|(t, l)| t == template_id && l == layout_id)
    }

    /// Current percentage vector for the active pair.
    pub fn active_percentages(&self) -> &[f64] {
        &self.active
    }

    /// Remember the latest pixel size of a pane. In-memory only, no I/O.
    pub fn record_cell_resize(&mut self, area_id: &str, pixel_size: Size) {
        self.recorded.insert(area_id.to_string(), pixel_size);
    }

    /// Convert recorded pane sizes to percentages and persist them.
    ///
    /// Uses the layout's static orientation: widths for row layouts, heights
    /// for column layouts. Areas with no recorded size keep their active
    /// value. Recorded sizes only apply to the pair passed to
    /// [`activate`](Self::activate); any other pair is committed from its own
    /// stored or default percentages. Silently does nothing if the relevant
    /// container dimension is zero, or the layout is unknown or free-floating.
    pub fn commit_sizes(
        &mut self,
        template_id: &TemplateId,
        layout_id: &str,
        container_pixel_size: Size,
    ) {
        let Some(layout) = self.catalog.get_layout(layout_id) else {
            debug!(layout_id, "Ignoring size commit for unknown layout");
            return;
        };
        if layout.is_free_floating() {
            debug!(layout_id, "Free-floating layout has no grid sizes");
            return;
        }

        let orientation = layout.orientation();
        let container = dimension(container_pixel_size, orientation);
        if container <= 0.0 || !container.is_finite() {
            debug!(layout_id, "Container not measurable, skipping size commit");
            return;
        }

        let is_active = self.is_active(template_id, layout_id);
        let base = if is_active && self.active.len() == layout.cells {
            self.active.clone()
        } else {
            let effective = self.effective_percentages(template_id, layout_id);
            if effective.len() == layout.cells {
                effective
            } else {
                layout.default_percentages()
            }
        };

        let percentages: Vec<f64> = layout
            .areas
            .iter()
            .zip(base)
            .map(|(area, current)| match self.recorded.get(&area.id) {
                Some(size) if is_active => {
                    round_percentage(dimension(*size, orientation) / container * 100.0)
                }
                _ => current,
            })
            .collect();

        let record = TemplateGridSizeRecord {
            template_id: template_id.clone(),
            layout_id: layout_id.to_string(),
            percentages: percentages.clone(),
        };

        let key = grid_sizes_key(template_id.as_str());
        if let Err(e) = save_json(self.store.as_ref(), &key, &record) {
            warn!(error = %e, template = %template_id, "Failed to persist grid sizes");
        }

        debug!(template = %template_id, layout_id, ?percentages, "Committed grid sizes");
        if is_active {
            self.active = percentages;
        }
    }

    /// Stored percentages for `template_id`, or empty if none were stored or
    /// they were stored under a different layout.
    pub fn load_sizes(&self, template_id: &TemplateId, layout_id: &str) -> Vec<f64> {
        let key = grid_sizes_key(template_id.as_str());
        match load_json::<TemplateGridSizeRecord>(self.store.as_ref(), &key) {
            Ok(Some(record)) if record.layout_id == layout_id => record.percentages,
            Ok(_) => Vec::new(),
            Err(e) => {
                warn!(error = %e, template = %template_id, "Failed to load grid sizes");
                Vec::new()
            }
        }
    }
}

fn dimension(size: Size, orientation: SplitDirection) -> f64 {
    match orientation {
        SplitDirection::Row => size.width,
        SplitDirection::Column => size.height,
    }
}

#[cfg(test)]
#[path = "grid_size_tests.rs"]
mod tests;
