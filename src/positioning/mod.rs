//! Positioning controller / persistence orchestrator.
//!
//! Owns the authoritative floating-widget list for one canvas and decides,
//! per operation, what goes to the local store and what goes to the remote
//! store. Local state is optimistic: it is applied before any remote call is
//! issued and never rolled back when one fails.
//!
//! # Module Structure
//!
//! - `persistence`: per-template load/save of the list, id reconciliation
//! - `remote`: injected collaborators, sync tasks, `SyncQueue`

pub mod persistence;
pub mod remote;

use crate::floating::{initial_geometry, GestureEvent, InitialSizing};
use crate::model::{
    CanvasSize, CatalogEntry, CatalogWidgetId, FloatingWidgetInstance, LocalInstanceId, Position,
    Rect, RemoteWidgetRecord, Size, TemplateId, WidgetInstanceId,
};
use crate::store::LocalStore;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use persistence::{load_widgets, peek_widgets, save_widgets};
pub use remote::{
    AddWidgetRequest, Collaborators, RemoteGeometry, SyncOutcome, SyncQueue, SyncTask,
    UpdateResponse, WidgetFieldUpdate,
};

/// Catalog widgets that can never be placed on a free-floating canvas.
pub const DEFAULT_EXCLUDED_WIDGETS: &[&str] = &["ticker-tape"];

/// The template whose canvas the controller manages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    /// Template id; also the local-store key scope.
    pub template_id: TemplateId,
    /// Whether the template exists on the server.
    pub saved: bool,
}

impl TemplateContext {
    /// Context for a template.
    pub fn new(template_id: TemplateId, saved: bool) -> Self {
        Self { template_id, saved }
    }
}

/// Where a widget collection's changes are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceMode {
    /// Device storage only.
    LocalOnly,
    /// Device storage plus the remote store.
    RemoteBacked,
}

impl PersistenceMode {
    /// Remote-backed iff the template is saved and some collaborator exists.
    pub fn derive(saved: bool, collaborators: &Collaborators) -> Self {
        if saved && collaborators.any() {
            PersistenceMode::RemoteBacked
        } else {
            PersistenceMode::LocalOnly
        }
    }
}

/// Tunables for the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    /// Initial size/placement policy.
    pub sizing: InitialSizing,
    /// Catalog widget ids rejected by `add_widget`.
    pub excluded_widgets: Vec<String>,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            sizing: InitialSizing::default(),
            excluded_widgets: DEFAULT_EXCLUDED_WIDGETS
                .iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }
}

/// Transient notice shown instead of adding a widget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddRejected {
    /// This widget type cannot float.
    #[error("{title} can't be used in a free-floating layout")]
    ExcludedFromFloating {
        /// Rejected catalog id.
        widget_id: CatalogWidgetId,
        /// Title for the toast.
        title: String,
    },
}

/// A widget was appended.
pub struct WidgetAdded {
    /// Id of the new instance.
    pub id: WidgetInstanceId,
    /// Remote half, present only in remote-backed mode.
    pub sync: Option<SyncTask>,
}

/// Result of `remove_widget`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalStep {
    /// Removed immediately (local-only mode).
    Removed,
    /// Removal armed; call `confirm_removal` or `cancel_removal`.
    AwaitingConfirmation,
    /// No widget with this id.
    NotFound,
}

/// Result of `confirm_removal`.
pub enum ConfirmedRemoval {
    /// Removed locally; nothing to sync (local id or no remove collaborator).
    RemovedLocally,
    /// Remote removal in flight; the widget is removed locally when the task's
    /// outcome is applied.
    Syncing(SyncTask),
    /// Nothing was pending.
    NothingPending,
}

/// Owns the floating-widget list for one template's canvas.
pub struct PositioningController {
    context: TemplateContext,
    collaborators: Collaborators,
    store: Box<dyn LocalStore>,
    settings: ControllerSettings,
    widgets: Vec<FloatingWidgetInstance>,
    pending_removal: Option<WidgetInstanceId>,
    canvas: Option<CanvasSize>,
    viewport: Option<CanvasSize>,
}

impl PositioningController {
    /// Create a controller and load the template's saved list.
    pub fn new(
        context: TemplateContext,
        store: Box<dyn LocalStore>,
        collaborators: Collaborators,
        settings: ControllerSettings,
    ) -> Self {
        let widgets = load_widgets(store.as_ref(), &context.template_id, now_millis());
        info!(
            template = %context.template_id,
            count = widgets.len(),
            "Loaded floating widgets"
        );
        Self {
            context,
            collaborators,
            store,
            settings,
            widgets,
            pending_removal: None,
            canvas: None,
            viewport: None,
        }
    }

    /// Current template.
    pub fn context(&self) -> &TemplateContext {
        &self.context
    }

    /// Persistence mode derived from the template and collaborators.
    pub fn persistence_mode(&self) -> PersistenceMode {
        PersistenceMode::derive(self.context.saved, &self.collaborators)
    }

    /// All widgets, in insertion order.
    pub fn widgets(&self) -> &[FloatingWidgetInstance] {
        &self.widgets
    }

    /// Look up one widget.
    pub fn widget(&self, id: &WidgetInstanceId) -> Option<&FloatingWidgetInstance> {
        self.widgets.iter().find(|w| &w.id == id)
    }

    /// Id awaiting removal confirmation, if any.
    pub fn pending_removal(&self) -> Option<&WidgetInstanceId> {
        self.pending_removal.as_ref()
    }

    /// Latest canvas measurement (`None` while unmeasurable).
    pub fn canvas(&self) -> Option<CanvasSize> {
        self.canvas
    }

    /// Update the canvas measurement.
    pub fn set_canvas_size(&mut self, canvas: Option<CanvasSize>) {
        self.canvas = canvas;
    }

    /// Update the viewport measurement used before the canvas is measurable.
    pub fn set_viewport_size(&mut self, viewport: Option<CanvasSize>) {
        self.viewport = viewport;
    }

    /// Switch to another template's canvas, reloading its saved list.
    pub fn switch_template(&mut self, context: TemplateContext) {
        self.pending_removal = None;
        self.widgets = load_widgets(self.store.as_ref(), &context.template_id, now_millis());
        debug!(
            template = %context.template_id,
            count = self.widgets.len(),
            "Switched floating canvas template"
        );
        self.context = context;
    }

    /// Mark the current template as saved (or not) on the server.
    pub fn set_template_saved(&mut self, saved: bool) {
        self.context.saved = saved;
    }

    /// Add a widget from the catalog.
    ///
    /// # Errors
    ///
    /// Returns `AddRejected` for widget types that cannot float; state is
    /// unchanged in that case.
    pub fn add_widget(&mut self, entry: &CatalogEntry) -> Result<WidgetAdded, AddRejected> {
        if self
            .settings
            .excluded_widgets
            .iter()
            .any(|excluded| excluded == entry.id.as_str())
        {
            info!(widget = %entry.id, "Rejected widget excluded from floating layouts");
            return Err(AddRejected::ExcludedFromFloating {
                widget_id: entry.id.clone(),
                title: entry.title.clone(),
            });
        }

        let rect = match self.canvas.or(self.viewport) {
            Some(area) => initial_geometry(area, self.settings.sizing),
            None => Rect::new(
                0.0,
                0.0,
                self.settings.sizing.min_width,
                self.settings.sizing.min_height,
            ),
        };

        let id = WidgetInstanceId::Local(LocalInstanceId::generate(
            &entry.id,
            now_millis(),
            &random_token(),
        ));
        let area_position = self.widgets.len();
        self.widgets.push(FloatingWidgetInstance {
            id: id.clone(),
            widget_id: entry.id.clone(),
            title: Some(entry.title.clone()),
            position: rect.position,
            size: rect.size,
        });
        self.persist();
        debug!(widget = %id, ?rect, "Added floating widget");

        let sync = match self.persistence_mode() {
            PersistenceMode::LocalOnly => None,
            PersistenceMode::RemoteBacked => remote::add_task(
                &self.collaborators,
                id.clone(),
                AddWidgetRequest {
                    template_id: self.context.template_id.clone(),
                    catalog_id: entry.id.clone(),
                    title: entry.title.clone(),
                    area_position,
                    geometry: RemoteGeometry {
                        top: rect.position.y,
                        left: rect.position.x,
                        width: rect.size.width,
                        height: rect.size.height,
                    },
                },
            ),
        };

        Ok(WidgetAdded { id, sync })
    }

    /// Request removal of a widget.
    ///
    /// Local-only canvases remove immediately. Remote-backed canvases arm a
    /// single pending removal that must be confirmed; arming a new one
    /// replaces the previous.
    pub fn remove_widget(&mut self, id: &WidgetInstanceId) -> RemovalStep {
        if self.widget(id).is_none() {
            return RemovalStep::NotFound;
        }

        match self.persistence_mode() {
            PersistenceMode::LocalOnly => {
                self.remove_locally(id);
                RemovalStep::Removed
            }
            PersistenceMode::RemoteBacked => {
                debug!(widget = %id, "Removal awaiting confirmation");
                self.pending_removal = Some(id.clone());
                RemovalStep::AwaitingConfirmation
            }
        }
    }

    /// Confirm the pending removal.
    pub fn confirm_removal(&mut self) -> ConfirmedRemoval {
        let Some(id) = self.pending_removal.take() else {
            return ConfirmedRemoval::NothingPending;
        };

        let task = id.backend_id().cloned().and_then(|backend_id| {
            remote::remove_task(
                &self.collaborators,
                id.clone(),
                self.context.template_id.clone(),
                backend_id,
            )
        });

        match task {
            Some(task) => ConfirmedRemoval::Syncing(task),
            None => {
                self.remove_locally(&id);
                ConfirmedRemoval::RemovedLocally
            }
        }
    }

    /// Drop the pending removal without doing anything.
    pub fn cancel_removal(&mut self) {
        self.pending_removal = None;
    }

    /// Update a widget's geometry and persist it.
    ///
    /// Always updates memory and the local store. In remote-backed mode, for
    /// widgets the server knows about, also returns a task patching the
    /// remote fields; a position-only call omits height and width.
    pub fn update_geometry(
        &mut self,
        id: &WidgetInstanceId,
        position: Option<Position>,
        size: Option<Size>,
    ) -> Option<SyncTask> {
        let Some(widget) = self.widgets.iter_mut().find(|w| &w.id == id) else {
            debug!(widget = %id, "Geometry update for unknown widget ignored");
            return None;
        };
        if let Some(position) = position {
            widget.position = position;
        }
        if let Some(size) = size {
            widget.size = size;
        }
        self.persist();

        if self.persistence_mode() != PersistenceMode::RemoteBacked {
            return None;
        }
        let Some(backend_id) = id.backend_id() else {
            debug!(widget = %id, "Local-only widget, skipping remote update");
            return None;
        };

        let fields = WidgetFieldUpdate {
            top_pos: position.map(|p| p.y),
            left_pos: position.map(|p| p.x),
            height: size.map(|s| s.height),
            width: size.map(|s| s.width),
        };
        remote::update_task(
            &self.collaborators,
            id.clone(),
            self.context.template_id.clone(),
            backend_id.clone(),
            fields,
        )
    }

    /// Feed a gesture frame into the widget list.
    ///
    /// Intermediate frames only touch memory; committed frames go through
    /// [`PositioningController::update_geometry`].
    pub fn apply_gesture_event(
        &mut self,
        id: &WidgetInstanceId,
        event: GestureEvent,
    ) -> Option<SyncTask> {
        match event {
            GestureEvent::Moved { position } => {
                if let Some(widget) = self.widgets.iter_mut().find(|w| &w.id == id) {
                    widget.position = position;
                }
                None
            }
            GestureEvent::Resized { rect } => {
                if let Some(widget) = self.widgets.iter_mut().find(|w| &w.id == id) {
                    widget.position = rect.position;
                    widget.size = rect.size;
                }
                None
            }
            GestureEvent::PositionCommitted { position } => {
                self.update_geometry(id, Some(position), None)
            }
            GestureEvent::SizeCommitted { size, position } => {
                self.update_geometry(id, Some(position), Some(size))
            }
        }
    }

    /// Replace the list with the widgets of a saved remote template.
    pub fn load_remote_widgets(&mut self, records: &[RemoteWidgetRecord]) {
        self.pending_removal = None;
        self.widgets = records
            .iter()
            .filter_map(|record| {
                let backend_id = record.backend_id()?;
                let Ok(widget_id) = CatalogWidgetId::new(record.catalog_id.clone()) else {
                    warn!(backend_id = %backend_id, "Remote widget without catalog id skipped");
                    return None;
                };
                Some(FloatingWidgetInstance {
                    id: WidgetInstanceId::composite(self.context.template_id.clone(), backend_id),
                    widget_id,
                    title: record.title.clone(),
                    position: Position::new(record.left_pos, record.top_pos),
                    size: Size::new(record.width, record.height),
                })
            })
            .collect();
        self.persist();
        info!(
            template = %self.context.template_id,
            count = self.widgets.len(),
            "Loaded floating widgets from remote template"
        );
    }

    /// Apply a finished sync task's outcome.
    ///
    /// Only a successful remote removal changes local state; failures were
    /// already logged by the task and never roll anything back.
    pub fn apply_outcome(&mut self, outcome: &SyncOutcome) {
        if let SyncOutcome::Removed { id } = outcome {
            self.remove_locally(id);
        }
    }

    fn remove_locally(&mut self, id: &WidgetInstanceId) {
        let before = self.widgets.len();
        self.widgets.retain(|w| &w.id != id);
        if self.pending_removal.as_ref() == Some(id) {
            self.pending_removal = None;
        }
        if self.widgets.len() != before {
            debug!(widget = %id, "Removed floating widget");
            self.persist();
        }
    }

    fn persist(&self) {
        save_widgets(self.store.as_ref(), &self.context.template_id, &self.widgets);
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Nine lowercase alphanumerics, e.g. `ab12cde34`.
fn random_token() -> String {
    let mut token = uuid::Uuid::new_v4().simple().to_string();
    token.truncate(9);
    token
}

#[cfg(test)]
#[path = "positioning_tests.rs"]
mod tests;
