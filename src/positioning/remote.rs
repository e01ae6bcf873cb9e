//! Remote collaborators and sync tasks.
//!
//! The remote store is reached only through async functions the hosting shell
//! injects via [`Collaborators`]. Each is optional; a missing collaborator
//! turns the corresponding feature into a no-op.
//!
//! Controller operations apply local state first and hand back a [`SyncTask`]
//! for the remote half. Tasks own everything they need (no borrow of the
//! controller), so any number can be in flight at once; [`SyncQueue`] polls
//! them concurrently and feeds each [`SyncOutcome`] back to the controller.

use super::PositioningController;
use crate::model::{BackendWidgetId, CatalogWidgetId, RemoteError, TemplateId, WidgetInstanceId};
use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use tracing::{debug, error, warn};

/// Result type returned by collaborators.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// `addWidgetToRemote`.
pub type AddWidgetFn = Rc<dyn Fn(AddWidgetRequest) -> LocalBoxFuture<'static, RemoteResult<()>>>;

/// `removeWidgetFromRemote(templateId, backendId)`.
pub type RemoveWidgetFn =
    Rc<dyn Fn(TemplateId, BackendWidgetId) -> LocalBoxFuture<'static, RemoteResult<()>>>;

/// `updateWidgetFieldsRemote(backendId, templateId, fields)`.
pub type UpdateWidgetFieldsFn = Rc<
    dyn Fn(BackendWidgetId, TemplateId, WidgetFieldUpdate) -> LocalBoxFuture<'static, RemoteResult<UpdateResponse>>,
>;

/// `refreshTemplates()`.
pub type RefreshTemplatesFn = Rc<dyn Fn() -> LocalBoxFuture<'static, RemoteResult<()>>>;

/// Geometry in the remote store's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RemoteGeometry {
    /// Top offset (y).
    pub top: f64,
    /// Left offset (x).
    pub left: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Arguments to the add-to-remote collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddWidgetRequest {
    /// Owning template.
    pub template_id: TemplateId,
    /// Content type.
    pub catalog_id: CatalogWidgetId,
    /// Display title.
    pub title: String,
    /// Slot index of the new widget in the canvas list.
    pub area_position: usize,
    /// Initial geometry, identical to what was applied locally.
    pub geometry: RemoteGeometry,
}

/// Partial field update for one remote widget.
///
/// Position-only updates leave `height`/`width` unset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetFieldUpdate {
    /// New top offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_pos: Option<f64>,
    /// New left offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_pos: Option<f64>,
    /// New height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// New width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

/// Server reply to a field update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResponse {
    /// Whether the server applied the update.
    pub success: bool,
    /// Server message.
    pub message: String,
}

/// Injected remote functions. All optional.
#[derive(Clone, Default)]
pub struct Collaborators {
    /// Create a widget on a saved template.
    pub add_widget: Option<AddWidgetFn>,
    /// Delete a widget from a saved template.
    pub remove_widget: Option<RemoveWidgetFn>,
    /// Patch a widget's geometry fields.
    pub update_widget_fields: Option<UpdateWidgetFieldsFn>,
    /// Reload the template list after a structural change.
    pub refresh_templates: Option<RefreshTemplatesFn>,
}

impl Collaborators {
    /// No remote store at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether any collaborator was supplied.
    pub fn any(&self) -> bool {
        self.add_widget.is_some()
            || self.remove_widget.is_some()
            || self.update_widget_fields.is_some()
            || self.refresh_templates.is_some()
    }

    /// Supply the add-to-remote collaborator.
    pub fn with_add_widget<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(AddWidgetRequest) -> Fut + 'static,
        Fut: Future<Output = RemoteResult<()>> + 'static,
    {
        self.add_widget = Some(Rc::new(move |req| f(req).boxed_local()));
        self
    }

    /// Supply the remove-from-remote collaborator.
    pub fn with_remove_widget<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(TemplateId, BackendWidgetId) -> Fut + 'static,
        Fut: Future<Output = RemoteResult<()>> + 'static,
    {
        self.remove_widget = Some(Rc::new(move |template, backend| {
            f(template, backend).boxed_local()
        }));
        self
    }

    /// Supply the update-fields collaborator.
    pub fn with_update_widget_fields<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(BackendWidgetId, TemplateId, WidgetFieldUpdate) -> Fut + 'static,
        Fut: Future<Output = RemoteResult<UpdateResponse>> + 'static,
    {
        self.update_widget_fields = Some(Rc::new(move |backend, template, fields| {
            f(backend, template, fields).boxed_local()
        }));
        self
    }

    /// Supply the refresh collaborator.
    pub fn with_refresh_templates<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = RemoteResult<()>> + 'static,
    {
        self.refresh_templates = Some(Rc::new(move || f().boxed_local()));
        self
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("add_widget", &self.add_widget.is_some())
            .field("remove_widget", &self.remove_widget.is_some())
            .field("update_widget_fields", &self.update_widget_fields.is_some())
            .field("refresh_templates", &self.refresh_templates.is_some())
            .finish()
    }
}

/// What a finished sync task reports back.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Widget created remotely (templates refreshed).
    Added {
        /// Local instance id of the widget.
        id: WidgetInstanceId,
    },
    /// Remote creation failed; the widget stays local-only.
    AddFailed {
        /// Local instance id of the widget.
        id: WidgetInstanceId,
        /// What went wrong.
        error: RemoteError,
    },
    /// Widget deleted remotely; the controller removes it locally on apply.
    Removed {
        /// Instance id of the widget.
        id: WidgetInstanceId,
    },
    /// Remote deletion failed; the widget stays.
    RemoveFailed {
        /// Instance id of the widget.
        id: WidgetInstanceId,
        /// What went wrong.
        error: RemoteError,
    },
    /// Geometry fields saved remotely.
    Updated {
        /// Instance id of the widget.
        id: WidgetInstanceId,
    },
    /// Geometry update failed; local geometry is kept.
    UpdateFailed {
        /// Instance id of the widget.
        id: WidgetInstanceId,
        /// What went wrong.
        error: RemoteError,
    },
}

/// Remote half of a controller operation.
pub type SyncTask = LocalBoxFuture<'static, SyncOutcome>;

async fn refresh(collaborators: &Collaborators) {
    if let Some(refresh) = &collaborators.refresh_templates {
        if let Err(e) = refresh().await {
            warn!(error = %e, "Template refresh failed");
        }
    }
}

/// Build the task that creates `id` remotely and then refreshes templates.
///
/// Returns `None` if no add collaborator was supplied.
pub(crate) fn add_task(
    collaborators: &Collaborators,
    id: WidgetInstanceId,
    request: AddWidgetRequest,
) -> Option<SyncTask> {
    let add = collaborators.add_widget.clone()?;
    let collaborators = collaborators.clone();
    Some(
        async move {
            match add(request).await {
                Ok(()) => {
                    debug!(widget = %id, "Widget added to remote template");
                    refresh(&collaborators).await;
                    SyncOutcome::Added { id }
                }
                Err(error) => {
                    error!(widget = %id, %error, "Failed to add widget to remote template");
                    SyncOutcome::AddFailed { id, error }
                }
            }
        }
        .boxed_local(),
    )
}

/// Build the task that deletes `id` remotely and then refreshes templates.
///
/// Returns `None` if no remove collaborator was supplied.
pub(crate) fn remove_task(
    collaborators: &Collaborators,
    id: WidgetInstanceId,
    template_id: TemplateId,
    backend_id: BackendWidgetId,
) -> Option<SyncTask> {
    let remove = collaborators.remove_widget.clone()?;
    let collaborators = collaborators.clone();
    Some(
        async move {
            match remove(template_id, backend_id).await {
                Ok(()) => {
                    debug!(widget = %id, "Widget removed from remote template");
                    refresh(&collaborators).await;
                    SyncOutcome::Removed { id }
                }
                Err(error) => {
                    error!(widget = %id, %error, "Failed to remove widget from remote template");
                    SyncOutcome::RemoveFailed { id, error }
                }
            }
        }
        .boxed_local(),
    )
}

/// Build the task that patches geometry fields of `id` remotely.
///
/// Returns `None` if no update collaborator was supplied.
pub(crate) fn update_task(
    collaborators: &Collaborators,
    id: WidgetInstanceId,
    template_id: TemplateId,
    backend_id: BackendWidgetId,
    fields: WidgetFieldUpdate,
) -> Option<SyncTask> {
    let update = collaborators.update_widget_fields.clone()?;
    Some(
        async move {
            let result = update(backend_id, template_id, fields)
                .await
                .and_then(|response| {
                    if response.success {
                        Ok(())
                    } else {
                        Err(RemoteError::Rejected {
                            message: response.message,
                        })
                    }
                });
            match result {
                Ok(()) => SyncOutcome::Updated { id },
                Err(error) => {
                    error!(widget = %id, %error, "Failed to update remote widget fields");
                    SyncOutcome::UpdateFailed { id, error }
                }
            }
        }
        .boxed_local(),
    )
}

/// Polls outstanding sync tasks concurrently.
#[derive(Default)]
pub struct SyncQueue {
    in_flight: FuturesUnordered<SyncTask>,
}

impl SyncQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a task; `None` is ignored so operation results can be passed
    /// straight through.
    pub fn push(&mut self, task: Option<SyncTask>) {
        if let Some(task) = task {
            self.in_flight.push(task);
        }
    }

    /// Number of tasks still running.
    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Wait for the next task to finish, in completion order.
    pub async fn next_outcome(&mut self) -> Option<SyncOutcome> {
        self.in_flight.next().await
    }

    /// Run every queued task to completion, applying each outcome to
    /// `controller` as it arrives.
    pub async fn drain_into(&mut self, controller: &mut PositioningController) -> Vec<SyncOutcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.next_outcome().await {
            controller.apply_outcome(&outcome);
            outcomes.push(outcome);
        }
        outcomes
    }
}

impl fmt::Debug for SyncQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncQueue")
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}
