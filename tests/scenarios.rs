//! End-to-end scenarios across the catalog, grid sizes, gestures and the
//! positioning controller, backed by the on-disk store.

use futures::executor::block_on;
use gridboard::catalog::LayoutCatalog;
use gridboard::floating::{GeometryLimits, GestureEvent, GestureTracker, ResizeHandle};
use gridboard::grid_size::GridSizeTracker;
use gridboard::model::{
    CanvasSize, CatalogEntry, CatalogWidgetId, Position, Rect, RemoteError, Size, TemplateId,
    WidgetInstanceId,
};
use gridboard::positioning::{
    Collaborators, ConfirmedRemoval, ControllerSettings, PositioningController, RemovalStep,
    SyncOutcome, SyncQueue, TemplateContext,
};
use gridboard::store::FileStore;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("gridboard_scenario_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn template(id: &str) -> TemplateId {
    TemplateId::new(id).unwrap()
}

fn chart() -> CatalogEntry {
    CatalogEntry::new(CatalogWidgetId::new("chart").unwrap(), "Chart")
}

#[test]
fn grid_sizes_survive_restart() {
    let dir = temp_dir("grid_sizes");
    let t1 = template("t1");

    let mut tracker = GridSizeTracker::new(Box::new(FileStore::new(&dir)));
    assert_eq!(tracker.activate(&t1, "grid-1x2"), vec![50.0, 50.0]);
    tracker.record_cell_resize("area-1", Size::new(250.0, 600.0));
    tracker.record_cell_resize("area-2", Size::new(750.0, 600.0));
    tracker.commit_sizes(&t1, "grid-1x2", Size::new(1000.0, 600.0));

    let mut restarted = GridSizeTracker::new(Box::new(FileStore::new(&dir)));
    assert_eq!(restarted.activate(&t1, "grid-1x2"), vec![25.0, 75.0]);
    assert!(
        restarted.load_sizes(&t1, "grid-2x2").is_empty(),
        "Sizes recorded for another layout must not apply"
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn local_only_canvas_add_then_remove() {
    let dir = temp_dir("local_only");
    let mut controller = PositioningController::new(
        TemplateContext::new(template("draft"), false),
        Box::new(FileStore::new(&dir)),
        Collaborators::none(),
        ControllerSettings::default(),
    );
    controller.set_canvas_size(CanvasSize::measured(1200.0, 900.0));

    let added = controller.add_widget(&chart()).unwrap();
    assert!(added.sync.is_none());
    assert_eq!(controller.widgets().len(), 1);

    assert_eq!(controller.remove_widget(&added.id), RemovalStep::Removed);
    assert!(controller.widgets().is_empty());

    let reopened = PositioningController::new(
        TemplateContext::new(template("draft"), false),
        Box::new(FileStore::new(&dir)),
        Collaborators::none(),
        ControllerSettings::default(),
    );
    assert!(reopened.widgets().is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn rejected_remote_add_keeps_local_widget_without_refresh() {
    let dir = temp_dir("remote_add_rejected");
    let refreshes = Rc::new(Cell::new(0));
    let counter = refreshes.clone();
    let collaborators = Collaborators::none()
        .with_add_widget(|_request| async { Err(RemoteError::Failed("HTTP 500".into())) })
        .with_refresh_templates(move || {
            counter.set(counter.get() + 1);
            async { Ok(()) }
        });

    let mut controller = PositioningController::new(
        TemplateContext::new(template("t1"), true),
        Box::new(FileStore::new(&dir)),
        collaborators,
        ControllerSettings::default(),
    );
    controller.set_canvas_size(CanvasSize::measured(1600.0, 1000.0));

    let mut queue = SyncQueue::new();
    queue.push(controller.add_widget(&chart()).unwrap().sync);
    let outcomes = block_on(queue.drain_into(&mut controller));

    assert!(matches!(outcomes.as_slice(), [SyncOutcome::AddFailed { .. }]));
    assert_eq!(controller.widgets().len(), 1);
    assert_eq!(refreshes.get(), 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn drag_and_resize_gestures_commit_through_controller() {
    let dir = temp_dir("gestures");
    let mut controller = PositioningController::new(
        TemplateContext::new(template("t1"), false),
        Box::new(FileStore::new(&dir)),
        Collaborators::none(),
        ControllerSettings::default(),
    );
    let canvas = CanvasSize::measured(1000.0, 800.0);
    controller.set_canvas_size(canvas);
    let id = controller.add_widget(&chart()).unwrap().id;
    controller.update_geometry(
        &id,
        Some(Position::new(100.0, 100.0)),
        Some(Size::new(400.0, 300.0)),
    );

    let mut gestures = GestureTracker::new(GeometryLimits::default());
    let start = controller.widget(&id).unwrap().rect();
    assert!(gestures.begin_resize(&id, ResizeHandle::NW, Position::new(100.0, 100.0), start));

    let frame = gestures
        .pointer_move(&id, Position::new(150.0, 130.0), canvas)
        .unwrap();
    assert_eq!(
        frame,
        GestureEvent::Resized {
            rect: Rect::new(150.0, 130.0, 350.0, 270.0)
        }
    );
    controller.apply_gesture_event(&id, frame);

    let commit = gestures
        .pointer_up(&id, Position::new(150.0, 130.0), canvas)
        .unwrap();
    assert!(commit.is_commit());
    assert!(controller.apply_gesture_event(&id, commit).is_none());

    let reopened = PositioningController::new(
        TemplateContext::new(template("t1"), false),
        Box::new(FileStore::new(&dir)),
        Collaborators::none(),
        ControllerSettings::default(),
    );
    assert_eq!(
        reopened.widget(&id).unwrap().rect(),
        Rect::new(150.0, 130.0, 350.0, 270.0)
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn remote_removal_targets_backend_id_of_composite() {
    let dir = temp_dir("remote_remove");
    let removed = Rc::new(Cell::new(None::<u64>));
    let sink = removed.clone();
    let collaborators = Collaborators::none().with_remove_widget(move |_template, backend| {
        sink.set(backend.as_str().parse().ok());
        async { Ok(()) }
    });

    let mut controller = PositioningController::new(
        TemplateContext::new(template("t1"), true),
        Box::new(FileStore::new(&dir)),
        collaborators,
        ControllerSettings::default(),
    );
    controller.load_remote_widgets(&[serde_json::from_str(
        r#"{"backend_id":"77","catalog_id":"news","top_pos":0,"left_pos":0,"width":400,"height":300}"#,
    )
    .unwrap()]);

    let id: WidgetInstanceId = "t1-77".parse().unwrap();
    assert_eq!(controller.remove_widget(&id), RemovalStep::AwaitingConfirmation);
    let ConfirmedRemoval::Syncing(task) = controller.confirm_removal() else {
        panic!("expected a remote removal");
    };
    let outcome = block_on(task);
    controller.apply_outcome(&outcome);

    assert_eq!(removed.get(), Some(77));
    assert!(controller.widgets().is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn id_extraction_examples() {
    let composite: WidgetInstanceId = "t1-77".parse().unwrap();
    assert_eq!(composite.backend_id().unwrap().as_str(), "77");

    let hyphenated: WidgetInstanceId = "my-template-42".parse().unwrap();
    assert_eq!(hyphenated.backend_id().unwrap().as_str(), "42");

    let bare: WidgetInstanceId = "42".parse().unwrap();
    assert_eq!(bare.backend_id().unwrap().as_str(), "42");

    let local: WidgetInstanceId = "floating-chart-1700000000000-ab12cde34".parse().unwrap();
    assert!(local.is_local());
    assert_eq!(local.backend_id(), None);

    assert!("".parse::<WidgetInstanceId>().is_err());
}

#[test]
fn free_floating_layout_is_in_catalog() {
    let catalog = LayoutCatalog::builtin();
    let layout = catalog.get_layout("free-floating").unwrap();
    assert!(layout.is_free_floating());
    assert!(layout.default_percentages().is_empty());
    assert!(catalog.validate().is_ok());
}
