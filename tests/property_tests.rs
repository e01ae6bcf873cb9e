//! Property-based tests for catalog and geometry invariants.
//!
//! Tests validate:
//! 1. Every layout partitions its area ids at every nesting level
//! 2. Every split's ratios sum to ~100 and match its child count
//! 3. Resizes on all 8 handles respect the minimum size and the canvas,
//!    including starts that already break them
//! 4. Drags stay inside `[0, canvas - size]`
//! 5. Widget instance ids survive a display/parse round trip

use gridboard::catalog::{LayoutCatalog, LayoutNode};
use gridboard::floating::{drag_position, resize, GeometryLimits, ResizeHandle};
use gridboard::model::{CanvasSize, Position, Rect, Size, WidgetInstanceId};
use proptest::prelude::*;
use std::collections::HashSet;

const EPS: f64 = 1e-9;

// ===== Property 1 & 2: Catalog structure =====

fn check_partition(node: &LayoutNode) -> Result<(), String> {
    if let LayoutNode::Split(split) = node {
        let mut seen = HashSet::new();
        for group in split.groups() {
            for id in group {
                if !seen.insert(id) {
                    return Err(format!("area {id} appears in two groups of one split"));
                }
            }
        }
        for child in &split.children {
            check_partition(child)?;
        }
    }
    Ok(())
}

#[test]
fn every_layout_partitions_areas_at_every_level() {
    for layout in LayoutCatalog::builtin().list_layouts() {
        if let Some(root) = &layout.root {
            let placed: HashSet<&str> = root.area_ids().into_iter().collect();
            let declared: HashSet<&str> = layout.area_ids().into_iter().collect();
            assert_eq!(placed, declared, "Layout {} must place every area once", layout.id);
            if let Err(e) = check_partition(root) {
                panic!("Layout {}: {}", layout.id, e);
            }
        } else {
            assert!(layout.is_free_floating(), "Only free-floating may lack a root");
        }
    }
}

#[test]
fn every_split_ratio_sums_to_about_one_hundred() {
    for layout in LayoutCatalog::builtin().list_layouts() {
        for split in layout.splits() {
            assert_eq!(
                split.ratio.len(),
                split.children.len(),
                "Layout {} ratio arity",
                layout.id
            );
            let sum = split.ratio_sum();
            assert!(
                (99.0..=101.0).contains(&sum),
                "Layout {} split sums to {}",
                layout.id,
                sum
            );
        }
    }
}

#[test]
fn default_percentages_have_one_entry_per_area() {
    for layout in LayoutCatalog::builtin().list_layouts() {
        assert_eq!(
            layout.default_percentages().len(),
            layout.cells,
            "Layout {}",
            layout.id
        );
    }
}

// ===== Property 3 & 4: Geometry =====

/// A canvas and a widget that fits inside it with at least the minimum size.
fn canvas_and_rect() -> impl Strategy<Value = (CanvasSize, Rect)> {
    (400.0f64..3000.0, 300.0f64..2000.0).prop_flat_map(|(cw, ch)| {
        (200.0f64..=cw, 150.0f64..=ch).prop_flat_map(move |(w, h)| {
            (0.0f64..=(cw - w), 0.0f64..=(ch - h)).prop_map(move |(x, y)| {
                (
                    CanvasSize::measured(cw, ch).expect("positive canvas"),
                    Rect::new(x, y, w, h),
                )
            })
        })
    })
}

/// A canvas and a widget as it may arrive from storage: below the minimum
/// size, or hanging off the right and bottom edges.
fn loaded_canvas_and_rect() -> impl Strategy<Value = (CanvasSize, Rect)> {
    (400.0f64..3000.0, 300.0f64..2000.0).prop_flat_map(|(cw, ch)| {
        (20.0f64..=cw, 20.0f64..=ch, 0.0f64..cw, 0.0f64..ch).prop_map(move |(w, h, x, y)| {
            (
                CanvasSize::measured(cw, ch).expect("positive canvas"),
                Rect::new(x, y, w, h),
            )
        })
    })
}

fn any_handle() -> impl Strategy<Value = ResizeHandle> {
    prop::sample::select(ResizeHandle::ALL.to_vec())
}

proptest! {
    #[test]
    fn resize_respects_minimum_and_canvas(
        (canvas, start) in canvas_and_rect(),
        handle in any_handle(),
        dx in -4000.0f64..4000.0,
        dy in -4000.0f64..4000.0,
    ) {
        let limits = GeometryLimits::default();
        let next = resize(start, Position::new(dx, dy), handle, canvas, limits);

        prop_assert!(next.size.width >= limits.min_width - EPS, "width {:?}", next);
        prop_assert!(next.size.height >= limits.min_height - EPS, "height {:?}", next);
        prop_assert!(next.position.x >= -EPS, "x {:?}", next);
        prop_assert!(next.position.y >= -EPS, "y {:?}", next);
        prop_assert!(next.right() <= canvas.width() + EPS, "right {:?} on {:?}", next, canvas);
        prop_assert!(next.bottom() <= canvas.height() + EPS, "bottom {:?} on {:?}", next, canvas);
    }

    #[test]
    fn resize_repairs_out_of_limit_starts(
        (canvas, start) in loaded_canvas_and_rect(),
        handle in any_handle(),
        dx in -4000.0f64..4000.0,
        dy in -4000.0f64..4000.0,
    ) {
        let limits = GeometryLimits::default();
        let next = resize(start, Position::new(dx, dy), handle, canvas, limits);

        prop_assert!(next.size.width >= limits.min_width - EPS, "width {:?}", next);
        prop_assert!(next.size.height >= limits.min_height - EPS, "height {:?}", next);
        prop_assert!(next.position.x >= -EPS, "x {:?}", next);
        prop_assert!(next.position.y >= -EPS, "y {:?}", next);
        prop_assert!(next.right() <= canvas.width() + EPS, "right {:?} on {:?}", next, canvas);
        prop_assert!(next.bottom() <= canvas.height() + EPS, "bottom {:?} on {:?}", next, canvas);
    }

    #[test]
    fn resize_leaves_unaffected_axes_alone(
        (canvas, start) in canvas_and_rect(),
        dx in -4000.0f64..4000.0,
        dy in -4000.0f64..4000.0,
    ) {
        let limits = GeometryLimits::default();

        let horizontal = resize(start, Position::new(dx, dy), ResizeHandle::E, canvas, limits);
        prop_assert_eq!(horizontal.position.y, start.position.y);
        prop_assert_eq!(horizontal.size.height, start.size.height);

        let vertical = resize(start, Position::new(dx, dy), ResizeHandle::S, canvas, limits);
        prop_assert_eq!(vertical.position.x, start.position.x);
        prop_assert_eq!(vertical.size.width, start.size.width);
    }

    #[test]
    fn drag_stays_inside_canvas(
        (canvas, start) in canvas_and_rect(),
        px in -5000.0f64..5000.0,
        py in -5000.0f64..5000.0,
        gx in 0.0f64..200.0,
        gy in 0.0f64..150.0,
    ) {
        let size = start.size;
        let pos = drag_position(Position::new(px, py), Position::new(gx, gy), size, canvas);

        prop_assert!(pos.x >= 0.0 && pos.x <= canvas.width() - size.width + EPS);
        prop_assert!(pos.y >= 0.0 && pos.y <= canvas.height() - size.height + EPS);
    }

    #[test]
    fn composite_ids_round_trip(template in "[a-z0-9]{1,7}(-[a-z0-9]{1,7})?", backend in "[0-9]{1,6}") {
        let raw = format!("{template}-{backend}");
        let id: WidgetInstanceId = raw.parse().expect("non-empty id parses");

        prop_assert_eq!(id.to_string(), raw);
        prop_assert_eq!(id.backend_id().map(|b| b.as_str().to_string()), Some(backend));
        prop_assert!(!id.is_local());
    }
}

#[test]
fn oversized_widget_drag_pins_to_origin() {
    let canvas = CanvasSize::measured(800.0, 600.0).unwrap();
    let pos = drag_position(
        Position::new(500.0, 400.0),
        Position::new(10.0, 10.0),
        Size::new(800.0, 600.0),
        canvas,
    );
    assert_eq!(pos, Position::new(0.0, 0.0));
}
