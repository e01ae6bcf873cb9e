//! Tests for the layout catalog.

use super::*;
use crate::model::LayoutError;

// ===== Test Helpers =====

fn catalog() -> &'static LayoutCatalog {
    LayoutCatalog::builtin()
}

fn area(id: &str) -> GridArea {
    GridArea {
        id: id.to_string(),
        row: 0,
        column: 0,
        row_span: 1,
        column_span: 1,
    }
}

fn two_area_layout(ratio: Vec<f64>, children: Vec<LayoutNode>) -> GridLayout {
    GridLayout {
        id: "broken".to_string(),
        name: "Broken".to_string(),
        cells: 2,
        areas: vec![area("area-1"), area("area-2")],
        root: Some(LayoutNode::Split(SplitConfig {
            direction: SplitDirection::Row,
            ratio,
            children,
        })),
    }
}

// ===== Lookup Tests =====

#[test]
fn builtin_catalog_has_about_forty_layouts() {
    let count = catalog().list_layouts().len();
    assert!(
        (40..=50).contains(&count),
        "Expected ~40 layouts, got {}",
        count
    );
}

#[test]
fn get_layout_finds_uniform_grid() {
    let layout = catalog().get_layout("grid-2x2").expect("grid-2x2 exists");
    assert_eq!(layout.cells, 4);
    assert_eq!(layout.name, "2 × 2 Grid");
}

#[test]
fn get_layout_returns_none_for_unknown_id() {
    assert!(catalog().get_layout("grid-99x99").is_none());
}

#[test]
fn require_layout_reports_unknown_id() {
    assert_eq!(
        catalog().require_layout("nope"),
        Err(LayoutError::UnknownLayout("nope".to_string()))
    );
}

#[test]
fn get_layout_by_name_is_case_insensitive() {
    let layout = catalog()
        .get_layout_by_name("main + sidebar")
        .expect("named layout exists");
    assert_eq!(layout.id, "main-sidebar");
}

#[test]
fn large_generated_layouts_exist() {
    for cells in [16, 24, 28, 32] {
        assert!(
            !catalog().list_layouts_with_cells(cells).is_empty(),
            "Expected a {}-cell layout",
            cells
        );
    }
}

#[test]
fn free_floating_sentinel_has_zero_cells() {
    let layout = catalog()
        .get_layout(FREE_FLOATING_LAYOUT_ID)
        .expect("sentinel exists");
    assert_eq!(layout.cells, 0);
    assert!(layout.is_free_floating());
    assert_eq!(layout.mode(), LayoutMode::FreeFloating);
    assert!(layout.splits().is_empty());
    assert_eq!(layout.validate(), Ok(()));
}

#[test]
fn grid_layouts_report_grid_mode() {
    let layout = catalog().get_layout("grid-1x2").unwrap();
    assert_eq!(layout.mode(), LayoutMode::Grid);
}

// ===== Invariant Tests =====

#[test]
fn whole_builtin_catalog_validates() {
    assert_eq!(catalog().validate(), Ok(()));
}

#[test]
fn every_split_partitions_its_region_exactly_once() {
    for layout in catalog().list_layouts() {
        for split in layout.splits() {
            let groups = split.groups();
            let flat: Vec<&str> = groups.iter().flatten().copied().collect();
            let mut deduped = flat.clone();
            deduped.sort_unstable();
            deduped.dedup();
            assert_eq!(
                flat.len(),
                deduped.len(),
                "layout {} has a duplicated area in a split",
                layout.id
            );
            assert_eq!(split.ratio.len(), groups.len(), "layout {}", layout.id);
        }
        if let Some(LayoutNode::Split(root)) = &layout.root {
            let mut covered: Vec<&str> = root.groups().into_iter().flatten().collect();
            covered.sort_unstable();
            let mut declared = layout.area_ids();
            declared.sort_unstable();
            assert_eq!(covered, declared, "layout {}", layout.id);
        }
    }
}

#[test]
fn validate_rejects_ratio_sum_out_of_tolerance() {
    let layout = two_area_layout(
        vec![50.0, 40.0],
        vec![
            LayoutNode::Area("area-1".to_string()),
            LayoutNode::Area("area-2".to_string()),
        ],
    );
    assert!(matches!(
        layout.validate(),
        Err(LayoutError::RatioSum { .. })
    ));
}

#[test]
fn validate_accepts_tolerant_rounding() {
    let layout = two_area_layout(
        vec![50.5, 50.0],
        vec![
            LayoutNode::Area("area-1".to_string()),
            LayoutNode::Area("area-2".to_string()),
        ],
    );
    assert_eq!(layout.validate(), Ok(()));
}

#[test]
fn validate_rejects_arity_mismatch() {
    let layout = two_area_layout(
        vec![100.0],
        vec![
            LayoutNode::Area("area-1".to_string()),
            LayoutNode::Area("area-2".to_string()),
        ],
    );
    assert!(matches!(
        layout.validate(),
        Err(LayoutError::RatioArity {
            ratios: 1,
            groups: 2,
            ..
        })
    ));
}

#[test]
fn validate_rejects_duplicate_area() {
    let layout = two_area_layout(
        vec![50.0, 50.0],
        vec![
            LayoutNode::Area("area-1".to_string()),
            LayoutNode::Area("area-1".to_string()),
        ],
    );
    assert_eq!(
        layout.validate(),
        Err(LayoutError::DuplicateArea {
            layout: "broken".to_string(),
            area: "area-1".to_string(),
        })
    );
}

#[test]
fn validate_rejects_missing_area() {
    let mut layout = two_area_layout(
        vec![100.0],
        vec![LayoutNode::Area("area-1".to_string())],
    );
    layout.areas.push(area("area-3"));
    layout.cells = 3;
    assert!(matches!(
        layout.validate(),
        Err(LayoutError::UncoveredArea { .. })
    ));
}

#[test]
fn validate_rejects_cell_count_mismatch() {
    let mut layout = make_uniform_grid(2, 2);
    layout.cells = 5;
    assert!(matches!(
        layout.validate(),
        Err(LayoutError::CellCount {
            declared: 5,
            actual: 4,
            ..
        })
    ));
}

// ===== Orientation & Default Percentage Tests =====

#[test]
fn orientation_comes_from_root_split() {
    assert_eq!(
        catalog().get_layout("grid-1x3").unwrap().orientation(),
        SplitDirection::Row
    );
    assert_eq!(
        catalog().get_layout("grid-3x1").unwrap().orientation(),
        SplitDirection::Column
    );
    assert_eq!(
        catalog().get_layout("grid-2x2").unwrap().orientation(),
        SplitDirection::Column
    );
}

#[test]
fn single_panel_orientation_defaults_to_row() {
    assert_eq!(
        catalog().get_layout("grid-1x1").unwrap().orientation(),
        SplitDirection::Row
    );
}

#[test]
fn default_percentages_for_thirds() {
    assert_eq!(
        catalog().get_layout("grid-1x3").unwrap().default_percentages(),
        vec![33.0, 33.0, 34.0]
    );
}

#[test]
fn default_percentages_follow_layout_orientation_only() {
    // Column-oriented 2x2: every area takes half the height.
    assert_eq!(
        catalog().get_layout("grid-2x2").unwrap().default_percentages(),
        vec![50.0, 50.0, 50.0, 50.0]
    );
}

#[test]
fn default_percentages_multiply_nested_matching_splits() {
    // Row-oriented: area-1 is 50% wide, the 2x2 quad on the right splits its
    // 50% into 25% columns.
    assert_eq!(
        catalog()
            .get_layout("focus-left-quad-right")
            .unwrap()
            .default_percentages(),
        vec![50.0, 25.0, 25.0, 25.0, 25.0]
    );
}

#[test]
fn default_percentages_single_panel_is_full() {
    assert_eq!(
        catalog().get_layout("grid-1x1").unwrap().default_percentages(),
        vec![100.0]
    );
}

#[test]
fn area_index_is_canonical_order() {
    let layout = catalog().get_layout("grid-2x3").unwrap();
    assert_eq!(layout.area_index("area-1"), Some(0));
    assert_eq!(layout.area_index("area-6"), Some(5));
    assert_eq!(layout.area_index("area-7"), None);
}

#[test]
fn layouts_serialize_to_json() {
    let layout = catalog().get_layout("one-over-two").unwrap();
    let json = serde_json::to_value(layout).expect("layout serializes");
    assert_eq!(json["cells"], 3);
    assert_eq!(json["root"]["direction"], "column");
    assert_eq!(json["root"]["children"][0], "area-1");
}
