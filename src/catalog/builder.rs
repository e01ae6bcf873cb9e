//! Catalog construction.
//!
//! Every uniform grid (from a single pane up to 8×4) comes from
//! [`make_uniform_grid`]; non-uniform arrangements come from a small table of
//! hand-authored compositions. Both feed the same [`GridLayout`] type and are
//! checked by the same `validate()`.

use super::{GridArea, GridLayout, LayoutNode, SplitConfig, SplitDirection, FREE_FLOATING_LAYOUT_ID};

/// Uniform grids in catalog order, as `(rows, columns)`.
const UNIFORM_GRIDS: &[(u16, u16)] = &[
    (1, 1),
    (1, 2),
    (2, 1),
    (1, 3),
    (3, 1),
    (1, 4),
    (4, 1),
    (2, 2),
    (2, 3),
    (3, 2),
    (2, 4),
    (4, 2),
    (3, 3),
    (2, 5),
    (5, 2),
    (3, 4),
    (4, 3),
    (2, 6),
    (6, 2),
    (4, 4),
    (3, 5),
    (5, 3),
    (4, 5),
    (5, 4),
    (4, 6),
    (6, 4),
    (4, 7),
    (7, 4),
    (4, 8),
    (8, 4),
];

/// Split 100% into `n` integer percentages, spreading the remainder over the
/// trailing entries (3 → 33/33/34, 7 → 14/14/14/14/14/15/15).
pub fn even_ratios(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let base = 100 / n;
    let remainder = 100 % n;
    (0..n)
        .map(|i| {
            let bump = usize::from(i >= n - remainder);
            (base + bump) as f64
        })
        .collect()
}

/// Generate a `rows × cols` grid of equally sized areas.
///
/// Areas are numbered row-major. The root is a column split of row splits;
/// degenerate single-row or single-column grids collapse to one split and a
/// 1×1 grid to a bare area.
pub fn make_uniform_grid(rows: u16, cols: u16) -> GridLayout {
    let area_id = |row: u16, col: u16| format!("area-{}", row * cols + col + 1);

    let areas = (0..rows)
        .flat_map(|row| {
            (0..cols).map(move |column| GridArea {
                id: format!("area-{}", row * cols + column + 1),
                row,
                column,
                row_span: 1,
                column_span: 1,
            })
        })
        .collect::<Vec<_>>();

    let make_row = |row: u16| -> LayoutNode {
        if cols == 1 {
            LayoutNode::Area(area_id(row, 0))
        } else {
            split(
                SplitDirection::Row,
                even_ratios(cols as usize),
                (0..cols).map(|col| LayoutNode::Area(area_id(row, col))).collect(),
            )
        }
    };

    let root = if rows == 1 {
        make_row(0)
    } else {
        split(
            SplitDirection::Column,
            even_ratios(rows as usize),
            (0..rows).map(make_row).collect(),
        )
    };

    let (id, name) = uniform_names(rows, cols);
    GridLayout {
        id,
        name,
        cells: areas.len(),
        areas,
        root: Some(root),
    }
}

fn uniform_names(rows: u16, cols: u16) -> (String, String) {
    let id = format!("grid-{rows}x{cols}");
    let name = match (rows, cols) {
        (1, 1) => "Single Panel".to_string(),
        (1, n) => format!("{n} Columns"),
        (n, 1) => format!("{n} Rows"),
        (r, c) => format!("{r} × {c} Grid"),
    };
    (id, name)
}

fn split(direction: SplitDirection, ratio: Vec<f64>, children: Vec<LayoutNode>) -> LayoutNode {
    LayoutNode::Split(SplitConfig {
        direction,
        ratio,
        children,
    })
}

fn row(ratio: &[f64], children: Vec<LayoutNode>) -> LayoutNode {
    split(SplitDirection::Row, ratio.to_vec(), children)
}

fn column(ratio: &[f64], children: Vec<LayoutNode>) -> LayoutNode {
    split(SplitDirection::Column, ratio.to_vec(), children)
}

fn a(n: usize) -> LayoutNode {
    LayoutNode::Area(format!("area-{n}"))
}

/// Area `n` at logical `(row, column)` spanning `(row_span, column_span)`.
fn cell(n: usize, row: u16, column: u16, row_span: u16, column_span: u16) -> GridArea {
    GridArea {
        id: format!("area-{n}"),
        row,
        column,
        row_span,
        column_span,
    }
}

fn hand_authored(id: &str, name: &str, areas: Vec<GridArea>, root: LayoutNode) -> GridLayout {
    GridLayout {
        id: id.to_string(),
        name: name.to_string(),
        cells: areas.len(),
        areas,
        root: Some(root),
    }
}

const THIRDS: &[f64] = &[33.0, 33.0, 34.0];
const HALVES: &[f64] = &[50.0, 50.0];
const QUARTERS: &[f64] = &[25.0, 25.0, 25.0, 25.0];

/// Non-uniform layouts.
fn hand_authored_layouts() -> Vec<GridLayout> {
    vec![
        hand_authored(
            "main-sidebar",
            "Main + Sidebar",
            vec![cell(1, 0, 0, 1, 1), cell(2, 0, 1, 1, 1)],
            row(&[70.0, 30.0], vec![a(1), a(2)]),
        ),
        hand_authored(
            "sidebar-main",
            "Sidebar + Main",
            vec![cell(1, 0, 0, 1, 1), cell(2, 0, 1, 1, 1)],
            row(&[30.0, 70.0], vec![a(1), a(2)]),
        ),
        hand_authored(
            "main-bottom-strip",
            "Main + Bottom Strip",
            vec![cell(1, 0, 0, 1, 1), cell(2, 1, 0, 1, 1)],
            column(&[70.0, 30.0], vec![a(1), a(2)]),
        ),
        hand_authored(
            "one-over-two",
            "One Over Two",
            vec![cell(1, 0, 0, 1, 2), cell(2, 1, 0, 1, 1), cell(3, 1, 1, 1, 1)],
            column(HALVES, vec![a(1), row(HALVES, vec![a(2), a(3)])]),
        ),
        hand_authored(
            "two-over-one",
            "Two Over One",
            vec![cell(1, 0, 0, 1, 1), cell(2, 0, 1, 1, 1), cell(3, 1, 0, 1, 2)],
            column(HALVES, vec![row(HALVES, vec![a(1), a(2)]), a(3)]),
        ),
        hand_authored(
            "one-left-two-right",
            "One Left, Two Right",
            vec![cell(1, 0, 0, 2, 1), cell(2, 0, 1, 1, 1), cell(3, 1, 1, 1, 1)],
            row(HALVES, vec![a(1), column(HALVES, vec![a(2), a(3)])]),
        ),
        hand_authored(
            "two-left-one-right",
            "Two Left, One Right",
            vec![cell(1, 0, 0, 1, 1), cell(2, 1, 0, 1, 1), cell(3, 0, 1, 2, 1)],
            row(HALVES, vec![column(HALVES, vec![a(1), a(2)]), a(3)]),
        ),
        hand_authored(
            "one-over-three",
            "One Over Three",
            vec![
                cell(1, 0, 0, 1, 3),
                cell(2, 1, 0, 1, 1),
                cell(3, 1, 1, 1, 1),
                cell(4, 1, 2, 1, 1),
            ],
            column(HALVES, vec![a(1), row(THIRDS, vec![a(2), a(3), a(4)])]),
        ),
        hand_authored(
            "three-over-one",
            "Three Over One",
            vec![
                cell(1, 0, 0, 1, 1),
                cell(2, 0, 1, 1, 1),
                cell(3, 0, 2, 1, 1),
                cell(4, 1, 0, 1, 3),
            ],
            column(HALVES, vec![row(THIRDS, vec![a(1), a(2), a(3)]), a(4)]),
        ),
        hand_authored(
            "one-left-three-right",
            "One Left, Three Right",
            vec![
                cell(1, 0, 0, 3, 1),
                cell(2, 0, 1, 1, 1),
                cell(3, 1, 1, 1, 1),
                cell(4, 2, 1, 1, 1),
            ],
            row(HALVES, vec![a(1), column(THIRDS, vec![a(2), a(3), a(4)])]),
        ),
        hand_authored(
            "focus-left-quad-right",
            "Focus Left, Quad Right",
            vec![
                cell(1, 0, 0, 2, 1),
                cell(2, 0, 1, 1, 1),
                cell(3, 0, 2, 1, 1),
                cell(4, 1, 1, 1, 1),
                cell(5, 1, 2, 1, 1),
            ],
            row(
                HALVES,
                vec![
                    a(1),
                    column(
                        HALVES,
                        vec![row(HALVES, vec![a(2), a(3)]), row(HALVES, vec![a(4), a(5)])],
                    ),
                ],
            ),
        ),
        hand_authored(
            "two-over-three",
            "Two Over Three",
            vec![
                cell(1, 0, 0, 1, 3),
                cell(2, 0, 3, 1, 3),
                cell(3, 1, 0, 1, 2),
                cell(4, 1, 2, 1, 2),
                cell(5, 1, 4, 1, 2),
            ],
            column(
                HALVES,
                vec![
                    row(HALVES, vec![a(1), a(2)]),
                    row(THIRDS, vec![a(3), a(4), a(5)]),
                ],
            ),
        ),
        hand_authored(
            "three-over-two",
            "Three Over Two",
            vec![
                cell(1, 0, 0, 1, 2),
                cell(2, 0, 2, 1, 2),
                cell(3, 0, 4, 1, 2),
                cell(4, 1, 0, 1, 3),
                cell(5, 1, 3, 1, 3),
            ],
            column(
                HALVES,
                vec![
                    row(THIRDS, vec![a(1), a(2), a(3)]),
                    row(HALVES, vec![a(4), a(5)]),
                ],
            ),
        ),
        hand_authored(
            "hero-over-four",
            "Hero Over Four",
            vec![
                cell(1, 0, 0, 1, 4),
                cell(2, 1, 0, 1, 1),
                cell(3, 1, 1, 1, 1),
                cell(4, 1, 2, 1, 1),
                cell(5, 1, 3, 1, 1),
            ],
            column(
                &[60.0, 40.0],
                vec![a(1), row(QUARTERS, vec![a(2), a(3), a(4), a(5)])],
            ),
        ),
    ]
}

/// The sentinel layout for the unconstrained canvas.
fn free_floating() -> GridLayout {
    GridLayout {
        id: FREE_FLOATING_LAYOUT_ID.to_string(),
        name: "Free Floating".to_string(),
        cells: 0,
        areas: Vec::new(),
        root: None,
    }
}

/// Every built-in layout, in catalog order.
pub fn builtin_layouts() -> Vec<GridLayout> {
    UNIFORM_GRIDS
        .iter()
        .map(|&(rows, cols)| make_uniform_grid(rows, cols))
        .chain(hand_authored_layouts())
        .chain(std::iter::once(free_floating()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_ratios_three_is_33_33_34() {
        assert_eq!(even_ratios(3), vec![33.0, 33.0, 34.0]);
    }

    #[test]
    fn even_ratios_seven_spreads_remainder_at_end() {
        assert_eq!(
            even_ratios(7),
            vec![14.0, 14.0, 14.0, 14.0, 14.0, 15.0, 15.0]
        );
    }

    #[test]
    fn even_ratios_always_sum_to_100() {
        for n in 1..=12 {
            let sum: f64 = even_ratios(n).iter().sum();
            assert_eq!(sum, 100.0, "n={}", n);
        }
    }

    #[test]
    fn even_ratios_zero_is_empty() {
        assert!(even_ratios(0).is_empty());
    }

    #[test]
    fn uniform_1x1_is_a_bare_area() {
        let layout = make_uniform_grid(1, 1);
        assert_eq!(layout.root, Some(LayoutNode::Area("area-1".to_string())));
        assert_eq!(layout.cells, 1);
    }

    #[test]
    fn uniform_single_row_is_one_row_split() {
        let layout = make_uniform_grid(1, 3);
        let splits = layout.splits();
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].direction, SplitDirection::Row);
    }

    #[test]
    fn uniform_areas_are_row_major() {
        let layout = make_uniform_grid(2, 3);
        let area_5 = &layout.areas[4];
        assert_eq!(area_5.id, "area-5");
        assert_eq!((area_5.row, area_5.column), (1, 1));
    }

    #[test]
    fn uniform_4x8_has_32_cells_and_validates() {
        let layout = make_uniform_grid(4, 8);
        assert_eq!(layout.cells, 32);
        assert_eq!(layout.validate(), Ok(()));
    }

    #[test]
    fn hand_authored_layouts_validate() {
        for layout in hand_authored_layouts() {
            assert_eq!(layout.validate(), Ok(()), "layout {}", layout.id);
        }
    }

    #[test]
    fn layout_ids_are_unique() {
        let layouts = builtin_layouts();
        let mut ids: Vec<&str> = layouts.iter().map(|l| l.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), layouts.len());
    }
}
