//! Grid layout catalog.
//!
//! Static registry mapping a layout id to a nested composition of areas and
//! percentage-weighted splits. Lookups are pure; the catalog is built once on
//! first use and never mutated.
//!
//! # Module Structure
//!
//! - `builder`: `make_uniform_grid` and the table of hand-authored layouts

pub mod builder;

use crate::model::LayoutError;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

pub use builder::{builtin_layouts, even_ratios, make_uniform_grid};

/// Id of the sentinel layout for unconstrained positioning.
pub const FREE_FLOATING_LAYOUT_ID: &str = "free-floating";

/// Axis a split partitions.
///
/// `Row` lays children out left to right (partitions width); `Column`
/// stacks them top to bottom (partitions height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// Children side by side.
    Row,
    /// Children stacked.
    Column,
}

/// One rectangular cell of a grid layout.
///
/// Purely descriptive: logical grid position and span, no pixel size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridArea {
    /// Stable `area-N` id.
    pub id: String,
    /// Zero-based logical row.
    pub row: u16,
    /// Zero-based logical column.
    pub column: u16,
    /// Rows covered.
    pub row_span: u16,
    /// Columns covered.
    pub column_span: u16,
}

/// Node of a layout composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LayoutNode {
    /// Leaf referencing an area id.
    Area(String),
    /// Nested split.
    Split(SplitConfig),
}

impl LayoutNode {
    /// Area ids under this node, in composition order.
    pub fn area_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_area_ids(&mut ids);
        ids
    }

    fn collect_area_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            LayoutNode::Area(id) => out.push(id.as_str()),
            LayoutNode::Split(split) => {
                for child in &split.children {
                    child.collect_area_ids(out);
                }
            }
        }
    }
}

/// A single row- or column-wise partition of a region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitConfig {
    /// Axis being partitioned.
    pub direction: SplitDirection,
    /// Percentage weight of each child. Tolerant rounding (e.g. 33/33/34).
    pub ratio: Vec<f64>,
    /// Ordered children.
    pub children: Vec<LayoutNode>,
}

impl SplitConfig {
    /// Area-id groups this split partitions, one group per child.
    pub fn groups(&self) -> Vec<Vec<&str>> {
        self.children.iter().map(LayoutNode::area_ids).collect()
    }

    /// Sum of all ratios.
    pub fn ratio_sum(&self) -> f64 {
        self.ratio.iter().sum()
    }
}

/// Whether a layout is a constrained grid or the free-floating canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Panes partitioned by splits; sizes persisted as percentages.
    Grid,
    /// Unconstrained canvas; widgets carry absolute pixel geometry.
    FreeFloating,
}

/// A predefined dashboard arrangement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLayout {
    /// Stable id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Number of areas. Zero marks the free-floating sentinel.
    pub cells: usize,
    /// Areas in canonical order (`area-1`, `area-2`, ...).
    pub areas: Vec<GridArea>,
    /// Composition root; `None` only for the free-floating sentinel.
    pub root: Option<LayoutNode>,
}

impl GridLayout {
    /// Whether this is the unconstrained sentinel layout.
    pub fn is_free_floating(&self) -> bool {
        self.cells == 0
    }

    /// Positioning mode implied by this layout.
    pub fn mode(&self) -> LayoutMode {
        if self.is_free_floating() {
            LayoutMode::FreeFloating
        } else {
            LayoutMode::Grid
        }
    }

    /// Area ids in canonical order.
    pub fn area_ids(&self) -> Vec<&str> {
        self.areas.iter().map(|a| a.id.as_str()).collect()
    }

    /// Canonical index of an area id.
    pub fn area_index(&self, area_id: &str) -> Option<usize> {
        self.areas.iter().position(|a| a.id == area_id)
    }

    /// All splits, depth first, root first.
    pub fn splits(&self) -> Vec<&SplitConfig> {
        fn walk<'a>(node: &'a LayoutNode, out: &mut Vec<&'a SplitConfig>) {
            if let LayoutNode::Split(split) = node {
                out.push(split);
                for child in &split.children {
                    walk(child, out);
                }
            }
        }

        let mut out = Vec::new();
        if let Some(root) = &self.root {
            walk(root, &mut out);
        }
        out
    }

    /// Static, layout-level axis used when converting pane pixels to percentages.
    ///
    /// Taken from the root split; single-area and free-floating layouts report `Row`.
    pub fn orientation(&self) -> SplitDirection {
        match &self.root {
            Some(LayoutNode::Split(split)) => split.direction,
            _ => SplitDirection::Row,
        }
    }

    /// Default percentage per area, canonical order.
    ///
    /// Each area's value is the product of the ratios of every enclosing split
    /// whose direction matches [`GridLayout::orientation`].
    pub fn default_percentages(&self) -> Vec<f64> {
        fn walk<'a>(
            node: &'a LayoutNode,
            share: f64,
            orientation: SplitDirection,
            out: &mut HashMap<&'a str, f64>,
        ) {
            match node {
                LayoutNode::Area(id) => {
                    out.insert(id.as_str(), share);
                }
                LayoutNode::Split(split) => {
                    for (child, ratio) in split.children.iter().zip(&split.ratio) {
                        let child_share = if split.direction == orientation {
                            share * ratio / 100.0
                        } else {
                            share
                        };
                        walk(child, child_share, orientation, out);
                    }
                }
            }
        }

        let mut shares = HashMap::new();
        if let Some(root) = &self.root {
            walk(root, 100.0, self.orientation(), &mut shares);
        }

        self.areas
            .iter()
            .map(|area| round_percentage(shares.get(area.id.as_str()).copied().unwrap_or(0.0)))
            .collect()
    }

    /// Check every structural invariant of the layout.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: cell count, ratio arity, ratio
    /// sum, or an area that is duplicated or not covered by the composition.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.cells != self.areas.len() {
            return Err(LayoutError::CellCount {
                layout: self.id.clone(),
                declared: self.cells,
                actual: self.areas.len(),
            });
        }

        for split in self.splits() {
            if split.ratio.len() != split.children.len() {
                return Err(LayoutError::RatioArity {
                    layout: self.id.clone(),
                    ratios: split.ratio.len(),
                    groups: split.children.len(),
                });
            }
            let sum = split.ratio_sum();
            if !(99.0..=101.0).contains(&sum) {
                return Err(LayoutError::RatioSum {
                    layout: self.id.clone(),
                    sum: format!("{sum}"),
                });
            }
        }

        let placed = self.root.as_ref().map(LayoutNode::area_ids).unwrap_or_default();
        let mut seen = HashSet::new();
        for id in &placed {
            if !seen.insert(*id) {
                return Err(LayoutError::DuplicateArea {
                    layout: self.id.clone(),
                    area: (*id).to_string(),
                });
            }
        }

        let declared: HashSet<&str> = self.area_ids().into_iter().collect();
        if let Some(missing) = declared.symmetric_difference(&seen).next() {
            return Err(LayoutError::UncoveredArea {
                layout: self.id.clone(),
                area: (*missing).to_string(),
            });
        }

        Ok(())
    }
}

/// Round a percentage to two decimals.
pub fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Immutable registry of every known layout.
#[derive(Debug, Clone)]
pub struct LayoutCatalog {
    layouts: Vec<GridLayout>,
}

impl LayoutCatalog {
    /// Build a catalog from an explicit list of layouts.
    pub fn new(layouts: Vec<GridLayout>) -> Self {
        Self { layouts }
    }

    /// The built-in catalog, constructed once per process.
    pub fn builtin() -> &'static LayoutCatalog {
        static CATALOG: OnceLock<LayoutCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| LayoutCatalog::new(builtin_layouts()))
    }

    /// Look up a layout by id.
    pub fn get_layout(&self, id: &str) -> Option<&GridLayout> {
        self.layouts.iter().find(|layout| layout.id == id)
    }

    /// Look up a layout by id, failing with a typed error.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::UnknownLayout` if the id is not in the catalog.
    pub fn require_layout(&self, id: &str) -> Result<&GridLayout, LayoutError> {
        self.get_layout(id)
            .ok_or_else(|| LayoutError::UnknownLayout(id.to_string()))
    }

    /// Look up a layout by display name (case-insensitive).
    pub fn get_layout_by_name(&self, name: &str) -> Option<&GridLayout> {
        self.layouts
            .iter()
            .find(|layout| layout.name.eq_ignore_ascii_case(name))
    }

    /// All layouts in catalog order.
    pub fn list_layouts(&self) -> &[GridLayout] {
        &self.layouts
    }

    /// Layouts with exactly `cells` areas.
    pub fn list_layouts_with_cells(&self, cells: usize) -> Vec<&GridLayout> {
        self.layouts
            .iter()
            .filter(|layout| layout.cells == cells)
            .collect()
    }

    /// Validate every layout in the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found.
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.layouts.iter().try_for_each(GridLayout::validate)
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
