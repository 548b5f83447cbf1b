//! Grid resolution: from the layout tree to concrete rectangles.
//!
//! Rows divide the grid height by percentage, columns divide a row's width
//! in twelfths and stacks divide a column's height by percentage. Missing
//! sizes share whatever the explicit siblings leave over, evenly. The last row,
//! column and stack absorb rounding leftovers so every tab fills the grid
//! without gaps.

use crate::config::TabSpec;
use crate::geometry::{Neighbors, Point, ResolvedRect, SlotIndex};
use crate::navigator;
use crate::percent::{parse_optional, percent_of};
use crate::validator::COLUMN_UNITS;
use std::ops::Range;

/// Splits `ceiling` between siblings, some of which have explicit sizes.
///
/// Unspecified siblings share the remainder evenly, rounded down, and the
/// last unspecified sibling takes whatever rounding left so that the
/// values add up to `ceiling`. Explicit values that already exceed the
/// ceiling leave nothing for the others.
///
/// # Examples
///
/// ```
/// use panedeck_core::grid::distribute;
///
/// assert_eq!(distribute(&[None, Some(30)], 100), vec![70, 30]);
/// assert_eq!(distribute(&[None, None, None], 100), vec![33, 33, 34]);
/// assert_eq!(distribute(&[Some(4), None], 12), vec![4, 8]);
/// ```
#[must_use]
pub fn distribute(explicit: &[Option<u16>], ceiling: u16) -> Vec<u16> {
    let fixed: u32 = explicit.iter().flatten().map(|v| u32::from(*v)).sum();
    let missing = explicit.iter().filter(|v| v.is_none()).count() as u32;
    if missing == 0 {
        return explicit.iter().flatten().copied().collect();
    }
    let remaining = u32::from(ceiling).saturating_sub(fixed);
    let share = remaining / missing;
    let last_share = remaining - share * (missing - 1);
    let last_missing = explicit.iter().rposition(Option::is_none);

    explicit
        .iter()
        .enumerate()
        .map(|(i, value)| match value {
            Some(v) => *v,
            None if Some(i) == last_missing => last_share as u16,
            None => share as u16,
        })
        .collect()
}

/// Splits `total` cells by percentage.
///
/// Every part but the last is rounded down; the last part receives the
/// rest of `total`.
fn split_cells(total: u16, percents: &[u16]) -> Vec<u16> {
    let mut used: u16 = 0;
    let last = percents.len().saturating_sub(1);
    percents
        .iter()
        .enumerate()
        .map(|(i, pct)| {
            let left = total.saturating_sub(used);
            let size = if i == last {
                left
            } else {
                percent_of(total, *pct).min(left)
            };
            used = used.saturating_add(size);
            size
        })
        .collect()
}

/// Column widths in cells for a row `width` cells wide.
///
/// A column with explicit `units` gets `width * units / 12` cells, rounded
/// down. Columns without a width share the remaining cells evenly and the
/// last column takes whatever rounding left, so the row is always tiled.
///
/// ```
/// use panedeck_core::grid::column_widths;
///
/// assert_eq!(column_widths(120, &[None; 5]), vec![24; 5]);
/// assert_eq!(column_widths(120, &[Some(4), None]), vec![40, 80]);
/// assert_eq!(column_widths(101, &[Some(5), Some(7)]), vec![42, 59]);
/// ```
#[must_use]
pub fn column_widths(width: u16, units: &[Option<u16>]) -> Vec<u16> {
    let explicit: Vec<Option<u16>> = units
        .iter()
        .map(|u| u.map(|u| (u32::from(width) * u32::from(u) / COLUMN_UNITS as u32) as u16))
        .collect();
    let mut widths = distribute(&explicit, width);
    let mut used: u16 = 0;
    let last = widths.len().saturating_sub(1);
    for (i, w) in widths.iter_mut().enumerate() {
        let left = width.saturating_sub(used);
        *w = if i == last { left } else { (*w).min(left) };
        used = used.saturating_add(*w);
    }
    widths
}

/// A column of a resolved row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnGeometry {
    /// Width in twelfths, when given.
    pub units: Option<u16>,
    pub width: u16,
    /// Global indices of the column's stacks, top to bottom.
    pub slots: Vec<SlotIndex>,
}

/// A row of a resolved tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowGeometry {
    /// Height in percent after auto-distribution.
    pub percent: u16,
    pub height: u16,
    pub cols: Vec<ColumnGeometry>,
}

/// The resolved shape of one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabGeometry {
    pub name: String,
    /// Global indices of the tab's rectangles.
    pub slots: Range<SlotIndex>,
    pub rows: Vec<RowGeometry>,
}

/// Every rectangle of every tab, with neighbors linked.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedLayout {
    pub width: u16,
    pub height: u16,
    pub tabs: Vec<TabGeometry>,
    pub rects: Vec<ResolvedRect>,
}

impl ResolvedLayout {
    /// Rectangles of tab `tab`, or an empty slice.
    #[must_use]
    pub fn tab_rects(&self, tab: usize) -> &[ResolvedRect] {
        self.tabs
            .get(tab)
            .and_then(|t| self.rects.get(t.slots.clone()))
            .unwrap_or_default()
    }

    /// Total number of rectangles across tabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Resolves layouts against a fixed grid size.
///
/// # Examples
///
/// ```
/// use panedeck_core::config::DashboardConfig;
/// use panedeck_core::grid::GridResolver;
///
/// let config = DashboardConfig::from_toml_str(r#"
/// [[layout]]
/// name = "main"
/// [[layout.rows]]
/// [[layout.rows.cols]]
/// [[layout.rows.cols.stacks]]
/// id = "a"
/// [[layout.rows.cols]]
/// [[layout.rows.cols.stacks]]
/// id = "b"
/// "#).unwrap();
///
/// let layout = GridResolver::new(80, 24).resolve(&config.layout);
/// assert_eq!(layout.rects.len(), 2);
/// assert_eq!(layout.rects[0].width, 40);
/// assert_eq!(layout.rects[1].x, 40);
/// assert_eq!(layout.rects[0].neighbors.right, Some(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridResolver {
    width: u16,
    height: u16,
}

impl GridResolver {
    /// Creates a resolver for a `width x height` grid.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Resolves every tab and links the neighbors within each tab.
    ///
    /// Invalid sizes are treated as unspecified; validate the
    /// configuration first to report them.
    #[must_use]
    pub fn resolve(&self, tabs: &[TabSpec]) -> ResolvedLayout {
        let mut layout = ResolvedLayout {
            width: self.width,
            height: self.height,
            ..ResolvedLayout::default()
        };
        for (tab_index, tab) in tabs.iter().enumerate() {
            let geometry = self.resolve_tab(tab_index, tab, &mut layout.rects);
            navigator::link_neighbors(&mut layout.rects[geometry.slots.clone()]);
            layout.tabs.push(geometry);
        }
        tracing::debug!(
            width = self.width,
            height = self.height,
            tabs = layout.tabs.len(),
            rects = layout.rects.len(),
            "resolved layout"
        );
        layout
    }

    fn resolve_tab(&self, tab_index: usize, tab: &TabSpec, out: &mut Vec<ResolvedRect>) -> TabGeometry {
        let start = out.len();
        let row_explicit: Vec<Option<u16>> = tab
            .rows
            .iter()
            .map(|row| parse_optional(row.height.as_deref()).ok().flatten())
            .collect();
        let row_percents = distribute(&row_explicit, 100);
        let row_heights = split_cells(self.height, &row_percents);

        let mut rows = Vec::with_capacity(tab.rows.len());
        let mut y: u16 = 0;
        for (row_index, row) in tab.rows.iter().enumerate() {
            let row_height = row_heights[row_index];
            let col_explicit: Vec<Option<u16>> = row
                .cols
                .iter()
                .map(|col| match col.width {
                    Some(w) if w > 0 && w <= COLUMN_UNITS => Some(w as u16),
                    _ => None,
                })
                .collect();
            let col_widths = column_widths(self.width, &col_explicit);

            let mut cols = Vec::with_capacity(row.cols.len());
            let mut x: u16 = 0;
            let last_column = row.cols.len().saturating_sub(1);
            for (col_index, col) in row.cols.iter().enumerate() {
                let col_width = col_widths[col_index];
                let stack_explicit: Vec<Option<u16>> = col
                    .stacks
                    .iter()
                    .map(|s| parse_optional(s.height.as_deref()).ok().flatten())
                    .collect();
                let stack_percents = distribute(&stack_explicit, 100);
                let stack_heights = split_cells(row_height, &stack_percents);

                let mut slots = Vec::with_capacity(col.stacks.len());
                let mut stack_y = y;
                let last_stack = col.stacks.len().saturating_sub(1);
                for (stack_index, stack) in col.stacks.iter().enumerate() {
                    let height = stack_heights[stack_index];
                    let mut rect = ResolvedRect {
                        index: out.len(),
                        widget_id: stack.id.clone(),
                        tab_index,
                        row_index,
                        col_index,
                        stack_index,
                        first_stack: stack_index == 0,
                        last_stack: stack_index == last_stack,
                        last_column: col_index == last_column,
                        x,
                        y: stack_y,
                        width: col_width,
                        height,
                        center: Point::default(),
                        edges: Default::default(),
                        neighbors: Neighbors::default(),
                    };
                    rect.update_derived(self.width, self.height);
                    slots.push(rect.index);
                    out.push(rect);
                    stack_y = stack_y.saturating_add(height);
                }
                cols.push(ColumnGeometry {
                    units: col_explicit[col_index],
                    width: col_width,
                    slots,
                });
                x = x.saturating_add(col_width);
            }
            rows.push(RowGeometry {
                percent: row_percents[row_index],
                height: row_height,
                cols,
            });
            y = y.saturating_add(row_height);
        }

        TabGeometry {
            name: tab.name.clone(),
            slots: start..out.len(),
            rows,
        }
    }
}
