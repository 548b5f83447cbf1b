//! Spatial navigation graph.
//!
//! For each rectangle of a tab, and for each direction, the navigator picks
//! the rectangle focus should move to. Candidates are scored by the
//! distance between the facing corners of both rectangles plus the
//! distance between their centers; the lowest score wins.
//!
//! Two corrections bias the choice towards what a user expects in grids
//! where columns hold different numbers of stacks:
//!
//! * moving sideways from the top stack of a column prefers the top stack
//!   of the adjacent column;
//! * moving vertically out of the first column between rows prefers the
//!   stack that continues the first column.

use crate::geometry::{Direction, ResolvedRect, SlotIndex};

/// Fills in the neighbors of every rectangle in `rects`.
///
/// `rects` should hold the rectangles of one tab; rectangles from other
/// tabs are never linked. Rectangles touching the window edge in a
/// direction get no neighbor in that direction.
pub fn link_neighbors(rects: &mut [ResolvedRect]) {
    let view: &[ResolvedRect] = rects;
    let links: Vec<[Option<SlotIndex>; 4]> = view
        .iter()
        .map(|from| Direction::ALL.map(|dir| nearest(from, view, dir)))
        .collect();

    for (rect, found) in rects.iter_mut().zip(links) {
        for (dir, target) in Direction::ALL.into_iter().zip(found) {
            rect.neighbors.set(dir, target);
        }
    }

    discard_flush_links(rects);
}

/// The best candidate from `from` in `direction`, if any.
#[must_use]
pub fn nearest(from: &ResolvedRect, rects: &[ResolvedRect], direction: Direction) -> Option<SlotIndex> {
    if from.edges.touches(direction) {
        return None;
    }
    let mut best: Option<(f64, SlotIndex)> = None;
    for to in rects {
        let Some(score) = score(from, to, direction) else {
            continue;
        };
        if best.map_or(true, |(current, _)| score < current) {
            best = Some((score, to.index));
        }
    }
    best.map(|(_, index)| index)
}

/// Score of moving from `from` to `to`, or `None` when `to` is not a
/// candidate in `direction`.
#[must_use]
pub fn score(from: &ResolvedRect, to: &ResolvedRect, direction: Direction) -> Option<f64> {
    if from.index == to.index || from.tab_index != to.tab_index || !eligible(from, to, direction) {
        return None;
    }
    let center = from.center.distance(to.center);
    let corners = match direction {
        Direction::Right => {
            from.top_right().distance(to.top_left())
                + from.bottom_right().distance(to.bottom_left())
        }
        Direction::Left => {
            from.bottom_left().distance(to.bottom_right())
                + from.top_left().distance(to.top_right())
        }
        Direction::Bottom => {
            from.bottom_left().distance(to.top_left())
                + from.bottom_right().distance(to.top_right())
        }
        Direction::Top => {
            from.top_left().distance(to.bottom_left())
                + from.top_right().distance(to.bottom_right())
        }
    };
    let total = corners + center;
    Some(if preferred(from, to, direction) {
        total / 2.0
    } else {
        total
    })
}

fn eligible(from: &ResolvedRect, to: &ResolvedRect, direction: Direction) -> bool {
    let same_column = from.row_index == to.row_index && from.col_index == to.col_index;
    match direction {
        Direction::Right => {
            from.row_index == to.row_index
                && to.col_index > from.col_index
                && to.center.x >= from.center.x
        }
        Direction::Left => {
            from.row_index == to.row_index
                && to.col_index < from.col_index
                && to.center.x <= from.center.x
        }
        Direction::Bottom => {
            to.center.y > from.center.y
                && if from.last_stack {
                    to.row_index > from.row_index
                } else {
                    same_column
                }
        }
        Direction::Top => {
            to.center.y < from.center.y
                && if from.first_stack {
                    to.row_index < from.row_index
                } else {
                    same_column
                }
        }
    }
}

fn preferred(from: &ResolvedRect, to: &ResolvedRect, direction: Direction) -> bool {
    match direction {
        Direction::Right => from.first_stack && to.first_stack && to.col_index == from.col_index + 1,
        Direction::Left => from.first_stack && to.first_stack && to.col_index + 1 == from.col_index,
        Direction::Bottom => {
            from.last_stack && from.col_index == 0 && to.col_index == 0 && to.first_stack
        }
        Direction::Top => {
            from.first_stack && from.col_index == 0 && to.col_index == 0 && to.last_stack
        }
    }
}

/// Drops bottom and right links to rectangles that end on the same line.
///
/// In sparse grids such a target is beside, not below or right of, the
/// source and following the link makes focus oscillate.
fn discard_flush_links(rects: &mut [ResolvedRect]) {
    let bottoms: Vec<(SlotIndex, i32, i32)> = rects
        .iter()
        .map(|r| (r.index, r.bottom(), r.right()))
        .collect();
    let lookup = |index: SlotIndex| bottoms.iter().find(|(i, _, _)| *i == index);

    for rect in rects.iter_mut() {
        if let Some(target) = rect.neighbors.bottom {
            if lookup(target).is_some_and(|(_, bottom, _)| *bottom == rect.bottom()) {
                rect.neighbors.bottom = None;
            }
        }
        if let Some(target) = rect.neighbors.right {
            if lookup(target).is_some_and(|(_, _, right)| *right == rect.right()) {
                rect.neighbors.right = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnSpec, RowSpec, StackSpec, TabSpec};
    use crate::grid::GridResolver;
    use proptest::prelude::*;

    fn stacks(ids: &[&str]) -> Vec<StackSpec> {
        ids.iter()
            .map(|id| StackSpec {
                id: (*id).into(),
                height: None,
            })
            .collect()
    }

    fn one_row(cols: &[&[&str]]) -> Vec<TabSpec> {
        vec![TabSpec {
            name: "t".into(),
            rows: vec![RowSpec {
                height: None,
                cols: cols
                    .iter()
                    .map(|ids| ColumnSpec {
                        width: None,
                        stacks: stacks(ids),
                    })
                    .collect(),
            }],
        }]
    }

    fn by_id<'a>(rects: &'a [ResolvedRect], id: &str) -> &'a ResolvedRect {
        rects.iter().find(|r| r.widget_id == id).unwrap()
    }

    fn id_of(rects: &[ResolvedRect], index: Option<SlotIndex>) -> Option<&str> {
        index.map(|i| rects[i].widget_id.as_str())
    }

    #[test]
    fn test_top_left_corner_has_no_top_or_left() {
        let layout = GridResolver::new(120, 40).resolve(&one_row(&[&["a", "d"], &["b"], &["c"]]));
        let a = by_id(&layout.rects, "a");
        assert_eq!(a.neighbors.left, None);
        assert_eq!(a.neighbors.top, None);
        assert_eq!(id_of(&layout.rects, a.neighbors.right), Some("b"));
        assert_eq!(id_of(&layout.rects, a.neighbors.bottom), Some("d"));
    }

    #[test]
    fn test_down_stays_in_column() {
        let layout = GridResolver::new(90, 30).resolve(&one_row(&[
            &["top", "middle", "bottom"],
            &["wide"],
        ]));
        let middle = by_id(&layout.rects, "middle");
        assert_eq!(id_of(&layout.rects, middle.neighbors.bottom), Some("bottom"));
        assert_eq!(id_of(&layout.rects, middle.neighbors.top), Some("top"));
        let bottom = by_id(&layout.rects, "bottom");
        assert_eq!(bottom.neighbors.bottom, None);
    }

    #[test]
    fn test_neighbors_are_not_necessarily_mutual() {
        let layout = GridResolver::new(24, 20).resolve(&one_row(&[&["a", "a2"], &["b"]]));
        let rects = &layout.rects;
        assert_eq!(id_of(rects, by_id(rects, "a2").neighbors.right), Some("b"));
        assert_eq!(id_of(rects, by_id(rects, "b").neighbors.left), Some("a"));
    }

    #[test]
    fn test_sideways_prefers_aligned_top_stack() {
        let layout = GridResolver::new(24, 20).resolve(&one_row(&[&["a"], &["b", "b2"]]));
        let rects = &layout.rects;
        let a = by_id(rects, "a");
        assert_eq!(id_of(rects, a.neighbors.right), Some("b"));
        assert_eq!(id_of(rects, by_id(rects, "b2").neighbors.left), Some("a"));
    }

    #[test]
    fn test_vertical_between_rows_prefers_first_column() {
        let tabs = vec![TabSpec {
            name: "t".into(),
            rows: vec![
                RowSpec {
                    height: None,
                    cols: vec![
                        ColumnSpec {
                            width: None,
                            stacks: stacks(&["a"]),
                        },
                        ColumnSpec {
                            width: None,
                            stacks: stacks(&["b"]),
                        },
                    ],
                },
                RowSpec {
                    height: None,
                    cols: vec![ColumnSpec {
                        width: None,
                        stacks: stacks(&["c"]),
                    }],
                },
            ],
        }];
        let layout = GridResolver::new(80, 20).resolve(&tabs);
        let rects = &layout.rects;
        assert_eq!(id_of(rects, by_id(rects, "a").neighbors.bottom), Some("c"));
        assert_eq!(id_of(rects, by_id(rects, "b").neighbors.bottom), Some("c"));
        assert_eq!(id_of(rects, by_id(rects, "c").neighbors.top), Some("a"));
    }

    #[test]
    fn test_flush_links_are_discarded() {
        let mut rects = vec![
            ResolvedRect::new(0, "a", 2, 2, 10, 10, 100, 100),
            ResolvedRect::new(1, "b", 20, 2, 10, 10, 100, 100),
        ];
        for rect in &mut rects {
            rect.first_stack = true;
            rect.last_stack = true;
        }
        rects[1].col_index = 1;
        link_neighbors(&mut rects);
        assert_eq!(rects[0].neighbors.right, Some(1));

        let mut flush = vec![
            ResolvedRect::new(0, "a", 2, 2, 10, 10, 100, 100),
            ResolvedRect::new(1, "b", 2, 30, 10, 10, 100, 100),
            ResolvedRect::new(2, "c", 8, 30, 4, 10, 100, 100),
        ];
        flush[1].row_index = 1;
        flush[2].row_index = 1;
        flush[2].col_index = 1;
        link_neighbors(&mut flush);
        assert_eq!(flush[1].neighbors.right, None);
        assert_eq!(flush[0].neighbors.bottom, Some(1));
    }

    #[test]
    fn test_other_tabs_are_never_candidates() {
        let mut a = ResolvedRect::new(0, "a", 2, 2, 10, 10, 100, 100);
        let mut b = ResolvedRect::new(1, "b", 20, 2, 10, 10, 100, 100);
        b.col_index = 1;
        b.tab_index = 1;
        a.first_stack = true;
        assert_eq!(score(&a, &b, Direction::Right), None);
        b.tab_index = 0;
        assert!(score(&a, &b, Direction::Right).is_some());
    }

    proptest! {
        #[test]
        fn prop_edges_force_none(
            layout_shape in proptest::collection::vec(1usize..4, 1..5),
            width in 20u16..300,
            height in 10u16..120,
        ) {
            let names: Vec<Vec<String>> = layout_shape
                .iter()
                .enumerate()
                .map(|(c, n)| (0..*n).map(|s| format!("w{c}_{s}")).collect())
                .collect();
            let tabs = vec![TabSpec {
                name: "t".into(),
                rows: vec![RowSpec {
                    height: None,
                    cols: names
                        .iter()
                        .map(|ids| ColumnSpec {
                            width: None,
                            stacks: ids
                                .iter()
                                .map(|id| StackSpec { id: id.clone(), height: None })
                                .collect(),
                        })
                        .collect(),
                }],
            }];
            let layout = GridResolver::new(width, height).resolve(&tabs);
            for rect in &layout.rects {
                for dir in Direction::ALL {
                    if rect.edges.touches(dir) {
                        prop_assert_eq!(rect.neighbor(dir), None);
                    }
                    if let Some(target) = rect.neighbor(dir) {
                        prop_assert_ne!(target, rect.index);
                        prop_assert!(target < layout.rects.len());
                    }
                }
            }
        }
    }
}
