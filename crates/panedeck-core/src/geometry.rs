//! Geometry of resolved widget rectangles.
//!
//! The grid resolver turns the declarative layout into a flat list of
//! [`ResolvedRect`]s, one per stack slot. The spatial navigator then fills
//! in the per-direction [`Neighbors`] of each rectangle.

use ratatui::layout::Rect;
use std::fmt;
use std::str::FromStr;

/// Global, dense index of a rectangle (and of the widget instance in it).
pub type SlotIndex = usize;

/// One of the four focus movement directions.
///
/// # Examples
///
/// ```
/// use panedeck_core::Direction;
///
/// assert_eq!(Direction::Top.opposite(), Direction::Bottom);
/// assert_eq!(Direction::Left.opposite().opposite(), Direction::Left);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Right => Direction::Left,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Top => "top",
            Direction::Right => "right",
            Direction::Bottom => "bottom",
            Direction::Left => "left",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown direction: {s}"))
    }
}

/// A point in terminal cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    ///
    /// ```
    /// use panedeck_core::Point;
    ///
    /// assert_eq!(Point::new(0, 0).distance(Point::new(3, 4)), 5.0);
    /// ```
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        dx.hypot(dy)
    }
}

/// Which window edges a rectangle touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Edges {
    /// Whether the rectangle touches the window edge in `direction`.
    #[must_use]
    pub const fn touches(&self, direction: Direction) -> bool {
        match direction {
            Direction::Top => self.top,
            Direction::Right => self.right,
            Direction::Bottom => self.bottom,
            Direction::Left => self.left,
        }
    }
}

/// The chosen neighbor in each direction, by global index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighbors {
    pub top: Option<SlotIndex>,
    pub right: Option<SlotIndex>,
    pub bottom: Option<SlotIndex>,
    pub left: Option<SlotIndex>,
}

impl Neighbors {
    /// Neighbor in `direction`.
    #[must_use]
    pub const fn get(&self, direction: Direction) -> Option<SlotIndex> {
        match direction {
            Direction::Top => self.top,
            Direction::Right => self.right,
            Direction::Bottom => self.bottom,
            Direction::Left => self.left,
        }
    }

    /// Sets the neighbor in `direction`.
    pub fn set(&mut self, direction: Direction, index: Option<SlotIndex>) {
        match direction {
            Direction::Top => self.top = index,
            Direction::Right => self.right = index,
            Direction::Bottom => self.bottom = index,
            Direction::Left => self.left = index,
        }
    }
}

/// A widget slot placed on the terminal grid.
///
/// Coordinates are relative to the grid area, which starts at `(0, 0)`.
/// Once created a rectangle is immutable apart from its [`Neighbors`],
/// which the navigator fills in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRect {
    /// Global index, dense across all tabs.
    pub index: SlotIndex,
    /// Id of the widget shown in this slot.
    pub widget_id: String,
    pub tab_index: usize,
    pub row_index: usize,
    pub col_index: usize,
    pub stack_index: usize,
    /// First stack of its column.
    pub first_stack: bool,
    /// Last stack of its column.
    pub last_stack: bool,
    /// Last column of its row.
    pub last_column: bool,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    /// Center, as `(x + w/2, y + h/2)` rounded down.
    pub center: Point,
    pub edges: Edges,
    pub neighbors: Neighbors,
}

impl ResolvedRect {
    /// Left x coordinate.
    #[must_use]
    pub fn left(&self) -> i32 {
        i32::from(self.x)
    }

    /// Right x coordinate, `x + width`.
    #[must_use]
    pub fn right(&self) -> i32 {
        i32::from(self.x) + i32::from(self.width)
    }

    /// Top y coordinate.
    #[must_use]
    pub fn top(&self) -> i32 {
        i32::from(self.y)
    }

    /// Bottom y coordinate, `y + height`.
    #[must_use]
    pub fn bottom(&self) -> i32 {
        i32::from(self.y) + i32::from(self.height)
    }

    #[must_use]
    pub fn top_left(&self) -> Point {
        Point::new(self.left(), self.top())
    }

    #[must_use]
    pub fn top_right(&self) -> Point {
        Point::new(self.right(), self.top())
    }

    #[must_use]
    pub fn bottom_left(&self) -> Point {
        Point::new(self.left(), self.bottom())
    }

    #[must_use]
    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// Neighbor in `direction`.
    #[must_use]
    pub fn neighbor(&self, direction: Direction) -> Option<SlotIndex> {
        self.neighbors.get(direction)
    }

    /// Screen rectangle when the grid is drawn inside `area`.
    ///
    /// The result is clipped to `area`.
    ///
    /// ```
    /// use panedeck_core::ResolvedRect;
    /// use ratatui::layout::Rect;
    ///
    /// let rect = ResolvedRect::new(0, "w", 10, 2, 20, 5, 80, 24);
    /// let area = Rect::new(0, 1, 80, 24);
    /// assert_eq!(rect.to_screen(area), Rect::new(10, 3, 20, 5));
    /// ```
    #[must_use]
    pub fn to_screen(&self, area: Rect) -> Rect {
        let shifted = Rect::new(
            area.x.saturating_add(self.x),
            area.y.saturating_add(self.y),
            self.width,
            self.height,
        );
        shifted.intersection(area)
    }

    /// Builds a standalone rectangle on a `grid_width x grid_height` grid.
    ///
    /// Structural fields (tab, row, column, stack) are zeroed and the
    /// stack and column flags are set as if it were alone in its column.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        index: SlotIndex,
        widget_id: &str,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        grid_width: u16,
        grid_height: u16,
    ) -> Self {
        let mut rect = Self {
            index,
            widget_id: widget_id.to_string(),
            tab_index: 0,
            row_index: 0,
            col_index: 0,
            stack_index: 0,
            first_stack: true,
            last_stack: true,
            last_column: true,
            x,
            y,
            width,
            height,
            center: Point::default(),
            edges: Edges::default(),
            neighbors: Neighbors::default(),
        };
        rect.update_derived(grid_width, grid_height);
        rect
    }

    /// Recomputes the center and edge flags from the coordinates.
    ///
    /// A rectangle touches an edge when it is within one cell of it.
    pub fn update_derived(&mut self, grid_width: u16, grid_height: u16) {
        self.center = Point::new(
            self.left() + i32::from(self.width / 2),
            self.top() + i32::from(self.height / 2),
        );
        self.edges = Edges {
            top: self.y <= 1,
            left: self.x <= 1,
            right: self.right() + 1 >= i32::from(grid_width),
            bottom: self.bottom() + 1 >= i32::from(grid_height),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!("left".parse::<Direction>(), Ok(Direction::Left));
        assert!("up".parse::<Direction>().is_err());
        for d in Direction::ALL {
            assert_eq!(d.to_string().parse::<Direction>(), Ok(d));
        }
    }

    #[test]
    fn test_neighbors_get_set() {
        let mut n = Neighbors::default();
        n.set(Direction::Right, Some(3));
        assert_eq!(n.get(Direction::Right), Some(3));
        assert_eq!(n.right, Some(3));
        assert_eq!(n.get(Direction::Left), None);
        n.set(Direction::Right, None);
        assert_eq!(n, Neighbors::default());
    }

    #[test]
    fn test_corners_and_center() {
        let rect = ResolvedRect::new(0, "w", 10, 4, 21, 7, 100, 40);
        assert_eq!(rect.top_left(), Point::new(10, 4));
        assert_eq!(rect.top_right(), Point::new(31, 4));
        assert_eq!(rect.bottom_left(), Point::new(10, 11));
        assert_eq!(rect.bottom_right(), Point::new(31, 11));
        assert_eq!(rect.center, Point::new(20, 7));
    }

    #[test]
    fn test_edges_tolerate_one_cell() {
        let full = ResolvedRect::new(0, "w", 0, 0, 80, 24, 80, 24);
        assert_eq!(
            full.edges,
            Edges {
                top: true,
                right: true,
                bottom: true,
                left: true
            }
        );

        let inner = ResolvedRect::new(0, "w", 2, 2, 10, 10, 80, 24);
        assert_eq!(inner.edges, Edges::default());

        let near = ResolvedRect::new(0, "w", 1, 1, 78, 22, 80, 24);
        assert!(Direction::ALL.into_iter().all(|d| near.edges.touches(d)));
    }

    #[test]
    fn test_to_screen_clips() {
        let rect = ResolvedRect::new(0, "w", 70, 20, 20, 10, 80, 24);
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(rect.to_screen(area), Rect::new(70, 20, 10, 4));
    }
}
