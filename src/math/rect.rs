use super::{GridOffset, GridPos, Point2, MAX_COORDINATE};

/// An axis-aligned rectangle on the integer grid.
///
/// `(x, y)` is the top-left corner; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The top-left corner.
    #[must_use]
    pub fn position(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }

    /// Returns `true` if the corner is on the grid and both sizes lie in
    /// `1..=MAX_COORDINATE`.
    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        let size = 1..=MAX_COORDINATE;
        self.position().is_on_grid() && size.contains(&self.width) && size.contains(&self.height)
    }

    /// Exclusive right boundary.
    #[must_use]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom boundary.
    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Returns a copy moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: GridOffset) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Half-open containment: `x ∈ [left, right)`, `y ∈ [top, bottom)`.
    #[must_use]
    pub fn contains_point(&self, p: &Point2) -> bool {
        p.x >= f64::from(self.x)
            && p.x < f64::from(self.right())
            && p.y >= f64::from(self.y)
            && p.y < f64::from(self.bottom())
    }

    /// Signed overlap along each axis. Negative means a gap of that size.
    #[must_use]
    pub fn axis_overlap(&self, other: &Rect) -> (i32, i32) {
        let ox = self.right().min(other.right()) - self.x.max(other.x);
        let oy = self.bottom().min(other.bottom()) - self.y.max(other.y);
        (ox, oy)
    }
}

/// Overlap extents on each axis; both zero when the rectangles are disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overlap {
    pub x: i32,
    pub y: i32,
}

impl Overlap {
    /// The smaller of the two extents: the thickness of the shared strip.
    #[must_use]
    pub fn thickness(&self) -> i32 {
        self.x.min(self.y)
    }
}

/// How two rectangles relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapKind {
    /// Separated by a gap on at least one axis.
    Disjoint,
    /// Share a boundary with zero area (tangent).
    Touching,
    /// Share a region with positive extent on both axes.
    Overlapping(Overlap),
}

/// Returns the positive overlap extents on each axis, or zero if disjoint.
#[must_use]
pub fn rectangles_overlap_area(a: &Rect, b: &Rect) -> Overlap {
    let (ox, oy) = a.axis_overlap(b);
    if ox <= 0 || oy <= 0 {
        return Overlap::default();
    }
    Overlap { x: ox, y: oy }
}

/// Classifies the relation between two rectangles.
#[must_use]
pub fn classify_overlap(a: &Rect, b: &Rect) -> OverlapKind {
    let (ox, oy) = a.axis_overlap(b);
    if ox < 0 || oy < 0 {
        OverlapKind::Disjoint
    } else if ox == 0 || oy == 0 {
        OverlapKind::Touching
    } else {
        OverlapKind::Overlapping(Overlap { x: ox, y: oy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_open_containment() {
        let r = Rect::new(2, 2, 3, 3);
        assert!(r.contains_point(&Point2::new(2.0, 2.0)));
        assert!(r.contains_point(&Point2::new(4.99, 4.99)));
        assert!(!r.contains_point(&Point2::new(5.0, 3.0)));
        assert!(!r.contains_point(&Point2::new(3.0, 5.0)));
    }

    #[test]
    fn bounds_cover_grid_range() {
        assert!(Rect::new(0, 0, 1, 1).is_within_bounds());
        assert!(Rect::new(MAX_COORDINATE, 0, MAX_COORDINATE, 1).is_within_bounds());
        assert!(!Rect::new(-1, 0, 1, 1).is_within_bounds());
        assert!(!Rect::new(i32::MAX - 10, 0, 1000, 2).is_within_bounds());
        assert!(!Rect::new(0, 0, 0, 2).is_within_bounds());
    }

    #[test]
    fn disjoint_rectangles_have_zero_overlap() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(5, 5, 2, 2);
        assert_eq!(rectangles_overlap_area(&a, &b), Overlap::default());
        assert_eq!(classify_overlap(&a, &b), OverlapKind::Disjoint);
    }

    #[test]
    fn shared_edge_is_touching() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(4, 1, 4, 4);
        assert_eq!(classify_overlap(&a, &b), OverlapKind::Touching);
        assert_eq!(rectangles_overlap_area(&a, &b), Overlap::default());
    }

    #[test]
    fn shared_corner_is_touching() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(4, 4, 2, 2);
        assert_eq!(classify_overlap(&a, &b), OverlapKind::Touching);
    }

    #[test]
    fn strip_overlap_extents() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(3, 1, 4, 4);
        let o = rectangles_overlap_area(&a, &b);
        assert_eq!(o, Overlap { x: 1, y: 3 });
        assert_eq!(o.thickness(), 1);
        assert_eq!(classify_overlap(&a, &b), OverlapKind::Overlapping(o));
    }
}
