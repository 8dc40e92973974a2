//! Prefilter rectangle and the dense output indexing derived from it.

use std::fmt;

use glam::IVec2;

/// Output rows are padded to a multiple of this many elements.
pub const ROW_ALIGNMENT: usize = 4;

#[inline]
pub fn align_up(value: usize, alignment: usize) -> usize {
    value.div_ceil(alignment) * alignment
}

/// Axis-aligned pixel rectangle, lower bounds inclusive, upper bounds exclusive.
///
/// Besides describing a region of the render, the rectangle defines the index
/// space of every output array of a prefilter pass: pixel `(x, y)` lives at
/// `(y - min.y) * row_width() + (x - min.x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub min: IVec2,
    pub max: IVec2,
}

impl Rect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: IVec2::new(x0, y0),
            max: IVec2::new(x1, y1),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        (self.max.x - self.min.x).max(0) as usize
    }

    #[inline]
    pub fn height(&self) -> usize {
        (self.max.y - self.min.y).max(0) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Width of one output row including alignment padding.
    #[inline]
    pub fn row_width(&self) -> usize {
        align_up(self.width(), ROW_ALIGNMENT)
    }

    /// Minimum length of an output array for this rectangle.
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.row_width() * self.height()
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min.x && x < self.max.x && y >= self.min.y && y < self.max.y
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    /// Overlap of two rectangles; empty (but not necessarily zero-sized at the
    /// origin) when they do not intersect.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max).max(min);
        Rect { min, max }
    }

    /// Output index of pixel `(x, y)`.
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> usize {
        debug_assert!(
            self.contains(x, y),
            "pixel ({}, {}) outside prefilter rect {}",
            x,
            y,
            self
        );
        (y - self.min.y) as usize * self.row_width() + (x - self.min.x) as usize
    }

    /// Row-major iterator over every pixel of the rectangle.
    pub fn pixels(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let Rect { min, max } = *self;
        (min.y..max.y).flat_map(move |y| (min.x..max.x).map(move |x| (x, y)))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})x[{}, {})",
            self.min.x, self.max.x, self.min.y, self.max.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 4), 0);
        assert_eq!(align_up(1, 4), 4);
        assert_eq!(align_up(4, 4), 4);
        assert_eq!(align_up(5, 4), 8);
    }

    #[test]
    fn test_row_width_is_padded() {
        let rect = Rect::new(10, 20, 15, 23);
        assert_eq!(rect.width(), 5);
        assert_eq!(rect.height(), 3);
        assert_eq!(rect.row_width(), 8);
        assert_eq!(rect.buffer_len(), 24);
    }

    #[test]
    fn test_index_uses_padded_rows() {
        let rect = Rect::new(10, 20, 15, 23);
        assert_eq!(rect.index(10, 20), 0);
        assert_eq!(rect.index(14, 20), 4);
        // second row starts after the padding
        assert_eq!(rect.index(10, 21), 8);
        assert_eq!(rect.index(14, 22), 2 * 8 + 4);
    }

    #[test]
    fn test_inverted_rect_is_empty() {
        let rect = Rect::new(5, 5, 2, 8);
        assert_eq!(rect.width(), 0);
        assert!(rect.is_empty());
        assert_eq!(rect.buffer_len(), 0);
    }

    #[test]
    fn test_contains_excludes_upper_bounds() {
        let rect = Rect::new(0, 0, 4, 4);
        assert!(rect.contains(0, 0));
        assert!(rect.contains(3, 3));
        assert!(!rect.contains(4, 3));
        assert!(!rect.contains(3, 4));
        assert!(!rect.contains(-1, 0));
    }

    #[test]
    fn test_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, -3, 20, 4);
        assert_eq!(a.intersect(&b), Rect::new(5, 0, 10, 4));

        let disjoint = a.intersect(&Rect::new(20, 20, 30, 30));
        assert!(disjoint.is_empty());
    }

    #[test]
    fn test_contains_rect() {
        let outer = Rect::new(0, 0, 10, 10);
        assert!(outer.contains_rect(&Rect::new(0, 0, 10, 10)));
        assert!(outer.contains_rect(&Rect::new(2, 3, 4, 5)));
        assert!(!outer.contains_rect(&Rect::new(2, 3, 11, 5)));
    }

    #[test]
    fn test_pixels_row_major() {
        let rect = Rect::new(1, 2, 3, 4);
        let pixels: Vec<_> = rect.pixels().collect();
        assert_eq!(pixels, vec![(1, 2), (2, 2), (1, 3), (2, 3)]);
    }
}
