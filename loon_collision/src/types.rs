// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and the type tag used to filter queries.

use core::fmt;

/// Axis-aligned box with a floating-point origin and integral extents.
///
/// The origin is the top-left corner. Extents are truncated toward zero when
/// set from floating-point values, matching the pixel-oriented semantics of
/// the engine. Negative extents are not rejected, but every geometric
/// predicate treats a box with no area as containing and intersecting nothing.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RectBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl RectBox {
    /// The empty box at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0, 0);

    /// Create a box from its origin and integral size.
    pub const fn new(x: f64, y: f64, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a box from floating-point extents, truncating them toward zero.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, trunc(width), trunc(height))
    }

    /// Replace all four fields.
    pub fn set_bounds(&mut self, x: f64, y: f64, width: f64, height: f64) {
        *self = Self::from_xywh(x, y, width, height);
    }

    /// Move the origin, keeping the size.
    pub fn set_location(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Change the size, truncating toward zero.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = trunc(width);
        self.height = trunc(height);
    }

    /// Translate the box in place.
    pub fn offset(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Grow the box by `h` on the left and right and by `v` on the top and bottom.
    pub fn grow(&mut self, h: f64, v: f64) {
        self.x -= h;
        self.y -= v;
        self.width = trunc(f64::from(self.width) + h * 2.0);
        self.height = trunc(f64::from(self.height) + v * 2.0);
    }

    /// Grow the box around its center by scale factors.
    pub fn scale_grow(&mut self, h: f64, v: f64) {
        self.grow(f64::from(self.width) * (h - 1.0), f64::from(self.height) * (v - 1.0));
    }

    /// Integer variant of [`grow`](Self::grow).
    pub fn inflate(&mut self, h: i32, v: i32) {
        self.x -= f64::from(h);
        self.y -= f64::from(v);
        self.width += h * 2;
        self.height += v * 2;
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f64 {
        self.x + f64::from(self.width)
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> f64 {
        self.y + f64::from(self.height)
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f64 {
        self.x + f64::from(self.width) / 2.0
    }

    /// Vertical center.
    pub fn center_y(&self) -> f64 {
        self.y + f64::from(self.height) / 2.0
    }

    /// Left edge in pixels, truncated toward zero.
    pub fn x_px(&self) -> i32 {
        trunc(self.x)
    }

    /// Top edge in pixels, truncated toward zero.
    pub fn y_px(&self) -> i32 {
        trunc(self.y)
    }

    /// Right edge in pixels, truncated toward zero.
    pub fn right_px(&self) -> i32 {
        trunc(self.right())
    }

    /// Bottom edge in pixels, truncated toward zero.
    pub fn bottom_px(&self) -> i32 {
        trunc(self.bottom())
    }

    /// Area in square pixels.
    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    /// True when the box has no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Strict overlap test: boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        other.right() > self.x
            && other.x < self.right()
            && other.bottom() > self.y
            && other.y < self.bottom()
    }

    /// Inclusive overlap test: touching edges count.
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.x > other.right()
            || self.right() < other.x
            || self.y > other.bottom()
            || self.bottom() < other.y)
    }

    /// The overlapping region, or `None` when the boxes share no area.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let left = self.x.max(other.x);
        let right = self.right().min(other.right());
        let top = self.y.max(other.y);
        let bottom = self.bottom().min(other.bottom());
        (left < right && top < bottom)
            .then(|| Self::from_xywh(left, top, right - left, bottom - top))
    }

    /// Bounding box of `self` and `other`.
    ///
    /// Only an `other` with area can expand the result. If `other` is empty,
    /// `self` is returned unchanged; if `self` is empty, `other` replaces it.
    pub fn union(&self, other: &Self) -> Self {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::from_xywh(left, top, right - left, bottom - top)
    }

    /// Half-open point containment: `left <= x < right` and `top <= y < bottom`.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        !self.is_empty() && x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Self) -> bool {
        !self.is_empty()
            && other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

impl fmt::Display for RectBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}x{}]",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Label attached to every registered object, used to filter queries by kind.
///
/// Queries take an `Option<TypeTag>`; `None` is the wildcard.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(&'static str);

impl TypeTag {
    /// Tag for objects that were not given a kind.
    pub const UNTYPED: Self = Self("");

    /// Create a tag from a static name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The tag's name.
    pub const fn name(self) -> &'static str {
        self.0
    }

    /// Whether `self` passes `filter`.
    pub fn matches(self, filter: Option<Self>) -> bool {
        filter.is_none_or(|f| f == self)
    }
}

impl Default for TypeTag {
    fn default() -> Self {
        Self::UNTYPED
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[inline]
pub(crate) fn trunc(v: f64) -> i32 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Pixel accessors truncate toward zero by definition."
    )]
    let i = v as i32;
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = RectBox::new(0.0, 0.0, 10, 10);
        let b = RectBox::new(10.0, 0.0, 10, 10);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
        assert!(a.overlaps(&b), "inclusive overlap counts shared edges");
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn intersects_is_symmetric() {
        let boxes = [
            RectBox::new(0.0, 0.0, 10, 10),
            RectBox::new(5.0, 5.0, 10, 10),
            RectBox::new(-3.5, 2.0, 4, 4),
            RectBox::new(9.9, 9.9, 1, 1),
            RectBox::new(2.0, 2.0, 0, 5),
            RectBox::new(20.0, 20.0, 3, 3),
        ];
        for a in &boxes {
            for b in &boxes {
                assert_eq!(a.intersects(b), b.intersects(a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn degenerate_boxes_hold_nothing() {
        let flat = RectBox::new(5.0, 5.0, 0, 10);
        let big = RectBox::new(0.0, 0.0, 100, 100);
        assert!(!flat.intersects(&big));
        assert!(!flat.contains_point(5.0, 6.0));
        assert!(!flat.contains(&RectBox::new(5.0, 5.0, 0, 0)));
    }

    #[test]
    fn intersection_region() {
        let a = RectBox::new(0.0, 0.0, 10, 10);
        let b = RectBox::new(5.0, 4.0, 10, 10);
        assert_eq!(a.intersection(&b), Some(RectBox::new(5.0, 4.0, 5, 6)));
    }

    #[test]
    fn union_ignores_empty_argument() {
        let a = RectBox::new(0.0, 0.0, 10, 10);
        let empty = RectBox::new(50.0, 50.0, 0, 0);
        assert_eq!(a.union(&empty), a);
        assert_eq!(empty.union(&a), a);
        let b = RectBox::new(20.0, 5.0, 5, 20);
        assert_eq!(a.union(&b), RectBox::new(0.0, 0.0, 25, 25));
    }

    #[test]
    fn point_containment_is_half_open() {
        let a = RectBox::new(0.0, 0.0, 10, 10);
        assert!(a.contains_point(0.0, 0.0));
        assert!(a.contains_point(9.99, 9.99));
        assert!(!a.contains_point(10.0, 5.0));
        assert!(!a.contains_point(5.0, 10.0));
    }

    #[test]
    fn enclosing_containment() {
        let outer = RectBox::new(0.0, 0.0, 10, 10);
        assert!(outer.contains(&RectBox::new(2.0, 2.0, 8, 8)));
        assert!(!outer.contains(&RectBox::new(2.0, 2.0, 9, 8)));
    }

    #[test]
    fn pixel_accessors_truncate() {
        let a = RectBox::new(-1.7, 2.9, 3, 3);
        assert_eq!(a.x_px(), -1);
        assert_eq!(a.y_px(), 2);
        assert_eq!(a.right_px(), 1);
        assert_eq!(a.bottom_px(), 5);
        assert_eq!(RectBox::from_xywh(0.0, 0.0, 4.9, -2.5), RectBox::new(0.0, 0.0, 4, -2));
    }

    #[test]
    fn grow_and_scale() {
        let mut a = RectBox::new(10.0, 10.0, 10, 10);
        a.grow(2.0, 1.0);
        assert_eq!(a, RectBox::new(8.0, 9.0, 14, 12));
        let mut b = RectBox::new(10.0, 10.0, 10, 10);
        b.scale_grow(2.0, 2.0);
        assert_eq!(b, RectBox::new(0.0, 0.0, 30, 30));
    }

    #[test]
    fn type_tag_filter() {
        let enemy = TypeTag::new("enemy");
        assert!(enemy.matches(None));
        assert!(enemy.matches(Some(enemy)));
        assert!(!enemy.matches(Some(TypeTag::new("hero"))));
    }
}
