// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversions between collision boxes and Kurbo geometry.

use kurbo::Rect;
use loon_collision::RectBox;

/// Kurbo rectangle covering the same area as `b`.
pub fn rect_to_kurbo(b: &RectBox) -> Rect {
    Rect::new(b.x, b.y, b.right(), b.bottom())
}

/// Collision box for `r`. Extents are truncated toward zero.
pub fn rect_from_kurbo(r: Rect) -> RectBox {
    RectBox::from_xywh(r.x0, r.y0, r.width(), r.height())
}

/// Clamp `v` to `[0, limit]`. A negative `limit` wins over zero.
pub(crate) fn limit_value(v: f64, limit: f64) -> f64 {
    let v = v.max(0.0);
    if limit < v { limit } else { v }
}

#[inline]
pub(crate) fn saturating_i32(v: f64) -> i32 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Float to int casts saturate; cell indices never get near the bounds."
    )]
    let i = v as i32;
    i
}
