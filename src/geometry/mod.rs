//! Projection of normalized boxes into pixel space.

use crate::label::BoxRecord;

/// An integer pixel position, `(0, 0)` being the top-left corner of the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A box in pixel space given by its two corners.
///
/// Note: the corners are not required to be ordered or to lie inside the
/// image. A label with a negative size projects to a box whose
/// `bottom_right` is above or left of `top_left`; drawing code orders them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub top_left: PixelPoint,
    pub bottom_right: PixelPoint,
}

impl PixelRect {
    #[inline]
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            top_left: PixelPoint::new(x1, y1),
            bottom_right: PixelPoint::new(x2, y2),
        }
    }

    /// Horizontal extent. Negative if the corners are swapped.
    #[inline]
    pub fn width(&self) -> i64 {
        i64::from(self.bottom_right.x) - i64::from(self.top_left.x)
    }

    /// Vertical extent. Negative if the corners are swapped.
    #[inline]
    pub fn height(&self) -> i64 {
        i64::from(self.bottom_right.y) - i64::from(self.top_left.y)
    }

    /// Returns the same box with `top_left <= bottom_right` on both axes.
    pub fn ordered(&self) -> Self {
        Self::from_corners(
            self.top_left.x.min(self.bottom_right.x),
            self.top_left.y.min(self.bottom_right.y),
            self.top_left.x.max(self.bottom_right.x),
            self.top_left.y.max(self.bottom_right.y),
        )
    }
}

/// Project a normalized box onto an image of `image_width` x `image_height`.
///
/// Corners are truncated toward zero, not floored, so a box that straddles
/// the left edge rounds its negative corner up toward the origin.
pub fn project(record: &BoxRecord, image_width: u32, image_height: u32) -> PixelRect {
    let w = f64::from(image_width);
    let h = f64::from(image_height);

    let rect_w = record.width * w;
    let rect_h = record.height * h;
    let cx = record.center_x * w;
    let cy = record.center_y * h;

    PixelRect::from_corners(
        (cx - rect_w / 2.0) as i32,
        (cy - rect_h / 2.0) as i32,
        (cx + rect_w / 2.0) as i32,
        (cy + rect_h / 2.0) as i32,
    )
}
