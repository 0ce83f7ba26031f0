use crate::foundation::math::clamp_anchor;
use crate::template::model::Slot;

/// Destination of an image slot's content in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Top-left x; may be negative or past the canvas.
    pub origin_x: i64,
    /// Top-left y; may be negative or past the canvas.
    pub origin_y: i64,
    /// Content width.
    pub width: u32,
    /// Content height.
    pub height: u32,
}

impl Placement {
    /// Half-open destination rectangle as `(x0, y0, x1, y1)`.
    pub fn dest_rect(&self) -> (i64, i64, i64, i64) {
        (
            self.origin_x,
            self.origin_y,
            self.origin_x + i64::from(self.width),
            self.origin_y + i64::from(self.height),
        )
    }
}

/// Place `content_w x content_h` content so that its anchor point sits on the slot's `(x, y)`.
///
/// Out-of-range anchors fall back to 0 (top-left).
pub fn resolve(slot: &Slot, content_w: u32, content_h: u32) -> Placement {
    let ax = clamp_anchor(slot.anchor_x);
    let ay = clamp_anchor(slot.anchor_y);
    Placement {
        origin_x: i64::from(slot.x) - (f64::from(content_w) * ax).round() as i64,
        origin_y: i64::from(slot.y) - (f64::from(content_h) * ay).round() as i64,
        width: content_w,
        height: content_h,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/placement.rs"]
mod tests;
