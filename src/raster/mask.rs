use image::{GrayImage, Luma};
use kurbo::Shape;

use crate::foundation::error::{TesseraError, TesseraResult};
use crate::template::model::MaskKind;

/// Corner radius used by rounded masks when none is given, as a fraction of the short side.
pub const DEFAULT_ROUNDED_FRACTION: f64 = 0.12;

const PATH_TOLERANCE: f64 = 0.1;

/// Concrete mask geometry for a `w x h` content box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaskShape {
    /// Full coverage, no rasterization.
    Opaque,
    /// Disk centered in the box with radius `min(w, h) / 2`.
    Circle {
        /// Center x.
        cx: f64,
        /// Center y.
        cy: f64,
        /// Radius.
        r: f64,
    },
    /// Rounded rectangle spanning the box.
    RoundedRect {
        /// Width.
        w: f64,
        /// Height.
        h: f64,
        /// Corner radius.
        r: f64,
    },
    /// Rectangle spanning the box.
    Rect {
        /// Width.
        w: f64,
        /// Height.
        h: f64,
    },
}

impl MaskShape {
    /// Resolve the shape for `kind` over a `w x h` box.
    pub fn for_kind(kind: MaskKind, w: u32, h: u32, radius: f64) -> Self {
        let (fw, fh) = (f64::from(w), f64::from(h));
        let short = fw.min(fh);
        match kind {
            MaskKind::None => Self::Opaque,
            MaskKind::Circle => Self::Circle {
                cx: fw / 2.0,
                cy: fh / 2.0,
                r: short / 2.0,
            },
            MaskKind::Rounded => Self::RoundedRect {
                w: fw,
                h: fh,
                r: if radius > 0.0 {
                    radius
                } else {
                    short * DEFAULT_ROUNDED_FRACTION
                },
            },
            MaskKind::Rect => Self::Rect { w: fw, h: fh },
        }
    }
}

/// Rasterize the coverage mask for `kind` at exactly `w x h`.
pub fn make_mask(kind: MaskKind, w: u32, h: u32, radius: f64) -> TesseraResult<GrayImage> {
    rasterize(MaskShape::for_kind(kind, w, h, radius), w, h)
}

/// Rasterize `shape` into a single-channel coverage buffer of `w x h`.
pub fn rasterize(shape: MaskShape, w: u32, h: u32) -> TesseraResult<GrayImage> {
    if w == 0 || h == 0 {
        return Ok(GrayImage::new(w, h));
    }
    match shape {
        MaskShape::Opaque => Ok(GrayImage::from_pixel(w, h, Luma([255]))),
        MaskShape::Circle { cx, cy, r } => {
            fill_coverage(w, h, |ctx| {
                ctx.fill_path(&to_cpu_path(&kurbo::Circle::new((cx, cy), r)));
            })
        }
        MaskShape::RoundedRect { w: rw, h: rh, r } => fill_coverage(w, h, |ctx| {
            ctx.fill_path(&to_cpu_path(&kurbo::RoundedRect::new(0.0, 0.0, rw, rh, r)));
        }),
        MaskShape::Rect { w: rw, h: rh } => fill_coverage(w, h, |ctx| {
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, rw, rh));
        }),
    }
}

fn fill_coverage(
    w: u32,
    h: u32,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) -> TesseraResult<GrayImage> {
    let w16: u16 = w
        .try_into()
        .map_err(|_| TesseraError::render("mask width exceeds u16"))?;
    let h16: u16 = h
        .try_into()
        .map_err(|_| TesseraError::render("mask height exceeds u16"))?;

    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
    draw(&mut ctx);
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut pixmap);

    let coverage: Vec<u8> = pixmap
        .data_as_u8_slice()
        .chunks_exact(4)
        .map(|px| px[3])
        .collect();
    GrayImage::from_raw(w, h, coverage)
        .ok_or_else(|| TesseraError::render("mask coverage size mismatch"))
}

fn to_cpu_path(shape: &impl Shape) -> vello_cpu::kurbo::BezPath {
    let mut p = vello_cpu::kurbo::BezPath::new();
    for el in shape.path_elements(PATH_TOLERANCE) {
        p.push(el);
    }
    p
}

#[cfg(test)]
#[path = "../../tests/unit/raster/mask.rs"]
mod tests;
