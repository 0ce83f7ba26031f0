use std::borrow::Cow;

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::template::model::ResizeMode;

/// Scale `src` into a `target_w x target_h` box according to `mode`.
///
/// Zero-sized targets or sources return the source borrowed and untouched. Scaled dimensions
/// are floored, so identical arguments always produce identical output. All scaling uses the
/// Catmull-Rom cubic kernel.
pub fn resize(
    src: &RgbaImage,
    target_w: u32,
    target_h: u32,
    mode: ResizeMode,
) -> Cow<'_, RgbaImage> {
    let (src_w, src_h) = src.dimensions();
    if target_w == 0 || target_h == 0 || src_w == 0 || src_h == 0 {
        return Cow::Borrowed(src);
    }

    let sx = f64::from(target_w) / f64::from(src_w);
    let sy = f64::from(target_h) / f64::from(src_h);

    let out = match mode {
        ResizeMode::Fill => scale(src, target_w, target_h),
        ResizeMode::Fit => {
            let (w, h) = scaled_dims((src_w, src_h), (target_w, target_h), sx <= sy);
            scale(src, w, h)
        }
        ResizeMode::Cover => {
            let (w, h) = scaled_dims((src_w, src_h), (target_w, target_h), sx >= sy);
            let (w, h) = (w.max(target_w), h.max(target_h));
            let scaled = scale(src, w, h);
            let x0 = (w - target_w) / 2;
            let y0 = (h - target_h) / 2;
            imageops::crop_imm(&scaled, x0, y0, target_w, target_h).to_image()
        }
    };
    Cow::Owned(out)
}

/// Uniformly scaled size where the binding axis lands exactly on its target and the other
/// axis is floored.
fn scaled_dims(src: (u32, u32), target: (u32, u32), x_binds: bool) -> (u32, u32) {
    let floor = |v: f64| (v + 1e-9).floor().max(0.0) as u32;
    if x_binds {
        let s = f64::from(target.0) / f64::from(src.0);
        (target.0, floor(f64::from(src.1) * s))
    } else {
        let s = f64::from(target.1) / f64::from(src.1);
        (floor(f64::from(src.0) * s), target.1)
    }
}

fn scale(src: &RgbaImage, w: u32, h: u32) -> RgbaImage {
    if w == 0 || h == 0 {
        return RgbaImage::new(w, h);
    }
    if src.dimensions() == (w, h) {
        return src.clone();
    }
    imageops::resize(src, w, h, FilterType::CatmullRom)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/resample.rs"]
mod tests;
