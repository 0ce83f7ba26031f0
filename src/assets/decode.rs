use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use image::RgbaImage;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};

use crate::foundation::error::{TesseraError, TesseraResult};

const JPEG_QUALITY: u8 = 92;

/// Decode a raster from memory into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> TesseraResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| TesseraError::decode(format!("decode image from memory: {e}")))?;
    Ok(dyn_img.to_rgba8())
}

/// Read and decode a raster file into straight RGBA8.
pub fn load_image(path: impl AsRef<Path>) -> TesseraResult<RgbaImage> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes).map_err(|e| match e {
        TesseraError::Decode(msg) => {
            TesseraError::decode(format!("{msg} (source '{}')", path.display()))
        }
        other => other,
    })
}

/// Pick the encoding keyword: the template's format, else the output extension, else `png`.
pub fn output_format_for(template_format: &str, out_path: &Path) -> String {
    if !template_format.is_empty() {
        return template_format.to_ascii_lowercase();
    }
    out_path
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "png".to_string())
}

/// Encode `canvas` to `path`. Unknown format keywords fall back to PNG.
pub fn save_image(canvas: &RgbaImage, path: impl AsRef<Path>, format: &str) -> TesseraResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("create output '{}'", path.display()))?;
    let mut w = BufWriter::new(file);

    let encoded = match format.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => {
            let rgb = image::DynamicImage::ImageRgba8(canvas.clone()).to_rgb8();
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut w, JPEG_QUALITY))
        }
        "gif" => canvas.write_to(&mut w, image::ImageFormat::Gif),
        "tiff" => canvas.write_to(&mut w, image::ImageFormat::Tiff),
        "bmp" => canvas.write_to(&mut w, image::ImageFormat::Bmp),
        _ => canvas.write_with_encoder(PngEncoder::new_with_quality(
            &mut w,
            CompressionType::Best,
            PngFilter::Adaptive,
        )),
    };
    encoded.map_err(|e| TesseraError::decode(format!("encode '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
