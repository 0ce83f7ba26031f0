use image::RgbaImage;

use crate::assets::decode::load_image;
use crate::compose::warning::SlotWarning;
use crate::config::RenderConfig;
use crate::foundation::error::TesseraResult;
use crate::layout::placement::{Placement, resolve};
use crate::raster::blend::blend_masked;
use crate::raster::mask::make_mask;
use crate::raster::opacity::apply_opacity;
use crate::raster::resample::resize;
use crate::template::model::Slot;
use crate::text::fonts::{FontChain, FontIo, FontOrigin, StdFontIo};
use crate::text::layout::TextPainter;

/// Produces the content raster of an image slot from its input value.
pub trait ImageLoader {
    /// Load the raster referenced by `reference`.
    fn load(&self, reference: &str) -> TesseraResult<RgbaImage>;
}

/// Loads images from disk, resolving relative paths against the configured assets root.
#[derive(Clone, Debug, Default)]
pub struct FsImageLoader {
    config: RenderConfig,
}

impl FsImageLoader {
    /// Construct a loader that resolves paths with `config`.
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, reference: &str) -> TesseraResult<RgbaImage> {
        load_image(self.config.resolve_asset(reference))
    }
}

/// Resize, fade, mask, place, and blend `content` for an image slot.
pub fn composite_image(
    canvas: &mut RgbaImage,
    slot: &Slot,
    content: &RgbaImage,
) -> TesseraResult<Placement> {
    let target_w = u32::try_from(slot.width).unwrap_or(0);
    let target_h = u32::try_from(slot.height).unwrap_or(0);
    let resized = resize(content, target_w, target_h, slot.mode);
    let faded = apply_opacity(&resized, slot.opacity);
    let (w, h) = faded.dimensions();
    let mask = make_mask(slot.mask, w, h, slot.radius)?;
    let placement = resolve(slot, w, h);
    blend_masked(
        canvas,
        &faded,
        &mask,
        (placement.origin_x, placement.origin_y),
    )?;
    Ok(placement)
}

/// Composites slots onto a canvas one at a time.
pub struct SlotCompositor {
    fonts: FontChain,
    font_io: Box<dyn FontIo>,
    images: Box<dyn ImageLoader>,
    text: TextPainter,
}

impl SlotCompositor {
    /// Compositor backed by the filesystem, HTTP font downloads, and system fonts.
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            fonts: FontChain::from_config(config),
            font_io: Box::new(StdFontIo::new()),
            images: Box::new(FsImageLoader::new(config.clone())),
            text: TextPainter::new(),
        }
    }

    /// Replace the font byte source.
    pub fn with_font_io(mut self, io: Box<dyn FontIo>) -> Self {
        self.font_io = io;
        self
    }

    /// Replace the font chain, e.g. one with a different face check or builtin face.
    pub fn with_font_chain(mut self, fonts: FontChain) -> Self {
        self.fonts = fonts;
        self
    }

    /// Replace the image loader.
    pub fn with_image_loader(mut self, images: Box<dyn ImageLoader>) -> Self {
        self.images = images;
        self
    }

    /// Draw one slot onto `canvas`.
    ///
    /// A missing input skips the slot silently. Unreadable images, font fallback, and drawing
    /// failures skip or degrade the slot and are returned as a warning; they never abort.
    #[tracing::instrument(level = "debug", skip_all, fields(slot = %slot.id))]
    pub fn composite_slot(
        &mut self,
        canvas: &mut RgbaImage,
        slot: &Slot,
        input: Option<&str>,
    ) -> Option<SlotWarning> {
        let Some(value) = input else {
            tracing::debug!("no input, skipping");
            return None;
        };

        let warning = if slot.is_text {
            self.composite_text(canvas, slot, value)
        } else {
            self.composite_image_input(canvas, slot, value)
        };
        if let Some(w) = &warning {
            tracing::warn!("{w}");
        }
        warning
    }

    fn composite_image_input(
        &mut self,
        canvas: &mut RgbaImage,
        slot: &Slot,
        reference: &str,
    ) -> Option<SlotWarning> {
        let content = match self.images.load(reference) {
            Ok(img) => img,
            Err(e) => {
                return Some(SlotWarning::ImageLoad {
                    slot: slot.id.clone(),
                    reason: e.to_string(),
                });
            }
        };
        match composite_image(canvas, slot, &content) {
            Ok(p) => {
                let (x0, y0, x1, y1) = p.dest_rect();
                tracing::debug!(x0, y0, x1, y1, "image placed");
                None
            }
            Err(e) => Some(SlotWarning::ImageComposite {
                slot: slot.id.clone(),
                reason: e.to_string(),
            }),
        }
    }

    fn composite_text(
        &mut self,
        canvas: &mut RgbaImage,
        slot: &Slot,
        text: &str,
    ) -> Option<SlotWarning> {
        let font = self.fonts.resolve(&slot.text_opts, self.font_io.as_ref());
        if let Err(e) = self.text.paint(canvas, slot, text, &font) {
            return Some(SlotWarning::TextRender {
                slot: slot.id.clone(),
                reason: e.to_string(),
            });
        }
        (font.origin == FontOrigin::Builtin).then(|| SlotWarning::FontFallback {
            slot: slot.id.clone(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/slot.rs"]
mod tests;
