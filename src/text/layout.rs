use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;

use crate::assets::color::text_color;
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::foundation::math::clamp_anchor;
use crate::raster::blend::blend_premul;
use crate::template::model::{Slot, TextOptions};
use crate::text::fonts::{FontBytes, ResolvedFont};

/// Font size used when a slot gives none.
pub const DEFAULT_FONT_SIZE_PX: f32 = 13.0;
/// Line height multiplier for wrapped text, relative to the font's natural line height.
pub const WRAP_LINE_SPACING: f32 = 1.4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<[u8; 4]> for TextBrushRgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// Anchor point of a text slot and the fractions of the text box placed on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextAnchor {
    /// Anchor x in canvas pixels.
    pub px: f64,
    /// Anchor y in canvas pixels.
    pub py: f64,
    /// Horizontal alignment fraction of the text box.
    pub frac_x: f64,
    /// Vertical alignment fraction of the text box.
    pub frac_y: f64,
}

impl TextAnchor {
    /// Top-left of a `box_w x box_h` text box aligned on this anchor.
    pub fn origin_for(&self, box_w: f64, box_h: f64) -> (f64, f64) {
        (
            self.px - self.frac_x * box_w,
            self.py - self.frac_y * box_h,
        )
    }
}

/// Compute where a text slot's text is anchored inside its box.
///
/// The slot anchor picks the point (0 when unset); alignment only decides which part of the
/// text box sits on it.
pub fn text_anchor(slot: &Slot) -> TextAnchor {
    let frac_x = slot.text_opts.align_x.fraction();
    let frac_y = slot.text_opts.align_y.fraction();
    let ax = clamp_anchor(slot.anchor_x);
    let ay = clamp_anchor(slot.anchor_y);
    TextAnchor {
        px: f64::from(slot.x) + f64::from(slot.width) * ax,
        py: f64::from(slot.y) + f64::from(slot.height) * ay,
        frac_x,
        frac_y,
    }
}

/// Wrap width in pixels when wrapping is enabled with a positive width.
pub fn wrap_width(opts: &TextOptions) -> Option<f32> {
    (opts.wrap && opts.max_width > 0).then_some(opts.max_width as f32)
}

fn font_size_px(opts: &TextOptions) -> f32 {
    let size = opts.font_size as f32;
    if size.is_finite() && size > 0.0 {
        size
    } else {
        DEFAULT_FONT_SIZE_PX
    }
}

fn font_key(bytes: &FontBytes) -> usize {
    Arc::as_ptr(bytes) as usize
}

/// Stateful helper for building Parley text layouts from raw font bytes.
///
/// Each distinct font buffer is registered once; the engine keeps the buffer alive alongside
/// its family name so the pointer key stays unique.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<usize, (FontBytes, String)>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, font: &FontBytes) -> TesseraResult<String> {
        if let Some((_, name)) = self.families.get(&font_key(font)) {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::new(font.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| TesseraError::font("no font families registered from font bytes"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TesseraError::font("registered font family has no name"))?
            .to_string();

        self.families
            .insert(font_key(font), (font.clone(), family_name.clone()));
        Ok(family_name)
    }

    /// Shape and lay out plain text. With `wrap_width` the text is broken into lines of at most
    /// that width, left-justified, with [`WRAP_LINE_SPACING`] line height.
    pub fn layout_plain(
        &mut self,
        text: &str,
        font: &FontBytes,
        size_px: f32,
        brush: TextBrushRgba8,
        wrap_width: Option<f32>,
    ) -> TesseraResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TesseraError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let family_name = self.family_for(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));
        if wrap_width.is_some() {
            builder.push_default(parley::style::StyleProperty::LineHeight(
                parley::style::LineHeight::MetricsRelative(WRAP_LINE_SPACING),
            ));
        }

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(wrap_width);
        if let Some(w) = wrap_width {
            layout.align(
                Some(w),
                parley::Alignment::Start,
                parley::AlignmentOptions::default(),
            );
        }

        Ok(layout)
    }
}

/// Lays out and paints text slots onto a canvas.
#[derive(Default)]
pub struct TextPainter {
    engine: TextLayoutEngine,
    faces: HashMap<usize, vello_cpu::peniko::FontData>,
}

impl TextPainter {
    /// Construct a painter with a fresh layout engine.
    pub fn new() -> Self {
        Self::default()
    }

    fn face_for(&mut self, font: &FontBytes) -> vello_cpu::peniko::FontData {
        self.faces
            .entry(font_key(font))
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::new(font.clone()), 0)
            })
            .clone()
    }

    /// Lay out `text` for `slot` with `font` and blend it source-over onto `canvas`.
    ///
    /// Glyphs are rasterized into a pixmap covering only the text box (plus a margin for
    /// overhanging outlines, clipped to the canvas). Returns the top-left of the aligned text
    /// box in canvas coordinates.
    pub fn paint(
        &mut self,
        canvas: &mut RgbaImage,
        slot: &Slot,
        text: &str,
        font: &ResolvedFont,
    ) -> TesseraResult<(f64, f64)> {
        let opts = &slot.text_opts;
        let wrap = wrap_width(opts);
        let brush = TextBrushRgba8::from(text_color(&opts.color));
        let size_px = font_size_px(opts);
        let layout = self
            .engine
            .layout_plain(text, &font.bytes, size_px, brush, wrap)?;

        let box_w = f64::from(wrap.unwrap_or_else(|| layout.width()));
        let box_h = f64::from(layout.height());
        let (ox, oy) = text_anchor(slot).origin_for(box_w, box_h);

        let pad = (f64::from(size_px) * 0.5).ceil() + 1.0;
        let x0 = (ox - pad).floor().max(0.0);
        let y0 = (oy - pad).floor().max(0.0);
        let x1 = (ox + box_w + pad).ceil().min(f64::from(canvas.width()));
        let y1 = (oy + box_h + pad).ceil().min(f64::from(canvas.height()));
        if x1 <= x0 || y1 <= y0 {
            return Ok((ox, oy));
        }
        let w16: u16 = ((x1 - x0) as u32)
            .try_into()
            .map_err(|_| TesseraError::render("text box wider than 65535 px"))?;
        let h16: u16 = ((y1 - y0) as u32)
            .try_into()
            .map_err(|_| TesseraError::render("text box taller than 65535 px"))?;

        let font_data = self.face_for(&font.bytes);
        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((ox - x0, oy - y0)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);
        blend_premul(
            canvas,
            pixmap.data_as_u8_slice(),
            (u32::from(w16), u32::from(h16)),
            (x0 as i64, y0 as i64),
        )?;
        Ok((ox, oy))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
