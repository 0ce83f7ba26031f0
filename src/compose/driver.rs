use std::path::Path;

use image::RgbaImage;

use crate::assets::decode::{load_image, output_format_for, save_image};
use crate::compose::slot::SlotCompositor;
use crate::compose::warning::SlotWarning;
use crate::config::RenderConfig;
use crate::foundation::error::TesseraResult;
use crate::raster::resample::resize;
use crate::template::model::{Inputs, ResizeMode, Template, parse_inputs_path};

/// Result of rendering a template: the composited canvas and every per-slot warning.
#[derive(Clone, Debug)]
pub struct RenderOutput {
    /// Straight-alpha RGBA8 canvas.
    pub canvas: RgbaImage,
    /// Non-fatal problems, in slot order.
    pub warnings: Vec<SlotWarning>,
}

/// Canvas for `template`: the base image, stretched to the output size when one is declared.
pub fn prepare_canvas(template: &Template, config: &RenderConfig) -> TesseraResult<RgbaImage> {
    let base = load_image(config.resolve_asset(&template.template_image))?;
    let out = &template.output;
    match (u32::try_from(out.width), u32::try_from(out.height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => {
            tracing::debug!(w, h, "stretching base image to output size");
            Ok(resize(&base, w, h, ResizeMode::Fill).into_owned())
        }
        _ => Ok(base),
    }
}

/// Render `template` with `inputs` using a filesystem-backed compositor built from `config`.
pub fn render_template(
    template: &Template,
    inputs: &Inputs,
    config: &RenderConfig,
) -> TesseraResult<RenderOutput> {
    let mut compositor = SlotCompositor::new(config);
    render_with(&mut compositor, template, inputs, config)
}

/// Render `template` with a caller-supplied compositor.
///
/// Only a missing or undecodable base image fails; slot problems end up in
/// [`RenderOutput::warnings`].
#[tracing::instrument(level = "debug", skip_all, fields(slots = template.slots.len()))]
pub fn render_with(
    compositor: &mut SlotCompositor,
    template: &Template,
    inputs: &Inputs,
    config: &RenderConfig,
) -> TesseraResult<RenderOutput> {
    let mut canvas = prepare_canvas(template, config)?;
    let warnings: Vec<SlotWarning> = template
        .slots
        .iter()
        .filter_map(|slot| {
            let input = inputs.get(&slot.id).map(String::as_str);
            compositor.composite_slot(&mut canvas, slot, input)
        })
        .collect();
    tracing::info!(
        width = canvas.width(),
        height = canvas.height(),
        warnings = warnings.len(),
        "template rendered"
    );
    Ok(RenderOutput { canvas, warnings })
}

/// Parse the template and inputs files, render, and encode the canvas to `out_path`.
///
/// The encoding is `format` when given, then the template's output format, then the output
/// extension, then PNG.
pub fn render_to_file(
    template_path: impl AsRef<Path>,
    inputs_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
    format: Option<&str>,
    config: &RenderConfig,
) -> TesseraResult<Vec<SlotWarning>> {
    let out_path = out_path.as_ref();
    let template = Template::from_path(template_path)?;
    let inputs = parse_inputs_path(inputs_path)?;
    let RenderOutput { canvas, warnings } = render_template(&template, &inputs, config)?;
    let requested = format
        .filter(|f| !f.is_empty())
        .unwrap_or(&template.output.format);
    let format = output_format_for(requested, out_path);
    save_image(&canvas, out_path, &format)?;
    tracing::info!(path = %out_path.display(), format = %format, "output written");
    Ok(warnings)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/driver.rs"]
mod tests;
