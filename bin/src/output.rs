//! Lightmap output

use crate::options::OutputFormat;
use relight_core::lightmap::*;
use std::path::{Path, PathBuf};

/// Returns the path of a lightmap file.
///
/// * `dir`    - Output directory.
/// * `name`   - Mesh name.
/// * `suffix` - Appended to the mesh name.
/// * `format` - File format; selects the extension.
pub fn lightmap_path(dir: &Path, name: &str, suffix: &str, format: OutputFormat) -> PathBuf {
    let extension = match format {
        OutputFormat::Png => "png",
        OutputFormat::Exr => "exr",
    };
    let file: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    dir.join(format!("{file}{suffix}.{extension}"))
}

/// Writes a lightmap with its seams expanded.
///
/// * `path`     - Output file path.
/// * `lightmap` - The lightmap.
/// * `format`   - File format.
/// * `encoding` - Pixel encoding of 8-bit output.
pub fn write_lightmap(
    path: &Path,
    lightmap: &Lightmap,
    format: OutputFormat,
    encoding: LightmapEncoding,
) -> Result<(), String> {
    match format {
        OutputFormat::Png => write_png(path, lightmap, encoding),
        OutputFormat::Exr => write_exr(path, lightmap),
    }
}

/// Writes the lightmap as an 8-bit RGBA PNG.
///
/// * `path`     - Output file path.
/// * `lightmap` - The lightmap.
/// * `encoding` - Pixel encoding.
fn write_png(path: &Path, lightmap: &Lightmap, encoding: LightmapEncoding) -> Result<(), String> {
    let (res_x, res_y) = (lightmap.width() as u32, lightmap.height() as u32);
    info!("Writing lightmap {} with resolution {}x{}", path.display(), res_x, res_y);

    let imgbuf = image::RgbaImage::from_raw(res_x, res_y, lightmap.to_rgba(encoding, true))
        .ok_or_else(|| format!("Lightmap buffer of {} does not match its size", path.display()))?;
    imgbuf
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|err| format!("Error saving lightmap {}: {err}", path.display()))
}

/// Writes the lightmap in OpenEXR format.
///
/// * `path`     - Output file path.
/// * `lightmap` - The lightmap.
fn write_exr(path: &Path, lightmap: &Lightmap) -> Result<(), String> {
    use exr::prelude::*;

    let (res_x, res_y) = (lightmap.width(), lightmap.height());
    info!("Writing lightmap {} with resolution {}x{}", path.display(), res_x, res_y);

    let rgb = lightmap.to_rgb_buffer(true);
    let size = Vec2(res_x, res_y);
    let layer = Layer::new(
        size,
        LayerAttributes::named("lightmap"),
        Encoding::SMALL_LOSSLESS,
        SpecificChannels::rgb(|pos: Vec2<usize>| {
            let offset = 3 * (pos.1 * res_x + pos.0);
            (rgb[offset], rgb[offset + 1], rgb[offset + 2])
        }),
    );

    let attributes = ImageAttributes::new(IntegerBounds::from_dimensions(size));
    Image::empty(attributes)
        .with_layer(layer)
        .write()
        .to_file(path)
        .map_err(|err| format!("Error saving lightmap {}: {err}", path.display()))
}
