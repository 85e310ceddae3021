//! Rasterization of note icons, stamps and in-place text through resvg.

use pixel_recolor::Rgb8;
use resvg::usvg::{self, Transform};
use std::path::PathBuf;
use std::sync::Arc;
use tiny_skia::Pixmap;

use crate::assets::AssetLoader;
use crate::error::RenderError;
use crate::models::InplaceAlignment;

/// Icon shown while no page raster is available.
pub const BUSY_ICON: &str = "busy";

/// Icon used for linked text notes whose icon is unknown.
const FALLBACK_ICON: &str = "note";

/// Stamp frame used for unknown stamp names.
const GENERIC_STAMP: &str = "generic";

/// How an SVG is fitted into the requested pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fit {
    /// Uniform scale, centered
    Contain,
    /// Independent x and y scale, filling the target
    Stretch,
}

/// Content of an in-place (free text) annotation box.
#[derive(Debug, Clone)]
pub struct TextBox<'a> {
    pub contents: &'a str,
    /// Font size in pixels
    pub font_size: f32,
    pub text_color: Rgb8,
    pub background: Rgb8,
    /// Border width in pixels, 0 for none
    pub border_width: f32,
    pub alignment: InplaceAlignment,
}

/// Renders icons from the embedded (or overridden) SVG assets.
pub struct IconSet {
    assets: AssetLoader,
    /// Font database for text rendering
    fontdb: Arc<fontdb::Database>,
}

impl IconSet {
    /// Create an icon set with system fonts for text rendering
    pub fn new(assets: AssetLoader) -> Self {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();

        tracing::info!(
            font_count = fontdb.len(),
            "Loaded fonts for annotation text rendering"
        );

        Self::with_fontdb(assets, Arc::new(fontdb))
    }

    /// Create an icon set sharing an existing font database
    pub fn with_fontdb(assets: AssetLoader, fontdb: Arc<fontdb::Database>) -> Self {
        Self { assets, fontdb }
    }

    /// Embedded icons with system fonts
    pub fn embedded() -> Self {
        Self::new(AssetLoader::embedded())
    }

    pub fn has_icon(&self, name: &str) -> bool {
        self.assets.has_icon(&icon_path(name))
    }

    /// Render a named icon scaled uniformly into `width` x `height`.
    ///
    /// Unknown names fall back to the note icon.
    pub fn render_icon(&self, name: &str, width: u32, height: u32) -> Result<Pixmap, RenderError> {
        let path = if self.has_icon(name) {
            icon_path(name)
        } else {
            tracing::debug!(icon = %name, "Unknown icon, using note icon");
            icon_path(FALLBACK_ICON)
        };
        let data = self
            .assets
            .read_icon(&path)
            .map_err(|_| RenderError::IconNotFound(name.to_string()))?;
        self.rasterize_svg(&data, width, height, Fit::Contain)
    }

    /// Render a named stamp stretched over `width` x `height`.
    ///
    /// Unknown names get the bare generic frame.
    pub fn render_stamp(&self, name: &str, width: u32, height: u32) -> Result<Pixmap, RenderError> {
        let mut path = stamp_path(name);
        if !self.assets.has_icon(&path) {
            tracing::debug!(stamp = %name, "Unknown stamp, using generic frame");
            path = stamp_path(GENERIC_STAMP);
        }
        let data = self
            .assets
            .read_icon(&path)
            .map_err(|_| RenderError::IconNotFound(name.to_string()))?;
        self.rasterize_svg(&data, width, height, Fit::Stretch)
    }

    /// Render a filled, word-wrapped text box of `width` x `height` pixels.
    pub fn render_text_box(
        &self,
        text_box: &TextBox<'_>,
        width: u32,
        height: u32,
    ) -> Result<Pixmap, RenderError> {
        let svg = text_box_svg(text_box, width, height);
        self.rasterize_svg(svg.as_bytes(), width, height, Fit::Stretch)
    }

    /// Parse and rasterize SVG onto a transparent pixmap
    fn rasterize_svg(
        &self,
        svg_data: &[u8],
        width: u32,
        height: u32,
        fit: Fit,
    ) -> Result<Pixmap, RenderError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };

        let tree = usvg::Tree::from_data(svg_data, &options)
            .map_err(|e| RenderError::IconParse(e.to_string()))?;

        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation { width, height })?;

        let svg_size = tree.size();
        let scale_x = width as f32 / svg_size.width();
        let scale_y = height as f32 / svg_size.height();
        let transform = match fit {
            Fit::Contain => {
                let scale = scale_x.min(scale_y);
                let offset_x = (width as f32 - svg_size.width() * scale) / 2.0;
                let offset_y = (height as f32 - svg_size.height() * scale) / 2.0;
                Transform::from_scale(scale, scale).post_translate(offset_x, offset_y)
            }
            Fit::Stretch => Transform::from_scale(scale_x, scale_y),
        };

        resvg::render(&tree, transform, &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

fn icon_path(name: &str) -> PathBuf {
    PathBuf::from(format!("{}.svg", asset_name(name)))
}

fn stamp_path(name: &str) -> PathBuf {
    PathBuf::from("stamps").join(format!("{}.svg", asset_name(name)))
}

/// `"NotForPublicRelease"` and `"not for public release"` both map to
/// `notforpublicrelease`.
fn asset_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Tint a grayscale icon: white becomes `color`, black stays black,
/// alpha is kept.
pub fn colorize(pixmap: &mut Pixmap, color: Rgb8) {
    let [cr, cg, cb] = color.to_bytes().map(u16::from);
    for px in pixmap.data_mut().chunks_exact_mut(4) {
        // Premultiplied red scaled by the color stays <= alpha
        let intensity = u16::from(px[0]);
        px[0] = (intensity * cr / 255) as u8;
        px[1] = (intensity * cg / 255) as u8;
        px[2] = (intensity * cb / 255) as u8;
    }
}

fn text_box_svg(text_box: &TextBox<'_>, width: u32, height: u32) -> String {
    let (w, h) = (width as f32, height as f32);
    let border = text_box.border_width.max(0.0);
    let font_size = text_box.font_size.max(1.0);
    let padding = border + 2.0;

    // Average glyph advance of a sans-serif face
    let columns = (((w - 2.0 * padding) / (font_size * 0.55)).floor() as usize).max(1);
    let lines = textwrap::wrap(text_box.contents, columns);

    let (anchor, x) = match text_box.alignment {
        InplaceAlignment::Left => ("start", padding),
        InplaceAlignment::Center => ("middle", w / 2.0),
        InplaceAlignment::Right => ("end", w - padding),
    };

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    if border > 0.0 {
        svg.push_str(&format!(
            r##"<rect x="{o}" y="{o}" width="{rw}" height="{rh}" fill="{bg}" stroke="#000000" stroke-width="{border}"/>"##,
            o = border / 2.0,
            rw = (w - border).max(0.0),
            rh = (h - border).max(0.0),
            bg = text_box.background,
        ));
    } else {
        svg.push_str(&format!(
            r#"<rect x="0" y="0" width="{w}" height="{h}" fill="{bg}"/>"#,
            bg = text_box.background,
        ));
    }
    svg.push_str(&format!(
        r#"<text font-family="sans-serif" font-size="{font_size}" fill="{color}" text-anchor="{anchor}">"#,
        color = text_box.text_color,
    ));
    for (i, line) in lines.iter().enumerate() {
        let y = padding + font_size * (0.85 + 1.2 * i as f32);
        if y - font_size > h {
            break;
        }
        svg.push_str(&format!(
            r#"<tspan x="{x}" y="{y}">{}</tspan>"#,
            escape_xml(line)
        ));
    }
    svg.push_str("</text></svg>");
    svg
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
