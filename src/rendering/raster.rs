//! PNG reading and writing, and the stand-in page raster used by scenes
//! without an image.

use pixel_recolor::Rgb8;
use std::io::Cursor;
use tiny_skia::{IntSize, Paint, Pixmap, Rect, Transform};

use crate::error::RenderError;

/// Decode a PNG of any color type into a premultiplied pixmap.
pub fn decode_png(data: &[u8]) -> Result<Pixmap, RenderError> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| RenderError::PngDecode(e.to_string()))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| RenderError::PngDecode(e.to_string()))?;
    let bytes = &buf[..info.buffer_size()];

    let rgba: Vec<u8> = match info.color_type {
        png::ColorType::Rgba => bytes
            .chunks_exact(4)
            .flat_map(|px| premultiply(px[0], px[1], px[2], px[3]))
            .collect(),
        png::ColorType::Rgb => bytes
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => bytes
            .chunks_exact(2)
            .flat_map(|px| premultiply(px[0], px[0], px[0], px[1]))
            .collect(),
        png::ColorType::Grayscale => bytes.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        // Expanded by the normalize transformation
        png::ColorType::Indexed => {
            return Err(RenderError::PngDecode(
                "indexed PNG was not expanded".to_string(),
            ))
        }
    };

    let size = IntSize::from_wh(info.width, info.height).ok_or(RenderError::PixmapAllocation {
        width: info.width,
        height: info.height,
    })?;
    Pixmap::from_vec(rgba, size).ok_or(RenderError::PixmapAllocation {
        width: info.width,
        height: info.height,
    })
}

fn premultiply(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    let mul = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
    [mul(r), mul(g), mul(b), a]
}

/// Encode a pixmap as 8-bit RGBA PNG.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    let straight: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&straight)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// A page of `paper` color with gray bars where text lines would be.
pub fn blank_page(width: u32, height: u32, paper: Rgb8) -> Result<Pixmap, RenderError> {
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation { width, height })?;
    pixmap.fill(tiny_skia::Color::from_rgba8(paper.r, paper.g, paper.b, 255));

    let mut paint = Paint::default();
    paint.set_color_rgba8(90, 90, 90, 255);

    let (w, h) = (width as f32, height as f32);
    let pitch = (h / 40.0).max(2.0);
    let (left, right) = (w * 0.1, w * 0.9);
    let mut y = h * 0.1;
    let mut line = 0;
    while y + pitch < h * 0.9 {
        // Every sixth line ends a paragraph, followed by a blank line
        if line % 7 == 6 {
            y += pitch;
            line += 1;
            continue;
        }
        let end = if line % 7 == 5 {
            left + (right - left) * 0.6
        } else {
            right
        };
        if let Some(rect) = Rect::from_xywh(left, y, end - left, pitch * 0.45) {
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
        y += pitch;
        line += 1;
    }
    Ok(pixmap)
}
