//! Page composition.
//!
//! One [`PagePainter::paint`] call fills a rectangle of the destination with
//! the page raster and everything drawn over it: accessibility colors,
//! search highlights, the text selection, annotations and link outlines.
//!
//! Colors are changed and highlights multiplied on a temporary buffer the
//! size of the painted area, which is then blitted onto the destination.
//! When none of that is needed everything is drawn straight onto the
//! destination, clipped to the painted area.

use pixel_recolor::{AccessibilityTransform, PixelBuffer, Rgb8};
use tiny_skia::{
    FillRule, FilterQuality, IntSize, Mask, PathBuilder, Pixmap, PixmapMut, PixmapPaint,
    Transform,
};

use super::annotation_paths::{
    geom_primitives, highlight_primitives, ink_primitives, text_icon_rect, TEXT_ICON_SIZE,
};
use super::icons::{colorize, IconSet, TextBox, BUSY_ICON};
use super::line_painter::LinePainter;
use super::shapes::{paint_for, BlendMode, Brush, NormalizedPath, Pen, PenStyle, Primitive};
use super::source::{PixmapSource, Tile};
use crate::models::{
    Annotation, AnnotationFlags, AnnotationKind, IntRect, NormalizedPoint, NormalizedRect,
    ObjectRectKind, ObserverId, Page, PaintFlags, RenderConfig, SubType, TextType,
};

/// A page raster more than this many times smaller than the target is not
/// scaled up.
const MAX_UPSCALE_RATIO: f64 = 20.0;
/// A page raster more than four times larger than the target is not
/// scaled down.
const MIN_SCALE_RATIO: f64 = 0.25;
/// Rasters bigger than this are never scaled up.
const MAX_UPSCALE_PIXELS: u64 = 60_000_000;

/// Edge of the busy placeholder icon, in pixels.
const BUSY_ICON_SIZE: u32 = 32;

/// Icons and stamps bigger than this are not rasterized.
const MAX_ICON_PIXELS: u64 = 64_000_000;

/// Where drawing happens for one paint call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintPath {
    /// Straight onto the destination
    Direct,
    /// Into a temporary buffer blitted onto the destination at the end
    Buffered,
}

/// Whether a paint call needs the temporary buffer.
///
/// Color transforms and multiplied highlights work on pixels and
/// need it, and so do buffered annotations and the source marker.
pub fn decide_backbuffer(
    color_transform: bool,
    highlights: bool,
    buffered_annotations: bool,
    source_marker: bool,
) -> PaintPath {
    if color_transform || highlights || buffered_annotations || source_marker {
        PaintPath::Buffered
    } else {
        PaintPath::Direct
    }
}

/// Annotations needing pixel composition are drawn into the buffer,
/// the rest can be drawn on any surface.
pub fn is_buffered(sub_type: SubType) -> bool {
    matches!(sub_type, SubType::Line | SubType::Highlight | SubType::Ink)
}

/// Everything intersecting the painted area, sorted by how it is drawn.
#[derive(Debug, Default)]
pub(crate) struct Visible<'p> {
    /// Search highlights and the text selection, in rotated page coordinates
    pub highlights: Vec<(Rgb8, NormalizedRect)>,
    pub buffered: Vec<&'p Annotation>,
    pub direct: Vec<&'p Annotation>,
    /// Externally drawn annotations being moved or resized
    pub outlined: Vec<&'p Annotation>,
}

/// Cull the page's overlays against `area` (rotated, normalized).
pub(crate) fn collect_visible<'p>(
    page: &'p Page,
    observer: ObserverId,
    flags: PaintFlags,
    area: &NormalizedRect,
) -> Visible<'p> {
    let mut visible = Visible::default();
    let rotation = page.rotation;

    if flags.contains(PaintFlags::HIGHLIGHTS) {
        for highlight in page.highlights.iter().filter(|h| h.observer == observer) {
            for rect in &highlight.rects {
                let rect = rect.transformed(rotation);
                if rect.intersects(area) {
                    visible.highlights.push((highlight.color, rect));
                }
            }
        }
    }

    if flags.contains(PaintFlags::TEXT_SELECTION) {
        if let Some(selection) = &page.text_selection {
            for rect in &selection.rects {
                let rect = rect.transformed(rotation);
                if rect.intersects(area) {
                    visible.highlights.push((selection.color, rect));
                }
            }
        }
    }

    if !flags.contains(PaintFlags::ANNOTATIONS) {
        return visible;
    }

    for annotation in &page.annotations {
        if annotation.flags.contains(AnnotationFlags::HIDDEN) {
            continue;
        }
        let mut bounds = annotation.transformed_bounding_rect(rotation);

        if annotation.flags.contains(AnnotationFlags::EXTERNALLY_DRAWN) {
            let moving = annotation
                .flags
                .intersects(AnnotationFlags::BEING_MOVED | AnnotationFlags::BEING_RESIZED);
            if moving && bounds.intersects(area) {
                visible.outlined.push(annotation);
            }
            continue;
        }

        if let AnnotationKind::Text(text) = &annotation.kind {
            if text.text_type == TextType::Linked {
                bounds = text_icon_rect(&bounds, page.width, page.height);
            }
        }
        if !bounds.intersects(area) {
            continue;
        }

        if is_buffered(annotation.sub_type()) {
            visible.buffered.push(annotation);
        } else {
            visible.direct.push(annotation);
        }
    }

    visible
}

/// A drawing target relative to the scaled, uncropped page.
#[derive(Debug, Clone, Copy)]
struct Frame {
    scaled_width: u32,
    scaled_height: u32,
    /// Page pixel at the target's top-left corner
    origin_x: i32,
    origin_y: i32,
    width: u32,
    height: u32,
}

impl Frame {
    /// Maps rotated normalized page coordinates to fractions of the target.
    fn to_normalized_image(&self) -> Transform {
        let (w, h) = (self.width.max(1) as f32, self.height.max(1) as f32);
        Transform::from_row(
            self.scaled_width as f32 / w,
            0.0,
            0.0,
            self.scaled_height as f32 / h,
            -self.origin_x as f32 / w,
            -self.origin_y as f32 / h,
        )
    }

    /// Pixel rectangle of `rect` on the target.
    fn pixel_rect(&self, rect: &NormalizedRect) -> IntRect {
        rect.geometry(self.scaled_width, self.scaled_height)
            .translate(-self.origin_x, -self.origin_y)
    }

    fn bounds(&self) -> IntRect {
        IntRect::new(0, 0, self.width as i32, self.height as i32)
    }
}

/// The raster the page content comes from.
enum BaseRaster<'s> {
    Tiles(Vec<Tile<'s>>),
    Whole(&'s Pixmap),
}

/// Paints pages over rasters from a [`PixmapSource`].
pub struct PagePainter<'a> {
    config: &'a RenderConfig,
    source: &'a dyn PixmapSource,
    icons: &'a IconSet,
}

impl<'a> PagePainter<'a> {
    pub fn new(config: &'a RenderConfig, source: &'a dyn PixmapSource, icons: &'a IconSet) -> Self {
        Self {
            config,
            source,
            icons,
        }
    }

    /// Paint the `limits` area of `dest`.
    ///
    /// `dest` shows the cropped page: its pixel (0, 0) is the top-left corner
    /// of `crop` on a page scaled to `scaled_width` x `scaled_height`.
    /// Pixels outside `limits` are never touched.
    #[allow(clippy::too_many_arguments)]
    pub fn paint(
        &self,
        dest: &mut PixmapMut<'_>,
        page: &Page,
        observer: ObserverId,
        flags: PaintFlags,
        scaled_width: u32,
        scaled_height: u32,
        limits: IntRect,
        crop: NormalizedRect,
        source_marker: Option<NormalizedPoint>,
    ) {
        let dest_bounds = IntRect::new(0, 0, dest.width() as i32, dest.height() as i32);
        let limits = limits.intersect(&dest_bounds);
        if limits.is_empty() || scaled_width == 0 || scaled_height == 0 {
            tracing::debug!(?limits, scaled_width, scaled_height, "Nothing to paint");
            return;
        }

        let crop_x = (crop.left * scaled_width as f64).round() as i32;
        let crop_y = (crop.top * scaled_height as f64).round() as i32;
        let area = NormalizedRect::from_pixels(
            limits.translate(crop_x, crop_y),
            scaled_width,
            scaled_height,
        );

        // Full destination as the drawing frame; the buffered path narrows it
        let dest_frame = Frame {
            scaled_width,
            scaled_height,
            origin_x: crop_x,
            origin_y: crop_y,
            width: dest.width(),
            height: dest.height(),
        };
        let clip = clip_mask(dest.width(), dest.height(), limits);
        let background = self.config.background_color(flags);
        fill_rect(dest, limits, background, clip.as_ref());

        let Some(base) = self.fetch_base(observer, scaled_width, scaled_height, area) else {
            let cropped = IntRect::new(
                0,
                0,
                (crop.width() * scaled_width as f64).round() as i32,
                (crop.height() * scaled_height as f64).round() as i32,
            );
            self.draw_placeholder(dest, limits, cropped, clip.as_ref());
            return;
        };

        let transform = self.config.accessibility_transform(flags);
        let visible = collect_visible(page, observer, flags, &area);
        let path = decide_backbuffer(
            transform.is_some(),
            !visible.highlights.is_empty(),
            !visible.buffered.is_empty(),
            source_marker.is_some(),
        );
        tracing::debug!(
            ?path,
            highlights = visible.highlights.len(),
            buffered = visible.buffered.len(),
            direct = visible.direct.len(),
            "Painting page"
        );

        match path {
            PaintPath::Direct => {
                draw_base(dest, &dest_frame, &base, clip.as_ref());
                self.draw_overlays(dest, page, flags, &dest_frame, limits, &visible, clip.as_ref());
            }
            PaintPath::Buffered => {
                let (width, height) = (limits.width as u32, limits.height as u32);
                let Some(mut buffer) = Pixmap::new(width, height) else {
                    tracing::warn!(width, height, "Failed to allocate paint buffer");
                    return;
                };
                buffer.fill(to_color(background));
                let frame = Frame {
                    origin_x: crop_x + limits.left,
                    origin_y: crop_y + limits.top,
                    width,
                    height,
                    ..dest_frame
                };
                draw_base(&mut buffer.as_mut(), &frame, &base, None);

                if let Some(transform) = transform {
                    match apply_transform(buffer, transform) {
                        Some(transformed) => buffer = transformed,
                        None => return,
                    }
                }

                let mut canvas = buffer.as_mut();
                draw_highlights(&mut canvas, &frame, &visible.highlights);
                self.draw_buffered_annotations(&mut canvas, page, &frame, &visible.buffered);
                if let Some(marker) = source_marker {
                    self.draw_source_marker(&mut canvas, &frame, marker);
                }
                self.draw_overlays(&mut canvas, page, flags, &frame, frame.bounds(), &visible, None);

                dest.draw_pixmap(
                    limits.left,
                    limits.top,
                    buffer.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                );
            }
        }
    }

    /// Tiles or the best whole-page pixmap; `None` when nothing usable exists.
    fn fetch_base(
        &self,
        observer: ObserverId,
        scaled_width: u32,
        scaled_height: u32,
        area: NormalizedRect,
    ) -> Option<BaseRaster<'a>> {
        if self.source.has_tiles_manager(observer) {
            let tiles = self.source.tiles_at(observer, area);
            let stale = tiles.iter().filter(|t| !t.is_valid).count();
            if stale > 0 {
                tracing::debug!(%observer, stale, total = tiles.len(), "Drawing stale tiles");
            }
            return Some(BaseRaster::Tiles(tiles));
        }

        let Some(pixmap) = self
            .source
            .nearest_pixmap(observer, scaled_width, scaled_height)
        else {
            tracing::debug!(%observer, "No page pixmap available");
            return None;
        };

        let ratio = scaled_width as f64 / pixmap.width().max(1) as f64;
        let pixels = pixmap.width() as u64 * pixmap.height() as u64;
        if ratio > MAX_UPSCALE_RATIO || ratio < MIN_SCALE_RATIO {
            tracing::debug!(ratio, "Page pixmap too far from the target scale");
            return None;
        }
        if ratio > 1.0 && pixels > MAX_UPSCALE_PIXELS {
            tracing::debug!(pixels, "Page pixmap too large to scale up");
            return None;
        }
        Some(BaseRaster::Whole(pixmap))
    }

    /// Busy icon centered in `limits`, or a gray cross over the cropped page.
    fn draw_placeholder(
        &self,
        dest: &mut PixmapMut<'_>,
        limits: IntRect,
        cropped: IntRect,
        clip: Option<&Mask>,
    ) {
        if self.config.show_busy_placeholder && self.icons.has_icon(BUSY_ICON) {
            let size = BUSY_ICON_SIZE
                .min(limits.width as u32)
                .min(limits.height as u32);
            match self.icons.render_icon(BUSY_ICON, size, size) {
                Ok(icon) => {
                    let x = limits.left + (limits.width - size as i32) / 2;
                    let y = limits.top + (limits.height - size as i32) / 2;
                    dest.draw_pixmap(
                        x,
                        y,
                        icon.as_ref(),
                        &PixmapPaint::default(),
                        Transform::identity(),
                        clip,
                    );
                    return;
                }
                Err(e) => tracing::debug!(%e, "Busy icon unavailable, drawing cross"),
            }
        }

        let (w, h) = (dest.width().max(1) as f64, dest.height().max(1) as f64);
        let corner = |x: i32, y: i32| NormalizedPoint::new(x as f64 / w, y as f64 / h);
        let pen = Pen::new(Rgb8::GRAY, 1.0);
        let diagonals = [
            [corner(cropped.left, cropped.top), corner(cropped.right(), cropped.bottom())],
            [corner(cropped.left, cropped.bottom()), corner(cropped.right(), cropped.top)],
        ];
        for line in diagonals {
            Primitive::path(line.to_vec(), false)
                .with_pen(Some(pen.clone()))
                .draw(dest, 1.0, clip);
        }
    }

    fn draw_buffered_annotations(
        &self,
        canvas: &mut PixmapMut<'_>,
        page: &Page,
        frame: &Frame,
        annotations: &[&Annotation],
    ) {
        let to_image = frame.to_normalized_image();
        let page_scale = page_scale(page, frame);
        for annotation in annotations {
            let primitives = match &annotation.kind {
                AnnotationKind::Line(line) => LinePainter::new(
                    line,
                    &annotation.style,
                    page.rotation,
                    (page.width, page.height),
                    to_image,
                )
                .primitives(),
                AnnotationKind::Highlight(highlight) => {
                    highlight_primitives(highlight, &annotation.style, page.rotation, to_image)
                }
                AnnotationKind::Ink(ink) => {
                    ink_primitives(ink, &annotation.style, page.rotation, to_image)
                }
                other => {
                    debug_assert!(false, "{:?} routed to the buffer", other.sub_type());
                    tracing::warn!(sub_type = ?other.sub_type(), "Unexpected buffered annotation");
                    continue;
                }
            };
            for primitive in &primitives {
                primitive.draw(canvas, page_scale, None);
            }
        }
    }

    /// One pixel line across the target just below the marker.
    fn draw_source_marker(&self, canvas: &mut PixmapMut<'_>, frame: &Frame, marker: NormalizedPoint) {
        let y = (marker.y * frame.scaled_height as f64).round() as i32 - frame.origin_y + 1;
        if y < 0 || y >= frame.height as i32 {
            return;
        }
        let rect = IntRect::new(0, y, frame.width as i32, 1);
        fill_rect(canvas, rect, self.config.link_highlight_color, None);
    }

    /// Direct annotations, drag outlines and link outlines.
    #[allow(clippy::too_many_arguments)]
    fn draw_overlays(
        &self,
        canvas: &mut PixmapMut<'_>,
        page: &Page,
        flags: PaintFlags,
        frame: &Frame,
        limits: IntRect,
        visible: &Visible<'_>,
        clip: Option<&Mask>,
    ) {
        let to_image = frame.to_normalized_image();

        if self.config.debug_draw_annotation_rect {
            let all = visible.buffered.iter().chain(&visible.direct);
            for annotation in all {
                let rect = annotation.transformed_bounding_rect(page.rotation);
                let color = annotation.style.color_or(Rgb8::YELLOW);
                rect_primitive(&rect, &to_image)
                    .with_pen(Some(Pen::hairline(color)))
                    .draw(canvas, 1.0, clip);
            }
        }

        for annotation in &visible.direct {
            self.draw_direct_annotation(canvas, page, frame, annotation, clip);
        }

        let dashed = Pen::new(Rgb8::BLACK, 1.0).with_style(PenStyle::Dashed);
        for annotation in &visible.outlined {
            let rect = annotation.transformed_bounding_rect(page.rotation);
            rect_primitive(&rect, &to_image)
                .with_pen(Some(dashed.clone()))
                .draw(canvas, 1.0, clip);
        }

        let links = flags.contains(PaintFlags::ENHANCE_LINKS);
        let images = flags.contains(PaintFlags::ENHANCE_IMAGES);
        if links || images {
            let grown = limits.adjusted(-2, -2, 2, 2);
            let pen = Pen::hairline(self.config.link_highlight_color);
            for object in &page.object_rects {
                let wanted = match object.kind {
                    ObjectRectKind::Action => links,
                    ObjectRectKind::Image => images,
                    _ => false,
                };
                if !wanted {
                    continue;
                }
                let rect = object.rect.transformed(page.rotation);
                if !frame.pixel_rect(&rect).intersects(&grown) {
                    continue;
                }
                rect_primitive(&rect, &to_image)
                    .with_pen(Some(pen.clone()))
                    .draw(canvas, 1.0, clip);
            }
        }
    }

    fn draw_direct_annotation(
        &self,
        canvas: &mut PixmapMut<'_>,
        page: &Page,
        frame: &Frame,
        annotation: &Annotation,
        clip: Option<&Mask>,
    ) {
        let opacity = annotation.style.clamped_opacity();
        if !is_visible(annotation) {
            tracing::trace!(sub_type = ?annotation.sub_type(), "Skipping invisible annotation");
            return;
        }

        let bounds = frame.pixel_rect(&annotation.transformed_bounding_rect(page.rotation));
        let page_scale = page_scale(page, frame);

        match &annotation.kind {
            AnnotationKind::Text(text) if text.text_type == TextType::Linked => {
                let size = TEXT_ICON_SIZE;
                match self.icons.render_icon(&text.icon, size, size) {
                    Ok(mut icon) => {
                        if let Some(color) = annotation.style.color {
                            colorize(&mut icon, color);
                        }
                        blit(canvas, &icon, bounds.left, bounds.top, 1.0, clip);
                    }
                    Err(e) => tracing::debug!(%e, icon = %text.icon, "Skipping text icon"),
                }
            }
            AnnotationKind::Text(text) => {
                let Some((width, height)) = icon_size(&bounds) else {
                    return;
                };
                let text_box = TextBox {
                    contents: &annotation.contents,
                    font_size: (text.font_size as f32 * page_scale).max(1.0),
                    text_color: text.text_color.unwrap_or(Rgb8::BLACK),
                    background: annotation.style.color_or(Rgb8::YELLOW),
                    border_width: (annotation.style.width as f32 * page_scale).max(0.0),
                    alignment: text.inplace_alignment,
                };
                match self.icons.render_text_box(&text_box, width, height) {
                    Ok(pixmap) => blit(canvas, &pixmap, bounds.left, bounds.top, 1.0, clip),
                    Err(e) => tracing::debug!(%e, "Skipping in-place text"),
                }
            }
            AnnotationKind::Stamp(stamp) => {
                let Some((width, height)) = icon_size(&bounds) else {
                    return;
                };
                match self.icons.render_stamp(&stamp.icon_name, width, height) {
                    Ok(pixmap) => blit(
                        canvas,
                        &pixmap,
                        bounds.left,
                        bounds.top,
                        opacity as f32,
                        clip,
                    ),
                    Err(e) => tracing::debug!(%e, stamp = %stamp.icon_name, "Skipping stamp"),
                }
            }
            AnnotationKind::Geom(geom) => {
                let Some(rect) = bounds.to_rect() else {
                    return;
                };
                let primitives = geom_primitives(
                    geom,
                    &annotation.style,
                    rect,
                    page_scale,
                    (frame.width, frame.height),
                );
                for primitive in &primitives {
                    primitive.draw(canvas, 1.0, clip);
                }
            }
            other => {
                tracing::trace!(sub_type = ?other.sub_type(), "Annotation has no appearance");
            }
        }
    }
}

/// Pixels per page point.
fn page_scale(page: &Page, frame: &Frame) -> f32 {
    if page.width > 0.0 {
        (frame.scaled_width as f64 / page.width) as f32
    } else {
        1.0
    }
}

/// Size to rasterize an icon covering `bounds` at, if reasonable.
fn icon_size(bounds: &IntRect) -> Option<(u32, u32)> {
    if bounds.is_empty() {
        return None;
    }
    let (w, h) = (bounds.width as u32, bounds.height as u32);
    if w as u64 * h as u64 > MAX_ICON_PIXELS {
        tracing::debug!(w, h, "Annotation too large to rasterize");
        return None;
    }
    Some((w, h))
}

fn rect_primitive(rect: &NormalizedRect, to_image: &Transform) -> Primitive {
    let corners: NormalizedPath = [
        rect.top_left(),
        NormalizedPoint::new(rect.right, rect.top),
        rect.bottom_right(),
        NormalizedPoint::new(rect.left, rect.bottom),
    ]
    .iter()
    .map(|p| p.mapped(to_image))
    .collect();
    Primitive::path(corners, true)
}

/// Multiply each rect into the target and frame it a little darker.
fn draw_highlights(canvas: &mut PixmapMut<'_>, frame: &Frame, highlights: &[(Rgb8, NormalizedRect)]) {
    let to_image = frame.to_normalized_image();
    for (color, rect) in highlights {
        let outline = rect_primitive(rect, &to_image);
        outline
            .clone()
            .with_brush(Some(Brush::new(*color)))
            .with_blend(BlendMode::Multiply)
            .draw(canvas, 1.0, None);
        outline
            .with_pen(Some(Pen::hairline(color.darker(150))))
            .draw(canvas, 1.0, None);
    }
}

/// Fully transparent annotations are not drawn, except text which always
/// shows its icon or box.
fn is_visible(annotation: &Annotation) -> bool {
    annotation.style.clamped_opacity() > 0.0
        || matches!(annotation.kind, AnnotationKind::Text(_))
}

fn draw_base(canvas: &mut PixmapMut<'_>, frame: &Frame, base: &BaseRaster<'_>, clip: Option<&Mask>) {
    let scaled = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    match base {
        BaseRaster::Tiles(tiles) => {
            for tile in tiles {
                let Some(pixmap) = tile.pixmap else {
                    continue;
                };
                let rect = frame.pixel_rect(&tile.rect);
                if rect.is_empty() || pixmap.width() == 0 || pixmap.height() == 0 {
                    continue;
                }
                let transform = Transform::from_row(
                    rect.width as f32 / pixmap.width() as f32,
                    0.0,
                    0.0,
                    rect.height as f32 / pixmap.height() as f32,
                    rect.left as f32,
                    rect.top as f32,
                );
                canvas.draw_pixmap(0, 0, pixmap, &scaled, transform, clip);
            }
        }
        BaseRaster::Whole(pixmap) => {
            let pixmap: &Pixmap = pixmap;
            let exact =
                pixmap.width() == frame.scaled_width && pixmap.height() == frame.scaled_height;
            if exact {
                canvas.draw_pixmap(
                    -frame.origin_x,
                    -frame.origin_y,
                    pixmap.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    clip,
                );
            } else {
                let transform = Transform::from_row(
                    frame.scaled_width as f32 / pixmap.width() as f32,
                    0.0,
                    0.0,
                    frame.scaled_height as f32 / pixmap.height() as f32,
                    -frame.origin_x as f32,
                    -frame.origin_y as f32,
                );
                canvas.draw_pixmap(0, 0, pixmap.as_ref(), &scaled, transform, clip);
            }
        }
    }
}

/// Run an accessibility transform over a buffer.
fn apply_transform(buffer: Pixmap, transform: AccessibilityTransform) -> Option<Pixmap> {
    let (width, height) = (buffer.width(), buffer.height());
    let mut pixels = match PixelBuffer::from_premultiplied(width, height, buffer.take()) {
        Ok(pixels) => pixels,
        Err(e) => {
            debug_assert!(false, "paint buffer rejected: {e}");
            tracing::warn!(%e, "Paint buffer rejected by color transform");
            return None;
        }
    };
    transform.apply(&mut pixels);
    IntSize::from_wh(width, height).and_then(|size| Pixmap::from_vec(pixels.into_data(), size))
}

fn blit(
    canvas: &mut PixmapMut<'_>,
    pixmap: &Pixmap,
    x: i32,
    y: i32,
    opacity: f32,
    clip: Option<&Mask>,
) {
    let paint = PixmapPaint {
        opacity: opacity.clamp(0.0, 1.0),
        ..PixmapPaint::default()
    };
    canvas.draw_pixmap(x, y, pixmap.as_ref(), &paint, Transform::identity(), clip);
}

fn fill_rect(canvas: &mut PixmapMut<'_>, rect: IntRect, color: Rgb8, clip: Option<&Mask>) {
    if let Some(rect) = rect.to_rect() {
        let paint = paint_for(color, 1.0, BlendMode::Normal);
        canvas.fill_rect(rect, &paint, Transform::identity(), clip);
    }
}

fn to_color(color: Rgb8) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, 255)
}

/// Mask restricting drawing to `rect`; `None` when `rect` covers the target.
fn clip_mask(width: u32, height: u32, rect: IntRect) -> Option<Mask> {
    if rect == IntRect::new(0, 0, width as i32, height as i32) {
        return None;
    }
    let mut mask = Mask::new(width, height)?;
    let path = PathBuilder::from_rect(rect.to_rect()?);
    mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
    Some(mask)
}
