//! Painter factory for integration tests.

use std::sync::Arc;
use tiny_skia::Pixmap;

use pagepaint::assets::AssetLoader;
use pagepaint::models::{
    IntRect, NormalizedPoint, NormalizedRect, ObserverId, Page, PaintFlags, RenderConfig,
};
use pagepaint::rendering::{IconSet, PagePainter, PixmapStore};

/// Observer every test paints for
pub const OBSERVER: ObserverId = ObserverId(0);

/// Config, raster source and icons wired up like the CLI does
pub struct TestPainter {
    pub config: RenderConfig,
    pub source: PixmapStore,
    icons: IconSet,
}

impl TestPainter {
    /// A painter without any page raster
    pub fn new() -> Self {
        Self {
            config: RenderConfig::default(),
            source: PixmapStore::new(),
            // No fonts: keeps tests fast and output independent of the host
            icons: IconSet::with_fontdb(AssetLoader::embedded(), Arc::new(fontdb::Database::new())),
        }
    }

    /// A painter over a white page raster of `width` x `height`
    pub fn with_white_page(width: u32, height: u32) -> Self {
        let mut pixmap = Pixmap::new(width, height).expect("Failed to allocate raster");
        pixmap.fill(tiny_skia::Color::WHITE);
        Self::new().with_raster(pixmap)
    }

    pub fn with_raster(mut self, pixmap: Pixmap) -> Self {
        self.source.insert_pixmap(OBSERVER, pixmap);
        self
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Paint the whole uncropped page at `width` x `height`
    pub fn paint(&self, page: &Page, flags: PaintFlags, width: u32, height: u32) -> Pixmap {
        self.paint_limits(
            page,
            flags,
            width,
            height,
            IntRect::new(0, 0, width as i32, height as i32),
        )
    }

    /// Paint only `limits` of a transparent destination
    pub fn paint_limits(
        &self,
        page: &Page,
        flags: PaintFlags,
        width: u32,
        height: u32,
        limits: IntRect,
    ) -> Pixmap {
        self.paint_full(page, flags, width, height, limits, None)
    }

    pub fn paint_full(
        &self,
        page: &Page,
        flags: PaintFlags,
        width: u32,
        height: u32,
        limits: IntRect,
        source_marker: Option<NormalizedPoint>,
    ) -> Pixmap {
        let mut dest = Pixmap::new(width, height).expect("Failed to allocate destination");
        let painter = PagePainter::new(&self.config, &self.source, &self.icons);
        painter.paint(
            &mut dest.as_mut(),
            page,
            OBSERVER,
            flags,
            width,
            height,
            limits,
            NormalizedRect::full(),
            source_marker,
        );
        dest
    }
}
