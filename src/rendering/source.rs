//! Access to the pre-rendered page rasters.
//!
//! The painter never renders page content itself. It asks a
//! [`PixmapSource`] for whatever raster the document backend has produced
//! for an observer, either one pixmap for the whole page or a set of tiles.

use std::collections::HashMap;
use tiny_skia::{Pixmap, PixmapRef};

use crate::models::{NormalizedRect, ObserverId};

/// A tile of the page raster.
#[derive(Debug, Clone, Copy)]
pub struct Tile<'a> {
    /// Area of the page the tile covers
    pub rect: NormalizedRect,
    /// Raster, absent while the tile has not been rendered yet
    pub pixmap: Option<PixmapRef<'a>>,
    /// False when the raster is stale and a new one is on the way
    pub is_valid: bool,
}

/// Source of page rasters for one page.
pub trait PixmapSource {
    /// True when rasters for `observer` are kept as tiles.
    fn has_tiles_manager(&self, observer: ObserverId) -> bool;

    /// True when a raster of exactly `width` x `height` is ready. For tiled
    /// sources `rect` limits the check to the tiles covering that area.
    fn has_pixmap(
        &self,
        observer: ObserverId,
        width: u32,
        height: u32,
        rect: Option<NormalizedRect>,
    ) -> bool;

    /// The best raster to scale from: the observer's own, or else the one
    /// whose width is closest to `width`.
    fn nearest_pixmap(&self, observer: ObserverId, width: u32, height: u32) -> Option<&Pixmap>;

    /// Tiles intersecting `rect`.
    fn tiles_at(&self, observer: ObserverId, rect: NormalizedRect) -> Vec<Tile<'_>>;
}

#[derive(Debug)]
struct StoredTile {
    rect: NormalizedRect,
    pixmap: Option<Pixmap>,
    is_valid: bool,
}

/// In-memory [`PixmapSource`].
#[derive(Debug, Default)]
pub struct PixmapStore {
    pixmaps: HashMap<ObserverId, Pixmap>,
    tiles: HashMap<ObserverId, Vec<StoredTile>>,
}

impl PixmapStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the whole-page raster for `observer`, replacing any previous one.
    pub fn insert_pixmap(&mut self, observer: ObserverId, pixmap: Pixmap) {
        tracing::trace!(
            %observer,
            width = pixmap.width(),
            height = pixmap.height(),
            "Stored page pixmap"
        );
        self.pixmaps.insert(observer, pixmap);
    }

    /// Add a tile for `observer`; switches that observer to tiled rendering.
    pub fn insert_tile(
        &mut self,
        observer: ObserverId,
        rect: NormalizedRect,
        pixmap: Option<Pixmap>,
        is_valid: bool,
    ) {
        self.tiles.entry(observer).or_default().push(StoredTile {
            rect,
            pixmap,
            is_valid,
        });
    }

    pub fn remove(&mut self, observer: ObserverId) {
        self.pixmaps.remove(&observer);
        self.tiles.remove(&observer);
    }
}

impl PixmapSource for PixmapStore {
    fn has_tiles_manager(&self, observer: ObserverId) -> bool {
        self.tiles.contains_key(&observer)
    }

    fn has_pixmap(
        &self,
        observer: ObserverId,
        width: u32,
        height: u32,
        rect: Option<NormalizedRect>,
    ) -> bool {
        if let Some(tiles) = self.tiles.get(&observer) {
            let area = rect.unwrap_or_else(NormalizedRect::full);
            return tiles
                .iter()
                .filter(|t| t.rect.intersects(&area))
                .all(|t| t.is_valid && t.pixmap.is_some());
        }
        self.pixmaps
            .get(&observer)
            .is_some_and(|p| p.width() == width && p.height() == height)
    }

    fn nearest_pixmap(&self, observer: ObserverId, width: u32, _height: u32) -> Option<&Pixmap> {
        if let Some(own) = self.pixmaps.get(&observer) {
            return Some(own);
        }
        self.pixmaps
            .values()
            .min_by_key(|p| p.width().abs_diff(width))
    }

    fn tiles_at(&self, observer: ObserverId, rect: NormalizedRect) -> Vec<Tile<'_>> {
        self.tiles
            .get(&observer)
            .map(|tiles| {
                tiles
                    .iter()
                    .filter(|t| t.rect.intersects(&rect))
                    .map(|t| Tile {
                        rect: t.rect,
                        pixmap: t.pixmap.as_ref().map(|p| p.as_ref()),
                        is_valid: t.is_valid,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
