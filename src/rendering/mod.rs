pub mod annotation_paths;
pub mod compositor;
pub mod icons;
pub mod line_painter;
pub mod raster;
pub mod shapes;
pub mod source;

pub use compositor::{decide_backbuffer, PagePainter, PaintPath};
pub use icons::IconSet;
pub use line_painter::{shorten_for_arrow, LinePainter};
pub use raster::{blank_page, decode_png, encode_png};
pub use shapes::{draw_ellipse, draw_shape, BlendMode, Brush, NormalizedPath, Pen, PenStyle};
pub use source::{PixmapSource, PixmapStore, Tile};
