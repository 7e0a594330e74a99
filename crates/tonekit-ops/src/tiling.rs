//! Pull-based tiled evaluation.
//!
//! The host renderer asks for output one tile at a time, in no particular
//! order and from any thread. [`render_tiled`] reproduces that: it cuts the
//! source into tiles, evaluates each one independently on the rayon pool and
//! stitches the results back together. Because every stage is a pure
//! function of its input tile, the stitched result equals a single-pass
//! render.
//!
//! ```text
//!  +------+------+----+
//!  |  0   |  1   | 2  |    tiles are generated row-major;
//!  +------+------+----+    edge tiles are clipped to the image
//!  |  3   |  4   | 5  |
//!  +------+------+----+
//! ```

use rayon::prelude::*;
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::{OpsError, OpsResult};
use tonekit_core::{Rect, RgbImage};

/// Default square tile edge, in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Generates the tiles covering a `width` x `height` image.
///
/// Tiles are square with edge `tile_size` except along the right and bottom
/// edges, where they are clipped. An empty image yields no tiles.
///
/// # Example
///
/// ```rust
/// use tonekit_ops::tiling::generate_tiles;
///
/// let tiles = generate_tiles(100, 50, 30).unwrap();
/// assert_eq!(tiles.len(), 8);
/// assert_eq!(tiles[7].width, 10);
/// ```
pub fn generate_tiles(width: u32, height: u32, tile_size: u32) -> OpsResult<Vec<Rect>> {
    if tile_size == 0 {
        return Err(OpsError::InvalidParameter("tile size must be positive".into()));
    }
    let tiles_x = width.div_ceil(tile_size);
    let tiles_y = height.div_ceil(tile_size);

    let mut tiles = Vec::with_capacity((tiles_x as usize) * (tiles_y as usize));
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x = tx * tile_size;
            let y = ty * tile_size;
            tiles.push(Rect::new(
                x,
                y,
                (width - x).min(tile_size),
                (height - y).min(tile_size),
            ));
        }
    }
    Ok(tiles)
}

/// Renders `source` tile by tile in parallel.
///
/// `render` receives the source pixels of one tile and that tile's bounds
/// in image coordinates, and must return an image of the same size as the
/// tile. Tiles are evaluated concurrently; the first error aborts the
/// render.
pub fn render_tiled<F>(source: &RgbImage, tile_size: u32, render: F) -> OpsResult<RgbImage>
where
    F: Fn(&RgbImage, Rect) -> OpsResult<RgbImage> + Sync,
{
    let tiles = generate_tiles(source.width(), source.height(), tile_size)?;
    debug!(
        width = source.width(),
        height = source.height(),
        tile_size,
        tiles = tiles.len(),
        "render tiled"
    );

    let rendered: Vec<(Rect, RgbImage)> = tiles
        .par_iter()
        .map(|&tile| {
            trace!(x = tile.x, y = tile.y, w = tile.width, h = tile.height, "tile");
            let input = source.crop(tile)?;
            let output = render(&input, tile)?;
            if output.dimensions() != (tile.width, tile.height) {
                return Err(OpsError::SizeMismatch(format!(
                    "tile at ({}, {}) rendered as {}x{}, expected {}x{}",
                    tile.x,
                    tile.y,
                    output.width(),
                    output.height(),
                    tile.width,
                    tile.height
                )));
            }
            Ok((tile, output))
        })
        .collect::<OpsResult<_>>()?;

    let mut dst = RgbImage::new(source.width(), source.height());
    for (tile, output) in &rendered {
        dst.paste(output, tile.x, tile.y)?;
    }
    Ok(dst)
}
