//! Box overlay rendering.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use rand::{rngs::StdRng, RngExt, SeedableRng};

use crate::error::CullError;
use crate::filter::Sample;
use crate::geometry::{project, PixelRect};
use crate::label::read_label_file;

/// Size every frame is scaled to before it is shown.
pub const DISPLAY_WIDTH: u32 = 1280;
pub const DISPLAY_HEIGHT: u32 = 736;

/// Box outline thickness in pixels.
pub const STROKE: u32 = 2;

/// Supplies one color per drawn box.
pub trait ColorSource {
    fn next_color(&mut self) -> Rgb<u8>;
}

/// Independent uniform RGB components. Consecutive boxes may share a color.
pub struct RandomColors {
    rng: StdRng,
}

impl RandomColors {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random::<u64>());
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ColorSource for RandomColors {
    fn next_color(&mut self) -> Rgb<u8> {
        Rgb([
            self.rng.random::<u8>(),
            self.rng.random::<u8>(),
            self.rng.random::<u8>(),
        ])
    }
}

/// Decode `path` as an RGB image.
pub fn load_image(path: &Path) -> Result<RgbImage, CullError> {
    image::open(path)
        .map(|img| img.to_rgb8())
        .map_err(|source| CullError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })
}

/// Draw every labelled box of `sample` onto its image at the image's native
/// resolution. A malformed label file fails the whole frame.
pub fn render_overlay(
    sample: &Sample,
    colors: &mut dyn ColorSource,
) -> Result<RgbImage, CullError> {
    let mut image = load_image(&sample.image_path)?;
    let records = read_label_file(&sample.label_path)?;

    let (width, height) = image.dimensions();
    for record in &records {
        let rect = project(record, width, height);
        draw_box(&mut image, &rect, colors.next_color());
    }

    Ok(image)
}

/// Render a sample and scale it to the display resolution.
pub fn render_frame(sample: &Sample, colors: &mut dyn ColorSource) -> Result<RgbImage, CullError> {
    let overlay = render_overlay(sample, colors)?;
    Ok(imageops::resize(
        &overlay,
        DISPLAY_WIDTH,
        DISPLAY_HEIGHT,
        FilterType::Triangle,
    ))
}

/// Stroke `rect` with a [`STROKE`]-pixel outline. Both corners are included
/// and parts outside the image are clipped.
pub fn draw_box(image: &mut RgbImage, rect: &PixelRect, color: Rgb<u8>) {
    let rect = clamp_to_canvas(&rect.ordered(), image.width(), image.height());
    let outer_w = span(rect.width());
    let outer_h = span(rect.height());

    for inset in 0..STROKE {
        let (Some(w), Some(h)) = (
            outer_w.checked_sub(2 * inset),
            outer_h.checked_sub(2 * inset),
        ) else {
            break;
        };
        if w == 0 || h == 0 {
            break;
        }
        let offset = inset as i32;
        let outline = Rect::at(
            rect.top_left.x.saturating_add(offset),
            rect.top_left.y.saturating_add(offset),
        )
        .of_size(w, h);
        draw_hollow_rect_mut(image, outline, color);
    }
}

/// Pull corners in to just outside the canvas. Edges beyond the margin are
/// invisible either way, and this keeps `Rect` arithmetic in range.
fn clamp_to_canvas(rect: &PixelRect, width: u32, height: u32) -> PixelRect {
    let margin = STROKE as i32 + 1;
    let max_x = i32::try_from(width).unwrap_or(i32::MAX).saturating_add(margin);
    let max_y = i32::try_from(height).unwrap_or(i32::MAX).saturating_add(margin);

    PixelRect::from_corners(
        rect.top_left.x.clamp(-margin, max_x),
        rect.top_left.y.clamp(-margin, max_y),
        rect.bottom_right.x.clamp(-margin, max_x),
        rect.bottom_right.y.clamp(-margin, max_y),
    )
}

/// Pixel count covered by an extent, counting both end pixels.
fn span(extent: i64) -> u32 {
    u32::try_from(extent.max(0) + 1).unwrap_or(u32::MAX)
}
