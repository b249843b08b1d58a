//! Resizing helpers for the barcode downscale and the logo fit.

use image::RgbaImage;
use image::imageops::{self, FilterType};
use tracing::debug;

/// Filter used when shrinking the oversampled barcode; smooths module edges.
pub const BARCODE_FILTER: FilterType = FilterType::Triangle;

/// Filter used when scaling the logo into its box.
pub const LOGO_FILTER: FilterType = FilterType::Lanczos3;

/// Scale a barcode raster onto a `size` x `size` square, edge to edge.
///
/// Returns a copy unchanged if it is already the requested size.
pub fn downscale_to_square(img: &RgbaImage, size: u32) -> RgbaImage {
    let (orig_w, orig_h) = img.dimensions();

    if orig_w == size && orig_h == size {
        debug!(size, "Barcode already at display size, skipping resize");
        return img.clone();
    }

    debug!(orig_w, orig_h, size, "Downscaling barcode to display size");
    imageops::resize(img, size, size, BARCODE_FILTER)
}

/// Fit `width` x `height` into a `box_size` square, preserving aspect ratio.
///
/// Wide images are constrained by width, all others by height; the derived
/// side is rounded to the nearest pixel. Both sides are at least 1.
pub fn fit_within_square(width: u32, height: u32, box_size: f64) -> (u32, u32) {
    let aspect = f64::from(width) / f64::from(height);
    let (w, h) = if aspect > 1.0 {
        (box_size, (box_size / aspect).round())
    } else {
        ((box_size * aspect).round(), box_size)
    };
    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}

/// Resize a logo to exactly the fitted dimensions.
pub fn resize_logo(logo: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if logo.dimensions() == (width, height) {
        return logo.clone();
    }
    debug!(
        orig_w = logo.width(),
        orig_h = logo.height(),
        width,
        height,
        "Resizing logo"
    );
    imageops::resize(logo, width, height, LOGO_FILTER)
}
