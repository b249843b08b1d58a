//! Image composition: barcode downscale plus the centered logo plate.
//!
//! Every call to [`compose`] returns a brand-new surface; nothing is patched
//! in place across generations.

use image::imageops;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect as DrawRect;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Color;
use crate::error::{QrError, Result};
use crate::resize;

/// How the logo plate is sized relative to the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositionSpec {
    /// Logo box side as a fraction of the display size, in (0, 1).
    pub logo_scale: f64,
    /// Plate padding on each side as a fraction of the logo box, in [0, 1).
    pub padding_fraction: f64,
    /// Corner radius as a fraction of the plate side, in [0, 1).
    pub corner_radius_fraction: f64,
    /// Plate fill; must be opaque.
    pub plate_color: Color,
}

impl Default for CompositionSpec {
    fn default() -> Self {
        Self {
            logo_scale: 0.2,
            padding_fraction: 0.15,
            corner_radius_fraction: 0.15,
            plate_color: Color::WHITE,
        }
    }
}

impl CompositionSpec {
    pub fn validate(&self) -> Result<()> {
        if !(self.logo_scale > 0.0 && self.logo_scale < 1.0) {
            return Err(QrError::InvalidInput(format!(
                "logo scale must be in (0, 1), got {}",
                self.logo_scale
            )));
        }
        if !(0.0..1.0).contains(&self.padding_fraction) {
            return Err(QrError::InvalidInput(format!(
                "plate padding must be in [0, 1), got {}",
                self.padding_fraction
            )));
        }
        if !(0.0..1.0).contains(&self.corner_radius_fraction) {
            return Err(QrError::InvalidInput(format!(
                "corner radius must be in [0, 1), got {}",
                self.corner_radius_fraction
            )));
        }
        if !self.plate_color.is_opaque() {
            return Err(QrError::InvalidInput(format!(
                "plate color must be opaque, got {}",
                self.plate_color
            )));
        }
        Ok(())
    }
}

/// Pixel rectangle on the output surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Resolved plate and logo geometry for one display size and logo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlateLayout {
    pub logo_size: f64,
    pub padding: u32,
    pub plate: Rect,
    pub radius: u32,
    pub logo: Rect,
}

impl PlateLayout {
    /// Compute plate and logo rectangles.
    ///
    /// A plate that would not fit inside the display is rejected rather than
    /// clamped.
    pub fn compute(display_size: u32, logo_dims: (u32, u32), spec: &CompositionSpec) -> Result<Self> {
        let display = f64::from(display_size);
        let logo_size = display * spec.logo_scale;
        if logo_size < 1.0 {
            return Err(QrError::InvalidDimension(format!(
                "logo box is smaller than one pixel at display size {display_size}"
            )));
        }
        if logo_dims.0 == 0 || logo_dims.1 == 0 {
            return Err(QrError::InvalidDimension("logo has no pixels".into()));
        }

        let padding = (logo_size * spec.padding_fraction).floor();
        let plate_size = logo_size + padding * 2.0;
        if plate_size > display {
            return Err(QrError::InvalidDimension(format!(
                "logo plate ({plate_size:.0}px) does not fit in {display_size}px output"
            )));
        }

        // Center on the whole-pixel side so both margins differ by at most 1px.
        let plate_side = plate_size.round() as u32;
        let plate_offset = (display_size - plate_side) / 2;
        let radius = ((plate_size * spec.corner_radius_fraction).floor() as u32).min(plate_side / 2);

        let (logo_w, logo_h) = resize::fit_within_square(logo_dims.0, logo_dims.1, logo_size);
        let logo_x = ((display - f64::from(logo_w)) / 2.0).floor() as u32;
        let logo_y = ((display - f64::from(logo_h)) / 2.0).floor() as u32;

        Ok(Self {
            logo_size,
            padding: padding as u32,
            plate: Rect {
                x: plate_offset,
                y: plate_offset,
                width: plate_side,
                height: plate_side,
            },
            radius,
            logo: Rect {
                x: logo_x,
                y: logo_y,
                width: logo_w,
                height: logo_h,
            },
        })
    }
}

/// Compose the display-resolution artifact.
///
/// `barcode` is normally rendered at a multiple of `display_size` so the
/// downscale anti-aliases module edges. Pixels outside the plate rectangle
/// are exactly the downscaled barcode.
pub fn compose(
    barcode: &RgbaImage,
    display_size: u32,
    logo: Option<&RgbaImage>,
    spec: &CompositionSpec,
) -> Result<RgbaImage> {
    if display_size == 0 {
        return Err(QrError::InvalidDimension(
            "display size must be positive".into(),
        ));
    }
    if barcode.width() == 0 || barcode.height() == 0 {
        return Err(QrError::InvalidDimension("barcode has no pixels".into()));
    }
    spec.validate()?;

    let mut surface = RgbaImage::new(display_size, display_size);
    let scaled = resize::downscale_to_square(barcode, display_size);
    imageops::replace(&mut surface, &scaled, 0, 0);

    let Some(logo) = logo else {
        return Ok(surface);
    };

    let layout = PlateLayout::compute(display_size, logo.dimensions(), spec)?;
    debug!(
        display_size,
        plate_x = layout.plate.x,
        plate_size = layout.plate.width,
        radius = layout.radius,
        logo_w = layout.logo.width,
        logo_h = layout.logo.height,
        "Drawing logo plate"
    );

    fill_rounded_rect(&mut surface, layout.plate, layout.radius, spec.plate_color.rgba());
    let fitted = resize::resize_logo(logo, layout.logo.width, layout.logo.height);
    overlay(&mut surface, &fitted, layout.logo.x, layout.logo.y);

    Ok(surface)
}

/// Fill a rounded rectangle: two crossing bars plus four corner discs.
pub fn fill_rounded_rect(img: &mut RgbaImage, rect: Rect, radius: u32, color: Rgba<u8>) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    let r = radius.min(rect.width / 2).min(rect.height / 2);
    let (x, y) = (rect.x as i32, rect.y as i32);

    if r == 0 {
        draw_filled_rect_mut(img, DrawRect::at(x, y).of_size(rect.width, rect.height), color);
        return;
    }

    let ri = r as i32;
    if rect.width > 2 * r {
        draw_filled_rect_mut(
            img,
            DrawRect::at(x + ri, y).of_size(rect.width - 2 * r, rect.height),
            color,
        );
    }
    if rect.height > 2 * r {
        draw_filled_rect_mut(
            img,
            DrawRect::at(x, y + ri).of_size(rect.width, rect.height - 2 * r),
            color,
        );
    }

    let right = x + rect.width as i32 - 1 - ri;
    let bottom = y + rect.height as i32 - 1 - ri;
    for center in [(x + ri, y + ri), (right, y + ri), (x + ri, bottom), (right, bottom)] {
        draw_filled_circle_mut(img, center, ri, color);
    }
}

/// Alpha-composite `top` onto `base` at the given position (source-over).
pub fn overlay(base: &mut RgbaImage, top: &RgbaImage, x: u32, y: u32) {
    for (dx, dy, pixel) in top.enumerate_pixels() {
        let target_x = x + dx;
        let target_y = y + dy;
        if target_x >= base.width() || target_y >= base.height() {
            continue;
        }
        match pixel[3] {
            0 => {}
            255 => base.put_pixel(target_x, target_y, *pixel),
            _ => {
                let bg = *base.get_pixel(target_x, target_y);
                base.put_pixel(target_x, target_y, blend_pixel(&bg, pixel));
            }
        }
    }
}

fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>) -> Rgba<u8> {
    let fa = f32::from(fg[3]) / 255.0;
    let ba = f32::from(bg[3]) / 255.0;
    let out_a = fa + ba * (1.0 - fa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |i: usize| {
        let c = (f32::from(fg[i]) * fa + f32::from(bg[i]) * ba * (1.0 - fa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round() as u8,
    ])
}
