//! QR code rendering with an optional centered logo.
//!
//! Encodes text into an oversampled QR raster, downscales it to the display
//! size, draws an opaque rounded plate with the logo on top, and exports the
//! result as PNG.

pub mod color;
pub mod compose;
pub mod encoder;
pub mod error;
pub mod export;
pub mod loader;
pub mod render;
pub mod resize;

// Re-exports for convenience
pub use color::Color;
pub use compose::{CompositionSpec, PlateLayout, Rect, compose};
pub use encoder::{EMPTY_TEXT_MESSAGE, EncodeRequest, ErrorCorrection, encode};
pub use error::QrError;
pub use export::{download_filename, encode_png, to_data_url};
pub use loader::{DEFAULT_MAX_LOGO_BYTES, UNSUPPORTED_LOGO_MESSAGE, load_logo};
pub use render::{QrContent, RenderSettings, render};

/// Side of the composed artifact in pixels.
pub const DEFAULT_DISPLAY_SIZE: u32 = 400;

/// Barcode is encoded at this multiple of the display size.
pub const DEFAULT_OVERSAMPLE: u32 = 2;

/// Size the preview is shown at in the page, independent of the artifact size.
pub const DEFAULT_PREVIEW_SIZE: u32 = 256;
