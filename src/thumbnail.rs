//! Web page thumbnails
//!
//! A thumbnail is produced by capturing the page to an in-memory PNG at the
//! configured viewport size and then resizing it to fit a bounding box. The
//! aspect ratio is preserved, and images smaller than the box are scaled up.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use log::debug;

use crate::{runner, CaptureConfig, Error, OutputFormat, PageSession, Result};

/// Encodings offered for thumbnails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbnailFormat {
    #[default]
    Jpeg,
    Png,
}

impl From<ThumbnailFormat> for ImageFormat {
    fn from(f: ThumbnailFormat) -> Self {
        match f {
            ThumbnailFormat::Jpeg => ImageFormat::Jpeg,
            ThumbnailFormat::Png => ImageFormat::Png,
        }
    }
}

/// Largest size with the source aspect ratio that fits inside
/// `max_width`×`max_height`. Never returns a zero dimension.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (max_width.max(1), max_height.max(1));
    }

    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let w = (width as f64 * scale).round().max(1.0) as u32;
    let h = (height as f64 * scale).round().max(1.0) as u32;
    (w.min(max_width.max(1)), h.min(max_height.max(1)))
}

/// Decode an image, resize it to fit the box, flatten to RGB and re-encode.
pub fn thumbnail_from_bytes(bytes: &[u8], max_width: u32, max_height: u32, format: ThumbnailFormat) -> Result<Vec<u8>> {
    if max_width == 0 || max_height == 0 {
        return Err(Error::ImageError(format!(
            "thumbnail bounds must be non-zero, got {}x{}",
            max_width, max_height
        )));
    }

    let source = image::load_from_memory(bytes)?;
    let (w, h) = fit_within(source.width(), source.height(), max_width, max_height);
    debug!(
        "thumbnail {}x{} -> {}x{} ({:?})",
        source.width(),
        source.height(),
        w,
        h,
        format
    );

    let resized = source.resize_exact(w, h, FilterType::Lanczos3);
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, format.into())?;
    Ok(out.into_inner())
}

/// Capture `url` through an open session and return a thumbnail of it.
///
/// The session is released before the resize happens.
pub fn web_thumbnail_with<S: PageSession>(
    session: S,
    url: &str,
    max_width: u32,
    max_height: u32,
    format: ThumbnailFormat,
    config: &CaptureConfig,
) -> Result<Vec<u8>> {
    let png = runner::with_session(session, |session| {
        runner::render_page(session, url, OutputFormat::Png, config)
    })?;
    thumbnail_from_bytes(&png, max_width, max_height, format)
}

/// [`web_thumbnail_with`] using a fresh CDP session.
#[cfg(feature = "cdp")]
pub fn web_thumbnail(
    url: &str,
    max_width: u32,
    max_height: u32,
    format: ThumbnailFormat,
    config: &CaptureConfig,
) -> Result<Vec<u8>> {
    let session = crate::new_session(config)?;
    web_thumbnail_with(session, url, max_width, max_height, format, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    fn png_of(width: u32, height: u32, pixel: Rgba<u8>) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, pixel));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn fit_preserves_aspect_ratio() {
        assert_eq!(fit_within(1152, 648, 320, 320), (320, 180));
        assert_eq!(fit_within(1152, 648, 400, 100), (178, 100));
        assert_eq!(fit_within(100, 50, 400, 400), (400, 200));
    }

    #[test]
    fn fit_never_collapses_to_zero() {
        assert_eq!(fit_within(10000, 1, 10, 10), (10, 1));
        assert_eq!(fit_within(0, 0, 16, 9), (16, 9));
    }

    #[test]
    fn jpeg_thumbnail_has_fitted_dimensions() {
        let src = png_of(1152, 648, Rgba([255, 255, 255, 255]));
        let thumb = thumbnail_from_bytes(&src, 320, 320, ThumbnailFormat::Jpeg).unwrap();

        assert_eq!(image::guess_format(&thumb).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&thumb).unwrap();
        assert_eq!(decoded.dimensions(), (320, 180));
    }

    #[test]
    fn png_thumbnail_is_flattened_to_rgb() {
        let src = png_of(64, 64, Rgba([0, 128, 255, 40]));
        let thumb = thumbnail_from_bytes(&src, 16, 16, ThumbnailFormat::Png).unwrap();

        let decoded = image::load_from_memory(&thumb).unwrap();
        assert_eq!(decoded.dimensions(), (16, 16));
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn zero_bounds_are_rejected() {
        let src = png_of(4, 4, Rgba([0, 0, 0, 255]));
        assert!(matches!(
            thumbnail_from_bytes(&src, 0, 10, ThumbnailFormat::Png),
            Err(Error::ImageError(_))
        ));
    }

    #[test]
    fn garbage_input_is_an_image_error() {
        let err = thumbnail_from_bytes(b"not an image", 10, 10, ThumbnailFormat::Jpeg).unwrap_err();
        assert!(matches!(err, Error::ImageError(_)));
    }
}
