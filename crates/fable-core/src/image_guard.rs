//! Upload-side image validation and normalization.
//!
//! Pure transform: bytes in, normalized bytes out. Uploading the result
//! is the blob-store collaborator's job.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageGuardError {
    #[error("Only JPEG and PNG images are allowed")]
    UnsupportedType,

    #[error("Image could not be reduced below the size cap")]
    TooLarge,

    #[error("Invalid image data: {0}")]
    Invalid(String),
}

/// Size policy for uploaded images. The 512 px edge and 300 KB byte
/// caps are the fixed product constants.
#[derive(Debug, Clone)]
pub struct ImagePolicy {
    /// Longest allowed edge in pixels.
    pub max_edge: u32,
    /// Largest allowed encoded size in bytes.
    pub max_bytes: usize,
    /// JPEG quality for the first re-encode after a resize.
    pub base_quality: u8,
    /// JPEG quality for the second attempt when still over the cap.
    pub reduced_quality: u8,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            max_edge: 512,
            max_bytes: 300 * 1024,
            base_quality: 85,
            reduced_quality: 70,
        }
    }
}

/// A validated, size-conforming image ready for upload.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub content_type: &'static str,
}

/// Validates type and dimensions, downscaling and re-encoding as needed.
pub struct ImageGuard {
    policy: ImagePolicy,
}

impl ImageGuard {
    pub fn new(policy: ImagePolicy) -> Self {
        Self { policy }
    }

    /// Validate `bytes` and normalize them to the policy caps.
    ///
    /// The format is sniffed from the bytes, never taken from a file
    /// name. Input already inside both caps passes through unchanged.
    pub fn process(&self, bytes: &[u8]) -> Result<ProcessedImage, ImageGuardError> {
        let format = match image::guess_format(bytes) {
            Ok(ImageFormat::Jpeg) => ImageFormat::Jpeg,
            Ok(ImageFormat::Png) => ImageFormat::Png,
            _ => return Err(ImageGuardError::UnsupportedType),
        };

        let img = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| ImageGuardError::Invalid(e.to_string()))?;

        let (width, height) = (img.width(), img.height());
        let needs_resize = width > self.policy.max_edge || height > self.policy.max_edge;

        if !needs_resize && bytes.len() <= self.policy.max_bytes {
            return Ok(ProcessedImage {
                bytes: bytes.to_vec(),
                width,
                height,
                content_type: content_type_of(format),
            });
        }

        // resize() fits within the bounds using the smaller scale
        // factor, so the aspect ratio is preserved and the long edge
        // lands exactly on max_edge.
        let img = if needs_resize {
            img.resize(self.policy.max_edge, self.policy.max_edge, FilterType::Triangle)
        } else {
            img
        };

        let encoded = encode(&img, format, self.policy.base_quality)?;
        let encoded = if encoded.len() > self.policy.max_bytes && format == ImageFormat::Jpeg {
            encode(&img, format, self.policy.reduced_quality)?
        } else {
            encoded
        };
        if encoded.len() > self.policy.max_bytes {
            return Err(ImageGuardError::TooLarge);
        }

        Ok(ProcessedImage {
            width: img.width(),
            height: img.height(),
            bytes: encoded,
            content_type: content_type_of(format),
        })
    }
}

impl Default for ImageGuard {
    fn default() -> Self {
        Self::new(ImagePolicy::default())
    }
}

fn content_type_of(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        _ => "image/jpeg",
    }
}

fn encode(
    img: &DynamicImage,
    format: ImageFormat,
    quality: u8,
) -> Result<Vec<u8>, ImageGuardError> {
    let mut buf = Cursor::new(Vec::new());
    let result = match format {
        ImageFormat::Jpeg => img.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality)),
        _ => img.write_with_encoder(PngEncoder::new(&mut buf)),
    };
    result.map_err(|e| ImageGuardError::Invalid(e.to_string()))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 251) as u8, (y % 241) as u8, ((x + y) % 255) as u8])
        }));
        let mut buf = Cursor::new(Vec::new());
        img.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, 90))
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn oversized_jpeg_is_downscaled_preserving_aspect() {
        let guard = ImageGuard::default();
        let out = guard.process(&jpeg_bytes(1024, 768)).unwrap();
        assert_eq!((out.width, out.height), (512, 384));
        assert_eq!(out.content_type, "image/jpeg");
        assert!(out.bytes.len() <= ImagePolicy::default().max_bytes);
    }

    #[test]
    fn portrait_orientation_caps_the_long_edge() {
        let guard = ImageGuard::default();
        let out = guard.process(&jpeg_bytes(300, 600)).unwrap();
        assert_eq!((out.width, out.height), (256, 512));
    }

    #[test]
    fn conforming_image_passes_through_unchanged() {
        let guard = ImageGuard::default();
        let input = jpeg_bytes(200, 100);
        let out = guard.process(&input).unwrap();
        assert_eq!(out.bytes, input);
        assert_eq!((out.width, out.height), (200, 100));
    }

    #[test]
    fn non_image_bytes_are_rejected_without_resizing() {
        let guard = ImageGuard::default();
        let err = guard.process(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ImageGuardError::UnsupportedType));
    }

    #[test]
    fn gif_is_an_unsupported_type() {
        let guard = ImageGuard::default();
        let err = guard.process(b"GIF87a\x01\x00\x01\x00").unwrap_err();
        assert!(matches!(err, ImageGuardError::UnsupportedType));
    }
}
