//! Raster payload validation shared by the fetcher and the disk cache.

use bytes::Bytes;
use image::ImageFormat;
use tracing::trace;

/// Formats with an enabled decoder.
pub const SUPPORTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::WebP,
    ImageFormat::Gif,
];

/// Detects the raster format from the payload's magic bytes.
///
/// # Errors
/// Returns error if the format is unknown or has no enabled decoder.
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, String> {
    let format =
        image::guess_format(bytes).map_err(|e| format!("Unrecognized image format: {e}"))?;

    if SUPPORTED_FORMATS.contains(&format) {
        Ok(format)
    } else {
        Err(format!("Unsupported image format: {format:?}"))
    }
}

/// Fully decodes the payload on a blocking thread and returns its format.
///
/// # Errors
/// Returns error if the payload is not a complete, decodable image.
pub async fn validate_image(bytes: Bytes) -> Result<ImageFormat, String> {
    let format = detect_format(&bytes)?;

    let decoded = tokio::task::spawn_blocking(move || {
        image::load_from_memory_with_format(&bytes, format)
    })
    .await
    .map_err(|e| format!("Decode task panicked: {e}"))?
    .map_err(|e| format!("Failed to decode image: {e}"))?;

    trace!(
        format = ?format,
        width = decoded.width(),
        height = decoded.height(),
        "Validated image payload"
    );

    Ok(format)
}

/// MIME type for a detected format.
#[must_use]
pub fn content_type_for(format: ImageFormat) -> &'static str {
    format.to_mime_type()
}
