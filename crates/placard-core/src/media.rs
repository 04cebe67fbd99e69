//! Turning user-picked image files into media references.

use crate::element::MediaRef;
use crate::storage::BoxFuture;
use image::imageops::FilterType;
use thiserror::Error;

/// Edge length (pixels) of acquired images.
pub const DEFAULT_IMAGE_SIZE: u32 = 800;

/// JPEG quality of acquired images.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Image formats accepted from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }

    fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::WebP => image::ImageFormat::WebP,
        }
    }
}

/// A file the user picked.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Format from the content, falling back to the file extension.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_magic_bytes(&self.bytes).or_else(|| {
            let (_, ext) = self.name.rsplit_once('.')?;
            ImageFormat::from_extension(ext)
        })
    }
}

/// Result of acquiring an image.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquiredImage {
    pub reference: MediaRef,
    /// False when the original bytes were passed through untouched.
    pub compressed: bool,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("failed to encode image: {0}")]
    Encode(String),
}

/// Produces a media reference from a picked file.
pub trait ImageSource: Send + Sync {
    fn acquire(&self, file: MediaFile) -> BoxFuture<'_, Result<AcquiredImage, MediaError>>;
}

/// Center-crops to a square, scales to a fixed edge and re-encodes as JPEG.
///
/// The result is inlined as a `data:` URI so the design stays self-contained.
#[derive(Debug, Clone, Copy)]
pub struct CompressingImageSource {
    size: u32,
    quality: u8,
}

impl Default for CompressingImageSource {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_SIZE, DEFAULT_JPEG_QUALITY)
    }
}

impl CompressingImageSource {
    pub fn new(size: u32, quality: u8) -> Self {
        Self {
            size: size.max(1),
            quality: quality.clamp(1, 100),
        }
    }

    /// Synchronous core of [`ImageSource::acquire`].
    pub fn compress(&self, file: &MediaFile) -> Result<AcquiredImage, MediaError> {
        let format = file
            .format()
            .ok_or_else(|| MediaError::UnsupportedFormat(file.name.clone()))?;

        let decoded = image::load_from_memory_with_format(&file.bytes, format.to_image_format())
            .map_err(|e| MediaError::Decode(e.to_string()))?;

        let (width, height) = (decoded.width(), decoded.height());
        let side = width.min(height);
        if side == 0 {
            return Err(MediaError::Decode(format!("{} has no pixels", file.name)));
        }

        let square = decoded.crop_imm((width - side) / 2, (height - side) / 2, side, side);
        let scaled = square.resize_exact(self.size, self.size, FilterType::Triangle);
        let rgb = scaled.to_rgb8();

        let mut jpeg = Vec::new();
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, self.quality);
        encoder
            .encode_image(&rgb)
            .map_err(|e| MediaError::Encode(e.to_string()))?;

        log::debug!(
            "Compressed {} from {}x{} ({} bytes) to {}x{} ({} bytes)",
            file.name,
            width,
            height,
            file.bytes.len(),
            self.size,
            self.size,
            jpeg.len()
        );

        Ok(AcquiredImage {
            reference: MediaRef::from_data("image/jpeg", &jpeg),
            compressed: true,
            width: self.size,
            height: self.size,
        })
    }
}

impl ImageSource for CompressingImageSource {
    fn acquire(&self, file: MediaFile) -> BoxFuture<'_, Result<AcquiredImage, MediaError>> {
        Box::pin(async move { self.compress(&file) })
    }
}

/// Inlines the original bytes without re-encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughImageSource;

impl ImageSource for PassthroughImageSource {
    fn acquire(&self, file: MediaFile) -> BoxFuture<'_, Result<AcquiredImage, MediaError>> {
        Box::pin(async move {
            let format = file
                .format()
                .ok_or_else(|| MediaError::UnsupportedFormat(file.name.clone()))?;
            let (width, height) = image::load_from_memory_with_format(&file.bytes, format.to_image_format())
                .map(|img| (img.width(), img.height()))
                .map_err(|e| MediaError::Decode(e.to_string()))?;
            Ok(AcquiredImage {
                reference: MediaRef::from_data(format.mime_type(), &file.bytes),
                compressed: false,
                width,
                height,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::block_on;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 { image::Rgb([255, 0, 0]) } else { image::Rgb([0, 0, 255]) }
        });
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_format_detection() {
        let file = MediaFile::new("photo.bin", png(2, 2));
        assert_eq!(file.format(), Some(ImageFormat::Png));
        let file = MediaFile::new("photo.JPG", vec![0, 1, 2]);
        assert_eq!(file.format(), Some(ImageFormat::Jpeg));
        let file = MediaFile::new("notes.txt", b"hello".to_vec());
        assert_eq!(file.format(), None);
    }

    #[test]
    fn test_compress_center_crops_to_square() {
        let source = CompressingImageSource::new(16, 80);
        let acquired = block_on(source.acquire(MediaFile::new("wide.png", png(60, 20)))).unwrap();

        assert!(acquired.compressed);
        assert_eq!((acquired.width, acquired.height), (16, 16));
        assert!(acquired.reference.as_str().starts_with("data:image/jpeg;base64,"));

        let jpeg = acquired.reference.decode_data().unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }

    #[test]
    fn test_unsupported_file_is_rejected() {
        let source = CompressingImageSource::default();
        let err = block_on(source.acquire(MediaFile::new("notes.txt", b"hello".to_vec()))).unwrap_err();
        assert!(matches!(err, MediaError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_garbage_png_fails_to_decode() {
        let source = CompressingImageSource::default();
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47];
        bytes.extend_from_slice(&[0; 16]);
        let err = block_on(source.acquire(MediaFile::new("broken.png", bytes))).unwrap_err();
        assert!(matches!(err, MediaError::Decode(_)));
    }

    #[test]
    fn test_passthrough_keeps_bytes() {
        let bytes = png(4, 3);
        let acquired = block_on(PassthroughImageSource.acquire(MediaFile::new("a.png", bytes.clone()))).unwrap();
        assert!(!acquired.compressed);
        assert_eq!((acquired.width, acquired.height), (4, 3));
        assert_eq!(acquired.reference.decode_data(), Some(bytes));
    }
}
