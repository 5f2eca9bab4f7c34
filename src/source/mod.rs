//! Loading user-supplied screenshots into an opaque, displayable payload.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use image::{ImageFormat, RgbaImage};
use thiserror::Error;

use crate::geometry::Size;

const IMAGE_CONTENT_TYPE_PREFIX: &str = "image/";

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unsupported content type: {content_type}")]
    UnsupportedContentType { content_type: String },
    #[error("failed to read image file: {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("image payload is empty")]
    Empty,
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// A decoded screenshot together with the bytes it was decoded from.
///
/// Cloning is cheap; the pixel buffer is shared.
#[derive(Debug, Clone)]
pub struct SourceImage {
    id: u64,
    mime_type: &'static str,
    pixels: Arc<RgbaImage>,
}

impl SourceImage {
    /// Identity of this upload; a replacement image always gets a new id.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width()), f64::from(self.height()))
    }
}

impl PartialEq for SourceImage {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with(IMAGE_CONTENT_TYPE_PREFIX)
}

pub fn decode_image_bytes(bytes: Vec<u8>) -> SourceResult<SourceImage> {
    if bytes.is_empty() {
        return Err(SourceError::Empty);
    }
    let format = image::guess_format(&bytes)?;
    let decoded = image::load_from_memory_with_format(&bytes, format)?;
    let pixels = decoded.to_rgba8();

    Ok(SourceImage {
        id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
        mime_type: mime_type_for(format),
        pixels: Arc::new(pixels),
    })
}

pub fn load_image_file(path: &Path) -> SourceResult<SourceImage> {
    let bytes = fs::read(path).map_err(|source| SourceError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let image = decode_image_bytes(bytes)?;
    tracing::info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        mime = image.mime_type(),
        "loaded source image"
    );
    Ok(image)
}

/// Drag-and-drop entry point: anything not advertised as `image/*` is refused
/// before the file is read.
pub fn load_dropped_file(path: &Path, content_type: Option<&str>) -> SourceResult<SourceImage> {
    let content_type = content_type.unwrap_or_default();
    if !is_image_content_type(content_type) {
        return Err(SourceError::UnsupportedContentType {
            content_type: content_type.to_string(),
        });
    }
    load_image_file(path)
}

fn mime_type_for(format: ImageFormat) -> &'static str {
    format.to_mime_type()
}

#[cfg(test)]
pub(crate) fn png_fixture(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut cursor = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("png fixture should encode");
    cursor.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_root() -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        path.push(format!("screenglow-source-{}-{nanos}", std::process::id()));
        path
    }

    #[test]
    fn content_type_check_accepts_only_image_types() {
        assert!(is_image_content_type("image/png"));
        assert!(is_image_content_type("Image/JPEG"));
        assert!(!is_image_content_type("text/plain"));
        assert!(!is_image_content_type("application/pdf"));
        assert!(!is_image_content_type(""));
    }

    #[test]
    fn decode_image_bytes_keeps_format_and_dimensions() {
        let bytes = png_fixture(4, 2, [10, 20, 30, 255]);
        let image = decode_image_bytes(bytes).expect("png should decode");
        assert_eq!((image.width(), image.height()), (4, 2));
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.pixels().get_pixel(3, 1).0, [10, 20, 30, 255]);
    }

    #[test]
    fn each_decode_gets_a_fresh_identity() {
        let bytes = png_fixture(1, 1, [0, 0, 0, 255]);
        let first = decode_image_bytes(bytes.clone()).expect("first decode");
        let second = decode_image_bytes(bytes).expect("second decode");
        assert_ne!(first.id(), second.id());
        assert_ne!(first, second);
        assert_eq!(first.clone(), first);
    }

    #[test]
    fn decode_rejects_empty_and_non_image_payloads() {
        assert!(matches!(decode_image_bytes(Vec::new()), Err(SourceError::Empty)));
        assert!(matches!(
            decode_image_bytes(b"definitely not an image".to_vec()),
            Err(SourceError::Decode(_))
        ));
    }

    #[test]
    fn dropped_non_image_file_is_refused_before_reading() {
        let err = load_dropped_file(Path::new("/nonexistent/notes.txt"), Some("text/plain"))
            .expect_err("text drop should be refused");
        assert!(matches!(err, SourceError::UnsupportedContentType { .. }));

        let err = load_dropped_file(Path::new("/nonexistent/unknown"), None)
            .expect_err("untyped drop should be refused");
        assert!(matches!(err, SourceError::UnsupportedContentType { .. }));
    }

    #[test]
    fn dropped_image_file_is_loaded_from_disk() {
        let root = fixture_root();
        fs::create_dir_all(&root).unwrap();
        let path = root.join("shot.png");
        fs::write(&path, png_fixture(3, 3, [255, 0, 0, 255])).unwrap();

        let image = load_dropped_file(&path, Some("image/png")).expect("png drop should load");
        assert_eq!(image.size(), Size::new(3.0, 3.0));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_file_reports_read_failure() {
        let err = load_image_file(Path::new("/nonexistent/shot.png"))
            .expect_err("missing file should fail");
        assert!(matches!(err, SourceError::ReadFailed { .. }));
    }
}
