use image::{DynamicImage, GenericImageView};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};

/// Tolerance for treating an aspect ratio as square
pub const SQUARE_EPSILON: f64 = 1e-3;

static NEXT_PHOTO_ID: AtomicU64 = AtomicU64::new(1);

/// Session-unique photo identity from a monotonic counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhotoId(u64);

impl PhotoId {
    pub fn next() -> Self {
        PhotoId(NEXT_PHOTO_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "photo-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    pub fn from_aspect_ratio(ratio: f64) -> Self {
        if (ratio - 1.0).abs() < SQUARE_EPSILON {
            Orientation::Square
        } else if ratio > 1.0 {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Square => "square",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Image has no pixels")]
    EmptyImage,
}

pub type PhotoResult<T> = Result<T, PhotoError>;

/// One decoded photo. Owns its pixels; dropping the photo releases them.
#[derive(Debug, Clone)]
pub struct Photo {
    id: PhotoId,
    image: DynamicImage,
    width: u32,
    height: u32,
}

impl Photo {
    pub fn new(id: PhotoId, image: DynamicImage) -> PhotoResult<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PhotoError::EmptyImage);
        }

        Ok(Self {
            id,
            image,
            width,
            height,
        })
    }

    /// Decodes encoded bytes, applying any EXIF orientation so the stored
    /// dimensions are the displayed ones
    pub fn decode(id: PhotoId, bytes: &[u8]) -> PhotoResult<Self> {
        let image = image::load_from_memory(bytes)?;
        let orientation = read_exif_orientation(bytes);
        let image = apply_orientation(image, orientation);
        let photo = Self::new(id, image)?;

        debug!(
            "Decoded {} ({}x{}, {})",
            photo.id,
            photo.width,
            photo.height,
            photo.orientation()
        );
        Ok(photo)
    }

    pub fn id(&self) -> PhotoId {
        self.id
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_aspect_ratio(self.aspect_ratio())
    }
}

/// EXIF orientation tag (1-8), `None` when absent or unreadable
fn read_exif_orientation(bytes: &[u8]) -> Option<u32> {
    let mut cursor = Cursor::new(bytes);
    let exif = exif::Reader::new().read_from_container(&mut cursor).ok()?;
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    field.value.get_uint(0)
}

fn apply_orientation(img: DynamicImage, orientation: Option<u32>) -> DynamicImage {
    match orientation {
        Some(2) => img.fliph(),
        Some(3) => img.rotate180(),
        Some(4) => img.flipv(),
        Some(5) => img.fliph().rotate270(),
        Some(6) => img.rotate90(),
        Some(7) => img.fliph().rotate90(),
        Some(8) => img.rotate270(),
        _ => img,
    }
}
