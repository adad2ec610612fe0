use chrono::{DateTime, Utc};
use image::{DynamicImage, ImageFormat};
use log::{error, info};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::collage_renderer::{self, CanvasGeometry};
use crate::config::ExportConfig;
use crate::layout_types::{LayoutError, PlacementPlan};
use crate::photo::Photo;
use crate::plan_validator;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Nothing to export: the collection is empty")]
    EmptyCollection,
    #[error("Plan has {plan} assignments but {photos} photos were supplied")]
    PlanMismatch { plan: usize, photos: usize },
    #[error("Canvas {width}x{height} exceeds the {max} pixel limit")]
    CanvasTooLarge { width: u64, height: u64, max: u32 },
    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// An encoded collage ready to be offered as a download
#[derive(Debug, Clone)]
pub struct ExportedCollage {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub png_bytes: Vec<u8>,
}

impl ExportedCollage {
    /// Writes the PNG into `dir`, creating it if needed
    pub fn save_to_dir(&self, dir: &Path) -> ExportResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.png_bytes)?;
        info!("Saved collage to {}", path.display());
        Ok(path)
    }
}

/// `<app>-collage-<unix millis>.png`
pub fn export_file_name(app_name: &str, at: DateTime<Utc>) -> String {
    format!("{}-collage-{}.png", app_name, at.timestamp_millis())
}

/// Rasterizes `photos` per `plan` and encodes the result as PNG.
/// Nothing is mutated on failure, so the caller may simply retry.
pub fn export_png(
    plan: &PlacementPlan,
    photos: &[Photo],
    config: &ExportConfig,
) -> ExportResult<ExportedCollage> {
    if photos.is_empty() {
        return Err(ExportError::EmptyCollection);
    }
    if plan.len() != photos.len() {
        return Err(ExportError::PlanMismatch {
            plan: plan.len(),
            photos: photos.len(),
        });
    }

    plan_validator::validate_plan(plan, photos.len())?;

    let geometry = CanvasGeometry::new(&plan.shape, config.cell_size, config.gap, config.scale);
    let (width, height) = geometry.canvas_size();
    if width > config.max_dimension as u64 || height > config.max_dimension as u64 {
        error!(
            "Refusing to export {}x{} canvas (limit {})",
            width, height, config.max_dimension
        );
        return Err(ExportError::CanvasTooLarge {
            width,
            height,
            max: config.max_dimension,
        });
    }

    let canvas = collage_renderer::render_collage(plan, photos, config);
    let (width, height) = canvas.dimensions();

    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(canvas).write_to(&mut buffer, ImageFormat::Png)?;

    let file_name = export_file_name(&config.app_name, Utc::now());
    info!(
        "Exported {} photos as {} ({}x{})",
        photos.len(),
        file_name,
        width,
        height
    );

    Ok(ExportedCollage {
        file_name,
        width,
        height,
        png_bytes: buffer.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::layout_types::{CellAssignment, ContainerShape, LayoutClass};
    use crate::photo::PhotoId;
    use chrono::TimeZone;
    use image::{GenericImageView, RgbImage};

    fn photo() -> Photo {
        Photo::new(PhotoId::next(), DynamicImage::ImageRgb8(RgbImage::new(8, 6))).unwrap()
    }

    fn single_plan() -> PlacementPlan {
        PlacementPlan {
            shape: ContainerShape::new(1, 1, LayoutClass::Single),
            assignments: vec![CellAssignment::cell(1, 1)],
        }
    }

    #[test]
    fn test_file_name_pattern() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            export_file_name("photo", at),
            "photo-collage-1700000000123.png"
        );
    }

    #[test]
    fn test_export_produces_png_at_scale() {
        let mut config = Config::default().export;
        config.cell_size = 16;
        config.gap = 1;

        let exported = export_png(&single_plan(), &[photo()], &config).unwrap();
        assert_eq!((exported.width, exported.height), (36, 36));
        assert!(exported.file_name.starts_with("photo-collage-"));

        let decoded = image::load_from_memory(&exported.png_bytes).unwrap();
        assert_eq!(decoded.dimensions(), (36, 36));
    }

    #[test]
    fn test_export_rejects_empty_and_mismatch() {
        let config = Config::default().export;
        assert!(matches!(
            export_png(&PlacementPlan::empty(), &[], &config),
            Err(ExportError::EmptyCollection)
        ));
        assert!(matches!(
            export_png(&single_plan(), &[photo(), photo()], &config),
            Err(ExportError::PlanMismatch { plan: 1, photos: 2 })
        ));
    }

    #[test]
    fn test_export_rejects_overlapping_plan() {
        let plan = PlacementPlan {
            shape: ContainerShape::new(1, 1, LayoutClass::Grid),
            assignments: vec![CellAssignment::cell(1, 1), CellAssignment::cell(1, 1)],
        };
        assert!(matches!(
            export_png(&plan, &[photo(), photo()], &Config::default().export),
            Err(ExportError::Layout(LayoutError::OverlappingCells { first: 0, second: 1 }))
        ));
    }

    #[test]
    fn test_export_rejects_zero_span_plan() {
        let plan = PlacementPlan {
            shape: ContainerShape::square(2, LayoutClass::Grid),
            assignments: vec![CellAssignment::new(1, 0, 1, 1)],
        };
        assert!(matches!(
            export_png(&plan, &[photo()], &Config::default().export),
            Err(ExportError::Layout(LayoutError::OutOfBounds { index: 0 }))
        ));
    }

    #[test]
    fn test_export_rejects_oversized_canvas() {
        let mut config = Config::default().export;
        config.max_dimension = 100;
        assert!(matches!(
            export_png(&single_plan(), &[photo()], &config),
            Err(ExportError::CanvasTooLarge { max: 100, .. })
        ));
    }

    #[test]
    fn test_save_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let exported = ExportedCollage {
            file_name: "photo-collage-1.png".to_string(),
            width: 1,
            height: 1,
            png_bytes: vec![1, 2, 3],
        };
        let path = exported.save_to_dir(&dir.path().join("out")).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    }
}
