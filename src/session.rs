//! In-memory collage session
//!
//! Owns the photo collection, the viewport class and the set of decodes
//! still in flight. Every mutation goes through `&mut self`, so appends,
//! removals and clears are serialized with respect to each other. Plans are
//! recomputed from scratch on request and never cached.

use log::{info, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::camera::{CameraError, CameraSource};
use crate::config::Config;
use crate::exporter::{self, ExportError, ExportedCollage};
use crate::layout_types::{LayoutError, PlacementPlan, ViewportClass};
use crate::mosaic_placer::MosaicOptions;
use crate::packer::{Packer, ShapeInputs};
use crate::photo::{Photo, PhotoError, PhotoId};
use crate::photo_collection::PhotoCollection;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Decode(#[from] PhotoError),
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// A decode that has been started but not yet appended
#[derive(Debug, PartialEq, Eq)]
pub struct PendingDecode {
    id: PhotoId,
}

impl PendingDecode {
    pub fn id(&self) -> PhotoId {
        self.id
    }
}

/// Outcome of a multi-file upload
#[derive(Debug, Default)]
pub struct BatchReport {
    pub added: Vec<PhotoId>,
    /// Input index and reason for every file that was skipped
    pub skipped: Vec<(usize, PhotoError)>,
}

pub struct CollageSession {
    config: Config,
    photos: PhotoCollection,
    viewport: ViewportClass,
    pending: HashSet<PhotoId>,
}

impl CollageSession {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            photos: PhotoCollection::new(),
            viewport: ViewportClass::default(),
            pending: HashSet::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn photos(&self) -> &PhotoCollection {
        &self.photos
    }

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    pub fn packer(&self) -> Packer {
        self.config.packer
    }

    pub fn set_packer(&mut self, packer: Packer) {
        self.config.packer = packer;
    }

    pub fn viewport_class(&self) -> ViewportClass {
        self.viewport
    }

    pub fn set_viewport_class(&mut self, viewport: ViewportClass) {
        self.viewport = viewport;
    }

    /// Re-buckets the viewport after a resize
    pub fn set_viewport_width(&mut self, width_px: u32) -> ViewportClass {
        self.viewport = ViewportClass::from_width(width_px);
        self.viewport
    }

    /// Decodes and appends one photo
    pub fn ingest_photo(&mut self, bytes: &[u8]) -> SessionResult<PhotoId> {
        let photo = Photo::decode(PhotoId::next(), bytes)?;
        Ok(self.append(photo))
    }

    /// Decodes every file in parallel and appends the readable ones in input
    /// order. Unreadable files are skipped without aborting the batch.
    pub fn ingest_batch<B>(&mut self, files: &[B]) -> BatchReport
    where
        B: AsRef<[u8]> + Sync,
    {
        let decoded: Vec<Result<Photo, PhotoError>> = files
            .par_iter()
            .map(|bytes| Photo::decode(PhotoId::next(), bytes.as_ref()))
            .collect();

        let mut report = BatchReport::default();
        for (index, result) in decoded.into_iter().enumerate() {
            match result {
                Ok(photo) => report.added.push(self.append(photo)),
                Err(e) => {
                    warn!("Skipping file {} of upload: {}", index, e);
                    report.skipped.push((index, e));
                }
            }
        }

        info!(
            "Batch ingest: {} added, {} skipped",
            report.added.len(),
            report.skipped.len()
        );
        report
    }

    /// Reserves an id for a decode that completes later
    pub fn begin_ingest(&mut self) -> PendingDecode {
        let id = PhotoId::next();
        self.pending.insert(id);
        PendingDecode { id }
    }

    /// Finishes a pending decode. Returns `Ok(None)` when the decode was
    /// cancelled by `remove_photo` or `clear_all` in the meantime.
    pub fn complete_ingest(
        &mut self,
        pending: PendingDecode,
        bytes: &[u8],
    ) -> SessionResult<Option<PhotoId>> {
        if !self.pending.remove(&pending.id) {
            warn!("Ignoring decode for cancelled {}", pending.id);
            return Ok(None);
        }

        let photo = Photo::decode(pending.id, bytes)?;
        Ok(Some(self.append(photo)))
    }

    pub fn capture_from<C: CameraSource + ?Sized>(
        &mut self,
        camera: &mut C,
    ) -> SessionResult<PhotoId> {
        let frame = camera.capture_frame().map_err(|e| {
            warn!("Camera capture failed: {}", e);
            e
        })?;
        self.ingest_photo(&frame)
    }

    /// Removes a photo or cancels its pending decode; absent ids are a no-op
    pub fn remove_photo(&mut self, id: PhotoId) {
        if self.pending.remove(&id) {
            info!("Cancelled pending decode for {}", id);
        }
        if self.photos.remove(id).is_some() {
            info!("Removed {}, {} photos left", id, self.photos.len());
        }
    }

    pub fn clear_all(&mut self) {
        self.photos.clear();
        self.pending.clear();
        info!("Cleared collage session");
    }

    /// Computes the plan for the current photos, viewport and packer
    pub fn placement_plan(&self) -> SessionResult<PlacementPlan> {
        let orientations = self.photos.orientations();
        let inputs = ShapeInputs {
            viewport: self.viewport,
            orientations: Some(&orientations),
            mosaic: MosaicOptions {
                orientation_aware: self.config.orientation_aware,
            },
        };

        Ok(self
            .config
            .packer
            .compute_placement_plan(self.photos.len(), &inputs)?)
    }

    /// Renders and encodes the current collage. Session state is untouched
    /// whether or not this succeeds.
    pub fn export(&self) -> SessionResult<ExportedCollage> {
        let plan = self.placement_plan()?;
        let exported = exporter::export_png(&plan, self.photos.as_slice(), &self.config.export)?;
        Ok(exported)
    }

    /// Exports into the configured export directory
    pub fn export_to_dir(&self) -> SessionResult<PathBuf> {
        let exported = self.export()?;
        Ok(exported.save_to_dir(&self.config.export.export_dir)?)
    }

    fn append(&mut self, photo: Photo) -> PhotoId {
        let id = photo.id();
        if self.photos.append(photo) {
            info!("Ingested {} ({} photos)", id, self.photos.len());
        } else {
            warn!("{} is already in the collection, keeping the existing photo", id);
        }
        id
    }
}

impl Default for CollageSession {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_viewport_width_updates_class() {
        let mut session = CollageSession::default();
        assert_eq!(session.set_viewport_width(500), ViewportClass::Mobile);
        assert_eq!(session.viewport_class(), ViewportClass::Mobile);
    }

    #[test]
    fn test_pending_decode_completes() {
        let mut session = CollageSession::default();
        let pending = session.begin_ingest();
        let id = pending.id();
        let added = session.complete_ingest(pending, &png_bytes(4, 4)).unwrap();
        assert_eq!(added, Some(id));
        assert_eq!(session.photo_count(), 1);
    }

    #[test]
    fn test_removed_pending_decode_is_ignored() {
        let mut session = CollageSession::default();
        let pending = session.begin_ingest();
        session.remove_photo(pending.id());
        let added = session.complete_ingest(pending, &png_bytes(4, 4)).unwrap();
        assert_eq!(added, None);
        assert_eq!(session.photo_count(), 0);
    }

    #[test]
    fn test_duplicate_append_keeps_single_photo() {
        let mut session = CollageSession::default();
        let photo = Photo::decode(PhotoId::next(), &png_bytes(4, 4)).unwrap();
        let first = session.append(photo.clone());
        let second = session.append(photo);
        assert_eq!(first, second);
        assert_eq!(session.photo_count(), 1);
    }

    #[test]
    fn test_camera_error_display_follows_kind() {
        let capture: SessionError = CameraError::Capture("stream ended".to_string()).into();
        assert_eq!(capture.to_string(), "Frame capture failed: stream ended");
        let denied: SessionError = CameraError::PermissionDenied.into();
        assert_eq!(denied.to_string(), "Camera permission denied");
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut session = CollageSession::default();
        session.ingest_photo(&png_bytes(3, 2)).unwrap();
        session.remove_photo(PhotoId::next());
        assert_eq!(session.photo_count(), 1);
    }
}
