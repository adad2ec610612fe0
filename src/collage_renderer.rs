use image::{ImageBuffer, Rgba, RgbaImage};
use log::debug;

use crate::config::ExportConfig;
use crate::layout_types::{CellAssignment, ContainerShape, PlacementPlan};
use crate::photo::Photo;

/// Pixel rectangle on the rendered canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Grid-to-pixel geometry at a given scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasGeometry {
    cell: u64,
    gap: u64,
    rows: u64,
    cols: u64,
}

impl CanvasGeometry {
    pub fn new(shape: &ContainerShape, cell_size: u32, gap: u32, scale: u32) -> Self {
        let scale = scale.max(1) as u64;
        Self {
            cell: cell_size.max(1) as u64 * scale,
            gap: gap as u64 * scale,
            rows: shape.rows as u64,
            cols: shape.cols as u64,
        }
    }

    /// Canvas `(width, height)`; u64 so oversized grids can be rejected
    pub fn canvas_size(&self) -> (u64, u64) {
        (
            self.cols * self.cell + (self.cols + 1) * self.gap,
            self.rows * self.cell + (self.rows + 1) * self.gap,
        )
    }

    pub fn rect_for(&self, assignment: &CellAssignment) -> PixelRect {
        let stride = self.cell + self.gap;
        let extent = |span: u32| span as u64 * self.cell + (span as u64).saturating_sub(1) * self.gap;

        PixelRect {
            x: (self.gap + (assignment.col_start as u64).saturating_sub(1) * stride) as u32,
            y: (self.gap + (assignment.row_start as u64).saturating_sub(1) * stride) as u32,
            width: extent(assignment.col_span) as u32,
            height: extent(assignment.row_span) as u32,
        }
    }
}

/// Draws each photo center-cropped into its plan rectangle on an opaque
/// background. `photos` must be index-aligned with `plan` and the canvas
/// must already be checked against the size cap.
pub fn render_collage(
    plan: &PlacementPlan,
    photos: &[Photo],
    config: &ExportConfig,
) -> RgbaImage {
    let geometry = CanvasGeometry::new(&plan.shape, config.cell_size, config.gap, config.scale);
    let (width, height) = geometry.canvas_size();
    let mut canvas: RgbaImage =
        ImageBuffer::from_pixel(width as u32, height as u32, opaque(config.background));

    for (assignment, photo) in plan.assignments.iter().zip(photos) {
        let rect = geometry.rect_for(assignment);

        let resized = photo.image().resize_to_fill(
            rect.width,
            rect.height,
            image::imageops::FilterType::Lanczos3,
        );

        image::imageops::overlay(
            &mut canvas,
            &resized.to_rgba8(),
            rect.x as i64,
            rect.y as i64,
        );
        debug!("Drew {} at {:?}", photo.id(), rect);
    }

    canvas
}

fn opaque(color: Rgba<u8>) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 255])
}
