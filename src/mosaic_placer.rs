//! Occupancy-tracked mosaic placement
//!
//! Photos are placed in sequence order. Each one draws a size class from a
//! fixed cycle, anchors at the next free cell in row-major order and keeps
//! its span only if the span fits the grid, touches no claimed cell and
//! leaves enough free cells for the photos still waiting. Otherwise it
//! shrinks to a single cell at the anchor. Counts 1 to 3 use hand-authored
//! layouts scaled to the grid.

use log::debug;

use crate::layout_types::{CellAssignment, ContainerShape, LayoutError, LayoutResult, SizeClass};
use crate::photo::Orientation;

/// Share of the major axis given to the large photo of a three-photo layout
const TRIO_LARGE_SHARE: f64 = 0.6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MosaicOptions {
    /// Swap wide/tall size classes to follow photo orientation
    pub orientation_aware: bool,
}

/// Claimed cells for one placement computation. Never outlives the call.
struct OccupancyGrid {
    rows: u32,
    cols: u32,
    cells: Vec<bool>,
    free: usize,
}

impl OccupancyGrid {
    fn new(shape: &ContainerShape) -> Self {
        Self {
            rows: shape.rows,
            cols: shape.cols,
            cells: vec![false; shape.capacity()],
            free: shape.capacity(),
        }
    }

    fn offset(&self, row: u32, col: u32) -> usize {
        (row as usize - 1) * self.cols as usize + (col as usize - 1)
    }

    fn is_free(&self, row: u32, col: u32) -> bool {
        !self.cells[self.offset(row, col)]
    }

    fn free_cells(&self) -> usize {
        self.free
    }

    fn can_hold(&self, candidate: &CellAssignment) -> bool {
        let in_bounds = candidate.row_end() <= self.rows && candidate.col_end() <= self.cols;
        in_bounds && candidate.cells().all(|(row, col)| self.is_free(row, col))
    }

    fn occupy(&mut self, placement: &CellAssignment) {
        for (row, col) in placement.cells() {
            let offset = self.offset(row, col);
            if !self.cells[offset] {
                self.cells[offset] = true;
                self.free -= 1;
            }
        }
    }

    /// First free cell at or after `cursor`, scanning row-major
    fn next_free_from(&self, cursor: (u32, u32)) -> Option<(u32, u32)> {
        let (mut row, mut col) = cursor;
        while row <= self.rows {
            if self.is_free(row, col) {
                return Some((row, col));
            }
            (row, col) = advance(row, col, self.cols);
        }
        None
    }
}

fn advance(row: u32, col: u32, cols: u32) -> (u32, u32) {
    if col >= cols {
        (row + 1, 1)
    } else {
        (row, col + 1)
    }
}

fn size_class_for(
    index: usize,
    orientation: Option<Orientation>,
    options: MosaicOptions,
) -> SizeClass {
    let class = SizeClass::for_sequence_index(index);
    if !options.orientation_aware {
        return class;
    }

    match (class, orientation) {
        (SizeClass::Wide, Some(Orientation::Portrait)) => SizeClass::Tall,
        (SizeClass::Tall, Some(Orientation::Landscape)) => SizeClass::Wide,
        _ => class,
    }
}

/// Places `count` photos on `shape`.
///
/// `orientations` is index-aligned with the photos and only consulted when
/// `options.orientation_aware` is set; missing entries are treated as unknown.
pub fn place_mosaic(
    count: usize,
    shape: &ContainerShape,
    orientations: Option<&[Orientation]>,
    options: MosaicOptions,
) -> LayoutResult<Vec<CellAssignment>> {
    if count > shape.capacity() {
        return Err(LayoutError::CapacityViolation {
            count,
            capacity: shape.capacity(),
            strategy: "mosaic",
        });
    }

    if let Some(placements) = hand_authored_layout(count, shape) {
        return Ok(placements);
    }

    let mut grid = OccupancyGrid::new(shape);
    let mut cursor = (1, 1);
    let mut placements = Vec::with_capacity(count);

    for index in 0..count {
        let (row, col) = grid.next_free_from(cursor).ok_or_else(|| {
            LayoutError::InvalidPlan(format!("no free cell left for photo {}", index))
        })?;

        let orientation = orientations.and_then(|o| o.get(index).copied());
        let size_class = size_class_for(index, orientation, options);
        let (row_span, col_span) = size_class.span();
        let candidate = CellAssignment::new(row, row_span, col, col_span);
        let still_waiting = count - index - 1;

        let placement = if grid.can_hold(&candidate)
            && grid.free_cells() - candidate.area() >= still_waiting
        {
            candidate
        } else {
            if size_class != SizeClass::Small {
                debug!(
                    "Photo {} falls back from {} to a single cell at ({},{})",
                    index, size_class, row, col
                );
            }
            CellAssignment::cell(row, col)
        };

        grid.occupy(&placement);
        placements.push(placement);
        cursor = advance(row, col, shape.cols);
    }

    Ok(placements)
}

/// Fixed layouts for one to three photos, `None` when the grid cannot host them
fn hand_authored_layout(count: usize, shape: &ContainerShape) -> Option<Vec<CellAssignment>> {
    let (rows, cols) = (shape.rows, shape.cols);
    match count {
        1 => Some(vec![CellAssignment::new(1, rows, 1, cols)]),
        2 => {
            let (major, _) = major_minor(shape);
            let half = major / 2;
            if half == 0 {
                return None;
            }
            let (first, second) = if cols >= rows {
                (
                    CellAssignment::new(1, rows, 1, half),
                    CellAssignment::new(1, rows, half + 1, cols - half),
                )
            } else {
                (
                    CellAssignment::new(1, half, 1, cols),
                    CellAssignment::new(half + 1, rows - half, 1, cols),
                )
            };
            Some(vec![first, second])
        }
        3 => {
            let (major, minor) = major_minor(shape);
            if major < 2 || minor < 2 {
                return None;
            }
            let large = ((major as f64 * TRIO_LARGE_SHARE).round() as u32).clamp(1, major - 1);
            let rest = major - large;
            let top = minor / 2;
            let bottom = minor - top;
            let placements = if cols >= rows {
                vec![
                    CellAssignment::new(1, rows, 1, large),
                    CellAssignment::new(1, top, large + 1, rest),
                    CellAssignment::new(top + 1, bottom, large + 1, rest),
                ]
            } else {
                vec![
                    CellAssignment::new(1, large, 1, cols),
                    CellAssignment::new(large + 1, rest, 1, top),
                    CellAssignment::new(large + 1, rest, top + 1, bottom),
                ]
            };
            Some(placements)
        }
        _ => None,
    }
}

fn major_minor(shape: &ContainerShape) -> (u32, u32) {
    if shape.cols >= shape.rows {
        (shape.cols, shape.rows)
    } else {
        (shape.rows, shape.cols)
    }
}
