use crate::layout_types::{LayoutError, LayoutResult, PlacementPlan};

/// Checks that `plan` gives each of `photo_count` photos exactly one
/// in-bounds rectangle and that no two rectangles share a cell.
pub fn validate_plan(plan: &PlacementPlan, photo_count: usize) -> LayoutResult<()> {
    if plan.assignments.len() != photo_count {
        return Err(LayoutError::AssignmentCountMismatch {
            expected: photo_count,
            actual: plan.assignments.len(),
        });
    }

    if plan.shape.rows == 0 || plan.shape.cols == 0 {
        return Err(LayoutError::InvalidPlan(format!(
            "shape {}x{} has no cells",
            plan.shape.rows, plan.shape.cols
        )));
    }

    if photo_count > plan.shape.capacity() {
        return Err(LayoutError::CapacityViolation {
            count: photo_count,
            capacity: plan.shape.capacity(),
            strategy: "plan",
        });
    }

    // Owner index per cell, row-major
    let cols = plan.shape.cols as usize;
    let mut owners: Vec<Option<usize>> = vec![None; plan.shape.capacity()];

    for (index, assignment) in plan.assignments.iter().enumerate() {
        if !assignment.fits_within(&plan.shape) {
            return Err(LayoutError::OutOfBounds { index });
        }

        for (row, col) in assignment.cells() {
            let offset = (row as usize - 1) * cols + (col as usize - 1);
            if let Some(first) = owners[offset] {
                return Err(LayoutError::OverlappingCells {
                    first,
                    second: index,
                });
            }
            owners[offset] = Some(index);
        }
    }

    Ok(())
}
