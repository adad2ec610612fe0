use crate::layout_types::{CellAssignment, ContainerShape, LayoutError, LayoutResult};

/// Row-major cell for the photo at `index` in a grid `cols` wide
pub fn cell_for_index(index: usize, cols: u32) -> CellAssignment {
    let cols = cols.max(1) as usize;
    let row = (index / cols) as u32 + 1;
    let col = (index % cols) as u32 + 1;
    CellAssignment::cell(row, col)
}

/// Assigns every photo one equal-size cell in row-major order
pub fn place_uniform(count: usize, shape: &ContainerShape) -> LayoutResult<Vec<CellAssignment>> {
    if count > shape.capacity() {
        return Err(LayoutError::CapacityViolation {
            count,
            capacity: shape.capacity(),
            strategy: "uniform-grid",
        });
    }

    Ok((0..count).map(|index| cell_for_index(index, shape.cols)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_types::LayoutClass;

    #[test]
    fn test_row_major_order() {
        let shape = ContainerShape::new(2, 2, LayoutClass::Grid);
        let cells = place_uniform(4, &shape).unwrap();
        assert_eq!(
            cells,
            vec![
                CellAssignment::cell(1, 1),
                CellAssignment::cell(1, 2),
                CellAssignment::cell(2, 1),
                CellAssignment::cell(2, 2),
            ]
        );
    }

    #[test]
    fn test_partial_last_row() {
        let shape = ContainerShape::new(2, 3, LayoutClass::Grid);
        let cells = place_uniform(5, &shape).unwrap();
        assert_eq!(cells[4], CellAssignment::cell(2, 2));
    }

    #[test]
    fn test_same_index_same_cell() {
        for index in 0..50 {
            assert_eq!(cell_for_index(index, 7), cell_for_index(index, 7));
        }
        assert_eq!(cell_for_index(13, 4), CellAssignment::cell(4, 2));
    }

    #[test]
    fn test_rejects_count_above_capacity() {
        let shape = ContainerShape::square(2, LayoutClass::Grid);
        assert!(matches!(
            place_uniform(5, &shape),
            Err(LayoutError::CapacityViolation { count: 5, capacity: 4, .. })
        ));
    }
}
