use crate::layout_types::{ContainerShape, LayoutClass, LayoutError, LayoutResult, ViewportClass};

/// Largest count served by the hand-tuned step table
pub const FIXED_TABLE_CEILING: usize = 36;

/// Largest count the uniform square strategy can hold (6x6)
pub const UNIFORM_CEILING: usize = 36;

/// Density factor and `[min, max]` grid size per viewport class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportDensity {
    pub density_factor: f64,
    pub min_grid: u32,
    pub max_grid: u32,
}

impl ViewportDensity {
    pub fn for_class(class: ViewportClass) -> Self {
        let (density_factor, min_grid, max_grid) = match class {
            ViewportClass::Mobile => (1.25, 2, 4),
            ViewportClass::Tablet => (1.5, 2, 5),
            ViewportClass::Laptop => (1.75, 3, 6),
            ViewportClass::Desktop => (2.0, 3, 8),
        };

        Self {
            density_factor,
            min_grid,
            max_grid,
        }
    }
}

/// Smallest `n` with `n * n >= count`
pub fn ceil_sqrt(count: usize) -> u32 {
    let mut n = (count as f64).sqrt().floor() as usize;
    while n * n < count {
        n += 1;
    }
    n.max(1) as u32
}

/// Hand-tuned step table, square `ceil(sqrt)` sizing above the ceiling
pub fn fixed_step_shape(count: usize) -> ContainerShape {
    let (rows, cols) = match count {
        0 => return ContainerShape::new(1, 1, LayoutClass::Empty),
        1 => (1, 1),
        2..=4 => (2, 2),
        5..=6 => (2, 3),
        7..=9 => (3, 3),
        10..=12 => (3, 4),
        13..=16 => (4, 4),
        17..=20 => (4, 5),
        21..=25 => (5, 5),
        26..=30 => (5, 6),
        31..=FIXED_TABLE_CEILING => (6, 6),
        _ => {
            let n = ceil_sqrt(count);
            (n, n)
        }
    };

    ContainerShape::new(rows, cols, grid_layout_class(count))
}

/// Square grid sized by viewport density, grown past `max_grid` when the
/// clamped size cannot hold every photo
pub fn responsive_shape(count: usize, viewport: ViewportClass) -> ContainerShape {
    if count == 0 {
        return ContainerShape::new(1, 1, LayoutClass::Empty);
    }

    let density = ViewportDensity::for_class(viewport);
    let scaled = (count as f64 * density.density_factor).ceil() as usize;
    let clamped = ceil_sqrt(scaled).clamp(density.min_grid, density.max_grid);
    let grid_size = clamped.max(ceil_sqrt(count));

    if grid_size != clamped {
        log::debug!(
            "Growing {} grid from {} to {} to hold {} photos",
            viewport,
            clamped,
            grid_size,
            count
        );
    }

    let layout_class = match count {
        1 => LayoutClass::Single,
        2 => LayoutClass::Duo,
        3 => LayoutClass::Trio,
        _ if count * 2 > (grid_size * grid_size) as usize => LayoutClass::MosaicDense,
        _ => LayoutClass::Mosaic,
    };

    ContainerShape::square(grid_size, layout_class)
}

/// Stepped square thresholds capped at 6x6. Counts above the cap are a
/// capacity violation rather than a silent truncation.
pub fn uniform_shape(count: usize) -> LayoutResult<ContainerShape> {
    let grid_size = match count {
        0 => return Ok(ContainerShape::new(1, 1, LayoutClass::Empty)),
        1 => 1,
        2..=4 => 2,
        5..=9 => 3,
        10..=16 => 4,
        17..=25 => 5,
        26..=UNIFORM_CEILING => 6,
        _ => {
            return Err(LayoutError::CapacityViolation {
                count,
                capacity: UNIFORM_CEILING,
                strategy: "uniform",
            })
        }
    };

    Ok(ContainerShape::square(grid_size, grid_layout_class(count)))
}

fn grid_layout_class(count: usize) -> LayoutClass {
    if count == 1 {
        LayoutClass::Single
    } else {
        LayoutClass::Grid
    }
}
