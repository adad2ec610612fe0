use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::grid_placer;
use crate::layout_types::{ContainerShape, LayoutResult, PlacementPlan, ViewportClass};
use crate::mosaic_placer::{self, MosaicOptions};
use crate::photo::Orientation;
use crate::plan_validator;
use crate::size_class_selector;

/// Packing strategy, selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Packer {
    /// Equal cells on a stepped square grid, capped at 6x6
    UniformGrid,
    /// Variable spans on a viewport-sized square grid
    Mosaic,
    /// Equal cells on the hand-tuned step table
    FixedStepGrid,
}

impl Packer {
    pub const ALL: [Packer; 3] = [Packer::UniformGrid, Packer::Mosaic, Packer::FixedStepGrid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Packer::UniformGrid => "uniform",
            Packer::Mosaic => "mosaic",
            Packer::FixedStepGrid => "fixed",
        }
    }

    /// Largest count the strategy accepts, `None` when unbounded
    pub fn ceiling(&self) -> Option<usize> {
        match self {
            Packer::UniformGrid => Some(size_class_selector::UNIFORM_CEILING),
            Packer::Mosaic | Packer::FixedStepGrid => None,
        }
    }

    pub fn select_shape(
        &self,
        photo_count: usize,
        viewport: ViewportClass,
    ) -> LayoutResult<ContainerShape> {
        match self {
            Packer::UniformGrid => size_class_selector::uniform_shape(photo_count),
            Packer::Mosaic => Ok(size_class_selector::responsive_shape(photo_count, viewport)),
            Packer::FixedStepGrid => Ok(size_class_selector::fixed_step_shape(photo_count)),
        }
    }

    /// Computes and validates a plan from scratch
    pub fn compute_placement_plan(
        &self,
        photo_count: usize,
        inputs: &ShapeInputs<'_>,
    ) -> LayoutResult<PlacementPlan> {
        let shape = self.select_shape(photo_count, inputs.viewport)?;

        let assignments = match self {
            Packer::UniformGrid | Packer::FixedStepGrid => {
                grid_placer::place_uniform(photo_count, &shape)?
            }
            Packer::Mosaic => {
                mosaic_placer::place_mosaic(photo_count, &shape, inputs.orientations, inputs.mosaic)?
            }
        };

        let plan = PlacementPlan { shape, assignments };
        plan_validator::validate_plan(&plan, photo_count)?;

        debug!(
            "{} plan for {} photos on {}x{} ({})",
            self, photo_count, shape.rows, shape.cols, shape.layout_class
        );
        Ok(plan)
    }
}

impl Default for Packer {
    fn default() -> Self {
        Packer::Mosaic
    }
}

impl FromStr for Packer {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(Packer::UniformGrid),
            "mosaic" => Ok(Packer::Mosaic),
            "fixed" => Ok(Packer::FixedStepGrid),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Packer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Container-shape inputs beyond the photo count
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeInputs<'a> {
    pub viewport: ViewportClass,
    /// Index-aligned with the photos; only read by an orientation-aware mosaic
    pub orientations: Option<&'a [Orientation]>,
    pub mosaic: MosaicOptions,
}

impl<'a> ShapeInputs<'a> {
    pub fn for_viewport(viewport: ViewportClass) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }
}

/// Free-function entry point for render collaborators
pub fn compute_placement_plan(
    packer: Packer,
    photo_count: usize,
    inputs: &ShapeInputs<'_>,
) -> LayoutResult<PlacementPlan> {
    packer.compute_placement_plan(photo_count, inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_types::{CellAssignment, LayoutClass, LayoutError};

    #[test]
    fn test_fixed_four_photos() {
        let plan = compute_placement_plan(Packer::FixedStepGrid, 4, &ShapeInputs::default())
            .unwrap();
        assert_eq!((plan.shape.rows, plan.shape.cols), (2, 2));
        let cells: Vec<_> = plan.assignments.iter().map(|a| (a.row(), a.col())).collect();
        assert_eq!(cells, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_single_photo_spans_full_grid_for_every_packer() {
        for packer in Packer::ALL {
            let plan = packer
                .compute_placement_plan(1, &ShapeInputs::for_viewport(ViewportClass::Laptop))
                .unwrap();
            let only = plan.assignments[0];
            assert_eq!(
                only,
                CellAssignment::new(1, plan.shape.rows, 1, plan.shape.cols),
                "{}",
                packer
            );
        }
    }

    #[test]
    fn test_uniform_above_ceiling_is_flagged() {
        let result = Packer::UniformGrid.compute_placement_plan(37, &ShapeInputs::default());
        assert!(matches!(
            result,
            Err(LayoutError::CapacityViolation { count: 37, .. })
        ));
    }

    #[test]
    fn test_zero_photos_gives_empty_plan() {
        for packer in Packer::ALL {
            let plan = packer
                .compute_placement_plan(0, &ShapeInputs::default())
                .unwrap();
            assert!(plan.is_empty());
            assert_eq!(plan.shape.layout_class, LayoutClass::Empty);
        }
    }

    #[test]
    fn test_packer_parse_and_display() {
        assert_eq!("fixed".parse::<Packer>(), Ok(Packer::FixedStepGrid));
        assert_eq!("mosaic".parse::<Packer>(), Ok(Packer::Mosaic));
        assert_eq!("masonry".parse::<Packer>(), Err(()));
        assert_eq!(Packer::UniformGrid.to_string(), "uniform");
        assert_eq!(Packer::UniformGrid.ceiling(), Some(36));
        assert_eq!(Packer::Mosaic.ceiling(), None);
    }
}
