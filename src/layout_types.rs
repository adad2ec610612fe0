use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete bucket of screen width used by the responsive mosaic sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    Mobile,
    Tablet,
    Laptop,
    Desktop,
}

impl ViewportClass {
    /// Buckets a viewport width in CSS pixels
    pub fn from_width(width_px: u32) -> Self {
        match width_px {
            0..=767 => ViewportClass::Mobile,
            768..=1023 => ViewportClass::Tablet,
            1024..=1439 => ViewportClass::Laptop,
            _ => ViewportClass::Desktop,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewportClass::Mobile => "mobile",
            ViewportClass::Tablet => "tablet",
            ViewportClass::Laptop => "laptop",
            ViewportClass::Desktop => "desktop",
        }
    }
}

impl Default for ViewportClass {
    fn default() -> Self {
        ViewportClass::Desktop
    }
}

impl FromStr for ViewportClass {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile" => Ok(ViewportClass::Mobile),
            "tablet" => Ok(ViewportClass::Tablet),
            "laptop" => Ok(ViewportClass::Laptop),
            "desktop" => Ok(ViewportClass::Desktop),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ViewportClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Styling tag attached to a shape. Never used for placement math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutClass {
    Empty,
    Single,
    Duo,
    Trio,
    Grid,
    Mosaic,
    MosaicDense,
}

impl LayoutClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutClass::Empty => "empty",
            LayoutClass::Single => "single",
            LayoutClass::Duo => "duo",
            LayoutClass::Trio => "trio",
            LayoutClass::Grid => "grid",
            LayoutClass::Mosaic => "mosaic",
            LayoutClass::MosaicDense => "mosaic-dense",
        }
    }
}

impl fmt::Display for LayoutClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target canvas description in grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerShape {
    pub rows: u32,
    pub cols: u32,
    pub layout_class: LayoutClass,
}

impl ContainerShape {
    pub fn new(rows: u32, cols: u32, layout_class: LayoutClass) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
            layout_class,
        }
    }

    pub fn square(grid_size: u32, layout_class: LayoutClass) -> Self {
        Self::new(grid_size, grid_size, layout_class)
    }

    pub fn capacity(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }
}

/// One photo's rectangle in 1-based grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellAssignment {
    pub row_start: u32,
    pub row_span: u32,
    pub col_start: u32,
    pub col_span: u32,
}

impl CellAssignment {
    pub fn new(row_start: u32, row_span: u32, col_start: u32, col_span: u32) -> Self {
        Self {
            row_start,
            row_span,
            col_start,
            col_span,
        }
    }

    /// Single cell at `(row, col)`
    pub fn cell(row: u32, col: u32) -> Self {
        Self::new(row, 1, col, 1)
    }

    pub fn row(&self) -> u32 {
        self.row_start
    }

    pub fn col(&self) -> u32 {
        self.col_start
    }

    /// Last occupied row (inclusive)
    pub fn row_end(&self) -> u32 {
        self.row_start.saturating_add(self.row_span).saturating_sub(1)
    }

    /// Last occupied column (inclusive)
    pub fn col_end(&self) -> u32 {
        self.col_start.saturating_add(self.col_span).saturating_sub(1)
    }

    pub fn area(&self) -> usize {
        self.row_span as usize * self.col_span as usize
    }

    pub fn intersects(&self, other: &CellAssignment) -> bool {
        self.row_start <= other.row_end()
            && other.row_start <= self.row_end()
            && self.col_start <= other.col_end()
            && other.col_start <= self.col_end()
    }

    pub fn fits_within(&self, shape: &ContainerShape) -> bool {
        let last = |start: u32, span: u32| start as u64 + span as u64 - 1;
        self.row_start >= 1
            && self.col_start >= 1
            && self.row_span >= 1
            && self.col_span >= 1
            && last(self.row_start, self.row_span) <= shape.rows as u64
            && last(self.col_start, self.col_span) <= shape.cols as u64
    }

    /// Iterates every `(row, col)` the rectangle covers
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.row_start..=self.row_end())
            .flat_map(move |row| (self.col_start..=self.col_end()).map(move |col| (row, col)))
    }
}

impl fmt::Display for CellAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{}) {}x{}",
            self.row_start, self.col_start, self.row_span, self.col_span
        )
    }
}

/// Ordered cell assignments, index-aligned with the photo collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementPlan {
    pub shape: ContainerShape,
    pub assignments: Vec<CellAssignment>,
}

impl PlacementPlan {
    pub fn empty() -> Self {
        Self {
            shape: ContainerShape::new(1, 1, LayoutClass::Empty),
            assignments: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CellAssignment> {
        self.assignments.get(index)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Named span shape used by the mosaic placer to vary visual rhythm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Large,
    Wide,
    Tall,
    Medium,
    Small,
}

impl SizeClass {
    /// Cycle order for the mosaic placer
    pub const CYCLE: [SizeClass; 5] = [
        SizeClass::Large,
        SizeClass::Wide,
        SizeClass::Tall,
        SizeClass::Medium,
        SizeClass::Small,
    ];

    /// `(row_span, col_span)`
    pub fn span(self) -> (u32, u32) {
        match self {
            SizeClass::Large => (2, 2),
            SizeClass::Wide => (1, 3),
            SizeClass::Tall => (3, 1),
            SizeClass::Medium => (1, 2),
            SizeClass::Small => (1, 1),
        }
    }

    pub fn for_sequence_index(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Large => "large",
            SizeClass::Wide => "wide",
            SizeClass::Tall => "tall",
            SizeClass::Medium => "medium",
            SizeClass::Small => "small",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Capacity violation: {strategy} grid holds {capacity} cells but {count} photos were requested")]
    CapacityViolation {
        count: usize,
        capacity: usize,
        strategy: &'static str,
    },
    #[error("Plan has {actual} assignments for {expected} photos")]
    AssignmentCountMismatch { expected: usize, actual: usize },
    #[error("Assignment {index} lies outside the grid")]
    OutOfBounds { index: usize },
    #[error("Assignments {first} and {second} overlap")]
    OverlappingCells { first: usize, second: usize },
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),
}

pub type LayoutResult<T> = Result<T, LayoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_class_from_width() {
        assert_eq!(ViewportClass::from_width(375), ViewportClass::Mobile);
        assert_eq!(ViewportClass::from_width(768), ViewportClass::Tablet);
        assert_eq!(ViewportClass::from_width(1280), ViewportClass::Laptop);
        assert_eq!(ViewportClass::from_width(1920), ViewportClass::Desktop);
    }

    #[test]
    fn test_viewport_class_parse() {
        assert_eq!("tablet".parse::<ViewportClass>(), Ok(ViewportClass::Tablet));
        assert_eq!("tv".parse::<ViewportClass>(), Err(()));
        assert_eq!(format!("{}", ViewportClass::Laptop), "laptop");
    }

    #[test]
    fn test_intersects() {
        let large = CellAssignment::new(1, 2, 1, 2);
        assert!(large.intersects(&CellAssignment::cell(2, 2)));
        assert!(!large.intersects(&CellAssignment::cell(1, 3)));
        assert!(!large.intersects(&CellAssignment::cell(3, 1)));
        assert!(CellAssignment::new(1, 3, 4, 1).intersects(&CellAssignment::new(2, 1, 3, 2)));
    }

    #[test]
    fn test_fits_within() {
        let shape = ContainerShape::square(4, LayoutClass::Mosaic);
        assert!(CellAssignment::new(3, 2, 3, 2).fits_within(&shape));
        assert!(!CellAssignment::new(1, 1, 2, 3).fits_within(&shape));
        assert!(!CellAssignment::cell(0, 1).fits_within(&shape));
        assert!(!CellAssignment::new(1, 0, 1, 1).fits_within(&shape));
    }

    #[test]
    fn test_huge_spans_do_not_overflow() {
        let shape = ContainerShape::square(2, LayoutClass::Grid);
        let far = CellAssignment::new(u32::MAX, 2, 1, 1);
        assert!(!far.fits_within(&shape));
        assert_eq!(far.row_end(), u32::MAX - 1);
        assert!(!CellAssignment::new(1, 1, 2, u32::MAX).fits_within(&shape));
    }

    #[test]
    fn test_cells_enumeration() {
        let cells: Vec<_> = CellAssignment::new(2, 2, 3, 1).cells().collect();
        assert_eq!(cells, vec![(2, 3), (3, 3)]);
    }

    #[test]
    fn test_size_class_cycle() {
        assert_eq!(SizeClass::for_sequence_index(0), SizeClass::Large);
        assert_eq!(SizeClass::for_sequence_index(1), SizeClass::Wide);
        assert_eq!(SizeClass::for_sequence_index(5), SizeClass::Large);
        assert_eq!(SizeClass::Tall.span(), (3, 1));
    }

    #[test]
    fn test_plan_serializes_with_kebab_case_class() {
        let plan = PlacementPlan {
            shape: ContainerShape::square(3, LayoutClass::MosaicDense),
            assignments: vec![CellAssignment::cell(1, 1)],
        };
        let json = plan.to_json().unwrap();
        assert!(json.contains("\"mosaic-dense\""));
        assert!(json.contains("\"row_span\":1"));
    }
}
