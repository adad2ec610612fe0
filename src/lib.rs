pub mod camera;
pub mod collage_renderer;
pub mod config;
pub mod exporter;
pub mod grid_placer;
pub mod layout_types;
pub mod mosaic_placer;
pub mod packer;
pub mod photo;
pub mod photo_collection;
pub mod plan_validator;
pub mod session;
pub mod size_class_selector;

pub use layout_types::{
    CellAssignment, ContainerShape, LayoutClass, LayoutError, PlacementPlan, SizeClass,
    ViewportClass,
};
pub use packer::{compute_placement_plan, Packer, ShapeInputs};
pub use photo::{Orientation, Photo, PhotoId};
pub use session::{CollageSession, SessionError};
