pub mod engine;
pub mod geometry;
pub mod offsets;

pub use engine::{anchor_row, layout, sub_branch_span, Column, Layout, Placement};
pub use geometry::{Geometry, Point};
pub use offsets::OffsetAllocator;
