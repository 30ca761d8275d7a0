pub mod boundary;

pub use boundary::{buffer_boundary, BoundaryMask, CellBoundary, EdgePolicy};
