//! Gridpack is a small library for laying out images in a uniform grid. It was
//! built for css-sprite, a tool that stitches images into a single sprite
//! sheet and describes where each image ended up.
//!
//! Every input is given one cell of the same size. Cells are arranged in a
//! single row, or a single column when packing vertically, and each input is
//! centered inside its cell. Inputs larger than their cell are never scaled
//! or rejected; they get a negative offset and spill into neighboring cells.
//!
//! Gridpack never touches pixels. It only computes where things go, and can
//! turn that into a [`PlacementReport`][PlacementReport] that a template
//! engine can consume.
//!
//! ## Example
//! ```
//! use gridpack::{GridPacker, GridSpec, Size};
//!
//! let sizes = vec![Size::new(10, 10), Size::new(20, 30), Size::new(4, 4)];
//!
//! // The cell size is derived from the largest input on each axis.
//! let layout = GridPacker::new(GridSpec::Auto).pack(sizes).unwrap();
//!
//! assert_eq!(layout.cell_size(), Size::new(20, 30));
//! assert_eq!(layout.grid_size(), Size::new(60, 30));
//! ```
//!
//! [PlacementReport]: struct.PlacementReport.html

mod geometry;
mod grid;
mod packer;
mod report;

pub use geometry::*;
pub use grid::*;
pub use packer::*;
pub use report::*;
