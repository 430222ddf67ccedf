//! Serializable description of a finished layout, meant to be handed to a
//! template engine.
//!
//! Field names here are part of the tool's public interface: templates refer
//! to them directly, so renaming one breaks every template that uses it.

use std::path::Path;

use serde::Serialize;

use crate::{
    geometry::{Position, Size},
    packer::Layout,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementReport {
    /// One record per input, in input order.
    pub images: Vec<ImageRecord>,

    /// Cell width. Kept at the top level alongside `height` because older
    /// templates read the cell size from there.
    pub width: u32,
    pub height: u32,

    pub cell_size: Size,
    pub grid_size: Size,
    pub count: usize,
    pub vertical: bool,
    pub output: OutputRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRecord {
    /// Zero-based position in the input list.
    pub index: usize,

    /// One-based position in the input list.
    pub count: usize,

    pub filename: String,

    /// Top-left corner of the cell, flattened.
    pub x: i64,
    pub y: i64,

    /// Centering offset within the cell, flattened.
    pub x_offset: i64,
    pub y_offset: i64,

    /// Where the image was actually drawn: cell corner plus offset.
    pub left: i64,
    pub top: i64,

    pub position: Position,
    pub offset: Position,
    pub size: Size,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    pub path: String,
    pub count: usize,
    pub width: u32,
    pub height: u32,
}

impl PlacementReport {
    /// Builds a report for `layout`. `filenames` holds one name per
    /// placement, in the same order the inputs were packed.
    ///
    /// # Panics
    /// Panics if there isn't exactly one filename per placement.
    pub fn new(layout: &Layout, filenames: &[String], output_path: &Path) -> Self {
        assert_eq!(
            filenames.len(),
            layout.placements().len(),
            "every placement needs exactly one filename"
        );

        let images: Vec<ImageRecord> = layout
            .placements()
            .iter()
            .map(|placement| {
                let slot = placement.slot();
                let offset = placement.offset();
                let drawn_at = placement.position();

                ImageRecord {
                    index: placement.index(),
                    count: placement.index() + 1,
                    filename: filenames[placement.index()].clone(),
                    x: slot.x,
                    y: slot.y,
                    x_offset: offset.x,
                    y_offset: offset.y,
                    left: drawn_at.x,
                    top: drawn_at.y,
                    position: slot,
                    offset,
                    size: placement.size(),
                }
            })
            .collect();

        let cell_size = layout.cell_size();
        let grid_size = layout.grid_size();
        let count = images.len();

        Self {
            images,
            width: cell_size.width,
            height: cell_size.height,
            cell_size,
            grid_size,
            count,
            vertical: layout.is_vertical(),
            output: OutputRecord {
                path: output_path.display().to_string(),
                count,
                width: grid_size.width,
                height: grid_size.height,
            },
        }
    }
}
