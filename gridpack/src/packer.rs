use std::convert::TryFrom;

use thiserror::Error;

use crate::{
    geometry::{Position, Size},
    grid::GridSpec,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    #[error("at least one item is needed to build a grid")]
    NoItems,

    #[error("a grid of {count} cells of size {cell_size} is too large")]
    GridTooLarge { cell_size: Size, count: usize },
}

/// Where a single input ended up in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub(crate) index: usize,
    pub(crate) slot: Position,
    pub(crate) offset: Position,
    pub(crate) size: Size,
}

impl Placement {
    /// The index of the input this placement corresponds to.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The top-left corner of the cell this input was assigned.
    #[inline]
    pub fn slot(&self) -> Position {
        self.slot
    }

    /// The translation from the cell's corner that centers the input in it.
    /// Negative on any axis where the input is larger than the cell.
    #[inline]
    pub fn offset(&self) -> Position {
        self.offset
    }

    /// Where the top-left corner of the input should be drawn.
    #[inline]
    pub fn position(&self) -> Position {
        self.slot + self.offset
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }
}

/// The result of laying out a set of inputs in a grid.
#[derive(Debug, Clone)]
pub struct Layout {
    pub(crate) cell_size: Size,
    pub(crate) grid_size: Size,
    pub(crate) vertical: bool,
    pub(crate) placements: Vec<Placement>,
}

impl Layout {
    #[inline]
    pub fn cell_size(&self) -> Size {
        self.cell_size
    }

    /// The size of the whole grid, which is the size the output image needs
    /// to be.
    #[inline]
    pub fn grid_size(&self) -> Size {
        self.grid_size
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    /// One placement per input, in the same order the inputs were given.
    #[inline]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }
}

/// Lays out inputs in a single row or column of equally-sized cells.
#[derive(Debug, Clone)]
pub struct GridPacker {
    spec: GridSpec,
    vertical: bool,
}

impl GridPacker {
    pub fn new(spec: GridSpec) -> Self {
        Self {
            spec,
            vertical: false,
        }
    }

    /// Stack cells top-to-bottom instead of left-to-right.
    pub fn vertical(self, vertical: bool) -> Self {
        Self { vertical, ..self }
    }

    pub fn pack<I>(&self, items: I) -> Result<Layout, PackError>
    where
        I: IntoIterator,
        I::Item: Into<Size>,
    {
        let sizes: Vec<Size> = items.into_iter().map(Into::into).collect();
        let count = sizes.len();

        let cell_size = self.spec.resolve(&sizes).ok_or(PackError::NoItems)?;
        if count == 0 {
            return Err(PackError::NoItems);
        }

        log::trace!(
            "Packing {} items into cells of size {} ({})",
            count,
            cell_size,
            self.spec
        );

        let too_large = || PackError::GridTooLarge { cell_size, count };
        let count_u32 = u32::try_from(count).map_err(|_| too_large())?;

        let grid_size = if self.vertical {
            let height = cell_size.height.checked_mul(count_u32).ok_or_else(too_large)?;
            Size::new(cell_size.width, height)
        } else {
            let width = cell_size.width.checked_mul(count_u32).ok_or_else(too_large)?;
            Size::new(width, cell_size.height)
        };

        let cell_width = i64::from(cell_size.width);
        let cell_height = i64::from(cell_size.height);

        let placements = sizes
            .iter()
            .enumerate()
            .map(|(index, &size)| {
                let step = index as i64;
                let slot = if self.vertical {
                    Position::new(0, step * cell_height)
                } else {
                    Position::new(step * cell_width, 0)
                };

                // Floor division, so odd negative differences round towards
                // the top-left like they do for positive ones.
                let offset = Position::new(
                    (cell_width - i64::from(size.width)).div_euclid(2),
                    (cell_height - i64::from(size.height)).div_euclid(2),
                );

                if offset.x < 0 || offset.y < 0 {
                    log::debug!(
                        "Item {} ({}) is larger than its cell ({}) and will overflow it",
                        index,
                        size,
                        cell_size
                    );
                }

                Placement {
                    index,
                    slot,
                    offset,
                    size,
                }
            })
            .collect();

        log::trace!("Finished packing {} items into a {} grid", count, grid_size);

        Ok(Layout {
            cell_size,
            grid_size,
            vertical: self.vertical,
            placements,
        })
    }
}
