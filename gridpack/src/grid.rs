use std::{fmt, str::FromStr};

use regex::Regex;
use thiserror::Error;

use crate::geometry::Size;

/// How big each cell of the grid should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSpec {
    /// Use the largest width and the largest height across all inputs.
    Auto,

    /// Use an explicit cell size, regardless of how big the inputs are.
    Fixed(Size),
}

impl GridSpec {
    /// Turns this spec into a concrete cell size for the given inputs.
    ///
    /// Returns `None` for `Auto` when there are no inputs to measure.
    pub fn resolve(&self, sizes: &[Size]) -> Option<Size> {
        match self {
            GridSpec::Auto => {
                let width = sizes.iter().map(|size| size.width).max()?;
                let height = sizes.iter().map(|size| size.height).max()?;

                Some(Size::new(width, height))
            }
            GridSpec::Fixed(size) => Some(*size),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid grid value {value:?}, expected 'auto' or WIDTH:HEIGHT (for example 32:32)")]
pub struct GridSpecError {
    value: String,
}

impl FromStr for GridSpec {
    type Err = GridSpecError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        lazy_static::lazy_static! {
            static ref SIZE_PATTERN: Regex = Regex::new(r"^(\d+):(\d+)$").unwrap();
        }

        if value == "auto" {
            return Ok(GridSpec::Auto);
        }

        let invalid = || GridSpecError {
            value: value.to_owned(),
        };

        let captures = SIZE_PATTERN.captures(value).ok_or_else(invalid)?;

        // The pattern guarantees digits, but they can still overflow a u32.
        let width = captures[1].parse().map_err(|_| invalid())?;
        let height = captures[2].parse().map_err(|_| invalid())?;

        Ok(GridSpec::Fixed(Size::new(width, height)))
    }
}

impl fmt::Display for GridSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GridSpec::Auto => write!(f, "auto"),
            GridSpec::Fixed(size) => write!(f, "{}:{}", size.width, size.height),
        }
    }
}
