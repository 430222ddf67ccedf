use std::path::PathBuf;

use gridpack::GridSpec;
use image::Rgba;
use structopt::StructOpt;

use crate::{color::parse_color, image::ColorMode};

/// Everything a single run needs, parsed fresh from the command line.
///
/// Values are validated while parsing, so a bad `--grid` or `--mode` is
/// reported before any input image is touched.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "css-sprite",
    about = "Combine images into a grid sprite sheet, optionally rendering CSS for it"
)]
pub struct Options {
    /// Paths to the images to include in the sprite, in order.
    ///
    /// Files are only opened after parsing, so one that is missing or can't
    /// be decoded fails the run with `Error: ...` and exit code 1 rather than
    /// a usage error.
    #[structopt(required = true, parse(from_os_str))]
    pub images: Vec<PathBuf>,

    /// Grid cell size to use. One of: auto, WIDTH:HEIGHT.
    ///
    /// 'auto' uses the largest width and height of all the images. Images
    /// bigger than an explicit cell size are drawn anyway and overlap their
    /// neighbors.
    #[structopt(long, short, default_value = "auto")]
    pub grid: GridSpec,

    /// Output file. The image format is picked from its extension.
    #[structopt(long, short, parse(from_os_str))]
    pub output: PathBuf,

    /// Color mode of the output image, like RGB or RGBA. Defaults to the mode
    /// of the first image.
    #[structopt(long, short)]
    pub mode: Option<ColorMode>,

    /// Stack the images vertically (they are stacked horizontally by
    /// default).
    #[structopt(long, short)]
    pub vertical: bool,

    /// Background color, as #RRGGBBAA hex or any CSS color name.
    #[structopt(long, short, default_value = "#00000000", parse(try_from_str = parse_color))]
    pub background: Rgba<u8>,

    /// Jinja template for CSS output on stdout.
    #[structopt(long, short, conflicts_with = "template-path")]
    pub template: Option<String>,

    /// Path to a Jinja template for CSS output on stdout.
    #[structopt(long, short = "p", parse(from_os_str))]
    pub template_path: Option<PathBuf>,

    /// Print the parsed arguments and progress to stderr.
    #[structopt(long)]
    pub verbose: bool,
}
