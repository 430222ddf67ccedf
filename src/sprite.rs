use std::{
    io::{self, Write},
    path::Path,
};

use gridpack::{GridPacker, GridSpec, PackError, PlacementReport};
use image::Rgba;
use thiserror::Error;

use crate::{
    image::{Canvas, ColorMode, SourceImage, SpriteImageError},
    options::Options,
    template::{self, TemplateSource},
};

#[derive(Debug, Error)]
pub enum SpriteError {
    #[error(transparent)]
    Pack(#[from] PackError),

    #[error(transparent)]
    Image(#[from] SpriteImageError),
}

/// Lays `images` out in a grid and draws them onto a fresh canvas.
///
/// The canvas uses `mode` if one is given, otherwise the mode of the first
/// image. Images are drawn in order, so where large images overflow their
/// cells, later images are drawn on top of earlier ones.
pub fn pack(
    images: &[SourceImage],
    spec: GridSpec,
    vertical: bool,
    mode: Option<ColorMode>,
    background: Rgba<u8>,
    output_path: &Path,
) -> Result<(Canvas, PlacementReport), SpriteError> {
    let first = images.first().ok_or(PackError::NoItems)?;
    let mode = mode.unwrap_or_else(|| first.mode());

    let layout = GridPacker::new(spec)
        .vertical(vertical)
        .pack(images.iter().map(SourceImage::size))?;

    log::info!(
        "Packing {} images into {} cells, {} grid",
        images.len(),
        layout.cell_size(),
        layout.grid_size()
    );

    let mut canvas = Canvas::new(mode, layout.grid_size(), background)?;

    for (image, placement) in images.iter().zip(layout.placements()) {
        log::debug!(
            "Drawing {} at {:?} (cell {:?}, offset {:?})",
            image.filename(),
            placement.position(),
            placement.slot(),
            placement.offset()
        );

        canvas.paste(image, placement.position());
    }

    let filenames: Vec<String> = images.iter().map(SourceImage::filename).collect();
    let report = PlacementReport::new(&layout, &filenames, output_path);

    Ok((canvas, report))
}

pub fn run(options: Options) -> anyhow::Result<()> {
    log::info!("{:#?}", options);

    // Every input is decoded up front so a bad file stops the run before
    // anything is drawn or written.
    let images = options
        .images
        .iter()
        .map(|path| SourceImage::open(path))
        .collect::<Result<Vec<_>, _>>()?;

    let (canvas, report) = pack(
        &images,
        options.grid,
        options.vertical,
        options.mode,
        options.background,
        &options.output,
    )?;

    log::debug!("Placement report: {}", serde_json::to_string_pretty(&report)?);

    // The template is rendered before the canvas is saved, so a broken
    // template means no output file.
    if let Some(source) = TemplateSource::from_options(options.template, options.template_path) {
        let rendered = template::render(&source, &report)?;

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", rendered)?;
        handle.flush()?;
    }

    canvas.save(&options.output)?;

    log::info!(
        "Wrote {} {} sprite to {}",
        canvas.size(),
        canvas.mode(),
        options.output.display()
    );

    Ok(())
}
