//! Simple containers for decoded input images and the sprite sheet canvas
//! they get drawn onto. Decoding, encoding, and blending are all done by the
//! `image` crate.

use std::{
    convert::TryFrom,
    fmt,
    io::{self, BufReader, BufWriter, Write},
    mem,
    path::{Path, PathBuf},
    str::FromStr,
};

use fs_err as fs;
use gridpack::{Position, Size};
use image::{
    imageops, io::Reader as ImageReader, ColorType, DynamicImage, GenericImageView, ImageFormat,
    Rgba, Rgba32FImage, RgbaImage,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpriteImageError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("couldn't decode image {}", .path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("couldn't encode image {}", .path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("a {size} sprite sheet is too large to allocate")]
    CanvasTooLarge { size: Size },
}

/// The channel layout and sample depth of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    L8,
    La8,
    Rgb8,
    Rgba8,
    L16,
    La16,
    Rgb16,
    Rgba16,
    Rgb32F,
    Rgba32F,
}

static MODE_NAMES: &[(&str, ColorMode)] = &[
    ("L", ColorMode::L8),
    ("LA", ColorMode::La8),
    ("RGB", ColorMode::Rgb8),
    ("RGBA", ColorMode::Rgba8),
    ("L16", ColorMode::L16),
    ("LA16", ColorMode::La16),
    ("RGB16", ColorMode::Rgb16),
    ("RGBA16", ColorMode::Rgba16),
    ("RGB32F", ColorMode::Rgb32F),
    ("RGBA32F", ColorMode::Rgba32F),
];

impl ColorMode {
    pub fn from_color_type(color: ColorType) -> Self {
        match color {
            ColorType::L8 => ColorMode::L8,
            ColorType::La8 => ColorMode::La8,
            ColorType::Rgb8 => ColorMode::Rgb8,
            ColorType::Rgba8 => ColorMode::Rgba8,
            ColorType::L16 => ColorMode::L16,
            ColorType::La16 => ColorMode::La16,
            ColorType::Rgb16 => ColorMode::Rgb16,
            ColorType::Rgba16 => ColorMode::Rgba16,
            ColorType::Rgb32F => ColorMode::Rgb32F,
            ColorType::Rgba32F => ColorMode::Rgba32F,
            other => {
                log::warn!("Unrecognized color type {:?}, treating it as RGBA", other);
                ColorMode::Rgba8
            }
        }
    }

    pub fn name(self) -> &'static str {
        MODE_NAMES
            .iter()
            .find(|(_, mode)| *mode == self)
            .map(|(name, _)| *name)
            .unwrap_or("RGBA")
    }

    /// Whether every channel of this mode fits in a byte.
    fn is_8_bit(self) -> bool {
        matches!(
            self,
            ColorMode::L8 | ColorMode::La8 | ColorMode::Rgb8 | ColorMode::Rgba8
        )
    }

    fn convert(self, image: DynamicImage) -> DynamicImage {
        match self {
            ColorMode::L8 => DynamicImage::ImageLuma8(image.into_luma8()),
            ColorMode::La8 => DynamicImage::ImageLumaA8(image.into_luma_alpha8()),
            ColorMode::Rgb8 => DynamicImage::ImageRgb8(image.into_rgb8()),
            ColorMode::Rgba8 => DynamicImage::ImageRgba8(image.into_rgba8()),
            ColorMode::L16 => DynamicImage::ImageLuma16(image.into_luma16()),
            ColorMode::La16 => DynamicImage::ImageLumaA16(image.into_luma_alpha16()),
            ColorMode::Rgb16 => DynamicImage::ImageRgb16(image.into_rgb16()),
            ColorMode::Rgba16 => DynamicImage::ImageRgba16(image.into_rgba16()),
            ColorMode::Rgb32F => DynamicImage::ImageRgb32F(image.into_rgb32f()),
            ColorMode::Rgba32F => DynamicImage::ImageRgba32F(image.into_rgba32f()),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(value: &str) -> Result<ColorMode, Self::Err> {
        MODE_NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(value))
            .map(|(_, mode)| *mode)
            .ok_or_else(|| {
                let valid: Vec<_> = MODE_NAMES.iter().map(|(name, _)| *name).collect();
                format!(
                    "Invalid color mode '{}'. Valid options are {}.",
                    value,
                    valid.join(", ")
                )
            })
    }
}

/// An input image, decoded and ready to be drawn.
#[derive(Debug, Clone)]
pub struct SourceImage {
    path: PathBuf,
    image: DynamicImage,
}

impl SourceImage {
    pub fn open(path: &Path) -> Result<Self, SpriteImageError> {
        log::debug!("Decoding {}", path.display());

        let file = BufReader::new(fs::File::open(path)?);
        let image = ImageReader::new(file)
            .with_guessed_format()?
            .decode()
            .map_err(|source| SpriteImageError::Decode {
                path: path.to_owned(),
                source,
            })?;

        Ok(Self::new(path, image))
    }

    pub fn new<P: Into<PathBuf>>(path: P, image: DynamicImage) -> Self {
        Self {
            path: path.into(),
            image,
        }
    }

    pub fn size(&self) -> Size {
        self.image.dimensions().into()
    }

    pub fn mode(&self) -> ColorMode {
        ColorMode::from_color_type(self.image.color())
    }

    /// The path this image was opened from, as the user gave it.
    pub fn filename(&self) -> String {
        self.path.display().to_string()
    }
}

/// The sprite sheet being drawn.
///
/// Drawing happens in RGBA, and the result is only converted to the
/// requested mode when it's written out. That way inputs of any mode can be
/// mixed. 8-bit modes are drawn at 4 bytes per pixel. Deeper modes are drawn
/// in f32 at 16 bytes per pixel, so a 16-bit or float sheet needs four times
/// the memory of an 8-bit one of the same size.
#[derive(Debug, Clone)]
pub struct Canvas {
    mode: ColorMode,
    pixels: Pixels,
}

#[derive(Debug, Clone)]
enum Pixels {
    Rgba8(RgbaImage),
    Rgba32F(Rgba32FImage),
}

impl Canvas {
    /// Allocates a canvas filled with `background`. Fails instead of
    /// panicking when the pixel buffer would be too large to address.
    pub fn new(
        mode: ColorMode,
        size: Size,
        background: Rgba<u8>,
    ) -> Result<Self, SpriteImageError> {
        let sample_size = if mode.is_8_bit() {
            mem::size_of::<u8>()
        } else {
            mem::size_of::<f32>()
        };

        let buffer_len = u64::from(size.width)
            .checked_mul(u64::from(size.height))
            .and_then(|pixels| pixels.checked_mul(4 * sample_size as u64))
            .and_then(|bytes| isize::try_from(bytes).ok());

        if buffer_len.is_none() {
            return Err(SpriteImageError::CanvasTooLarge { size });
        }

        let pixels = if mode.is_8_bit() {
            Pixels::Rgba8(RgbaImage::from_pixel(size.width, size.height, background))
        } else {
            let fill = Rgba(background.0.map(|channel| f32::from(channel) / 255.0));
            Pixels::Rgba32F(Rgba32FImage::from_pixel(size.width, size.height, fill))
        };

        Ok(Self { mode, pixels })
    }

    pub fn size(&self) -> Size {
        match &self.pixels {
            Pixels::Rgba8(pixels) => pixels.dimensions().into(),
            Pixels::Rgba32F(pixels) => pixels.dimensions().into(),
        }
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Draws `source` with its top-left corner at `position`, blending it
    /// with whatever is already there according to its alpha channel.
    /// Images without alpha overwrite the canvas. Anything that lands outside
    /// of the canvas is dropped.
    pub fn paste(&mut self, source: &SourceImage, position: Position) {
        match &mut self.pixels {
            Pixels::Rgba8(pixels) => {
                imageops::overlay(pixels, &source.image.to_rgba8(), position.x, position.y)
            }
            Pixels::Rgba32F(pixels) => {
                imageops::overlay(pixels, &source.image.to_rgba32f(), position.x, position.y)
            }
        }
    }

    /// The finished canvas, converted to its color mode.
    pub fn to_image(&self) -> DynamicImage {
        let drawn = match &self.pixels {
            Pixels::Rgba8(pixels) => DynamicImage::ImageRgba8(pixels.clone()),
            Pixels::Rgba32F(pixels) => DynamicImage::ImageRgba32F(pixels.clone()),
        };

        self.mode.convert(drawn)
    }

    /// Encodes the canvas to `path`, picking the format from its extension.
    pub fn save(&self, path: &Path) -> Result<(), SpriteImageError> {
        let encode_error = |source| SpriteImageError::Encode {
            path: path.to_owned(),
            source,
        };

        let format = ImageFormat::from_path(path).map_err(encode_error)?;
        let image = self.to_image();

        log::debug!(
            "Writing {} {} image to {}",
            self.size(),
            self.mode,
            path.display()
        );

        let mut writer = BufWriter::new(fs::File::create(path)?);
        image.write_to(&mut writer, format).map_err(encode_error)?;
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use image::{GrayImage, Luma, RgbImage, RgbaImage};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn solid(size: (u32, u32), color: Rgba<u8>) -> SourceImage {
        SourceImage::new(
            "solid.png",
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(size.0, size.1, color)),
        )
    }

    fn pixel(canvas: &Canvas, x: u32, y: u32) -> Rgba<u8> {
        *canvas.to_image().to_rgba8().get_pixel(x, y)
    }

    #[test]
    fn parse_modes() {
        assert_eq!("RGBA".parse::<ColorMode>(), Ok(ColorMode::Rgba8));
        assert_eq!("rgb".parse::<ColorMode>(), Ok(ColorMode::Rgb8));
        assert_eq!("L".parse::<ColorMode>(), Ok(ColorMode::L8));
        assert_eq!("la16".parse::<ColorMode>(), Ok(ColorMode::La16));
    }

    #[test]
    fn parse_unknown_mode_lists_options() {
        let err = "CMYK".parse::<ColorMode>().unwrap_err();

        assert!(err.contains("'CMYK'"));
        assert!(err.contains("L, LA, RGB, RGBA"));
    }

    #[test]
    fn mode_of_source() {
        let gray = SourceImage::new("g.png", DynamicImage::ImageLuma8(GrayImage::new(2, 2)));
        let rgb = SourceImage::new("c.png", DynamicImage::ImageRgb8(RgbImage::new(2, 2)));

        assert_eq!(gray.mode(), ColorMode::L8);
        assert_eq!(rgb.mode(), ColorMode::Rgb8);
        assert_eq!(rgb.size(), Size::new(2, 2));
        assert_eq!(rgb.filename(), "c.png");
    }

    #[test]
    fn new_canvas_is_background() {
        let background = Rgba([1, 2, 3, 4]);
        let canvas = Canvas::new(ColorMode::Rgba8, Size::new(3, 2), background).unwrap();

        assert_eq!(canvas.size(), Size::new(3, 2));
        assert_eq!(pixel(&canvas, 0, 0), Rgba([1, 2, 3, 4]));
        assert_eq!(pixel(&canvas, 2, 1), Rgba([1, 2, 3, 4]));
    }

    #[test]
    fn paste_opaque() {
        let mut canvas = Canvas::new(ColorMode::Rgba8, Size::new(4, 4), CLEAR).unwrap();
        canvas.paste(&solid((2, 2), RED), Position::new(1, 1));

        assert_eq!(pixel(&canvas, 0, 0), CLEAR);
        assert_eq!(pixel(&canvas, 1, 1), RED);
        assert_eq!(pixel(&canvas, 2, 2), RED);
        assert_eq!(pixel(&canvas, 3, 3), CLEAR);
    }

    #[test]
    fn paste_transparent_keeps_background() {
        let white = Rgba([255, 255, 255, 255]);
        let mut canvas = Canvas::new(ColorMode::Rgba8, Size::new(2, 2), white).unwrap();
        canvas.paste(&solid((2, 2), CLEAR), Position::new(0, 0));

        assert_eq!(pixel(&canvas, 0, 0), white);
    }

    #[test]
    fn paste_without_alpha_overwrites() {
        let mut canvas = Canvas::new(ColorMode::Rgba8, Size::new(2, 2), CLEAR).unwrap();
        let gray = SourceImage::new(
            "g.png",
            DynamicImage::ImageLuma8(GrayImage::from_pixel(1, 1, Luma([200]))),
        );
        canvas.paste(&gray, Position::new(1, 0));

        assert_eq!(pixel(&canvas, 1, 0), Rgba([200, 200, 200, 255]));
        assert_eq!(pixel(&canvas, 0, 0), CLEAR);
    }

    #[test]
    fn paste_negative_is_clipped() {
        let mut canvas = Canvas::new(ColorMode::Rgba8, Size::new(3, 3), CLEAR).unwrap();
        canvas.paste(&solid((3, 3), RED), Position::new(-2, -2));

        assert_eq!(pixel(&canvas, 0, 0), RED);
        assert_eq!(pixel(&canvas, 1, 0), CLEAR);
        assert_eq!(pixel(&canvas, 0, 1), CLEAR);
    }

    #[test]
    fn paste_past_edge_is_clipped() {
        let mut canvas = Canvas::new(ColorMode::Rgba8, Size::new(3, 3), CLEAR).unwrap();
        canvas.paste(&solid((4, 4), RED), Position::new(2, 2));

        assert_eq!(pixel(&canvas, 2, 2), RED);
        assert_eq!(pixel(&canvas, 1, 1), CLEAR);
    }

    #[test]
    fn converts_to_mode() {
        let white = Rgba([255, 255, 255, 255]);
        let canvas = Canvas::new(ColorMode::L8, Size::new(1, 1), white).unwrap();
        let image = canvas.to_image();

        assert_eq!(image.color(), ColorType::L8);
        assert_eq!(image.to_luma8().get_pixel(0, 0), &Luma([255]));
    }

    #[test]
    fn deep_modes_draw_in_float() {
        let mut canvas = Canvas::new(ColorMode::Rgba16, Size::new(2, 1), CLEAR).unwrap();
        canvas.paste(&solid((1, 1), RED), Position::new(1, 0));

        assert!(matches!(canvas.pixels, Pixels::Rgba32F(_)));
        assert_eq!(canvas.to_image().color(), ColorType::Rgba16);
        assert_eq!(pixel(&canvas, 0, 0), CLEAR);
        assert_eq!(pixel(&canvas, 1, 0), RED);
    }

    #[test]
    fn byte_modes_draw_in_bytes() {
        for &mode in &[ColorMode::L8, ColorMode::La8, ColorMode::Rgb8, ColorMode::Rgba8] {
            let canvas = Canvas::new(mode, Size::new(1, 1), CLEAR).unwrap();
            assert!(matches!(canvas.pixels, Pixels::Rgba8(_)), "{} canvas", mode);
        }
    }

    #[test]
    fn huge_canvas_is_an_error() {
        let size = Size::new(u32::MAX, u32::MAX);

        for &mode in &[ColorMode::Rgba8, ColorMode::Rgba32F] {
            let err = Canvas::new(mode, size, CLEAR).unwrap_err();
            assert!(matches!(err, SpriteImageError::CanvasTooLarge { size: s } if s == size));
        }
    }

    #[test]
    fn save_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.png");

        let mut canvas = Canvas::new(ColorMode::Rgba8, Size::new(4, 2), CLEAR).unwrap();
        canvas.paste(&solid((2, 2), RED), Position::new(2, 0));
        canvas.save(&path).unwrap();

        let reopened = SourceImage::open(&path).unwrap();
        assert_eq!(reopened.size(), Size::new(4, 2));
        assert_eq!(reopened.mode(), ColorMode::Rgba8);
        assert_eq!(reopened.image.to_rgba8().get_pixel(3, 1), &RED);
    }

    #[test]
    fn save_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.notaformat");

        let canvas = Canvas::new(ColorMode::Rgba8, Size::new(1, 1), CLEAR).unwrap();
        let err = canvas.save(&path).unwrap_err();

        assert!(matches!(err, SpriteImageError::Encode { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn open_missing() {
        let err = SourceImage::open(Path::new("does/not/exist.png")).unwrap_err();
        assert!(matches!(err, SpriteImageError::Io(_)));
    }

    #[test]
    fn open_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = SourceImage::open(&path).unwrap_err();
        assert!(matches!(err, SpriteImageError::Decode { .. }));
    }
}
