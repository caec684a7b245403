use crate::{
    error::RenderError,
    vec3::{Color, Float},
};
use image::RgbImage;
use log::info;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Row-major grid of gamma-encoded colors with channels in [0, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

/// Quantize a [0, 1] channel to a byte.
pub fn to_byte(channel: Float) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.999) as u8
}

impl Image {
    /// `pixels` must hold exactly `width * height` colors, top row first.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self, RenderError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(RenderError::PixelCount {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Image {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.pixels.chunks(self.width as usize)
    }

    /// Plain-text PPM (P3) with 8-bit channels.
    pub fn write_ppm(&self, writer: impl Write) -> std::io::Result<()> {
        let mut buf_writer = BufWriter::new(writer);

        // Write header metadata necessary for PPM file:
        writeln!(buf_writer, "P3\n{} {}\n255", self.width, self.height)?;
        for row in self.rows() {
            let line = row
                .iter()
                .map(|c| format!("{} {} {}", to_byte(c.x), to_byte(c.y), to_byte(c.z)))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(buf_writer, "{line}")?;
        }
        buf_writer.flush()
    }

    pub fn to_rgb8(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let c = self.get(x, y);
            image::Rgb([to_byte(c.x), to_byte(c.y), to_byte(c.z)])
        })
    }

    /// Writes the image, picking the encoding from the file extension.
    /// `.ppm` goes through the plain-text writer, everything else through the `image` crate.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        let is_ppm = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));
        if is_ppm {
            self.write_ppm(File::create(path)?)?;
        } else {
            self.to_rgb8().save(path)?;
        }
        info!("wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}
