//! Image primitives.
//!
//! Photos are decoded once into a lightweight owned RGB image (`OwnedImage`),
//! resized to the on-screen size, and then re-annotated on every redraw.
//! Keeping the pixels as plain `Color` values makes the hand-off to the GUI
//! (which wants tightly packed RGB bytes) a straight copy.

use std::path::Path;

use anyhow::{bail, Context, Result};

/// Owned RGB image (no alpha).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    width: u32,
    height: u32,
    data: Vec<Color>,
}

impl OwnedImage {
    /// A `width * height` image filled with a single color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            data: vec![color; (width as usize) * (height as usize)],
        }
    }

    /// Build an `OwnedImage` from tightly packed RGB bytes (`width * height * 3`).
    pub fn from_rgb(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let expected = (width as usize) * (height as usize) * 3;
        if bytes.len() != expected {
            bail!(
                "rgb buffer has {} bytes, expected {expected} for {width}x{height}",
                bytes.len()
            );
        }

        let data = bytes
            .chunks_exact(3)
            .map(|v| Color::new(v[0], v[1], v[2]))
            .collect::<Vec<_>>();

        Ok(Self { width, height, data })
    }

    /// Decode an image file (JPEG, PNG, ...) from disk. Alpha is discarded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("decode {}", path.display()))?
            .to_rgb8();
        Ok(Self::from_rgb_image(&img))
    }

    pub fn from_rgb_image(img: &image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let data = img
            .pixels()
            .map(|p| Color::new(p.0[0], p.0[1], p.0[2]))
            .collect::<Vec<_>>();

        Self { width, height, data }
    }

    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| self.data[self.index(x, y)].into())
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline(always)]
    fn index(&self, x: u32, y: u32) -> usize {
        (x + y * self.width) as usize
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[self.index(x, y)])
    }

    /// Tightly packed RGB bytes, row-major.
    pub fn get_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 3);
        for clr in &self.data {
            bytes.extend_from_slice(&[clr.r, clr.g, clr.b]);
        }
        bytes
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_rgb_image()
            .save_with_format(path, image::ImageFormat::Png)
            .context("save png")?;
        Ok(())
    }

    /// Resize this image to exactly `width * height` (aspect ratio is not kept).
    ///
    /// Uses `fast_image_resize` with a Lanczos3 convolution, which is what
    /// photo thumbnails want when shrinking by large factors.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            bail!("cannot resize to {width}x{height}");
        }
        if self.width == width && self.height == height {
            return Ok(());
        }

        // SAFETY: `Color` is `#[repr(C)]` with 3 x `u8`, so it is layout-compatible
        // with `fast_image_resize::pixels::U8x3` (alignment 1).
        let src_pixels = unsafe {
            std::slice::from_raw_parts(
                self.data.as_ptr() as *const fast_image_resize::pixels::U8x3,
                self.data.len(),
            )
        };

        let src = fast_image_resize::images::ImageRef::from_pixels(self.width, self.height, src_pixels)
            .context("wrap source pixels")?;
        let mut dst = fast_image_resize::images::Image::new(width, height, fast_image_resize::PixelType::U8x3);

        let options = fast_image_resize::ResizeOptions::new().resize_alg(
            fast_image_resize::ResizeAlg::Convolution(fast_image_resize::FilterType::Lanczos3),
        );
        fast_image_resize::Resizer::new()
            .resize(&src, &mut dst, &options)
            .with_context(|| format!("resize {}x{} -> {width}x{height}", self.width, self.height))?;

        let resized = Self::from_rgb(width, height, &dst.into_vec())?;
        log::trace!("resized {}x{} -> {width}x{height}", self.width, self.height);
        *self = resized;
        Ok(())
    }

    #[inline]
    pub fn resized(mut self, width: u32, height: u32) -> Result<Self> {
        self.resize(width, height)?;
        Ok(self)
    }
}

// ----------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Same shade as the CSS / X11 "green" keyword.
    pub const GREEN: Self = Self::new(0, 128, 0);
    pub const RED: Self = Self::new(255, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for image::Rgb<u8> {
    fn from(c: Color) -> Self {
        image::Rgb([c.r, c.g, c.b])
    }
}
