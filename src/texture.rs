use std::path::Path;

use image::RgbaImage;

use crate::error::Result;

/// Displayable image the renderer publishes finished frames to.
///
/// It keeps its own copy of the pixels; the renderer only writes to it.
pub trait RenderTarget {
    fn create(width: u32, height: u32) -> Self
    where
        Self: Sized;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn resize(&mut self, width: u32, height: u32);
    /// Copy `width * height` packed RGBA8 pixels into the target.
    fn set_data(&mut self, data: &[u32]);
}

/// CPU-side texture backed by an `RgbaImage`.
#[derive(Debug, Clone)]
pub struct Texture {
    image: RgbaImage,
}

impl Texture {
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Packed pixel at `(x, y)`, as handed to [`RenderTarget::set_data`].
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        u32::from_le_bytes(self.image.get_pixel(x, y).0)
    }

    /// Write the texture to disk; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.image.save(path)?;
        tracing::info!(path = %path.display(), "saved image");
        Ok(())
    }
}

impl RenderTarget for Texture {
    fn create(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
    }

    fn set_data(&mut self, data: &[u32]) {
        debug_assert_eq!(data.len() * 4, self.image.len());

        if cfg!(target_endian = "little") {
            self.image.copy_from_slice(bytemuck::cast_slice(data));
        } else {
            for (dst, pixel) in self.image.chunks_exact_mut(4).zip(data) {
                dst.copy_from_slice(&pixel.to_le_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_data_lays_out_bytes_as_rgba() {
        let mut texture = Texture::create(2, 1);
        texture.set_data(&[0xFF0000FF, 0x80402010]);

        assert_eq!(texture.image().get_pixel(0, 0).0, [0xFF, 0x00, 0x00, 0xFF]);
        assert_eq!(texture.image().get_pixel(1, 0).0, [0x10, 0x20, 0x40, 0x80]);
        assert_eq!(texture.pixel(1, 0), 0x80402010);
    }

    #[test]
    fn resize_changes_dimensions() {
        let mut texture = Texture::create(2, 2);
        texture.resize(5, 3);
        assert_eq!((texture.width(), texture.height()), (5, 3));
        assert_eq!(texture.image().len(), 5 * 3 * 4);
    }
}
