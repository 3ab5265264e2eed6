use std::path::Path;

use eyre::{Context, Result};
use image::DynamicImage;

use super::driver::{Driver, Gl};

/// A 2D texture with repeat wrapping, linear filtering and mipmaps.
///
/// Deleted on drop.
pub struct Texture<D: Driver = Gl> {
    id: u32,
    width: u32,
    height: u32,
    driver: D,
}

impl<D: Driver> Texture<D> {
    pub fn from_file(driver: D, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .wrap_err_with(|| format!("Failed to load texture '{}'", path.display()))?;

        let texture = Self::from_image(driver, &image);
        tracing::info!(
            "texture loaded: '{}' ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );

        Ok(texture)
    }

    /// Uploads the image, RGBA if it has an alpha channel, RGB otherwise
    pub fn from_image(driver: D, image: &DynamicImage) -> Self {
        // OpenGL expects the first row at the bottom
        let image = image.flipv();
        let width = image.width();
        let height = image.height();

        let (format, pixels) = if image.color().channel_count() == 4 {
            (gl::RGBA, image.into_rgba8().into_raw())
        } else {
            (gl::RGB, image.into_rgb8().into_raw())
        };

        let id = driver.gen_texture();
        driver.bind_texture(gl::TEXTURE_2D, id);

        driver.tex_parameter_i(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as i32);
        driver.tex_parameter_i(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as i32);
        driver.tex_parameter_i(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR as i32);
        driver.tex_parameter_i(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as i32);

        driver.tex_image_2d(
            gl::TEXTURE_2D,
            format,
            width,
            height,
            format,
            gl::UNSIGNED_BYTE,
            &pixels,
        );
        driver.generate_mipmap(gl::TEXTURE_2D);

        Self {
            id,
            width,
            height,
            driver,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bind(&self) {
        self.driver.bind_texture(gl::TEXTURE_2D, self.id);
    }

    pub fn unbind(&self) {
        self.driver.bind_texture(gl::TEXTURE_2D, 0);
    }
}

impl<D: Driver> Drop for Texture<D> {
    fn drop(&mut self) {
        self.driver.delete_texture(self.id);
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    use super::*;
    use crate::ogl::stub::{StubDriver, TexImageCall};

    #[test]
    fn rgba_image_upload() {
        let driver = StubDriver::new();
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255])));
        let texture = Texture::from_image(driver.clone(), &image);

        assert_eq!((texture.width(), texture.height()), (4, 2));
        let state = driver.state();
        assert_eq!(
            state.tex_images,
            vec![TexImageCall {
                internal_format: gl::RGBA,
                width: 4,
                height: 2,
                format: gl::RGBA,
                len: 4 * 2 * 4,
            }]
        );
        assert_eq!(state.calls("generate_mipmap"), 1);
        assert!(state
            .tex_params
            .contains(&(gl::TEXTURE_WRAP_S, gl::REPEAT as i32)));
    }

    #[test]
    fn rgb_image_upload() {
        let driver = StubDriver::new();
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 3, Rgb([1, 2, 3])));
        let _texture = Texture::from_image(driver.clone(), &image);

        let upload = driver.state().tex_images[0].clone();
        assert_eq!(upload.format, gl::RGB);
        assert_eq!(upload.len, 27);
    }

    #[test]
    fn loads_from_file_and_deletes_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wall.png");
        RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let driver = StubDriver::new();
        let texture = Texture::from_file(driver.clone(), &path).unwrap();
        texture.bind();
        let id = texture.id();
        assert_eq!(driver.state().bound_texture, id);

        drop(texture);
        assert_eq!(driver.state().deleted_textures, vec![id]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let res = Texture::from_file(StubDriver::new(), "/no/such/texture.png");
        assert!(res.is_err());
    }
}
