use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::info;

use crate::assets::image::{self, DecodedImage, ImageError};

use super::{GpuHandle, GraphicsResult, PixelFormat, RenderDevice};

/// A 2D texture with mipmaps, uploaded from an image file.
pub struct Texture {
    device: Rc<dyn RenderDevice>,
    handle: Option<GpuHandle>,
    width: u32,
    height: u32,
    format: PixelFormat,
    path: Option<PathBuf>,
}

impl Texture {
    /// Decodes `path` and uploads it. Set `flip_vertically` for images stored top row first.
    pub fn from_file(
        device: Rc<dyn RenderDevice>,
        path: &Path,
        flip_vertically: bool,
    ) -> GraphicsResult<Self> {
        info!("Loading texture: {}", path.display());
        let decoded = image::decode(path, flip_vertically)?;
        Ok(Self::from_image(device, &decoded)?.with_path(path.to_owned()))
    }

    pub fn from_image(device: Rc<dyn RenderDevice>, image: &DecodedImage) -> GraphicsResult<Self> {
        let format = PixelFormat::from_channels(image.channels)
            .ok_or(ImageError::UnsupportedChannels(image.channels))?;
        let handle = device.create_texture(image)?;

        Ok(Self {
            device,
            handle: Some(handle),
            width: image.width,
            height: image.height,
            format,
            path: None,
        })
    }

    /// Records `path` as the file the texture came from
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Binds the texture to texture unit `unit`
    pub fn bind(&self, unit: u32) {
        if let Some(handle) = self.handle {
            self.device.bind_texture(handle, unit);
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The file the texture was loaded from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.device.destroy_texture(handle);
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graphics::testing::{Call, RecordingDevice};
    use crate::graphics::GraphicsError;

    fn image(channels: u8) -> DecodedImage {
        DecodedImage {
            pixels: vec![0; 4 * channels as usize],
            width: 2,
            height: 2,
            channels,
        }
    }

    #[test]
    fn test_formats() {
        let recording = RecordingDevice::new();
        for (channels, format) in [
            (1, PixelFormat::Red),
            (3, PixelFormat::Rgb),
            (4, PixelFormat::Rgba),
        ] {
            let texture = Texture::from_image(recording.clone(), &image(channels)).unwrap();
            assert_eq!(texture.format(), format);
            assert_eq!((texture.width(), texture.height()), (2, 2));
        }

        assert!(matches!(
            Texture::from_image(recording.clone(), &image(2)),
            Err(GraphicsError::Image(ImageError::UnsupportedChannels(2)))
        ));
        assert_eq!(
            recording.count(|c| matches!(c, Call::CreateTexture { .. })),
            3
        );
    }

    #[test]
    fn test_bind_and_release_once() {
        let recording = RecordingDevice::new();
        let mut texture = Texture::from_image(recording.clone(), &image(4)).unwrap();

        texture.bind(0);
        texture.release();
        texture.bind(0);
        drop(texture);

        assert_eq!(recording.count(|c| matches!(c, Call::BindTexture(_, 0))), 1);
        assert_eq!(recording.count(|c| matches!(c, Call::DestroyTexture(_))), 1);
    }
}
