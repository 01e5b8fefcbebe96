//! Image decoding for textures.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to decode image `{path}`: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Unsupported texture format: {0} channels")]
    UnsupportedChannels(u8),
}

/// Tightly packed 8 bit pixels, rows from top to bottom unless flipped.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

/// Decodes the image at `path`, keeping its channel count.
///
/// One, three and four channel images are supported; anything else is rejected. Images with
/// more than 8 bits per channel are narrowed to 8 bits.
pub fn decode(path: &Path, flip_vertically: bool) -> Result<DecodedImage, ImageError> {
    let image = image::open(path).map_err(|source| ImageError::Decode {
        path: path.to_owned(),
        source,
    })?;
    let image = if flip_vertically { image.flipv() } else { image };

    let decoded = from_dynamic(image)?;
    debug!(
        "Decoded `{}`: {}x{}, {} channels",
        path.display(),
        decoded.width,
        decoded.height,
        decoded.channels
    );
    Ok(decoded)
}

fn from_dynamic(image: DynamicImage) -> Result<DecodedImage, ImageError> {
    let channels = image.color().channel_count();
    let ((width, height), pixels) = match channels {
        1 => {
            let buffer = image.to_luma8();
            (buffer.dimensions(), buffer.into_raw())
        }
        3 => {
            let buffer = image.to_rgb8();
            (buffer.dimensions(), buffer.into_raw())
        }
        4 => {
            let buffer = image.to_rgba8();
            (buffer.dimensions(), buffer.into_raw())
        }
        n => return Err(ImageError::UnsupportedChannels(n)),
    };

    Ok(DecodedImage {
        pixels,
        width,
        height,
        channels,
    })
}
