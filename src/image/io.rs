//! Loading and saving images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use std::fs;
use std::path::{Path, PathBuf};

use crate::image::{ChannelLayout, OwnedImage};
use crate::trace::trace_event;
use crate::util::{PixelOpsError, PixelOpsResult};

/// Creates an owned image from a decoded dynamic image.
///
/// Single-channel luminance sources stay grayscale; every other source is
/// converted to 8-bit RGB (alpha is dropped).
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> PixelOpsResult<OwnedImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    match img {
        image::DynamicImage::ImageLuma8(gray) => {
            OwnedImage::new(gray.as_raw().clone(), width, height, ChannelLayout::Gray)
        }
        other => OwnedImage::new(other.to_rgb8().into_raw(), width, height, ChannelLayout::Rgb),
    }
}

/// Converts an owned image into a dynamic image for encoding.
pub fn dynamic_from_owned(img: &OwnedImage) -> PixelOpsResult<image::DynamicImage> {
    let width = u32::try_from(img.width()).map_err(|_| PixelOpsError::InvalidDimensions {
        width: img.width(),
        height: img.height(),
    })?;
    let height = u32::try_from(img.height()).map_err(|_| PixelOpsError::InvalidDimensions {
        width: img.width(),
        height: img.height(),
    })?;
    let data = img.data().to_vec();
    let too_small = PixelOpsError::BufferTooSmall {
        needed: img.width() * img.height() * img.channels(),
        got: data.len(),
    };
    let dynamic = match img.layout() {
        ChannelLayout::Gray => image::GrayImage::from_raw(width, height, data)
            .map(image::DynamicImage::ImageLuma8),
        ChannelLayout::Rgb => {
            image::RgbImage::from_raw(width, height, data).map(image::DynamicImage::ImageRgb8)
        }
    };
    dynamic.ok_or(too_small)
}

/// Loads and decodes an image from disk.
pub fn load_image<P: AsRef<Path>>(path: P) -> PixelOpsResult<OwnedImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| PixelOpsError::ImageIo {
        reason: format!("{}: {err}", path.display()),
    })?;
    owned_from_dynamic_image(&img)
}

/// Encodes an image to disk, choosing the format from the file extension.
pub fn save_image<P: AsRef<Path>>(img: &OwnedImage, path: P) -> PixelOpsResult<()> {
    let path = path.as_ref();
    let dynamic = dynamic_from_owned(img)?;
    dynamic.save(path).map_err(|err| PixelOpsError::ImageEncode {
        reason: format!("{}: {err}", path.display()),
    })
}

/// Destination directory for result images.
///
/// The directory is created once, when the value is constructed; saving only
/// joins file names onto it.
#[derive(Clone, Debug)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Creates `root` (and any missing parents) if it does not exist.
    pub fn create<P: Into<PathBuf>>(root: P) -> PixelOpsResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|err| PixelOpsError::ImageEncode {
            reason: format!("{}: {err}", root.display()),
        })?;
        Ok(Self { root })
    }

    /// Returns the directory path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Saves `img` as `name` inside the directory and returns the full path.
    pub fn save(&self, img: &OwnedImage, name: &str) -> PixelOpsResult<PathBuf> {
        let path = self.root.join(name);
        save_image(img, &path)?;
        trace_event!("image_saved", width = img.width(), height = img.height());
        Ok(path)
    }
}
