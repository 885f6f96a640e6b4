//! Image views, owned buffers, and channel layouts.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than `width * channels` represents padded rows (or a view
//! into a larger image). ROI slices are zero-copy views into the same backing
//! slice and retain the original stride.
//!
//! Element `(x, y, c)` lives at `y * stride + x * channels + c`.

use std::fmt;

use crate::util::{PixelOpsError, PixelOpsResult};

pub(crate) mod border;
#[cfg(feature = "image-io")]
pub mod io;
pub mod pyramid;

/// Channel arrangement of an 8-bit image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    /// Single luminance plane.
    Gray,
    /// Interleaved red, green, blue.
    Rgb,
}

impl ChannelLayout {
    /// Returns the number of interleaved channels.
    pub const fn channels(self) -> usize {
        match self {
            ChannelLayout::Gray => 1,
            ChannelLayout::Rgb => 3,
        }
    }

    /// Maps a channel count back to a layout.
    pub fn from_channels(channels: usize) -> PixelOpsResult<Self> {
        match channels {
            1 => Ok(ChannelLayout::Gray),
            3 => Ok(ChannelLayout::Rgb),
            _ => Err(PixelOpsError::InvalidChannels { channels }),
        }
    }
}

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
    layout: ChannelLayout,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width * channels`.
    pub fn from_slice(
        data: &'a [T],
        width: usize,
        height: usize,
        layout: ChannelLayout,
    ) -> PixelOpsResult<Self> {
        let stride = width
            .checked_mul(layout.channels())
            .ok_or(PixelOpsError::InvalidDimensions { width, height })?;
        Self::new(data, width, height, stride, layout)
    }

    /// Creates a view with an explicit stride.
    pub fn new(
        data: &'a [T],
        width: usize,
        height: usize,
        stride: usize,
        layout: ChannelLayout,
    ) -> PixelOpsResult<Self> {
        let needed = required_len(width, height, stride, layout)?;
        if data.len() < needed {
            return Err(PixelOpsError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
            layout,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the channel layout.
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Returns the number of interleaved channels.
    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y, c)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize, c: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height || c >= self.channels() {
            return None;
        }
        let idx = y
            .checked_mul(self.stride)?
            .checked_add(x.checked_mul(self.channels())?)?
            .checked_add(c)?;
        self.data.get(idx)
    }

    /// Returns all channels of pixel `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&'a [T]> {
        let row = self.row(y)?;
        let channels = self.channels();
        let start = x.checked_mul(channels)?;
        row.get(start..start + channels)
    }

    /// Returns a contiguous slice for row `y` with length `width * channels`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width * self.channels())?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> PixelOpsResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(PixelOpsError::InvalidDimensions { width, height });
        }

        let out_of_bounds = PixelOpsError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x * self.channels()))
            .ok_or(PixelOpsError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        let data = self
            .data
            .get(start..)
            .ok_or(PixelOpsError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;

        ImageView::new(data, width, height, self.stride, self.layout)
    }
}

fn required_len(
    width: usize,
    height: usize,
    stride: usize,
    layout: ChannelLayout,
) -> PixelOpsResult<usize> {
    if width == 0 || height == 0 {
        return Err(PixelOpsError::InvalidDimensions { width, height });
    }
    let row_len = width
        .checked_mul(layout.channels())
        .ok_or(PixelOpsError::InvalidDimensions { width, height })?;
    if stride < row_len {
        return Err(PixelOpsError::InvalidStride { row_len, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_len))
        .ok_or(PixelOpsError::InvalidDimensions { width, height })
}

/// Owned contiguous 8-bit image buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
    layout: ChannelLayout,
}

impl OwnedImage {
    /// Wraps a contiguous row-major buffer.
    ///
    /// The buffer length must equal `width * height * channels` exactly.
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        layout: ChannelLayout,
    ) -> PixelOpsResult<Self> {
        let needed = element_count(width, height, layout)?;
        if data.len() != needed {
            return Err(PixelOpsError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            layout,
        })
    }

    /// Allocates an image with every element set to zero.
    pub fn zeros(width: usize, height: usize, layout: ChannelLayout) -> PixelOpsResult<Self> {
        Self::filled(width, height, layout, 0)
    }

    /// Allocates an image with every element set to `value`.
    pub fn filled(
        width: usize,
        height: usize,
        layout: ChannelLayout,
        value: u8,
    ) -> PixelOpsResult<Self> {
        let needed = element_count(width, height, layout)?;
        Ok(Self {
            data: vec![value; needed],
            width,
            height,
            layout,
        })
    }

    /// Copies a possibly strided view into a contiguous buffer.
    pub fn from_view(view: ImageView<'_, u8>) -> PixelOpsResult<Self> {
        let width = view.width();
        let height = view.height();
        let layout = view.layout();
        let mut data = Vec::with_capacity(element_count(width, height, layout)?);
        for y in 0..height {
            let row = view.row(y).ok_or(PixelOpsError::BufferTooSmall {
                needed: y * view.stride() + width * layout.channels(),
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, width, height, layout)
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width * self.layout.channels(),
            layout: self.layout,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the channel layout.
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Returns the number of interleaved channels.
    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Returns the contiguous element buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the contiguous element buffer mutably.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the image and returns its buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Returns the element at `(x, y, c)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize, c: usize) -> Option<u8> {
        self.index_of(x, y, c).map(|idx| self.data[idx])
    }

    /// Writes the element at `(x, y, c)`; returns `false` when out of bounds.
    pub fn set(&mut self, x: usize, y: usize, c: usize, value: u8) -> bool {
        match self.index_of(x, y, c) {
            Some(idx) => {
                self.data[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Returns all channels of pixel `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        let idx = self.index_of(x, y, 0)?;
        self.data.get(idx..idx + self.channels())
    }

    /// Returns row `y` as a slice of `width * channels` elements.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let len = self.width * self.channels();
        self.data.get(y * len..(y + 1) * len)
    }

    /// Returns `true` when `other` has the same width, height, and layout.
    pub fn same_shape(&self, other: &OwnedImage) -> bool {
        self.width == other.width && self.height == other.height && self.layout == other.layout
    }

    /// Formats the shape as `WxHxC` for diagnostics.
    pub(crate) fn shape_label(&self) -> String {
        format!("{}x{}x{}", self.width, self.height, self.channels())
    }

    /// Summarizes the buffer geometry.
    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            height: self.height,
            width: self.width,
            channels: self.channels(),
            size: self.data.len(),
            dtype: "u8",
        }
    }

    fn index_of(&self, x: usize, y: usize, c: usize) -> Option<usize> {
        let channels = self.channels();
        if x >= self.width || y >= self.height || c >= channels {
            return None;
        }
        Some((y * self.width + x) * channels + c)
    }
}

fn element_count(width: usize, height: usize, layout: ChannelLayout) -> PixelOpsResult<usize> {
    if width == 0 || height == 0 {
        return Err(PixelOpsError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(layout.channels()))
        .ok_or(PixelOpsError::InvalidDimensions { width, height })
}

/// Geometry summary of an image buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    /// Rows.
    pub height: usize,
    /// Columns.
    pub width: usize,
    /// Interleaved channels per pixel.
    pub channels: usize,
    /// Total number of elements (`height * width * channels`).
    pub size: usize,
    /// Element type name.
    pub dtype: &'static str,
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Image Information ===")?;
        writeln!(f, "Height: {}", self.height)?;
        writeln!(f, "Width: {}", self.width)?;
        writeln!(f, "Channels: {}", self.channels)?;
        writeln!(f, "Size (number of elements): {}", self.size)?;
        write!(f, "Data type: {}", self.dtype)
    }
}
