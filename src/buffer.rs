// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Owned RGB pixel storage and the axis vocabulary shared by every stage.

use ndarray::{Array3, ArrayView3, Slice};

use crate::error::{Error, Result};

/// Number of 8-bit samples per pixel (RGB, no alpha).
pub const CHANNELS: usize = 3;

/// Image dimension selected for slicing, joining and offsetting.
///
/// `Horizontal` is the width (x) dimension, `Vertical` is the height (y)
/// dimension. Slicing along `Vertical` cuts row bands, joining along
/// `Horizontal` places buffers side by side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The other axis.
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    // Storage is (height, width, channel).
    pub(crate) fn nd(self) -> ndarray::Axis {
        match self {
            Self::Horizontal => ndarray::Axis(1),
            Self::Vertical => ndarray::Axis(0),
        }
    }
}

/// Rectangular RGB8 image, at least 1x1.
///
/// Pixels live in a standard-layout `(height, width, 3)` array, so the raw
/// bytes are row-major `RGBRGB...`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Array3<u8>,
}

impl PixelBuffer {
    /// Black buffer of the given size.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        check_size(width, height)?;
        Ok(Self::wrap(Array3::zeros((height, width, CHANNELS))))
    }

    /// Buffer over row-major RGB bytes.
    pub fn from_raw(width: usize, height: usize, raw: Vec<u8>) -> Result<Self> {
        check_size(width, height)?;
        let expected = width * height * CHANNELS;
        let actual = raw.len();
        let data = Array3::from_shape_vec((height, width, CHANNELS), raw)
            .map_err(|_| Error::BufferLength { expected, actual })?;
        Ok(Self::wrap(data))
    }

    /// Buffer whose pixel at `(x, y)` is `f(x, y)`.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> [u8; CHANNELS],
    {
        check_size(width, height)?;
        let data = Array3::from_shape_fn((height, width, CHANNELS), |(y, x, c)| f(x, y)[c]);
        Ok(Self::wrap(data))
    }

    pub(crate) fn wrap(data: Array3<u8>) -> Self {
        debug_assert!(data.dim().0 > 0 && data.dim().1 > 0);
        debug_assert_eq!(data.dim().2, CHANNELS);

        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Size along `axis`.
    pub fn extent(&self, axis: Axis) -> usize {
        self.data.len_of(axis.nd())
    }

    /// Size along the axis perpendicular to `axis`.
    pub fn cross_extent(&self, axis: Axis) -> usize {
        self.extent(axis.cross())
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; CHANNELS]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some([
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ])
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub fn as_raw(&self) -> &[u8] {
        self.data.as_slice().expect("Should be standard-layout")
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data.into_raw_vec()
    }

    /// Copies out `start..end` along `axis`, or `None` when that range holds
    /// no pixels.
    pub fn crop(&self, axis: Axis, start: usize, end: usize) -> Option<Self> {
        let end = end.min(self.extent(axis));
        if end <= start {
            return None;
        }

        let view = self.data.slice_axis(axis.nd(), Slice::from(start..end));
        Some(Self::wrap(view.to_owned()))
    }
}

fn check_size(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::EmptyBuffer { width, height });
    }
    Ok(())
}
