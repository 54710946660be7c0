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

//! Quarter-turn rotation by index remapping.
//!
//! Positive angles turn counter-clockwise: after a 90 degree turn the input's
//! top-right pixel is the output's top-left pixel. No resampling happens,
//! every output pixel is a copy of exactly one input pixel.

use ndarray::{s, Array3};

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::error::{Error, Result};

/// Rotation reduced to one of the four quarter turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuarterTurn {
    Identity,
    /// 90 degrees counter-clockwise.
    Ccw90,
    Half,
    /// 270 degrees counter-clockwise, i.e. 90 clockwise.
    Cw90,
}

impl QuarterTurn {
    /// Normalises `degrees` modulo 360. Fails unless it is a multiple of 90.
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Self::Identity),
            90 => Ok(Self::Ccw90),
            180 => Ok(Self::Half),
            270 => Ok(Self::Cw90),
            _ => Err(Error::UnsupportedRotation(degrees)),
        }
    }

    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Self::Ccw90 | Self::Cw90)
    }

    /// `(width, height)` after turning a `width` x `height` buffer.
    pub fn output_dimensions(self, width: usize, height: usize) -> (usize, usize) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }

    pub fn apply(self, buffer: &PixelBuffer) -> PixelBuffer {
        let y = ndarray::Axis(0);
        let x = ndarray::Axis(1);

        let mut v = buffer.view();
        match self {
            Self::Identity => {}
            Self::Ccw90 => {
                v.invert_axis(x);
                v = v.permuted_axes([1, 0, 2]);
            }
            Self::Half => {
                v.invert_axis(y);
                v.invert_axis(x);
            }
            Self::Cw90 => {
                v.invert_axis(y);
                v = v.permuted_axes([1, 0, 2]);
            }
        }

        PixelBuffer::wrap(v.as_standard_layout().into_owned())
    }
}

/// Rotates `buffer` counter-clockwise by `degrees`.
///
/// With `expand` the output grows to hold the whole turned image (width and
/// height swap on odd quarter turns). Without it the output keeps the input
/// size, the turned image is centred on it, overhang is cropped and uncovered
/// area is black.
pub fn rotate(buffer: &PixelBuffer, degrees: i32, expand: bool) -> Result<PixelBuffer> {
    let turn = QuarterTurn::from_degrees(degrees)?;
    let rotated = turn.apply(buffer);

    if expand || !turn.swaps_dimensions() {
        return Ok(rotated);
    }
    Ok(recenter(&rotated, buffer.width(), buffer.height()))
}

fn recenter(src: &PixelBuffer, width: usize, height: usize) -> PixelBuffer {
    let (dx, sx, w) = centred_overlap(width, src.width());
    let (dy, sy, h) = centred_overlap(height, src.height());

    let mut out = Array3::<u8>::zeros((height, width, CHANNELS));
    out.slice_mut(s![dy..dy + h, dx..dx + w, ..])
        .assign(&src.view().slice(s![sy..sy + h, sx..sx + w, ..]));
    PixelBuffer::wrap(out)
}

// (destination start, source start, length)
fn centred_overlap(dst: usize, src: usize) -> (usize, usize, usize) {
    if dst >= src {
        ((dst - src) / 2, 0, src)
    } else {
        (0, (src - dst) / 2, dst)
    }
}
