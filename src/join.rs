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

use ndarray::parallel::prelude::*;
use ndarray::{s, Array3};

use crate::buffer::{Axis, PixelBuffer, CHANNELS};
use crate::error::{Error, Result};

/// Concatenates `buffers` along `axis`, in the order given.
///
/// The output is as long as the sum of the inputs along `axis` and as wide as
/// the widest input across it. Each input is anchored at the start of the
/// cross axis; anything it does not cover stays black.
pub fn join<'a, I>(buffers: I, axis: Axis) -> Result<PixelBuffer>
where
    I: IntoIterator<Item = &'a PixelBuffer>,
{
    let buffers: Vec<_> = buffers.into_iter().collect();
    if buffers.is_empty() {
        return Err(Error::EmptyJoinInput);
    }
    Ok(join_nonempty(&buffers, axis))
}

/// Two-buffer [`join`], `a` first.
pub fn concat(a: &PixelBuffer, b: &PixelBuffer, axis: Axis) -> PixelBuffer {
    join_nonempty(&[a, b], axis)
}

fn join_nonempty(buffers: &[&PixelBuffer], axis: Axis) -> PixelBuffer {
    let along: usize = buffers.iter().map(|b| b.extent(axis)).sum();
    let across = buffers
        .iter()
        .map(|b| b.cross_extent(axis))
        .max()
        .unwrap_or(1);
    let (width, height) = match axis {
        Axis::Horizontal => (along, across),
        Axis::Vertical => (across, along),
    };

    let mut out = Array3::<u8>::zeros((height, width, CHANNELS));

    // Carve the output into one disjoint region per input.
    let mut rest = out.view_mut();
    let mut targets = Vec::with_capacity(buffers.len());
    for b in buffers {
        let (head, tail) = rest.split_at(axis.nd(), b.extent(axis));
        targets.push(head);
        rest = tail;
    }

    targets
        .into_par_iter()
        .zip(buffers.par_iter())
        .for_each(|(mut dst, src)| {
            let (w, h) = src.dimensions();
            dst.slice_mut(s![..h, ..w, ..]).assign(&src.view());
        });

    PixelBuffer::wrap(out)
}
