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

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::buffer::{Axis, PixelBuffer};
use crate::error::{Error, Result};
use crate::parity::ParityGroup;

/// A band cut from a parent buffer, tagged with its 1-based position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Strip {
    index: usize,
    pixels: PixelBuffer,
}

impl Strip {
    pub fn new(index: usize, pixels: PixelBuffer) -> Self {
        Self { index, pixels }
    }

    /// 1-based ordinal of the strip in the cut.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn parity(&self) -> ParityGroup {
        ParityGroup::of(self.index)
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn into_pixels(self) -> PixelBuffer {
        self.pixels
    }
}

/// Nominal strip size along `axis`.
///
/// Row bands (`Vertical`) never go below one pixel, column bands
/// (`Horizontal`) may be zero wide. The two policies differ on purpose: the
/// output dimensions for uneven slice counts depend on it.
pub fn strip_size(extent: usize, axis: Axis, num_slices: usize) -> usize {
    match axis {
        Axis::Vertical => (extent / num_slices).max(1),
        Axis::Horizontal => extent / num_slices,
    }
}

/// Cuts `buffer` into `num_slices` strips along `axis`.
///
/// Strip `i` covers `[(i-1)*base, i*base)`; the last one runs to the buffer
/// edge. Strips whose region holds no pixels are dropped, the rest keep
/// their ordinal and come back in ascending order.
pub fn slice(buffer: &PixelBuffer, axis: Axis, num_slices: usize) -> Result<Vec<Strip>> {
    if num_slices == 0 {
        return Err(Error::InvalidSliceCount(num_slices));
    }

    let extent = buffer.extent(axis);
    let base = strip_size(extent, axis, num_slices);
    debug!(?axis, extent, num_slices, base, "Slicing buffer");

    // Bands past the edge are empty, only the last one can still hold pixels.
    let inner = if base == 0 {
        0
    } else {
        (num_slices - 1).min((extent + base - 1) / base)
    };

    let strips: Vec<Strip> = (1..=inner)
        .into_par_iter()
        .chain(rayon::iter::once(num_slices))
        .filter_map(|i| {
            let start = (i - 1).saturating_mul(base);
            let end = if i == num_slices {
                extent
            } else {
                i.saturating_mul(base)
            };
            buffer
                .crop(axis, start, end)
                .map(|pixels| Strip::new(i, pixels))
        })
        .collect();

    let skipped = num_slices - strips.len();
    if strips.is_empty() {
        warn!("No slices were created");
    } else if skipped > 0 {
        warn!(
            created = strips.len(),
            skipped, "Skipped slices with no pixels"
        );
    } else {
        debug!("Successfully created {} slices", strips.len());
    }

    Ok(strips)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| [x as u8, y as u8, 0]).unwrap()
    }

    fn indices(strips: &[Strip]) -> Vec<usize> {
        strips.iter().map(Strip::index).collect()
    }

    #[test]
    fn zero_slices_is_rejected() {
        let buf = numbered(4, 4);
        assert!(matches!(
            slice(&buf, Axis::Vertical, 0),
            Err(Error::InvalidSliceCount(0))
        ));
    }

    #[test]
    fn row_bands_even_split() {
        let buf = numbered(4, 8);
        let strips = slice(&buf, Axis::Vertical, 4).unwrap();

        assert_eq!(indices(&strips), [1, 2, 3, 4]);
        for (n, s) in strips.iter().enumerate() {
            assert_eq!(s.pixels().dimensions(), (4, 2));
            assert_eq!(s.pixels().pixel(0, 0), Some([0, (n * 2) as u8, 0]));
        }
    }

    #[test]
    fn row_bands_last_absorbs_remainder() {
        let buf = numbered(3, 10);
        let strips = slice(&buf, Axis::Vertical, 3).unwrap();

        let heights: Vec<_> = strips.iter().map(|s| s.pixels().height()).collect();
        assert_eq!(heights, [3, 3, 4]);
    }

    #[test]
    fn row_bands_drop_regions_past_the_edge() {
        // base is forced to 1, bands 4..=5 fall outside a 3 pixel tall buffer
        let buf = numbered(2, 3);
        let strips = slice(&buf, Axis::Vertical, 6).unwrap();

        assert_eq!(indices(&strips), [1, 2, 3]);
        assert!(strips.iter().all(|s| s.pixels().height() == 1));
    }

    #[test]
    fn column_bands_last_absorbs_remainder() {
        let buf = numbered(10, 2);
        let strips = slice(&buf, Axis::Horizontal, 4).unwrap();

        assert_eq!(indices(&strips), [1, 2, 3, 4]);
        let widths: Vec<_> = strips.iter().map(|s| s.pixels().width()).collect();
        assert_eq!(widths, [2, 2, 2, 4]);
        assert_eq!(strips[3].pixels().pixel(0, 1), Some([6, 1, 0]));
    }

    #[test]
    fn column_bands_narrower_than_count_keep_only_last() {
        // base is 0, so every band but the last is empty
        let buf = numbered(3, 2);
        let strips = slice(&buf, Axis::Horizontal, 5).unwrap();

        assert_eq!(indices(&strips), [5]);
        assert_eq!(strips[0].pixels().dimensions(), (3, 2));
    }

    #[test]
    fn huge_slice_count_stays_cheap() {
        let buf = numbered(4, 4);

        let rows = slice(&buf, Axis::Vertical, usize::MAX).unwrap();
        assert_eq!(indices(&rows), [1, 2, 3, 4]);
        assert!(rows.iter().all(|s| s.pixels().dimensions() == (4, 1)));

        let columns = slice(&buf, Axis::Horizontal, usize::MAX).unwrap();
        assert_eq!(indices(&columns), [usize::MAX]);
        assert_eq!(columns[0].pixels(), &buf);
    }

    #[test]
    fn single_slice_is_whole_buffer() {
        let buf = numbered(5, 5);
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let strips = slice(&buf, axis, 1).unwrap();
            assert_eq!(strips.len(), 1);
            assert_eq!(strips[0].pixels(), &buf);
        }
    }

    #[test]
    fn strip_size_policies() {
        assert_eq!(strip_size(3, Axis::Vertical, 8), 1);
        assert_eq!(strip_size(3, Axis::Horizontal, 8), 0);
        assert_eq!(strip_size(17, Axis::Vertical, 4), 4);
        assert_eq!(strip_size(17, Axis::Horizontal, 4), 4);
    }
}
