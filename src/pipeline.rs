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

//! The two-round scramble.
//!
//! One round cuts the buffer into strips, joins the odd strips and the even
//! strips side by side, puts the odd composite left of the even composite and
//! turns the result. The full scramble runs two rounds, turning 90 degrees
//! after the first and 270 after the second.

use tracing::{debug, info, instrument, warn};

use crate::buffer::{Axis, PixelBuffer};
use crate::error::{Error, Result};
use crate::join::{concat, join};
use crate::parity::{split, ParityGroup};
use crate::rotate::{rotate, QuarterTurn};
use crate::slice::{slice, Strip};

pub const DEFAULT_SLICES: usize = 2048;

/// Scramble parameters.
///
/// `slices` should stay within `1..=extent` of the buffer along `axis` at
/// every round. Larger counts still run but drop strips.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    slices: usize,
    axis: Axis,
    rotations: [i32; 2],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            slices: DEFAULT_SLICES,
            axis: Axis::Vertical,
            rotations: [90, 270],
        }
    }
}

impl Config {
    pub fn slices(&self) -> usize {
        self.slices
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Degrees turned after the first and the second round.
    pub fn rotations(&self) -> [i32; 2] {
        self.rotations
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slices(mut self, slices: usize) -> Self {
        self.config.slices = slices;
        self
    }

    pub fn axis(mut self, axis: Axis) -> Self {
        self.config.axis = axis;
        self
    }

    pub fn first_rotation(mut self, degrees: i32) -> Self {
        self.config.rotations[0] = degrees;
        self
    }

    pub fn second_rotation(mut self, degrees: i32) -> Self {
        self.config.rotations[1] = degrees;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// Receives every intermediate artifact of a round.
///
/// All methods do nothing by default. An error aborts the scramble.
pub trait RoundObserver {
    fn strips(&mut self, _round: usize, _strips: &[Strip]) -> Result<()> {
        Ok(())
    }

    fn composite(
        &mut self,
        _round: usize,
        _group: ParityGroup,
        _buffer: &PixelBuffer,
    ) -> Result<()> {
        Ok(())
    }

    fn merged(&mut self, _round: usize, _buffer: &PixelBuffer) -> Result<()> {
        Ok(())
    }

    fn rotated(&mut self, _round: usize, _buffer: &PixelBuffer) -> Result<()> {
        Ok(())
    }
}

impl RoundObserver for () {}

/// What a single round did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundReport {
    /// 1 or 2
    pub round: usize,
    pub requested: usize,
    pub produced: usize,
    pub odd: usize,
    pub even: usize,
    /// `(width, height)` before the turn.
    pub merged: (usize, usize),
    /// `(width, height)` after the turn.
    pub output: (usize, usize),
}

impl RoundReport {
    /// Some strips had no pixels and were dropped.
    pub fn is_degraded(&self) -> bool {
        self.produced < self.requested
    }
}

/// Result of [`scramble`].
#[derive(Clone, Debug)]
pub struct Scrambled {
    pixels: PixelBuffer,
    rounds: Vec<RoundReport>,
}

impl Scrambled {
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn into_pixels(self) -> PixelBuffer {
        self.pixels
    }

    pub fn rounds(&self) -> &[RoundReport] {
        &self.rounds
    }

    pub fn is_degraded(&self) -> bool {
        self.rounds.iter().any(RoundReport::is_degraded)
    }
}

/// Runs both rounds over `buffer`.
pub fn scramble(buffer: PixelBuffer, config: &Config) -> Result<Scrambled> {
    scramble_with(buffer, config, &mut ())
}

/// [`scramble`], handing intermediate artifacts to `observer`.
#[instrument(skip_all, fields(width = buffer.width(), height = buffer.height(), slices = config.slices))]
pub fn scramble_with<O>(buffer: PixelBuffer, config: &Config, observer: &mut O) -> Result<Scrambled>
where
    O: RoundObserver + ?Sized,
{
    if config.slices == 0 {
        return Err(Error::InvalidSliceCount(config.slices));
    }
    for degrees in config.rotations {
        QuarterTurn::from_degrees(degrees)?;
    }

    let mut pixels = buffer;
    let mut rounds = Vec::with_capacity(config.rotations.len());
    for (n, degrees) in config.rotations.into_iter().enumerate() {
        let (out, report) = round_with(n + 1, pixels, config.axis, config.slices, degrees, observer)?;
        pixels = out;
        rounds.push(report);
    }

    let scrambled = Scrambled { pixels, rounds };
    if scrambled.is_degraded() {
        warn!("Some strips were dropped, slice count is too large for this image");
    }
    info!(
        width = scrambled.pixels.width(),
        height = scrambled.pixels.height(),
        "Scramble complete"
    );
    Ok(scrambled)
}

/// A single round: slice, split, join each group, merge odd then even
/// horizontally, then turn the merged image by `degrees` with expansion.
pub fn run_round(
    buffer: PixelBuffer,
    axis: Axis,
    slices: usize,
    degrees: i32,
) -> Result<(PixelBuffer, RoundReport)> {
    round_with(1, buffer, axis, slices, degrees, &mut ())
}

fn round_with<O>(
    round: usize,
    buffer: PixelBuffer,
    axis: Axis,
    slices: usize,
    degrees: i32,
    observer: &mut O,
) -> Result<(PixelBuffer, RoundReport)>
where
    O: RoundObserver + ?Sized,
{
    let extent = buffer.extent(axis);
    if slices > extent {
        warn!(round, slices, extent, "Slice count exceeds image extent");
    }

    let strips = slice(&buffer, axis, slices)?;
    drop(buffer);
    observer.strips(round, &strips)?;
    let produced = strips.len();

    let (odd, even) = split(strips);
    debug!(round, odd = odd.len(), even = even.len(), "Split strips");

    let odd_combined = join(odd.iter().map(Strip::pixels), Axis::Horizontal)?;
    observer.composite(round, ParityGroup::Odd, &odd_combined)?;
    let even_combined = join(even.iter().map(Strip::pixels), Axis::Horizontal)?;
    observer.composite(round, ParityGroup::Even, &even_combined)?;

    let merged = concat(&odd_combined, &even_combined, Axis::Horizontal);
    observer.merged(round, &merged)?;

    let rotated = rotate(&merged, degrees, true)?;
    observer.rotated(round, &rotated)?;

    let report = RoundReport {
        round,
        requested: slices,
        produced,
        odd: odd.len(),
        even: even.len(),
        merged: merged.dimensions(),
        output: rotated.dimensions(),
    };
    debug!(?report, "Round complete");

    Ok((rotated, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Column x, row y -> red = x, green = y.
    fn coords(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| [x as u8, y as u8, 0]).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        strips: Vec<(usize, Vec<usize>)>,
        composites: Vec<(usize, ParityGroup, (usize, usize))>,
        merged: Vec<(usize, usize)>,
        rotated: Vec<(usize, usize)>,
    }

    impl RoundObserver for Recorder {
        fn strips(&mut self, round: usize, strips: &[Strip]) -> Result<()> {
            self.strips
                .push((round, strips.iter().map(Strip::index).collect()));
            Ok(())
        }

        fn composite(&mut self, round: usize, group: ParityGroup, b: &PixelBuffer) -> Result<()> {
            self.composites.push((round, group, b.dimensions()));
            Ok(())
        }

        fn merged(&mut self, _round: usize, b: &PixelBuffer) -> Result<()> {
            self.merged.push(b.dimensions());
            Ok(())
        }

        fn rotated(&mut self, _round: usize, b: &PixelBuffer) -> Result<()> {
            self.rotated.push(b.dimensions());
            Ok(())
        }
    }

    struct FailOnMerge;

    impl RoundObserver for FailOnMerge {
        fn merged(&mut self, _round: usize, _b: &PixelBuffer) -> Result<()> {
            Err(Error::EmptyJoinInput)
        }
    }

    #[test]
    fn builder_defaults() {
        let config = ConfigBuilder::new().build();
        assert_eq!(config, Config::default());
        assert_eq!(config.slices(), 2048);
        assert_eq!(config.axis(), Axis::Vertical);
        assert_eq!(config.rotations(), [90, 270]);

        let config = ConfigBuilder::new()
            .slices(8)
            .axis(Axis::Horizontal)
            .first_rotation(270)
            .second_rotation(90)
            .build();
        assert_eq!(config.slices(), 8);
        assert_eq!(config.axis(), Axis::Horizontal);
        assert_eq!(config.rotations(), [270, 90]);
    }

    #[test]
    fn first_round_interleaves_parity() {
        let (out, report) = run_round(coords(4, 8), Axis::Vertical, 4, 90).unwrap();

        assert_eq!(report.produced, 4);
        assert_eq!((report.odd, report.even), (2, 2));
        assert_eq!(report.merged, (16, 2));
        assert_eq!(out.dimensions(), (2, 16));
        assert!(!report.is_degraded());

        // Undo the turn to read the merged row order: bands 1, 3, 2, 4.
        let merged = rotate(&out, 270, true).unwrap();
        let bands: Vec<_> = (0..4)
            .map(|k| merged.pixel(k * 4, 0).unwrap()[1] / 2 + 1)
            .collect();
        assert_eq!(bands, [1, 3, 2, 4]);
        assert_eq!(merged.pixel(3, 1), Some([3, 1, 0]));
    }

    #[test]
    fn full_scramble_restores_dimensions() {
        let config = ConfigBuilder::new().slices(4).build();
        let mut recorder = Recorder::default();
        let out = scramble_with(coords(4, 8), &config, &mut recorder).unwrap();

        assert_eq!(out.pixels().dimensions(), (4, 8));
        assert_eq!(out.rounds().len(), 2);
        assert!(!out.is_degraded());

        assert_eq!(recorder.strips[0], (1, vec![1, 2, 3, 4]));
        assert_eq!(recorder.strips[1], (2, vec![1, 2, 3, 4]));
        assert_eq!(
            recorder.composites,
            [
                (1, ParityGroup::Odd, (8, 2)),
                (1, ParityGroup::Even, (8, 2)),
                (2, ParityGroup::Odd, (4, 4)),
                (2, ParityGroup::Even, (4, 4)),
            ]
        );
        assert_eq!(recorder.merged, [(16, 2), (8, 4)]);
        assert_eq!(recorder.rotated, [(2, 16), (4, 8)]);
    }

    #[test]
    fn column_bands_scramble() {
        let config = ConfigBuilder::new()
            .slices(4)
            .axis(Axis::Horizontal)
            .build();
        let mut recorder = Recorder::default();
        let buf = coords(8, 4);
        let out = scramble_with(buf.clone(), &config, &mut recorder).unwrap();

        assert_eq!(out.pixels().dimensions(), (8, 4));
        assert!(!out.is_degraded());
        assert_eq!(recorder.merged, [(8, 4), (4, 8)]);
        assert_eq!(recorder.rotated, [(4, 8), (8, 4)]);
        assert_ne!(out.pixels(), &buf);

        // Round one alone: columns 1, 3, 2, 4, each two pixels wide.
        let (first, _) = run_round(buf, Axis::Horizontal, 4, 90).unwrap();
        let merged = rotate(&first, 270, true).unwrap();
        let starts: Vec<_> = (0..4).map(|k| merged.pixel(k * 2, 0).unwrap()[0]).collect();
        assert_eq!(starts, [0, 4, 2, 6]);
    }

    #[test]
    fn column_bands_narrower_than_count_abort() {
        let config = ConfigBuilder::new()
            .slices(5)
            .axis(Axis::Horizontal)
            .build();
        let mut recorder = Recorder::default();

        assert!(matches!(
            scramble_with(coords(3, 4), &config, &mut recorder),
            Err(Error::EmptyJoinInput)
        ));
        assert_eq!(recorder.strips, [(1, vec![5])]);
        assert!(recorder.merged.is_empty());
    }

    #[test]
    fn huge_slice_count_degrades() {
        let config = ConfigBuilder::new().slices(usize::MAX).build();
        let out = scramble(coords(4, 4), &config).unwrap();

        assert!(out.is_degraded());
        assert_eq!(out.rounds()[0].produced, 4);
        assert_eq!(out.rounds()[1].produced, 16);
        // every band is one pixel tall, so the rows end up in a single column
        assert_eq!(out.pixels().dimensions(), (1, 16));
    }

    #[test]
    fn scramble_keeps_every_pixel() {
        let buf = coords(6, 9);
        let config = ConfigBuilder::new().slices(3).build();
        let out = scramble(buf.clone(), &config).unwrap();

        let mut before = buf.into_raw();
        let mut after = out.into_pixels().into_raw();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[test]
    fn oversized_slice_count_degrades() {
        let config = ConfigBuilder::new().slices(6).build();
        let out = scramble(coords(3, 4), &config).unwrap();

        assert!(out.is_degraded());
        assert_eq!(out.rounds()[0].produced, 4);
    }

    #[test]
    fn single_strip_cannot_fill_even_group() {
        let config = ConfigBuilder::new().slices(1).build();
        assert!(matches!(
            scramble(coords(4, 4), &config),
            Err(Error::EmptyJoinInput)
        ));
    }

    #[test]
    fn bad_config_fails_before_work() {
        let config = ConfigBuilder::new().slices(0).build();
        assert!(matches!(
            scramble(coords(2, 2), &config),
            Err(Error::InvalidSliceCount(0))
        ));

        let config = ConfigBuilder::new().slices(2).second_rotation(30).build();
        let mut recorder = Recorder::default();
        assert!(matches!(
            scramble_with(coords(2, 2), &config, &mut recorder),
            Err(Error::UnsupportedRotation(30))
        ));
        assert!(recorder.strips.is_empty());
    }

    #[test]
    fn observer_error_aborts() {
        let config = ConfigBuilder::new().slices(2).build();
        assert!(scramble_with(coords(2, 2), &config, &mut FailOnMerge).is_err());
    }
}
