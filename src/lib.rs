//! Library to scramble an image by cutting it into strips and
//! reassembling them out of order.
//!
//! The entry point is [scramble]. One round:
//!
//! * Cuts the image into `N` strips (row bands by default).
//! * Joins the odd numbered strips side by side, then the even ones.
//! * Puts the odd composite left of the even composite.
//! * Turns the result (90 degrees counter-clockwise after the first round,
//!   270 after the second).
//!
//! Two rounds are run. No pixel is duplicated or lost, except for black
//! padding when the strips of a group differ in size. There is no key and the
//! transform is not meant to be cryptographically secure.
//!
//! ```
//! use stripscramble::{scramble, ConfigBuilder, PixelBuffer};
//!
//! let image = PixelBuffer::from_fn(4, 8, |x, y| [x as u8, y as u8, 0]).unwrap();
//! let config = ConfigBuilder::new().slices(4).build();
//!
//! let out = scramble(image, &config).unwrap();
//! assert_eq!(out.pixels().dimensions(), (4, 8));
//! ```

// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//

mod buffer;
pub mod codec;
mod error;
mod join;
mod parity;
mod pipeline;
mod rotate;
mod slice;
pub mod workspace;

#[doc(inline)]
pub use crate::buffer::{Axis, PixelBuffer, CHANNELS};
pub use crate::error::{Error, Result};
#[doc(inline)]
pub use crate::join::{concat, join};
#[doc(inline)]
pub use crate::parity::{split, ParityGroup};
#[doc(inline)]
pub use crate::pipeline::{
    run_round, scramble, scramble_with, Config, ConfigBuilder, RoundObserver, RoundReport,
    Scrambled, DEFAULT_SLICES,
};
#[doc(inline)]
pub use crate::rotate::{rotate, QuarterTurn};
#[doc(inline)]
pub use crate::slice::{slice, strip_size, Strip};
#[doc(inline)]
pub use crate::workspace::Workspace;
