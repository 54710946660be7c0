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

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Image file not found: {}", path.display())]
    InputMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot decode image file {}", path.display())]
    UnsupportedInput {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Cannot encode image to {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image too large to encode ({width}x{height})")]
    TooLarge { width: usize, height: usize },

    #[error("Cannot join an empty strip sequence")]
    EmptyJoinInput,

    #[error("Workspace I/O failed on {}", path.display())]
    WorkspaceIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid slice count: {0}. Must be at least 1")]
    InvalidSliceCount(usize),

    #[error("Unsupported rotation: {0} degrees. Must be a multiple of 90")]
    UnsupportedRotation(i32),

    #[error("Empty pixel buffer ({width}x{height})")]
    EmptyBuffer { width: usize, height: usize },

    #[error("Pixel storage has {actual} bytes, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn workspace(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::WorkspaceIo { path, source }
    }
}
