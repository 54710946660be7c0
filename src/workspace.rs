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

//! Scratch directory for intermediate artifacts.
//!
//! Strips are stored as `slice_<i>.png` with `i` zero-padded to two digits.
//! The file name is the only place the strip order survives on disk, so
//! [`Workspace::numbered_slices`] parses it back and sorts by it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::buffer::PixelBuffer;
use crate::codec;
use crate::error::{Error, Result};
use crate::parity::ParityGroup;
use crate::pipeline::RoundObserver;
use crate::slice::Strip;

const STRIP_PREFIX: &str = "slice_";
const STRIP_SUFFIX: &str = ".png";

pub const ODD_COMBINED: &str = "odd_combined.png";
pub const EVEN_COMBINED: &str = "even_combined.png";
pub const MERGED: &str = "merged_image.png";
pub const ROTATED: &str = "rotated.png";

pub fn strip_file_name(index: usize) -> String {
    format!("{STRIP_PREFIX}{index:02}{STRIP_SUFFIX}")
}

/// Index encoded in a strip file name, e.g. `slice_07.png` -> 7.
pub fn parse_strip_file_name(name: &str) -> Option<usize> {
    name.strip_prefix(STRIP_PREFIX)?
        .strip_suffix(STRIP_SUFFIX)?
        .parse()
        .ok()
}

/// Removes `path` and everything below it.
///
/// Returns `false` if there was nothing to remove.
pub fn remove_dir(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match fs::remove_dir_all(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed workspace");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No workspace to remove");
            Ok(false)
        }
        Err(e) => Err(Error::workspace(path)(e)),
    }
}

const ARTIFACTS: [&str; 4] = [ODD_COMBINED, EVEN_COMBINED, MERGED, ROTATED];

/// Directory holding the strips and composites of a run.
///
/// Only files named by this module are ever deleted. The directory itself is
/// removed only when the workspace created it.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    created: bool,
}

impl Workspace {
    /// Opens `root`, creating it if needed.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let created = !root.is_dir();
        fs::create_dir_all(&root).map_err(Error::workspace(&root))?;
        Ok(Self { root, created })
    }

    /// Like [`Workspace::create`], but clears artifacts left by an earlier run.
    pub fn fresh(root: impl Into<PathBuf>) -> Result<Self> {
        let ws = Self::create(root)?;
        ws.clear()?;
        Ok(ws)
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Whether the directory did not exist before this workspace.
    pub fn is_owned(&self) -> bool {
        self.created
    }

    pub fn strip_path(&self, index: usize) -> PathBuf {
        self.root.join(strip_file_name(index))
    }

    /// Replaces the stored strips with `strips`.
    pub fn save_strips(&self, strips: &[Strip]) -> Result<usize> {
        self.clear_strips()?;
        strips
            .par_iter()
            .try_for_each(|s| codec::save(s.pixels(), self.strip_path(s.index())))?;

        if strips.is_empty() {
            info!("No slices were created");
        } else {
            info!("Successfully created {} slices", strips.len());
        }
        Ok(strips.len())
    }

    /// Deletes stored strips, leaving other artifacts alone.
    pub fn clear_strips(&self) -> Result<usize> {
        let stale = self.numbered_slices(None)?;
        for (_, path) in &stale {
            fs::remove_file(path).map_err(Error::workspace(path))?;
        }
        Ok(stale.len())
    }

    /// Deletes stored strips and composites. Unrelated files stay.
    pub fn clear(&self) -> Result<usize> {
        let mut removed = self.clear_strips()?;
        for name in ARTIFACTS {
            let path = self.root.join(name);
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(Error::workspace(path)(e)),
            }
        }
        Ok(removed)
    }

    /// Stored strips in ascending index order, optionally of one parity.
    pub fn numbered_slices(&self, parity: Option<ParityGroup>) -> Result<Vec<(usize, PathBuf)>> {
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(Error::workspace(&self.root))? {
            let entry = entry.map_err(Error::workspace(&self.root))?;
            let name = entry.file_name();
            let Some(index) = name.to_str().and_then(parse_strip_file_name) else {
                continue;
            };
            if parity.map_or(true, |p| p.contains(index)) {
                found.push((index, entry.path()));
            }
        }

        found.sort_unstable_by_key(|&(i, _)| i);
        Ok(found)
    }

    /// Reads stored strips back, see [`Workspace::numbered_slices`].
    pub fn load_strips(&self, parity: Option<ParityGroup>) -> Result<Vec<Strip>> {
        self.numbered_slices(parity)?
            .into_par_iter()
            .map(|(index, path)| Ok(Strip::new(index, codec::load(path)?)))
            .collect()
    }

    pub fn save_artifact(&self, name: &str, buffer: &PixelBuffer) -> Result<PathBuf> {
        let path = self.root.join(name);
        codec::save(buffer, &path)?;
        Ok(path)
    }

    /// Removes the directory if this workspace created it, otherwise only
    /// its own files. Returns `true` if the directory is gone.
    pub fn remove(self) -> Result<bool> {
        if self.created {
            remove_dir(&self.root)
        } else {
            self.clear()?;
            Ok(false)
        }
    }

    /// Runs `f`, then removes the workspace unless `keep` is set.
    ///
    /// An error from `f` wins over an error from the cleanup.
    pub fn run<T, F>(mut self, keep: bool, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let res = f(&mut self);
        let cleanup = if keep { Ok(false) } else { self.remove() };

        match (res, cleanup) {
            (Err(e), Err(c)) => {
                warn!(error = %c, "Workspace cleanup failed");
                Err(e)
            }
            (res, cleanup) => {
                cleanup?;
                res
            }
        }
    }
}

impl RoundObserver for Workspace {
    fn strips(&mut self, _round: usize, strips: &[Strip]) -> Result<()> {
        self.save_strips(strips).map(drop)
    }

    fn composite(&mut self, _round: usize, group: ParityGroup, buffer: &PixelBuffer) -> Result<()> {
        let name = match group {
            ParityGroup::Odd => ODD_COMBINED,
            ParityGroup::Even => EVEN_COMBINED,
        };
        self.save_artifact(name, buffer).map(drop)
    }

    fn merged(&mut self, _round: usize, buffer: &PixelBuffer) -> Result<()> {
        self.save_artifact(MERGED, buffer).map(drop)
    }

    fn rotated(&mut self, _round: usize, buffer: &PixelBuffer) -> Result<()> {
        self.save_artifact(ROTATED, buffer).map(drop)
    }
}
