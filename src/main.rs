//! Main Program for Stripscramble
//! Run with `--help` for more instruction

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

use std::path::PathBuf;

use anyhow::{Context, Error};
use clap::{ArgAction, Parser, ValueEnum};
use stripscramble::{codec, scramble, scramble_with, Axis, ConfigBuilder, Workspace, DEFAULT_SLICES};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SliceAxis {
    /// Row bands
    Vertical,
    /// Column bands
    Horizontal,
}

impl From<SliceAxis> for Axis {
    fn from(v: SliceAxis) -> Self {
        match v {
            SliceAxis::Vertical => Axis::Vertical,
            SliceAxis::Horizontal => Axis::Horizontal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version)]
struct Args {
    /// Input file
    input: PathBuf,

    /// Number of strips per round (at most the image height)
    #[arg(short = 'n', long, default_value_t = DEFAULT_SLICES)]
    slices: usize,

    /// Direction to cut strips in
    #[arg(long, value_enum, default_value_t = SliceAxis::Vertical)]
    axis: SliceAxis,

    /// Save strips and composites to this directory
    #[arg(short = 'w', long)]
    workspace: Option<PathBuf>,

    /// Don't delete the workspace afterwards
    #[arg(long, requires = "workspace")]
    keep_workspace: bool,

    /// Increase log level (repeatable)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Output file
    #[arg(short = 'o', long)]
    output: PathBuf,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let config = ConfigBuilder::new()
        .slices(args.slices)
        .axis(args.axis.into())
        .build();

    let im = codec::load(&args.input)?;

    let out = if let Some(dir) = &args.workspace {
        Workspace::fresh(dir)?.run(args.keep_workspace, |ws| scramble_with(im, &config, ws))?
    } else {
        scramble(im, &config)?
    };

    codec::save(out.pixels(), &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    let (width, height) = out.pixels().dimensions();
    info!(output = %args.output.display(), width, height, "Done");

    Ok(())
}
