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

//! Decoding files into [`PixelBuffer`]s and encoding them back.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::io::Reader as ImageReader;
use image::{save_buffer, ColorType, RgbImage};
use tracing::{debug, info};

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::error::{Error, Result};

/// Loads any image the `image` crate can decode, converted to RGB8.
pub fn load(path: impl AsRef<Path>) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let missing = |source| Error::InputMissing {
        path: path.to_owned(),
        source,
    };
    let unsupported = |source| Error::UnsupportedInput {
        path: path.to_owned(),
        source,
    };

    let reader = ImageReader::new(BufReader::new(File::open(path).map_err(missing)?))
        .with_guessed_format()
        .map_err(missing)?;
    let format = reader.format();
    let im = reader.decode().map_err(unsupported)?;

    info!(
        path = %path.display(),
        ?format,
        width = im.width(),
        height = im.height(),
        color = ?im.color(),
        "Loaded image"
    );

    from_rgb_image(im.into_rgb8())
}

/// Saves `buffer` as RGB8, format picked from the extension of `path`.
pub fn save(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let (width, height) = dimensions_u32(buffer.width(), buffer.height())?;

    save_buffer(path, buffer.as_raw(), width, height, ColorType::Rgb8).map_err(|source| {
        Error::Encode {
            path: path.to_owned(),
            source,
        }
    })?;
    debug!(path = %path.display(), width, height, "Saved image");
    Ok(())
}

pub fn from_rgb_image(im: RgbImage) -> Result<PixelBuffer> {
    let (width, height) = im.dimensions();
    PixelBuffer::from_raw(width as usize, height as usize, im.into_raw())
}

pub fn to_rgb_image(buffer: &PixelBuffer) -> Result<RgbImage> {
    let (width, height) = dimensions_u32(buffer.width(), buffer.height())?;
    RgbImage::from_raw(width, height, buffer.as_raw().to_vec()).ok_or(Error::BufferLength {
        expected: buffer.width() * buffer.height() * CHANNELS,
        actual: buffer.as_raw().len(),
    })
}

fn dimensions_u32(width: usize, height: usize) -> Result<(u32, u32)> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(Error::TooLarge { width, height }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> PixelBuffer {
        PixelBuffer::from_fn(5, 3, |x, y| [x as u8 * 40, y as u8 * 80, 7]).unwrap()
    }

    #[test]
    fn png_keeps_pixels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.png");

        save(&sample(), &path).unwrap();
        assert_eq!(load(&path).unwrap(), sample());
    }

    #[test]
    fn load_converts_to_rgb() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gray.png");
        image::GrayImage::from_pixel(2, 2, image::Luma([99]))
            .save(&path)
            .unwrap();

        let buf = load(&path).unwrap();
        assert_eq!(buf.dimensions(), (2, 2));
        assert_eq!(buf.pixel(1, 1), Some([99, 99, 99]));
    }

    #[test]
    fn missing_file() {
        let dir = tempdir().unwrap();
        let err = load(dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, Error::InputMissing { .. }));
    }

    #[test]
    fn garbage_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("junk.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedInput { .. }));
    }

    #[test]
    fn rgb_image_conversion() {
        let im = to_rgb_image(&sample()).unwrap();
        assert_eq!(im.get_pixel(4, 2).0, [160, 160, 7]);
        assert_eq!(from_rgb_image(im).unwrap(), sample());
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert_eq!(dimensions_u32(5, 3).unwrap(), (5, 3));
        assert_eq!(
            dimensions_u32(u32::MAX as usize, 1).unwrap(),
            (u32::MAX, 1)
        );

        #[cfg(target_pointer_width = "64")]
        {
            let wide = u32::MAX as usize + 1;
            assert!(matches!(
                dimensions_u32(wide, 2),
                Err(Error::TooLarge { width, height: 2 }) if width == wide
            ));
            assert!(matches!(
                dimensions_u32(2, wide),
                Err(Error::TooLarge { .. })
            ));
        }
    }
}
