// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading.
//!
//! This module loads the bundled example images and user uploads into RGBA
//! rasters, and prepares the small previews shown in the example grid.

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Bundled example images, by file name.
pub const EXAMPLE_IMAGES: [&str; 9] = [
    "1.png", "2.png", "3.png", "4.png", "5.png", "6.png", "7.png", "8.png", "9.png",
];

/// File extensions accepted by the upload dialog.
pub const UPLOAD_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "webp", "gif"];

/// Edge length of example previews.
pub const THUMBNAIL_SIZE: u32 = 96;

/// Location of an example image inside the examples directory.
pub fn example_path(examples_dir: &Path, name: &str) -> PathBuf {
    examples_dir.join(name)
}

/// Load an image file as an RGBA raster.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path)
        .with_context(|| format!("failed to open image {}", path.display()))?
        .to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        anyhow::bail!("image has zero dimensions: {}", path.display());
    }
    Ok(image)
}

/// Load an image and shrink it to a square-bounded preview.
pub fn load_thumbnail(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path)
        .with_context(|| format!("failed to open image {}", path.display()))?;
    Ok(image
        .resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Triangle)
        .to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_load_image_and_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let path = example_path(dir.path(), EXAMPLE_IMAGES[0]);
        RgbaImage::from_pixel(400, 200, Rgba([10, 200, 30, 255]))
            .save(&path)
            .unwrap();

        let image = load_image(&path).unwrap();
        assert_eq!(image.dimensions(), (400, 200));

        let thumbnail = load_thumbnail(&path).unwrap();
        assert_eq!(thumbnail.dimensions(), (THUMBNAIL_SIZE, THUMBNAIL_SIZE / 2));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_image(Path::new("does/not/exist.png")).unwrap_err();
        assert!(format!("{:#}", err).contains("does/not/exist.png"));
    }
}
