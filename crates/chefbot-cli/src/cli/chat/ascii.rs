//! ASCII-art preview of a generated dish image.
//!
//! The image is converted to greyscale, resized to `width x width/2`
//! (terminal cells are roughly twice as tall as wide), and each pixel is
//! mapped onto a ten-step brightness ramp, dark to light.

use std::path::Path;

use image::DynamicImage;
use image::imageops::FilterType;

use chefbot_types::error::RenderError;

/// Brightness ramp from darkest to lightest.
pub const ASCII_RAMP: &[u8] = b" .:-=+*#%@";

/// Render `img` as framed ASCII art `width` columns wide.
pub fn image_to_ascii(img: &DynamicImage, width: u32) -> String {
    let width = width.max(1);
    let height = (width / 2).max(1);
    let grey = img
        .grayscale()
        .resize_exact(width, height, FilterType::Triangle)
        .to_luma8();

    let border = format!("+{}+\n", "-".repeat(width as usize));
    let mut out = String::with_capacity(border.len() * (height as usize + 2));
    out.push_str(&border);
    for row in grey.rows() {
        out.push('|');
        out.extend(row.map(|pixel| ramp_char(pixel.0[0])));
        out.push_str("|\n");
    }
    out.push_str(&border);
    out
}

fn ramp_char(luma: u8) -> char {
    let idx = usize::from(luma) * (ASCII_RAMP.len() - 1) / 255;
    char::from(ASCII_RAMP[idx])
}

/// Load an image file and render its preview.
pub fn ascii_preview(path: &Path, width: u32) -> Result<String, RenderError> {
    if !path.exists() {
        return Err(RenderError::ArtifactMissing(path.display().to_string()));
    }
    let img = image::open(path)
        .map_err(|e| RenderError::ArtifactDecode(format!("{}: {e}", path.display())))?;
    Ok(image_to_ascii(&img, width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn ramp_endpoints() {
        assert_eq!(ramp_char(0), ' ');
        assert_eq!(ramp_char(255), '@');
        assert_eq!(ramp_char(128), '=');
    }

    #[test]
    fn output_is_framed_and_sized() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(40, 40, Luma([255])));
        let art = image_to_ascii(&img, 8);
        let lines: Vec<&str> = art.lines().collect();

        assert_eq!(lines.len(), 4 + 2);
        assert_eq!(lines[0], "+--------+");
        assert_eq!(lines[5], "+--------+");
        assert!(lines[1..5].iter().all(|l| *l == "|@@@@@@@@|"));
    }

    #[test]
    fn dark_image_is_blank() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(10, 10, Luma([0])));
        let art = image_to_ascii(&img, 4);
        assert!(art.contains("|    |"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = ascii_preview(Path::new("/definitely/not/here.png"), 80).unwrap_err();
        assert!(matches!(err, RenderError::ArtifactMissing(_)));
    }

    #[test]
    fn undecodable_file_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        let err = ascii_preview(&path, 80).unwrap_err();
        assert!(matches!(err, RenderError::ArtifactDecode(_)));
    }

    #[test]
    fn real_png_round_trips_through_preview() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dish.png");
        GrayImage::from_pixel(16, 16, Luma([255])).save(&path).unwrap();
        let art = ascii_preview(&path, 6).unwrap();
        assert!(art.contains("|@@@@@@|"));
    }
}
