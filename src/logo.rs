use anyhow::{Context, Result};
use image::{DynamicImage, GenericImageView};

/// Braille dots per card logo: 2x4 dots per cell, so 12 columns by 4 rows.
pub const LOGO_DOTS_X: u32 = 24;
pub const LOGO_DOTS_Y: u32 = 16;

const ALPHA_CUTOFF: u8 = 128;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoPoint {
    pub x: f64,
    pub y: f64,
    pub rgb: (u8, u8, u8),
}

/// A logo sampled down to a fixed dot grid, y pointing up as canvas coordinates do.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoArt {
    pub width: u32,
    pub height: u32,
    pub points: Vec<LogoPoint>,
}

pub fn decode_logo(bytes: &[u8], width: u32, height: u32) -> Result<LogoArt> {
    let img = image::load_from_memory(bytes).context("undecodable logo")?;
    Ok(sample_logo(&img, width, height))
}

/// Nearest-neighbour sampling; mostly transparent pixels are skipped.
pub fn sample_logo(img: &DynamicImage, width: u32, height: u32) -> LogoArt {
    let (w, h) = img.dimensions();
    let mut points = Vec::new();
    if w == 0 || h == 0 || width == 0 || height == 0 {
        return LogoArt {
            width,
            height,
            points,
        };
    }
    for y in 0..height {
        for x in 0..width {
            let img_x = ((x as u64 * w as u64) / width as u64) as u32;
            let img_y = ((y as u64 * h as u64) / height as u64) as u32;
            let p = img.get_pixel(img_x.min(w - 1), img_y.min(h - 1));
            if p[3] <= ALPHA_CUTOFF {
                continue;
            }
            points.push(LogoPoint {
                x: x as f64,
                y: (height - 1 - y) as f64,
                rgb: (p[0], p[1], p[2]),
            });
        }
    }
    LogoArt {
        width,
        height,
        points,
    }
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, Rgba, RgbaImage};

    use super::{decode_logo, sample_logo};

    #[test]
    fn transparent_pixels_are_dropped() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        img.put_pixel(0, 0, Rgba([200, 10, 10, 255]));
        let art = sample_logo(&DynamicImage::ImageRgba8(img), 4, 4);
        assert_eq!(art.points.len(), 1);
        // Top-left pixel lands on the highest canvas row.
        assert_eq!(art.points[0].x, 0.0);
        assert_eq!(art.points[0].y, 3.0);
        assert_eq!(art.points[0].rgb, (200, 10, 10));
    }

    #[test]
    fn opaque_image_fills_grid() {
        let img = RgbaImage::from_pixel(100, 50, Rgba([1, 2, 3, 255]));
        let art = sample_logo(&DynamicImage::ImageRgba8(img), 24, 16);
        assert_eq!(art.points.len(), 24 * 16);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(decode_logo(b"not an image", 24, 16).is_err());
    }
}
