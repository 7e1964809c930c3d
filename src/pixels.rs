//! Coarse color, brightness, contrast and sharpness statistics.
//!
//! Color is averaged over a fixed 100x100 downsample of the image; contrast,
//! sharpness and the grayscale mean are taken at full resolution.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};
use serde::Serialize;

/// Side length of the canvas the color average is computed on.
pub const COLOR_CANVAS_SIZE: u32 = 100;

/// Mean channel values, kept by name so blue/red order can't be mixed up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelMeans {
    pub blue: f64,
    pub green: f64,
    pub red: f64,
}

impl ChannelMeans {
    /// Arithmetic mean of the three channels.
    pub fn brightness(&self) -> f64 {
        (self.blue + self.green + self.red) / 3.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelStats {
    /// Average color of the 100x100 canvas.
    pub mean_color: ChannelMeans,
    /// Mean of `mean_color`'s channels.
    pub brightness: f64,
    /// Standard deviation of the full-resolution grayscale image.
    pub contrast: f64,
    /// Variance of the Laplacian response over the grayscale image.
    pub sharpness: f64,
    /// Mean of the full-resolution grayscale image.
    pub gray_mean: f64,
}

impl PixelStats {
    pub fn from_image(image: &RgbImage) -> Self {
        let mean_color = mean_color(image);
        let gray = to_gray(image);
        let (gray_mean, contrast) = mean_and_std(&gray);

        Self {
            mean_color,
            brightness: mean_color.brightness(),
            contrast,
            sharpness: laplacian_variance(&gray),
            gray_mean,
        }
    }
}

/// Average color over a bilinear downsample to the fixed canvas.
pub fn mean_color(image: &RgbImage) -> ChannelMeans {
    let small = imageops::resize(
        image,
        COLOR_CANVAS_SIZE,
        COLOR_CANVAS_SIZE,
        FilterType::Triangle,
    );

    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for p in small.pixels() {
        r += u64::from(p.0[0]);
        g += u64::from(p.0[1]);
        b += u64::from(p.0[2]);
    }

    let n = f64::from(small.width() * small.height()).max(1.0);
    ChannelMeans {
        blue: b as f64 / n,
        green: g as f64 / n,
        red: r as f64 / n,
    }
}

/// BT.601 luma conversion, rounded to the nearest integer.
pub fn to_gray(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        let [r, g, b] = p.0.map(f64::from);
        let luma = 0.299 * r + 0.587 * g + 0.114 * b;
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}

/// Population mean and standard deviation of a grayscale image.
pub fn mean_and_std(gray: &GrayImage) -> (f64, f64) {
    let n = gray.width() as usize * gray.height() as usize;
    if n == 0 {
        return (0.0, 0.0);
    }

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for p in gray.pixels() {
        let v = f64::from(p.0[0]);
        sum += v;
        sum_sq += v * v;
    }

    let mean = sum / n as f64;
    let variance = (sum_sq / n as f64 - mean * mean).max(0.0);
    (mean, variance.sqrt())
}

/// Reflect-101 border index: `-1 -> 1`, `n -> n - 2`.
#[inline]
fn reflect_101(i: i64, n: i64) -> u32 {
    if n == 1 {
        return 0;
    }
    let mut i = i;
    if i < 0 {
        i = -i;
    }
    if i >= n {
        i = 2 * n - 2 - i;
    }
    i as u32
}

/// Variance of the 4-neighbour Laplacian `[0,1,0; 1,-4,1; 0,1,0]`.
///
/// Every pixel contributes; neighbours outside the image are mirrored
/// without repeating the edge pixel.
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (w, h) = (i64::from(gray.width()), i64::from(gray.height()));
    if w == 0 || h == 0 {
        return 0.0;
    }

    let at = |x: i64, y: i64| -> f64 {
        f64::from(gray.get_pixel(reflect_101(x, w), reflect_101(y, h)).0[0])
    };

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for y in 0..h {
        for x in 0..w {
            let response =
                at(x, y - 1) + at(x, y + 1) + at(x - 1, y) + at(x + 1, y) - 4.0 * at(x, y);
            sum += response;
            sum_sq += response * response;
        }
    }

    let n = (w * h) as f64;
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn uniform_image_has_flat_statistics() {
        // BGR (200, 200, 200)
        let img = RgbImage::from_pixel(100, 100, Rgb([200, 200, 200]));
        let stats = PixelStats::from_image(&img);

        assert!((stats.mean_color.blue - 200.0).abs() < 1e-9);
        assert!((stats.mean_color.green - 200.0).abs() < 1e-9);
        assert!((stats.mean_color.red - 200.0).abs() < 1e-9);
        assert!((stats.brightness - 200.0).abs() < 1e-9);
        assert!((stats.gray_mean - 200.0).abs() < 1e-9);
        assert_eq!(stats.contrast, 0.0);
        assert_eq!(stats.sharpness, 0.0);
    }

    #[test]
    fn channel_means_keep_their_names() {
        let img = RgbImage::from_pixel(37, 53, Rgb([220, 150, 90]));
        let means = mean_color(&img);

        assert!((means.red - 220.0).abs() < 1e-9);
        assert!((means.green - 150.0).abs() < 1e-9);
        assert!((means.blue - 90.0).abs() < 1e-9);
    }

    #[test]
    fn gray_uses_bt601_weights() {
        let img = RgbImage::from_pixel(1, 1, Rgb([255, 0, 0]));
        // 0.299 * 255 = 76.245
        assert_eq!(to_gray(&img).get_pixel(0, 0).0[0], 76);

        let img = RgbImage::from_pixel(1, 1, Rgb([0, 255, 0]));
        // 0.587 * 255 = 149.685
        assert_eq!(to_gray(&img).get_pixel(0, 0).0[0], 150);
    }

    #[test]
    fn half_black_half_white_contrast() {
        let gray = GrayImage::from_fn(10, 10, |x, _| {
            if x < 5 {
                Luma([0])
            } else {
                Luma([255])
            }
        });
        let (mean, std) = mean_and_std(&gray);

        assert!((mean - 127.5).abs() < 1e-9);
        assert!((std - 127.5).abs() < 1e-9);
    }

    #[test]
    fn reflect_101_borders() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(0, 5), 0);
        assert_eq!(reflect_101(4, 5), 4);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(-1, 1), 0);
        assert_eq!(reflect_101(1, 1), 0);
    }

    #[test]
    fn single_bright_pixel_laplacian() {
        // 5x5 black with a centered pixel of 10: response -40 at the center,
        // +10 at its four neighbours, 0 elsewhere.
        let gray = GrayImage::from_fn(5, 5, |x, y| {
            if x == 2 && y == 2 {
                Luma([10])
            } else {
                Luma([0])
            }
        });

        let n = 25.0;
        let mean = (-40.0 + 4.0 * 10.0) / n;
        let expected = (1600.0 + 4.0 * 100.0) / n - mean * mean;
        assert!((laplacian_variance(&gray) - expected).abs() < 1e-9);
    }

    #[test]
    fn noisy_images_are_sharper() {
        let flat = GrayImage::from_pixel(20, 20, Luma([128]));
        let checker = GrayImage::from_fn(20, 20, |x, y| {
            if (x + y) % 2 == 0 {
                Luma([0])
            } else {
                Luma([255])
            }
        });

        assert!(laplacian_variance(&checker) > laplacian_variance(&flat));
    }
}
