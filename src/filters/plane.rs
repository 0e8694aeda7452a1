//! Floating-point sample planes and the neighborhood operations shared by
//! the built-in filters.
//!
//! Images are split into one `f32` plane per channel, filtered, then
//! quantized back to 8 bits. Rows are processed in parallel with rayon.

use image::{GrayImage, Luma, Rgb, RgbImage};
use rayon::prelude::*;

/// How samples outside the image are synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Border {
    /// `gfedcb|abcdefgh|gfedcba`
    Reflect101,
    /// `aaaaaa|abcdefgh|hhhhhhh`
    Replicate,
}

impl Border {
    /// Map a possibly out-of-range coordinate onto `0..len`.
    pub(crate) fn index(self, i: isize, len: usize) -> usize {
        let n = len as isize;
        if (0..n).contains(&i) {
            return i as usize;
        }
        match self {
            Border::Replicate => i.clamp(0, n - 1) as usize,
            Border::Reflect101 => {
                if n == 1 {
                    return 0;
                }
                let period = 2 * (n - 1);
                let i = i.rem_euclid(period);
                (if i >= n { period - i } else { i }) as usize
            }
        }
    }
}

/// A single channel of `f32` samples in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Plane {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl Plane {
    pub(crate) fn from_gray(image: &GrayImage) -> Self {
        Self {
            width: image.width() as usize,
            height: image.height() as usize,
            data: image.as_raw().iter().map(|&v| v as f32).collect(),
        }
    }

    /// Split a color image into red, green and blue planes.
    pub(crate) fn split_rgb(image: &RgbImage) -> [Plane; 3] {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let mut planes = [
            Vec::with_capacity(width * height),
            Vec::with_capacity(width * height),
            Vec::with_capacity(width * height),
        ];
        for pixel in image.pixels() {
            for (plane, &sample) in planes.iter_mut().zip(pixel.0.iter()) {
                plane.push(sample as f32);
            }
        }
        planes.map(|data| Plane { width, height, data })
    }

    #[inline]
    pub(crate) fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Quantize to an 8-bit grayscale image.
    pub(crate) fn to_gray(&self, quantize: impl Fn(f32) -> u8) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            Luma([quantize(self.get(x as usize, y as usize))])
        })
    }
}

/// Merge three planes into a color image, quantizing each sample.
pub(crate) fn merge_rgb(planes: &[Plane; 3], quantize: impl Fn(f32) -> u8) -> RgbImage {
    let [r, g, b] = planes;
    RgbImage::from_fn(r.width as u32, r.height as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        Rgb([quantize(r.get(x, y)), quantize(g.get(x, y)), quantize(b.get(x, y))])
    })
}

/// Round to nearest and saturate to `[0, 255]`.
#[inline]
pub(crate) fn saturate(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Clip to `[0, 255]` and truncate toward zero.
#[inline]
pub(crate) fn clip_truncate(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Correlate with `h` along rows, then `v` along columns.
pub(crate) fn separable(src: &Plane, h: &[f32], v: &[f32], border: Border) -> Plane {
    if src.is_empty() {
        return src.clone();
    }
    let (width, height) = (src.width, src.height);
    let rx = (h.len() / 2) as isize;
    let ry = (v.len() / 2) as isize;

    let mut horizontal = vec![0.0f32; width * height];
    horizontal
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let src_row = &src.data[y * width..(y + 1) * width];
            for (x, out) in row.iter_mut().enumerate() {
                *out = h
                    .iter()
                    .enumerate()
                    .map(|(i, &k)| k * src_row[border.index(x as isize + i as isize - rx, width)])
                    .sum();
            }
        });

    let mut data = vec![0.0f32; width * height];
    data.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            *out = v
                .iter()
                .enumerate()
                .map(|(j, &k)| {
                    let sy = border.index(y as isize + j as isize - ry, height);
                    k * horizontal[sy * width + x]
                })
                .sum();
        }
    });

    Plane { width, height, data }
}

/// Correlate with a 3x3 kernel (not flipped).
pub(crate) fn correlate3x3(src: &Plane, kernel: &[[f32; 3]; 3], border: Border) -> Plane {
    if src.is_empty() {
        return src.clone();
    }
    let (width, height) = (src.width, src.height);
    let mut data = vec![0.0f32; width * height];
    data.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (ky, kernel_row) in kernel.iter().enumerate() {
                let sy = border.index(y as isize + ky as isize - 1, height);
                for (kx, &k) in kernel_row.iter().enumerate() {
                    let sx = border.index(x as isize + kx as isize - 1, width);
                    acc += k * src.get(sx, sy);
                }
            }
            *out = acc;
        }
    });
    Plane { width, height, data }
}

/// 1-D Gaussian kernel of odd length `size`, normalized to sum 1.
///
/// Small sizes use fixed tables; larger ones derive sigma from the size.
pub(crate) fn gaussian_kernel(size: usize) -> Vec<f32> {
    match size {
        1 => vec![1.0],
        3 => vec![0.25, 0.5, 0.25],
        5 => vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => vec![0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
        _ => {
            let sigma = gaussian_sigma(size);
            let center = (size / 2) as f64;
            let scale = -0.5 / (sigma * sigma);
            let raw: Vec<f64> = (0..size)
                .map(|i| {
                    let d = i as f64 - center;
                    (scale * d * d).exp()
                })
                .collect();
            let sum: f64 = raw.iter().sum();
            raw.iter().map(|w| (w / sum) as f32).collect()
        }
    }
}

/// Standard deviation implied by a Gaussian kernel size.
pub(crate) fn gaussian_sigma(size: usize) -> f64 {
    0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Row `n - 1` of Pascal's triangle, as a kernel of length `n`.
pub(crate) fn binomial(n: usize) -> Vec<f32> {
    let mut row = vec![1.0f32];
    for _ in 1..n {
        let mut next = vec![1.0f32; row.len() + 1];
        for i in 1..row.len() {
            next[i] = row[i - 1] + row[i];
        }
        row = next;
    }
    row
}

/// BT.601 luma in 14-bit fixed point, rounded.
pub(crate) fn to_grayscale(image: &RgbImage) -> GrayImage {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    const HALF: u32 = 1 << 13;

    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgb([r, g, b]) = *image.get_pixel(x, y);
        Luma([((r as u32 * R + g as u32 * G + b as u32 * B + HALF) >> 14) as u8])
    })
}
