//! CPU image filters applied to layer pixmaps (premultiplied RGBA8).

use tiny_skia::Pixmap;

use crate::paint::ColorMatrix;

/// Gaussian blur approximated by three box blurs per axis.
pub fn gaussian_blur(pixmap: &mut Pixmap, sigma_x: f32, sigma_y: f32) {
    let w = pixmap.width() as usize;
    let h = pixmap.height() as usize;
    let data = pixmap.data_mut();
    let mut scratch = vec![0u8; data.len()];

    if sigma_x > 0.0 {
        for r in box_radii(sigma_x) {
            box_blur(data, &mut scratch, w, h, r, Axis::X);
        }
    }
    if sigma_y > 0.0 {
        for r in box_radii(sigma_y) {
            box_blur(data, &mut scratch, w, h, r, Axis::Y);
        }
    }
}

/// Box radii whose three-pass convolution approximates a Gaussian of `sigma`.
pub(crate) fn box_radii(sigma: f32) -> [usize; 3] {
    const PASSES: f32 = 3.0;
    let var12 = 12.0 * sigma * sigma;
    let ideal = (var12 / PASSES + 1.0).sqrt();
    let mut lower = ideal.floor() as i32;
    if lower % 2 == 0 {
        lower -= 1;
    }
    let lower = lower.max(1);
    let upper = lower + 2;
    let l = lower as f32;
    let m = ((var12 - PASSES * l * l - 4.0 * PASSES * l - 3.0 * PASSES) / (-4.0 * l - 4.0)).round() as i32;

    let mut out = [0usize; 3];
    for (i, r) in out.iter_mut().enumerate() {
        let size = if (i as i32) < m { lower } else { upper };
        *r = ((size - 1) / 2) as usize;
    }
    out
}

#[derive(Copy, Clone)]
enum Axis {
    X,
    Y,
}

fn box_blur(data: &mut [u8], scratch: &mut [u8], w: usize, h: usize, r: usize, axis: Axis) {
    if r == 0 || w == 0 || h == 0 {
        return;
    }
    let (lines, len, line_stride, step) = match axis {
        Axis::X => (h, w, w * 4, 4),
        Axis::Y => (w, h, 4, w * 4),
    };
    let div = (2 * r + 1) as u32;
    let last = len as isize - 1;
    let r = r as isize;

    for line in 0..lines {
        let base = line * line_stride;
        for c in 0..4 {
            let at = |i: isize| base + (i.clamp(0, last) as usize) * step + c;
            let mut sum: u32 = (-r..=r).map(|i| data[at(i)] as u32).sum();
            for i in 0..len as isize {
                scratch[at(i)] = ((sum + div / 2) / div) as u8;
                sum += data[at(i + r + 1)] as u32;
                sum -= data[at(i - r)] as u32;
            }
        }
    }
    data.copy_from_slice(scratch);
}

/// Applies `matrix` to every pixel, working in straight alpha.
pub fn apply_color_matrix(pixmap: &mut Pixmap, matrix: &ColorMatrix) {
    for px in pixmap.data_mut().chunks_exact_mut(4) {
        let a = px[3] as f32 / 255.0;
        let straight = if a > 0.0 {
            [
                px[0] as f32 / 255.0 / a,
                px[1] as f32 / 255.0 / a,
                px[2] as f32 / 255.0 / a,
                a,
            ]
        } else {
            [0.0; 4]
        };
        let [r, g, b, a] = matrix.apply(straight);
        let a8 = (a * 255.0).round() as u8;
        let premul = |v: f32| ((v * a * 255.0).round() as u8).min(a8);
        px[0] = premul(r);
        px[1] = premul(g);
        px[2] = premul(b);
        px[3] = a8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_radii_grow_with_sigma() {
        assert_eq!(box_radii(0.1), [0, 0, 0]);
        let small = box_radii(2.0);
        let large = box_radii(8.0);
        assert!(large.iter().sum::<usize>() > small.iter().sum::<usize>());
    }

    #[test]
    fn blur_spreads_a_single_pixel() {
        let mut pm = Pixmap::new(9, 1).unwrap();
        pm.data_mut()[4 * 4..4 * 4 + 4].copy_from_slice(&[255, 255, 255, 255]);
        gaussian_blur(&mut pm, 1.5, 0.0);

        let alpha: Vec<u8> = pm.data().chunks_exact(4).map(|p| p[3]).collect();
        assert!(alpha[4] < 255);
        assert!(alpha[3] > 0 && alpha[5] > 0);
        assert_eq!(alpha[3], alpha[5]);
    }

    #[test]
    fn grayscale_matrix_equalizes_channels() {
        let mut pm = Pixmap::new(1, 1).unwrap();
        pm.data_mut().copy_from_slice(&[255, 0, 0, 255]);
        apply_color_matrix(&mut pm, &ColorMatrix::GRAYSCALE);
        let px = pm.data();
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert_eq!(px[3], 255);
    }
}
