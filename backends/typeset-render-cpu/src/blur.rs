//! Gaussian blur for soft shadows
//!
//! Two 1-D passes (rows, then columns) with a normalized kernel. The layer
//! is premultiplied, so every channel can be blurred independently. Pixels
//! beyond the edge count as transparent, which lets the shadow fade out at
//! the border instead of smearing.

use typeset_core::PixelBuffer;

/// Kernel for `radius`: sigma is a third of the radius, the kernel reaches
/// `ceil(radius)` pixels to each side
fn kernel(radius: f32) -> Vec<f32> {
    let half = radius.ceil() as i64;
    let sigma = (radius / 3.0).max(0.5);
    let denominator = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (-half..=half)
        .map(|i| (-((i * i) as f32) / denominator).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    for weight in &mut weights {
        *weight /= sum;
    }
    weights
}

fn blur_pass(
    source: &[u8],
    target: &mut [u8],
    width: usize,
    height: usize,
    bpp: usize,
    weights: &[f32],
    horizontal: bool,
) {
    let half = (weights.len() / 2) as i64;
    let (outer, inner) = if horizontal { (height, width) } else { (width, height) };
    for o in 0..outer {
        for i in 0..inner {
            let mut sums = [0f32; 4];
            for (k, weight) in weights.iter().enumerate() {
                let j = i as i64 + k as i64 - half;
                if j < 0 || j >= inner as i64 {
                    continue;
                }
                let (x, y) = if horizontal { (j as usize, o) } else { (o, j as usize) };
                let start = (y * width + x) * bpp;
                for (channel, sum) in sums.iter_mut().enumerate().take(bpp) {
                    *sum += f32::from(source[start + channel]) * weight;
                }
            }
            let (x, y) = if horizontal { (i, o) } else { (o, i) };
            let start = (y * width + x) * bpp;
            for (channel, sum) in sums.iter().enumerate().take(bpp) {
                target[start + channel] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Blur `buffer` in place; radii below one hundredth of a pixel do nothing
pub fn apply_gaussian_blur(buffer: &mut PixelBuffer, radius: f32) {
    if radius <= 0.01 || buffer.is_empty() {
        return;
    }
    let weights = kernel(radius);
    let width = buffer.width() as usize;
    let height = buffer.height() as usize;
    let bpp = buffer.format().bytes_per_pixel();

    let mut scratch = vec![0u8; buffer.data().len()];
    blur_pass(buffer.data(), &mut scratch, width, height, bpp, &weights, true);
    blur_pass(&scratch, buffer.data_mut(), width, height, bpp, &weights, false);
    log::trace!("blurred {}x{} layer, radius {}", width, height, radius);
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeset_core::PixelFormat;

    #[test]
    fn test_kernel_is_normalized_and_symmetric() {
        let weights = kernel(3.0);
        assert_eq!(weights.len(), 7);
        let sum: f32 = weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!((weights[0] - weights[6]).abs() < 1e-6);
        assert!(weights[3] > weights[2]);
    }

    #[test]
    fn test_blur_spreads_a_point() {
        let mut buffer = PixelBuffer::new(9, 9, PixelFormat::L8);
        buffer.data_mut()[4 * 9 + 4] = 255;
        apply_gaussian_blur(&mut buffer, 2.0);
        let center = buffer.alpha(4, 4).unwrap_or(0);
        let near = buffer.alpha(5, 4).unwrap_or(0);
        assert!(center < 255);
        assert!(near > 0);
        assert!(center >= near);
        assert_eq!(buffer.alpha(0, 0), Some(0));
    }

    #[test]
    fn test_flat_interior_is_stable() {
        let mut buffer = PixelBuffer::new(16, 16, PixelFormat::Rgba8888);
        buffer.data_mut().fill(200);
        apply_gaussian_blur(&mut buffer, 1.5);
        assert_eq!(buffer.pixel(8, 8), Some(&[200u8, 200, 200, 200][..]));
        // edges fade against transparent surroundings
        assert!(buffer.alpha(0, 0).unwrap_or(255) < 200);
    }

    #[test]
    fn test_zero_radius_is_noop() {
        let mut buffer = PixelBuffer::new(2, 2, PixelFormat::L8);
        buffer.data_mut()[0] = 77;
        apply_gaussian_blur(&mut buffer, 0.0);
        assert_eq!(buffer.data(), &[77, 0, 0, 0]);
    }
}
