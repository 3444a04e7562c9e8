//! Output dimension math and resampling.

use image::imageops::FilterType;
use tracing::debug;

use super::codec::ImageHandle;

/// Resampling filter for every resize; fixed so output is identical across formats.
const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Computes output dimensions for a `width`×`height` source.
///
/// The percentage scale is applied first (floored, at least 1 px per axis),
/// then a uniform downscale so the result fits within `max_w`×`max_h`.
/// A bound of 0 leaves that axis unconstrained; the clamp never enlarges.
pub fn compute_resize(width: u32, height: u32, percent: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let (mut w, mut h) = (width, height);

    if percent != 100 {
        w = scale_axis(w, percent as f64 / 100.0);
        h = scale_axis(h, percent as f64 / 100.0);
    }

    if max_w > 0 || max_h > 0 {
        let mut factor = 1.0_f64;
        if max_w > 0 {
            factor = factor.min(max_w as f64 / w as f64);
        }
        if max_h > 0 {
            factor = factor.min(max_h as f64 / h as f64);
        }
        if factor < 1.0 {
            w = scale_axis(w, factor);
            h = scale_axis(h, factor);
        }
    }

    (w, h)
}

fn scale_axis(value: u32, factor: f64) -> u32 {
    ((value as f64 * factor).floor() as u32).max(1)
}

/// Resamples `image` to `width`×`height`, returning it untouched when the
/// size already matches.
pub fn resample(image: ImageHandle, width: u32, height: u32) -> ImageHandle {
    if image.dimensions() == (width, height) {
        return image;
    }

    debug!(
        "Resampling {}×{} → {}×{}",
        image.width(),
        image.height(),
        width,
        height
    );
    let resized = image.as_dynamic().resize_exact(width, height, RESAMPLE_FILTER);
    ImageHandle::new(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbaImage};

    #[test]
    fn unchanged_without_scale_or_bounds() {
        assert_eq!(compute_resize(640, 480, 100, 0, 0), (640, 480));
        let once = compute_resize(640, 480, 100, 0, 0);
        assert_eq!(compute_resize(once.0, once.1, 100, 0, 0), (640, 480));
    }

    #[test]
    fn percent_then_bounding_box() {
        // 100×60 at 50% is 50×30; a 40px width bound shrinks by 0.8.
        assert_eq!(compute_resize(100, 60, 50, 40, 0), (40, 24));
    }

    #[test]
    fn percent_floors_and_keeps_one_pixel() {
        assert_eq!(compute_resize(99, 3, 50, 0, 0), (49, 1));
        assert_eq!(compute_resize(1, 1, 1, 0, 0), (1, 1));
    }

    #[test]
    fn bounds_never_enlarge() {
        assert_eq!(compute_resize(100, 50, 100, 400, 400), (100, 50));
    }

    #[test]
    fn tighter_bound_wins() {
        assert_eq!(compute_resize(2048, 1024, 100, 1024, 256), (512, 256));
        assert_eq!(compute_resize(1024, 2048, 100, 1024, 1024), (512, 1024));
    }

    #[test]
    fn clamp_respects_bounds_across_a_grid() {
        for &(w, h) in &[(1, 1), (7, 3), (100, 60), (1920, 1080), (333, 4000)] {
            for &percent in &[1, 33, 50, 99, 100] {
                for &(max_w, max_h) in &[(0, 0), (1, 0), (0, 17), (64, 64), (5000, 10)] {
                    let scaled = compute_resize(w, h, percent, 0, 0);
                    let (nw, nh) = compute_resize(w, h, percent, max_w, max_h);
                    assert!(nw <= scaled.0 && nh <= scaled.1, "{w}x{h}@{percent} grew");
                    if max_w > 0 {
                        assert!(nw <= max_w.max(1), "{w}x{h}@{percent} width {nw} > {max_w}");
                    }
                    if max_h > 0 {
                        assert!(nh <= max_h.max(1), "{w}x{h}@{percent} height {nh} > {max_h}");
                    }
                    assert!(nw >= 1 && nh >= 1);
                }
            }
        }
    }

    #[test]
    fn resample_changes_pixels_only_when_needed() {
        let image = ImageHandle::new(DynamicImage::ImageRgba8(RgbaImage::new(10, 6)));
        let same = resample(image.clone(), 10, 6);
        assert_eq!(same.dimensions(), (10, 6));

        let smaller = resample(image, 5, 3);
        assert_eq!(smaller.dimensions(), (5, 3));
        assert!(smaller.has_alpha());
    }
}
