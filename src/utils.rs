// src/utils.rs
use image::Rgba;
use ndarray::{Array2, Zip};

/// Coverage mask of a filled disc on a `size x size` grid, indexed `[[y, x]]`.
///
/// A pixel is covered when `(x - c)^2 + (y - c)^2 <= r^2`, so the disc spans
/// `center - radius ..= center + radius` along both axes. One byte per pixel.
pub fn disc_mask(size: u32, center: u32, radius: u32) -> Array2<bool> {
    let n = size as usize;
    let c = center as i64;
    let r2 = (radius as i64).pow(2);

    let mut mask = Array2::from_elem((n, n), false);
    Zip::indexed(&mut mask).par_for_each(|(y, x), covered| {
        let dx = x as i64 - c;
        let dy = y as i64 - c;
        *covered = dx * dx + dy * dy <= r2;
    });

    mask
}

/// Source-over for a single colour channel, alphas in `[0, 1]`.
/// Returns the un-premultiplied result channel.
#[inline(always)]
pub fn blend_channel(src: f64, src_alpha: f64, dst: f64, dst_alpha: f64) -> f64 {
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha <= 0.0 {
        return 0.0;
    }
    (src * src_alpha + dst * dst_alpha * (1.0 - src_alpha)) / out_alpha
}

/// Composite `src` over `dst` (Porter-Duff source-over, straight alpha).
pub fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        255 => return src,
        0 => return dst,
        _ => {}
    }

    let sa = src[3] as f64 / 255.0;
    let da = dst[3] as f64 / 255.0;
    let out_alpha = sa + da * (1.0 - sa);

    let channel = |i: usize| -> u8 {
        blend_channel(src[i] as f64, sa, dst[i] as f64, da)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
