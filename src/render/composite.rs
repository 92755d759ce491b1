use crate::foundation::{
    core::Rgba8Premul,
    error::{PromoError, PromoResult},
    math::mul_div255_u8,
};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over of one premultiplied pixel, with `opacity` applied to `src`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Source-over of a whole premultiplied buffer onto `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> PromoResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PromoError::evaluation(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    if opacity <= 0.0 {
        return Ok(());
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Silhouette of `src`: every pixel becomes `color` scaled by the source alpha.
pub fn tint_alpha(src: &[u8], color: Rgba8Premul) -> Vec<u8> {
    let c = color.to_array();
    let mut out = vec![0u8; src.len()];
    for (d, s) in out.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 0 {
            continue;
        }
        for i in 0..4 {
            d[i] = mul_div255_u8(u16::from(c[i]), a);
        }
    }
    out
}

/// Translate an image by whole pixels; uncovered pixels become transparent.
pub fn shift(src: &[u8], width: u32, height: u32, dx: i32, dy: i32) -> PromoResult<Vec<u8>> {
    let expected = (width as usize) * (height as usize) * 4;
    if src.len() != expected {
        return Err(PromoError::evaluation(
            "shift expects src matching width*height*4",
        ));
    }
    if dx == 0 && dy == 0 {
        return Ok(src.to_vec());
    }

    let (w, h) = (width as i64, height as i64);
    let mut out = vec![0u8; expected];
    for y in 0..h {
        let sy = y - i64::from(dy);
        if !(0..h).contains(&sy) {
            continue;
        }
        let x0 = i64::from(dx).max(0);
        let x1 = (w + i64::from(dx)).min(w);
        if x0 >= x1 {
            continue;
        }
        let sx0 = x0 - i64::from(dx);
        let dst_start = ((y * w + x0) * 4) as usize;
        let src_start = ((sy * w + sx0) * 4) as usize;
        let len = ((x1 - x0) * 4) as usize;
        out[dst_start..dst_start + len].copy_from_slice(&src[src_start..src_start + len]);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
