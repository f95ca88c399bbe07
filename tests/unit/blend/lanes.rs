use super::*;

fn simd() -> Fallback {
    Fallback::new()
}

fn ramp_block<S: Simd>(simd: S) -> u8x64<S> {
    let mut b = [0u8; BLOCK_BYTES];
    for (i, v) in b.iter_mut().enumerate() {
        *v = i as u8;
    }
    u8x64::from_slice(simd, &b)
}

#[test]
fn alpha_table_marks_every_fourth_byte() {
    for (i, &b) in ALPHA_BYTES.iter().enumerate() {
        assert_eq!(b, if i % 4 == 3 { 0xFF } else { 0 }, "byte {i}");
    }
    let mask = alpha_byte_mask(simd());
    let picked = mask.select(u8x64::splat(simd(), 1), u8x64::splat(simd(), 0));
    assert_eq!(picked.as_slice(), &ALPHA_BYTES.map(|b| b & 1));
}

#[test]
fn load_and_store_keep_channel_order() {
    let mut pixels = [Pixel::default(); BLOCK_PIXELS];
    for (i, p) in pixels.iter_mut().enumerate() {
        *p = Pixel::rgba(i as u8, 100 + i as u8, 200, 255 - i as u8);
    }
    let block = load_block(simd(), &pixels);
    assert_eq!(&block.as_slice()[4..8], &[1, 101, 200, 254]);

    let mut out = [Pixel::default(); BLOCK_PIXELS];
    store_block(block, &mut out);
    assert_eq!(out, pixels);
}

#[test]
fn splat_pixel_repeats_channels() {
    let block = splat_pixel(simd(), Pixel::rgba(1, 2, 3, 4));
    for px in block.as_slice().chunks_exact(4) {
        assert_eq!(px, &[1, 2, 3, 4]);
    }
}

#[test]
fn splat_alpha_broadcasts_per_pixel() {
    let alpha = ramp_block(simd()).splat_alpha();
    for (p, px) in alpha.as_slice().chunks_exact(4).enumerate() {
        assert_eq!(px, &[(4 * p + 3) as u8; 4], "pixel {p}");
    }
}

#[test]
fn halves_widen_and_narrow_back() {
    let src = ramp_block(simd());
    let (lo, hi) = widen_halves(simd(), src);
    for i in 0..BLOCK_BYTES / 2 {
        assert_eq!(lo.as_slice()[i], i as u16);
        assert_eq!(hi.as_slice()[i], (BLOCK_BYTES / 2 + i) as u16);
    }
    let back = narrow_halves(simd(), lo, hi);
    assert_eq!(back.as_slice(), src.as_slice());
}

#[test]
fn alpha_lanes_land_in_alpha_bytes() {
    let rgb = u32x16::splat(simd(), u32::from_ne_bytes([9, 8, 7, 0]));
    let mut alpha = [0u32; BLOCK_PIXELS];
    for (i, a) in alpha.iter_mut().enumerate() {
        *a = 254 + i as u32;
    }
    let block = with_alpha_lanes(rgb, u32x16::from_slice(simd(), &alpha));
    for (p, px) in block.as_slice().chunks_exact(4).enumerate() {
        assert_eq!(&px[..3], &[9, 8, 7]);
        assert_eq!(px[3], (254 + p) as u8, "wraps past 255");
    }
}

#[test]
fn column_ramp_counts_from_start() {
    let ramp = column_ramp(simd(), 32.0);
    for (i, &v) in ramp.as_slice().iter().enumerate() {
        assert_eq!(v, 32.0 + i as f32);
    }
}
