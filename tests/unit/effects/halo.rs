use super::*;

fn white(alpha: u8) -> Pixel {
    Pixel::rgba(255, 255, 255, alpha)
}

#[test]
fn alpha_at_center_and_rim() {
    let halo = Halo::new(Position::new(50, 50), 10, white(255));
    assert_eq!(halo.alpha_at(0, 0), Some(255));
    assert_eq!(halo.alpha_at(10, 0), Some(0));
    assert_eq!(halo.alpha_at(6, 8), Some(0));
    assert_eq!(halo.alpha_at(10, 1), None);
    assert_eq!(halo.alpha_at(8, 7), None);
}

#[test]
fn color_alpha_scales_intensity() {
    let halo = Halo::new(Position::new(50, 50), 10, white(128));
    // base = 100, 100 * 128 / 100
    assert_eq!(halo.alpha_at(0, 0), Some(128));
    // base = 75, 75 * 128 / 100 = 96
    assert_eq!(halo.alpha_at(5, 0), Some(96));
}

#[test]
fn unnormalized_alpha_wraps_to_low_byte() {
    let halo =
        Halo::new(Position::new(50, 50), 10, white(255)).with_falloff(HaloFalloff::Unnormalized);
    // base = 100, 100 * 255 = 25500 = 99 * 256 + 156
    assert_eq!(halo.alpha_at(0, 0), Some(156));
    // base = 19 at (9, 0): 19 * 255 = 4845 = 18 * 256 + 237
    assert_eq!(halo.alpha_at(9, 0), Some(237));
}

#[test]
fn zero_radius_has_no_contribution() {
    let halo = Halo::new(Position::new(0, 0), 0, white(255));
    assert_eq!(halo.alpha_at(0, 0), Some(0));
    assert_eq!(halo.alpha_at(1, 0), None);
}

#[test]
fn falloff_serde_names() {
    assert_eq!(
        serde_json::to_string(&HaloFalloff::Unnormalized).unwrap(),
        "\"unnormalized\""
    );
    let halo: Halo = serde_json::from_str(
        r#"{ "center": { "x": 3, "y": 4 }, "radius": 2, "color": [1, 2, 3, 4] }"#,
    )
    .unwrap();
    assert_eq!(halo.falloff, HaloFalloff::Normalized);
    assert_eq!(halo.color, Pixel::rgba(1, 2, 3, 4));
}

#[test]
fn glow_block_tracks_scalar_alpha() {
    for falloff in [HaloFalloff::Normalized, HaloFalloff::Unnormalized] {
        for alpha in [1u8, 64, 128, 255] {
            let halo = Halo::new(Position::new(20, 20), 9, white(alpha)).with_falloff(falloff);
            let lanes = HaloLanes::new(Fallback::new(), &halo);
            for y in 0..=18u32 {
                let dy = y as f32 - 9.0;
                let block = lanes.glow_block(0, dy * dy);
                for (x, px) in (0u32..).zip(block.as_slice().chunks_exact(4)) {
                    let got = px[3];
                    let want = halo.alpha_at(x.abs_diff(9), y.abs_diff(9)).unwrap_or(0);
                    let tolerance = match falloff {
                        HaloFalloff::Normalized => 1,
                        HaloFalloff::Unnormalized => 0,
                    };
                    assert!(
                        got.abs_diff(want) <= tolerance,
                        "{falloff:?} alpha={alpha} ({x}, {y}): wide={got} scalar={want}"
                    );
                    assert_eq!(&px[..3], &[255, 255, 255]);
                }
            }
        }
    }
}

#[test]
fn unnormalized_glow_is_exact_past_f32_products() {
    // base * alpha passes 2^24 near the center of a radius-290 halo.
    let halo = Halo::new(Position::new(300, 300), 290, white(200))
        .with_falloff(HaloFalloff::Unnormalized);
    let lanes = HaloLanes::new(Fallback::new(), &halo);
    for y in [0u32, 150, 289, 290, 291, 430, 580] {
        let dy = y as f32 - 290.0;
        for x in (0..=580 - BLOCK_PIXELS as u32).step_by(37) {
            let block = lanes.glow_block(x, dy * dy);
            for (i, px) in (0u32..).zip(block.as_slice().chunks_exact(4)) {
                let want = halo
                    .alpha_at((x + i).abs_diff(290), y.abs_diff(290))
                    .unwrap_or(0);
                assert_eq!(px[3], want, "({}, {y})", x + i);
            }
        }
    }
}

#[test]
fn normalized_alpha_is_exact_integer_division() {
    // r = 3: r² = 9. base at (1, 1) is 7; 7 * 200 / 9 = 155.5..., truncated.
    let halo = Halo::new(Position::new(5, 5), 3, white(200));
    assert_eq!(halo.alpha_at(1, 1), Some(155));
    let huge = Halo::new(Position::new(0, 0), u32::MAX, white(255));
    assert_eq!(huge.alpha_at(0, 0), Some(255));
    assert_eq!(huge.alpha_at(1, 0), Some(254));
}

#[test]
fn out_of_bounds_halo_is_rejected_without_writes() {
    let mut bg = PixelImage::filled(20, 20, Pixel::rgba(1, 2, 3, 4)).unwrap();
    let before = bg.clone();
    for center in [
        Position::new(4, 10),
        Position::new(10, 4),
        Position::new(15, 10),
        Position::new(10, 15),
    ] {
        let halo = Halo::new(center, 5, white(255));
        assert!(matches!(
            add_halo_scalar(&mut bg, &halo),
            Err(BlendError::OutOfBounds(_))
        ));
        assert!(matches!(
            add_halo_wide(&mut bg, &halo),
            Err(BlendError::OutOfBounds(_))
        ));
    }
    assert_eq!(bg, before);
}

#[test]
fn halo_touching_edges_is_accepted() {
    let mut bg = PixelImage::new(11, 11).unwrap();
    let halo = Halo::new(Position::new(5, 5), 5, white(255));
    add_halo_scalar(&mut bg, &halo).unwrap();
    add_halo_wide(&mut bg, &halo).unwrap();
}
