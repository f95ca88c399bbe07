use super::*;
use crate::assets::decode::save_png;
use crate::effects::halo::HaloFalloff;
use crate::foundation::core::Pixel;

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("alphablend_scene_{tag}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn parse_minimal_scene_uses_defaults() {
    let cfg = SceneConfig::from_json_str(r#"{ "background": "bg.png" }"#).unwrap();
    assert_eq!(cfg.background, PathBuf::from("bg.png"));
    assert!(cfg.foreground.is_empty());
    assert!(cfg.halos.is_empty());
    assert_eq!(cfg.kernel, KernelKind::Wide);
    cfg.validate().unwrap();
}

#[test]
fn parse_full_scene() {
    let cfg = SceneConfig::from_json_str(
        r#"{
            "background": "bg.png",
            "foreground": [{ "path": "fg.png", "pos": { "x": 3, "y": 4 } }],
            "halos": [{
                "center": { "x": 10, "y": 11 },
                "radius": 5,
                "color": [255, 255, 255, 128],
                "falloff": "unnormalized"
            }],
            "kernel": "scalar"
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.foreground[0].pos, Position::new(3, 4));
    assert_eq!(cfg.halos[0].color, Pixel::rgba(255, 255, 255, 128));
    assert_eq!(cfg.halos[0].falloff, HaloFalloff::Unnormalized);
    assert_eq!(cfg.kernel, KernelKind::Scalar);
}

#[test]
fn unknown_fields_are_config_errors() {
    let err = SceneConfig::from_json_str(r#"{ "background": "bg.png", "bogus": 1 }"#).unwrap_err();
    assert!(matches!(err, BlendError::Config(_)));
}

#[test]
fn validate_rejects_empty_paths() {
    let mut cfg = SceneConfig::from_json_str(r#"{ "background": "" }"#).unwrap();
    assert!(matches!(cfg.validate(), Err(BlendError::Config(_))));

    cfg.background = PathBuf::from("bg.png");
    cfg.foreground.push(ForegroundConfig {
        path: PathBuf::new(),
        pos: Position::default(),
    });
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("foreground[0]"));
}

#[test]
fn render_scene_blends_then_glows() {
    let dir = temp_dir("render");
    let bg = PixelImage::filled(32, 32, Pixel::rgba(0, 0, 0, 255)).unwrap();
    let fg = PixelImage::filled(4, 4, Pixel::rgba(255, 0, 0, 255)).unwrap();
    save_png(&bg, &dir.join("bg.png")).unwrap();
    save_png(&fg, &dir.join("fg.png")).unwrap();

    let mut cfg = SceneConfig::from_json_str(
        r#"{
            "background": "bg.png",
            "foreground": [{ "path": "fg.png", "pos": { "x": 0, "y": 0 } }],
            "halos": [{ "center": { "x": 16, "y": 16 }, "radius": 5, "color": [255, 255, 255, 128] }]
        }"#,
    )
    .unwrap();

    for kernel in [KernelKind::Scalar, KernelKind::Wide] {
        cfg.kernel = kernel;
        let out = render_scene(&cfg, &dir).unwrap();
        // 255 * 255 >> 8
        assert_eq!(out.get(1, 1), Some(Pixel::rgba(254, 0, 0, 255)));
        assert_eq!(out.get(20, 30), Some(Pixel::rgba(0, 0, 0, 255)));
        let center = out.get(16, 16).unwrap();
        assert!(center.red > 0 && center.red == center.green && center.alpha == 255);
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn render_scene_reports_failing_step() {
    let dir = temp_dir("oob");
    let bg = PixelImage::filled(8, 8, Pixel::rgba(0, 0, 0, 255)).unwrap();
    save_png(&bg, &dir.join("bg.png")).unwrap();

    let cfg = SceneConfig::from_json_str(
        r#"{
            "background": "bg.png",
            "halos": [{ "center": { "x": 2, "y": 2 }, "radius": 3, "color": [255, 255, 255, 255] }]
        }"#,
    )
    .unwrap();
    let err = render_scene(&cfg, &dir).unwrap_err();
    assert!(matches!(err, BlendError::OutOfBounds(_)));
    assert!(err.to_string().contains("halos[0]"));

    let _ = std::fs::remove_dir_all(&dir);
}
