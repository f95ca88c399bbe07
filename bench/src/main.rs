use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use alphablend::{
    Compositor, Halo, HaloFalloff, KernelKind, Pixel, PixelImage, PlacedImage, Position,
    create_compositor,
};
use serde_json::json;

#[derive(Clone, Debug)]
struct BenchArgs {
    width: u32,
    height: u32,
    fg_width: u32,
    fg_height: u32,
    bg_path: Option<PathBuf>,
    fg_path: Option<PathBuf>,
    repeats: u32,
    samples: u32,
    warmup: u32,
    halo_radius: u32,
    stripes: bool,
    seed: u64,
    json: bool,
}

/// Mean and standard deviation of one kernel's per-sample time.
#[derive(Clone, Copy, Debug)]
struct Stats {
    mean_ms: f64,
    stddev_ms: f64,
}

#[derive(Clone, Copy, Debug)]
struct Comparison {
    scalar: Stats,
    wide: Stats,
    speedup: f64,
    speedup_err: f64,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = parse_args()?;

    if args.repeats == 0 || args.samples == 0 {
        anyhow::bail!("--repeats and --samples must be > 0");
    }

    let bg = match &args.bg_path {
        Some(p) => alphablend::load_image(p)?,
        None => synth_image(args.width, args.height, args.seed)?,
    };
    let fg = match &args.fg_path {
        Some(p) => alphablend::load_image(p)?,
        None => synth_image(args.fg_width, args.fg_height, args.seed.wrapping_add(1))?,
    };
    if fg.width() > bg.width() || fg.height() > bg.height() {
        anyhow::bail!(
            "foreground {}x{} does not fit background {}x{}",
            fg.width(),
            fg.height(),
            bg.width(),
            bg.height()
        );
    }

    let pos = Position::new((bg.width() - fg.width()) / 2, (bg.height() - fg.height()) / 2);
    let halo = center_halo(&bg, args.halo_radius, args.stripes)?;

    eprintln!(
        "bench: {samples} sample(s) x {repeats} repeat(s) ({profile} build), bg={bw}x{bh}, fg={fw}x{fh}, halo_r={r}, falloff={falloff:?}",
        samples = args.samples,
        repeats = args.repeats,
        profile = if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
        bw = bg.width(),
        bh = bg.height(),
        fw = fg.width(),
        fh = fg.height(),
        r = halo.radius,
        falloff = halo.falloff,
    );

    let scalar = create_compositor(KernelKind::Scalar);
    let wide = create_compositor(KernelKind::Wide);
    let placed = PlacedImage::new(&fg, pos);

    let blend = compare(&args, &bg, scalar.as_ref(), wide.as_ref(), |c, canvas| {
        c.blend_region(canvas, &placed)
    })?;
    let glow = compare(&args, &bg, scalar.as_ref(), wide.as_ref(), |c, canvas| {
        c.add_halo(canvas, &halo)
    })?;

    if args.json {
        let report = json!({
            "background": [bg.width(), bg.height()],
            "foreground": [fg.width(), fg.height()],
            "samples": args.samples,
            "repeats": args.repeats,
            "blend": comparison_json(&blend),
            "halo": comparison_json(&glow),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report("blend_region", &blend);
        report("add_halo", &glow);
    }
    Ok(())
}

fn parse_args() -> anyhow::Result<BenchArgs> {
    let mut args = std::env::args().skip(1);

    let mut out = BenchArgs {
        width: 1920,
        height: 1080,
        fg_width: 640,
        fg_height: 360,
        bg_path: None,
        fg_path: None,
        repeats: 100,
        samples: 10,
        warmup: 1,
        halo_radius: 200,
        stripes: false,
        seed: 0x5eed,
        json: false,
    };

    while let Some(a) = args.next() {
        match a.as_str() {
            "--width" => out.width = parse_u32(args.next(), "--width")?,
            "--height" => out.height = parse_u32(args.next(), "--height")?,
            "--fg-width" => out.fg_width = parse_u32(args.next(), "--fg-width")?,
            "--fg-height" => out.fg_height = parse_u32(args.next(), "--fg-height")?,
            "--repeats" => out.repeats = parse_u32(args.next(), "--repeats")?,
            "--samples" => out.samples = parse_u32(args.next(), "--samples")?,
            "--warmup" => out.warmup = parse_u32(args.next(), "--warmup")?,
            "--halo-radius" => out.halo_radius = parse_u32(args.next(), "--halo-radius")?,
            "--seed" => {
                let v = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("missing value for --seed"))?;
                out.seed = v
                    .parse()
                    .map_err(|e| anyhow::anyhow!("invalid --seed '{v}': {e}"))?;
            }
            "--bg" => {
                out.bg_path = Some(PathBuf::from(args.next().ok_or_else(|| {
                    anyhow::anyhow!("missing value for --bg (expected a path)")
                })?))
            }
            "--fg" => {
                out.fg_path = Some(PathBuf::from(args.next().ok_or_else(|| {
                    anyhow::anyhow!("missing value for --fg (expected a path)")
                })?))
            }
            "--stripes" => out.stripes = true,
            "--json" => out.json = true,
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => anyhow::bail!("unknown arg '{a}' (try --help)"),
        }
    }

    Ok(out)
}

fn print_help() {
    eprintln!(
        "\
alphablend-bench: scalar vs wide kernel timings

USAGE:
  cargo run --release --manifest-path bench/Cargo.toml -- [OPTIONS]

OPTIONS:
  --width <N>         synthetic background width (default 1920)
  --height <N>        synthetic background height (default 1080)
  --fg-width <N>      synthetic foreground width (default 640)
  --fg-height <N>     synthetic foreground height (default 360)
  --bg <PATH>         load the background from an image file instead
  --fg <PATH>         load the foreground from an image file instead
  --samples <N>       timed samples per kernel (default 10)
  --repeats <N>       operations per sample (default 100)
  --warmup <N>        untimed samples per kernel (default 1)
  --halo-radius <N>   halo radius, clamped to fit the background (default 200)
  --stripes           use the unnormalized halo falloff
  --seed <N>          synthetic image seed
  --json              print the report as JSON on stdout"
    );
}

fn parse_u32(v: Option<String>, flag: &str) -> anyhow::Result<u32> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<u32>()
        .map_err(|e| anyhow::anyhow!("invalid {flag} '{v}': {e}"))
}

/// Deterministic noise image. Alpha covers the full range, including 0 and 255.
fn synth_image(width: u32, height: u32, seed: u64) -> anyhow::Result<PixelImage> {
    let mut state = seed | 1;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 32) as u32
    };
    let pixels = (0..u64::from(width) * u64::from(height))
        .map(|_| {
            let [r, g, b, a] = next().to_le_bytes();
            Pixel::rgba(r, g, b, a)
        })
        .collect::<Vec<_>>();
    Ok(PixelImage::from_pixels(width, height, &pixels)?)
}

fn center_halo(bg: &PixelImage, radius: u32, stripes: bool) -> anyhow::Result<Halo> {
    if bg.width() < 1 || bg.height() < 1 {
        anyhow::bail!("background is empty");
    }
    let cx = (bg.width() - 1) / 2;
    let cy = (bg.height() - 1) / 2;
    let max_r = cx
        .min(cy)
        .min(bg.width() - 1 - cx)
        .min(bg.height() - 1 - cy);
    let falloff = if stripes {
        HaloFalloff::Unnormalized
    } else {
        HaloFalloff::Normalized
    };
    Ok(Halo::new(
        Position::new(cx, cy),
        radius.min(max_r),
        Pixel::rgba(255, 255, 255, 128),
    )
    .with_falloff(falloff))
}

fn compare(
    args: &BenchArgs,
    bg: &PixelImage,
    scalar: &dyn Compositor,
    wide: &dyn Compositor,
    op: impl Fn(&dyn Compositor, &mut PixelImage) -> alphablend::BlendResult<()>,
) -> anyhow::Result<Comparison> {
    let scalar = time_kernel(args, bg, scalar, &op)?;
    let wide = time_kernel(args, bg, wide, &op)?;

    let speedup = if wide.mean_ms > 0.0 {
        scalar.mean_ms / wide.mean_ms
    } else {
        f64::INFINITY
    };
    let rel = |s: Stats| {
        if s.mean_ms > 0.0 {
            s.stddev_ms / s.mean_ms
        } else {
            0.0
        }
    };
    let speedup_err = speedup * rel(scalar).hypot(rel(wide));

    Ok(Comparison {
        scalar,
        wide,
        speedup,
        speedup_err,
    })
}

fn time_kernel(
    args: &BenchArgs,
    bg: &PixelImage,
    kernel: &dyn Compositor,
    op: &impl Fn(&dyn Compositor, &mut PixelImage) -> alphablend::BlendResult<()>,
) -> anyhow::Result<Stats> {
    let run_sample = || -> anyhow::Result<Duration> {
        let mut canvas = bg.clone();
        let t0 = Instant::now();
        for _ in 0..args.repeats {
            op(kernel, &mut canvas)?;
        }
        let dt = t0.elapsed();
        std::hint::black_box(&canvas);
        Ok(dt)
    };

    for _ in 0..args.warmup {
        run_sample()?;
    }

    let mut per_op_ms = Vec::with_capacity(args.samples as usize);
    for _ in 0..args.samples {
        let dt = run_sample()?;
        per_op_ms.push(dt.as_secs_f64() * 1000.0 / f64::from(args.repeats));
    }

    let n = per_op_ms.len() as f64;
    let mean_ms = per_op_ms.iter().sum::<f64>() / n;
    let var = per_op_ms.iter().map(|v| (v - mean_ms).powi(2)).sum::<f64>() / n;
    Ok(Stats {
        mean_ms,
        stddev_ms: var.sqrt(),
    })
}

fn report(name: &str, c: &Comparison) {
    eprintln!("\n{name} (ms per op, mean ± stddev):");
    eprintln!(
        "  scalar {:>10.4} ± {:.4}",
        c.scalar.mean_ms, c.scalar.stddev_ms
    );
    eprintln!("  wide   {:>10.4} ± {:.4}", c.wide.mean_ms, c.wide.stddev_ms);
    eprintln!("  speedup {:.2}x ± {:.2}", c.speedup, c.speedup_err);
}

fn comparison_json(c: &Comparison) -> serde_json::Value {
    json!({
        "scalar_ms": { "mean": c.scalar.mean_ms, "stddev": c.scalar.stddev_ms },
        "wide_ms": { "mean": c.wide.mean_ms, "stddev": c.wide.stddev_ms },
        "speedup": c.speedup,
        "speedup_err": c.speedup_err,
    })
}
