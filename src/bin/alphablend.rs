use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "alphablend", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a JSON scene to a PNG.
    Render(RenderArgs),
    /// Blend one foreground onto a background, optionally adding a halo.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON. Relative image paths resolve against its directory.
    #[arg(long)]
    scene: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Override the kernel named in the scene.
    #[arg(long, value_enum)]
    kernel: Option<KernelChoice>,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Background image.
    #[arg(long)]
    bg: PathBuf,

    /// Foreground image.
    #[arg(long)]
    fg: PathBuf,

    /// Foreground left edge on the background.
    #[arg(long, default_value_t = 0)]
    x: u32,

    /// Foreground top edge on the background.
    #[arg(long, default_value_t = 0)]
    y: u32,

    /// Halo center column. A halo is drawn when a radius is given.
    #[arg(long, default_value_t = 0)]
    halo_x: u32,

    /// Halo center row.
    #[arg(long, default_value_t = 0)]
    halo_y: u32,

    /// Halo radius in pixels.
    #[arg(long)]
    halo_radius: Option<u32>,

    /// Halo color as `R,G,B,A`.
    #[arg(long, value_parser = parse_rgba, default_value = "255,255,255,128")]
    halo_color: alphablend::Pixel,

    /// Use the unnormalized falloff, which draws concentric bands.
    #[arg(long)]
    stripes: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Kernel to use.
    #[arg(long, value_enum, default_value_t = KernelChoice::Wide)]
    kernel: KernelChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KernelChoice {
    Scalar,
    Wide,
}

impl From<KernelChoice> for alphablend::KernelKind {
    fn from(choice: KernelChoice) -> Self {
        match choice {
            KernelChoice::Scalar => alphablend::KernelKind::Scalar,
            KernelChoice::Wide => alphablend::KernelKind::Wide,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Compose(args) => cmd_compose(args),
    }
}

fn parse_rgba(s: &str) -> Result<alphablend::Pixel, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("expected R,G,B,A bytes: {e}"))?;
    let [r, g, b, a] = parts[..] else {
        return Err(format!("expected 4 components, got {}", parts.len()));
    };
    Ok(alphablend::Pixel::rgba(r, g, b, a))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut scene = alphablend::SceneConfig::from_path(&args.scene)?;
    if let Some(kernel) = args.kernel {
        scene.kernel = kernel.into();
    }

    let base_dir = args.scene.parent().unwrap_or_else(|| Path::new("."));
    let out = alphablend::render_scene(&scene, base_dir)
        .with_context(|| format!("render scene '{}'", args.scene.display()))?;

    alphablend::save_png(&out, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let compositor = alphablend::create_compositor(args.kernel.into());

    let mut canvas = alphablend::load_image(&args.bg)?;
    let fg = alphablend::load_image(&args.fg)?;
    compositor.blend_region(
        &mut canvas,
        &alphablend::PlacedImage::new(&fg, alphablend::Position::new(args.x, args.y)),
    )?;

    if let Some(radius) = args.halo_radius {
        let falloff = if args.stripes {
            alphablend::HaloFalloff::Unnormalized
        } else {
            alphablend::HaloFalloff::Normalized
        };
        let halo = alphablend::Halo::new(
            alphablend::Position::new(args.halo_x, args.halo_y),
            radius,
            args.halo_color,
        )
        .with_falloff(falloff);
        compositor.add_halo(&mut canvas, &halo)?;
    }

    alphablend::save_png(&canvas, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
