use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "starloop", version, about = "Seeded, loopable starfield overlay generator")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a loopable alpha video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render the stars-only preview frame as a PNG.
    Frame(FrameArgs),
    /// Print the meteor schedule for a seed and duration as JSON.
    Schedule(ScheduleArgs),
    /// Print the composed scene for one point in time as JSON.
    Scene(SceneArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// JSON generate config; explicit flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed string.
    #[arg(long)]
    seed: Option<String>,

    /// Width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Loop length in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Number of background stars.
    #[arg(long)]
    stars: Option<usize>,

    /// Output codec.
    #[arg(long, value_enum)]
    codec: Option<CodecChoice>,

    /// Output path (defaults to `<seed>.<ext>`).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Worker threads for frame rendering.
    #[arg(long)]
    threads: Option<usize>,

    /// Render frames one at a time on the main thread.
    #[arg(long)]
    sequential: bool,

    /// Keep the raw twinkle frequencies instead of snapping them to the loop length.
    #[arg(long)]
    no_loop_align: bool,

    /// Parent directory for per-request scratch frames.
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// Print the resulting asset description as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Seed string.
    #[arg(long)]
    seed: String,

    /// Width in pixels.
    #[arg(long)]
    width: u32,

    /// Height in pixels.
    #[arg(long)]
    height: u32,

    /// Number of background stars.
    #[arg(long)]
    stars: Option<usize>,

    /// Background color as `r,g,b,a` (transparent when omitted).
    #[arg(long, value_parser = parse_rgba)]
    background: Option<[u8; 4]>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ScheduleArgs {
    /// Seed string (the `-meteors` stream suffix is applied automatically).
    #[arg(long)]
    seed: String,

    /// Loop length in seconds.
    #[arg(long)]
    duration: f64,
}

#[derive(Parser, Debug)]
struct SceneArgs {
    /// Seed string.
    #[arg(long)]
    seed: String,

    /// Loop length in seconds.
    #[arg(long)]
    duration: f64,

    /// Sample time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Number of background stars.
    #[arg(long)]
    stars: Option<usize>,

    /// Keep the raw twinkle frequencies instead of snapping them to the loop length.
    #[arg(long)]
    no_loop_align: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CodecChoice {
    Prores,
    Vp9,
}

impl From<CodecChoice> for starloop::VideoCodec {
    fn from(c: CodecChoice) -> Self {
        match c {
            CodecChoice::Prores => starloop::VideoCodec::ProRes4444,
            CodecChoice::Vp9 => starloop::VideoCodec::Vp9Alpha,
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Schedule(args) => cmd_schedule(args),
        Command::Scene(args) => cmd_scene(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("STARLOOP_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_rgba(s: &str) -> Result<[u8; 4], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(format!("expected r,g,b,a, got '{s}'"));
    }
    let mut out = [0u8; 4];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|e| format!("bad channel '{part}': {e}"))?;
    }
    Ok(out)
}

fn build_config(args: &RenderArgs) -> anyhow::Result<starloop::GenerateConfig> {
    let mut cfg = match &args.config {
        Some(path) => starloop::GenerateConfig::load(path)?,
        None => {
            let (Some(seed), Some(width), Some(height), Some(duration)) =
                (&args.seed, args.width, args.height, args.duration)
            else {
                anyhow::bail!("--seed, --width, --height and --duration are required without --config");
            };
            starloop::GenerateConfig::new(starloop::LoopRequest::new(
                seed.clone(),
                width,
                height,
                duration,
            ))
        }
    };

    let request = &mut cfg.request;
    if let Some(seed) = &args.seed {
        request.seed = seed.clone();
    }
    if let Some(w) = args.width {
        request.canvas.width = w;
    }
    if let Some(h) = args.height {
        request.canvas.height = h;
    }
    if let Some(d) = args.duration {
        request.duration_secs = d;
    }
    if let Some(fps) = args.fps {
        request.fps = starloop::Fps::integer(fps)?;
    }
    if let Some(n) = args.stars {
        request.star_count = n;
    }
    if let Some(codec) = args.codec {
        cfg.codec = codec.into();
    }
    if let Some(threads) = args.threads {
        cfg.threading.threads = Some(threads);
    }
    if args.sequential {
        cfg.threading.parallel = false;
    }
    if args.no_loop_align {
        cfg.loop_align_twinkle = false;
    }
    if let Some(dir) = &args.scratch_dir {
        cfg.scratch_root = Some(dir.clone());
    }
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args)?;
    let out = args.out.clone().unwrap_or_else(|| {
        PathBuf::from(format!("{}.{}", cfg.request.seed, cfg.codec.extension()))
    });

    if !starloop::is_ffmpeg_on_path() {
        anyhow::bail!("ffmpeg is required for video output, but was not found on PATH");
    }

    let (request, opts) = cfg.into_parts(starloop::CancelToken::new());
    let asset = starloop::generate_loopable_asset(&request, &out, opts)
        .with_context(|| format!("generate loop '{}'", out.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&asset)?);
    }
    eprintln!(
        "wrote {} ({} frames @ {} fps)",
        asset.path.display(),
        asset.frame_count,
        asset.fps.as_f64()
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let settings = starloop::RenderSettings {
        clear_rgba: args.background,
        point_scale: None,
    };
    let canvas = starloop::Canvas {
        width: args.width,
        height: args.height,
    };
    let frame = starloop::generate_static_frame(&args.seed, canvas, args.stars, &settings)?;
    write_png(&args.out, &frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_schedule(args: ScheduleArgs) -> anyhow::Result<()> {
    let events = starloop::schedule_meteors(&format!("{}-meteors", args.seed), args.duration);
    println!("{}", serde_json::to_string_pretty(&events)?);
    Ok(())
}

fn cmd_scene(args: SceneArgs) -> anyhow::Result<()> {
    let mut params = starloop::SceneParams::generate(
        &args.seed,
        args.stars.unwrap_or(starloop::DEFAULT_STAR_COUNT),
        args.duration,
    );
    if !args.no_loop_align {
        params.twinkle_loop_secs = Some(args.duration);
    }
    let scene = params.compose(args.time);
    println!("{}", serde_json::to_string_pretty(&scene)?);
    Ok(())
}

fn write_png(path: &Path, frame: &starloop::FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.straight_alpha_bytes(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
