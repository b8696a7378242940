use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "wavyte-stroke", version)]
struct Cli {
    /// Log pipeline spans and per-pass counts to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene as a PNG.
    Frame(FrameArgs),
    /// Dump the expanded triangle strips of every stroke as JSON.
    Expand(ExpandArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Expand and accumulate on a rayon pool.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct ExpandArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Expand(args) => cmd_expand(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn load_scene(path: &Path) -> anyhow::Result<wavyte_stroke::Scene> {
    wavyte_stroke::Scene::from_path(path)
        .with_context(|| format!("load scene '{}'", path.display()))
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut scene = load_scene(&args.in_path)?;
    if args.parallel {
        scene.threading.parallel = true;
    }
    if args.threads.is_some() {
        scene.threading.threads = args.threads;
    }

    let frame = wavyte_stroke::render_scene(&scene)?;
    let straight = unpremultiply(&frame.data);

    ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &straight,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_expand(args: ExpandArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.in_path)?;
    let strokes = wavyte_stroke::expand_scene(&scene)?;

    match &args.out {
        Some(out) => {
            ensure_parent_dir(out)?;
            let f = File::create(out).with_context(|| format!("create '{}'", out.display()))?;
            let mut w = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut w, &strokes).context("serialize expansion")?;
            w.flush().with_context(|| format!("write '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            serde_json::to_writer_pretty(&mut w, &strokes).context("serialize expansion")?;
            writeln!(w).context("write stdout")?;
        }
    }
    Ok(())
}

/// PNG stores straight alpha.
fn unpremultiply(premul: &[u8]) -> Vec<u8> {
    premul
        .chunks_exact(4)
        .flat_map(|px| {
            let a = px[3];
            if a == 0 || a == 255 {
                return [px[0], px[1], px[2], a];
            }
            let un = |c: u8| ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8;
            [un(px[0]), un(px[1]), un(px[2]), a]
        })
        .collect()
}
