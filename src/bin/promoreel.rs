use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "promoreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one promo video from a job JSON (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// List the available effects and how they route.
    Effects,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input job JSON ({"images": [...], "effect": "...", "watermark": false, "out": "..."}).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Asset root holding animations/, clips/ and watermark.png.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Effects => {
            cmd_effects();
            Ok(())
        }
    }
}

fn read_job_json(path: &PathBuf) -> anyhow::Result<promoreel::JobSpec> {
    let f = File::open(path).with_context(|| format!("open job '{}'", path.display()))?;
    let r = BufReader::new(f);
    let job: promoreel::JobSpec =
        serde_json::from_reader(r).with_context(|| "parse job JSON")?;
    Ok(job)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let job = read_job_json(&args.in_path)?;
    let cfg = promoreel::PipelineConfig::default().with_asset_root(args.assets);
    let out = promoreel::render_promo(&job, &cfg)?;
    println!("wrote {}", out.display());
    Ok(())
}

fn cmd_effects() {
    for effect in promoreel::effects::ALL_EFFECTS {
        let route = if effect.uses_external_compositor() {
            "external compositor"
        } else {
            "frame synthesis"
        };
        let images = if effect.accepts_many_images() {
            "2+ images"
        } else {
            "1 image"
        };
        println!("{:<30} {:<20} {}", effect.display_name(), route, images);
    }
}
