use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tessera", version)]
struct Cli {
    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a template with inputs into a single image.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Template JSON.
    #[arg(long)]
    template: PathBuf,

    /// Inputs JSON mapping slot ids to image paths or text.
    #[arg(long)]
    inputs: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Output encoding (png, jpg, gif, tiff, bmp); overrides the template.
    #[arg(long)]
    format: Option<String>,

    /// Directory of the default font, also searched for system fonts (defaults to
    /// `TESSERA_FONT_DIR`).
    #[arg(long)]
    font_dir: Option<String>,

    /// Default font file, tried first for every text slot (defaults to `TESSERA_FONT_TTF`).
    #[arg(long)]
    font_file: Option<String>,

    /// Base directory for relative image paths.
    #[arg(long)]
    assets_root: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = tessera::RenderConfig::from_env_with_fonts(
        args.font_dir.as_deref(),
        args.font_file.as_deref(),
    );
    if let Some(root) = args.assets_root {
        config = config.with_assets_root(root);
    }

    // Slot warnings are logged by the compositor as they happen.
    let warnings = tessera::render_to_file(
        &args.template,
        &args.inputs,
        &args.out,
        args.format.as_deref(),
        &config,
    )
    .with_context(|| format!("render '{}'", args.template.display()))?;

    eprintln!(
        "wrote {} ({} slot warnings)",
        args.out.display(),
        warnings.len()
    );
    Ok(())
}
