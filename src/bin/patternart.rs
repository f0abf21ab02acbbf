use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use patternart::{DensityTable, Provider, Theme, export_batch, fallback_templates, load_templates, render_template};

#[derive(Parser, Debug)]
#[command(name = "patternart", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every template at every requested density.
    Export(ExportArgs),
    /// Render a single template at a single density as a PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Directory of pattern template JSON files.
    #[arg(long, default_value = "templates")]
    templates: PathBuf,

    /// Output resource root (density subdirectories are created inside).
    #[arg(long, default_value = "res")]
    out: PathBuf,

    /// Density tiers to export.
    #[arg(long, value_delimiter = ',', default_value = "mdpi,hdpi,xhdpi,xxhdpi,xxxhdpi")]
    densities: Vec<String>,

    /// Color theme.
    #[arg(long, default_value = "neon")]
    theme: String,

    /// Art provider.
    #[arg(long, value_enum, default_value_t = ProviderChoice::Local)]
    provider: ProviderChoice,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Pattern name. Looked up among the templates, falling back to the
    /// built-in set; an unknown name still renders with default styling.
    #[arg(long)]
    name: String,

    /// Directory of pattern template JSON files.
    #[arg(long, default_value = "templates")]
    templates: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Density tier.
    #[arg(long, default_value = "mdpi")]
    density: String,

    /// Color theme.
    #[arg(long, default_value = "neon")]
    theme: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProviderChoice {
    Local,
    Remote,
}

impl From<ProviderChoice> for Provider {
    fn from(c: ProviderChoice) -> Self {
        match c {
            ProviderChoice::Local => Provider::LocalDeterministic,
            ProviderChoice::Remote => Provider::RemoteGenerative,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let theme = Theme::by_name(&args.theme)?;
    let templates = load_templates(&args.templates)
        .with_context(|| format!("load templates from '{}'", args.templates.display()))?;

    let report = export_batch(
        &templates,
        &theme,
        &DensityTable::default_tiers(),
        &args.densities,
        &args.out,
        args.provider.into(),
    )?;

    eprintln!("wrote {} artifacts to {}", report.written.len(), args.out.display());
    if !report.failed.is_empty() {
        for f in &report.failed {
            eprintln!("failed {}@{}: {}", f.pattern, f.density, f.error);
        }
        anyhow::bail!("{} artifacts failed to export", report.failed.len());
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let theme = Theme::by_name(&args.theme)?;
    let scale = DensityTable::default_tiers().scale_for(&args.density)?;

    let mut templates = load_templates(&args.templates)
        .with_context(|| format!("load templates from '{}'", args.templates.display()))?;
    if templates.is_empty() {
        templates = fallback_templates();
    }
    let template = templates
        .into_iter()
        .find(|t| t.name == args.name)
        .unwrap_or_else(|| patternart::PatternTemplate::named(&args.name));

    let canvas = render_template(&template, &theme, scale)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &canvas.to_rgb8(),
        canvas.width(),
        canvas.height(),
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
