use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use postergen::{
    CopyGenerator, GeneratedCopy, OutputFormat, PosterSettings, ReplyFileCopy, StaticCopy,
    TemplateId, TemplateRegistry, copy,
};

#[derive(Parser, Debug)]
#[command(name = "postergen", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one poster per template and print a JSON run summary.
    Generate(GenerateArgs),
    /// List the registered templates.
    Templates(TemplatesArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Png,
    Webp,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Webp => OutputFormat::Webp,
        }
    }
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Settings JSON; flags below override its values.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Base directory for relative paths.
    #[arg(long)]
    assets_root: Option<PathBuf>,

    /// Cover photo.
    #[arg(long = "in")]
    input: Option<PathBuf>,

    /// Output directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Text layout document.
    #[arg(long)]
    text_layout: Option<PathBuf>,

    /// Custom template registry JSON.
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Fallback font file.
    #[arg(long)]
    default_font: Option<PathBuf>,

    /// Output encoding.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Render templates in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Only render these template ids (repeatable).
    #[arg(long)]
    only: Vec<String>,

    /// Poster title.
    #[arg(long)]
    title: Option<String>,

    /// Poster description.
    #[arg(long)]
    description: Option<String>,

    /// Saved model reply with `Title:` / `Description:` lines.
    #[arg(long, conflicts_with_all = ["title", "description"])]
    reply_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TemplatesArgs {
    /// Custom template registry JSON instead of the stock set.
    #[arg(long)]
    templates: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("postergen=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Templates(args) => cmd_templates(args),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut settings = match &args.settings {
        Some(p) => PosterSettings::from_path(p)?,
        None => PosterSettings::default(),
    };
    if let Some(p) = args.assets_root {
        settings.assets_root = p;
    }
    if let Some(p) = args.input {
        settings.input_image = p;
    }
    if let Some(p) = args.out_dir {
        settings.output_dir = p;
    }
    if let Some(p) = args.text_layout {
        settings.text_layout = p;
    }
    if args.templates.is_some() {
        settings.templates = args.templates;
    }
    if let Some(p) = args.default_font {
        settings.default_font = p;
    }
    if let Some(f) = args.format {
        settings.output_format = f.into();
    }
    if args.parallel {
        settings.pipeline.parallel = true;
    }
    if args.threads.is_some() {
        settings.pipeline.threads = args.threads;
    }
    if !args.only.is_empty() {
        settings.pipeline.only = Some(args.only.into_iter().map(TemplateId).collect());
    }

    let generator: Box<dyn CopyGenerator> = match args.reply_file {
        Some(path) => Box::new(ReplyFileCopy { path }),
        None => Box::new(StaticCopy(GeneratedCopy::new(
            args.title.unwrap_or_else(|| copy::FALLBACK_TITLE.to_owned()),
            args.description.unwrap_or_else(|| copy::FALLBACK_DESCRIPTION.to_owned()),
        ))),
    };

    let summary = postergen::generate_posters(&settings, generator.as_ref())?;
    let json = serde_json::to_string_pretty(&summary).context("serialize run summary")?;
    println!("{json}");
    Ok(())
}

fn cmd_templates(args: TemplatesArgs) -> anyhow::Result<()> {
    let registry = match &args.templates {
        Some(p) => TemplateRegistry::from_path(p)?,
        None => TemplateRegistry::builtin(),
    };
    for t in registry.list() {
        let r = t.placement;
        println!(
            "{}\t{}\t{},{} {}x{}",
            t.id,
            t.background_path.display(),
            r.x,
            r.y,
            r.width,
            r.height
        );
    }
    Ok(())
}
