use clap::{Parser, Subcommand};
use miyabiyaka::{config, output, site};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Visibility overrides for a single build.
#[derive(clap::Args, Clone)]
struct VisibilityArgs {
    /// Build as public: omit the robots noindex directive
    #[arg(long, conflicts_with = "under_construction")]
    public: bool,

    /// Build as under construction: add the robots noindex directive
    #[arg(long)]
    under_construction: bool,
}

impl VisibilityArgs {
    fn apply(&self, site: &mut config::SiteConfig) {
        if self.public {
            site.under_construction = false;
        } else if self.under_construction {
            site.under_construction = true;
        }
    }
}

#[derive(Parser)]
#[command(name = "miyabiyaka")]
#[command(about = "Pre-renders the miyabiyaka kimono school site")]
#[command(long_about = "\
Pre-renders the miyabiyaka kimono school site

Each HTML page declares its metadata as data-* attributes on <html> and
leaves empty mount points for the shared blocks:

  <html lang=\"ja\"
        data-page-title=\"よくある質問 | miyabiyaka\"
        data-breadcrumb='[{\"name\":\"ホーム\",\"url\":\"/miyabiyaka/\"},{\"name\":\"よくある質問\",\"url\":null}]'
        data-page-header='{\"title\":\"よくある質問\",\"subtitle\":\"FAQ\"}'>
  <body>
    <div id=\"header\"></div>       # site header and navigation
    <div id=\"breadcrumb\"></div>   # from data-breadcrumb
    <div id=\"page-header\"></div>  # from data-page-header
    ...
    <div id=\"footer\"></div>       # site footer

The build fills the <head> (title, description, OGP, Twitter card, fonts,
stylesheets, JSON-LD) and the mount points, then copies every other file.

Run 'miyabiyaka gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site source directory
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Config file (defaults to config.toml in the source directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pre-render every page and copy assets into the output directory
    Build(VisibilityArgs),
    /// Validate page attributes and placeholders without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Build(visibility) => {
            let mut site_config = site::load_site_config(&cli.source, cli.config.as_deref())?;
            visibility.apply(&mut site_config);
            init_thread_pool(&site_config.processing);

            println!("==> Building {} → {}", cli.source.display(), cli.output.display());
            let summary = site::build(&cli.source, &cli.output, &site_config)?;
            output::print_build_output(&summary);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let site_config = site::load_site_config(&cli.source, cli.config.as_deref())?;
            println!("==> Checking {}", cli.source.display());
            let checks = site::check(&cli.source, &site_config)?;
            output::print_check_output(&checks);
            if !checks.is_empty() {
                return Err(format!("{} page(s) with problems", checks.len()).into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; config can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
