use clap::{Parser, Subcommand};
use simple_folio::{assets, config, generate, output, scan, timeline};
use std::path::{Path, PathBuf};

/// Shared flags for commands that copy assets.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Disable the asset cache and copy every file again
    #[arg(long)]
    no_cache: bool,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "simple-folio")]
#[command(about = "Static site generator for single-page animated portfolios")]
#[command(long_about = "\
Static site generator for single-page animated portfolios

A profile file and a handful of markdown files become one page with a hero,
an about section and content sections that reveal themselves as they scroll
into view. Visitors who prefer reduced motion get the same page at rest.

Content structure:

  content/
  ├── config.toml      # Site, colors and motion timing (optional, sparse)
  ├── profile.toml     # Hero and about copy (required)
  ├── 030-projects.md  # Section (numbered = shown in nav)
  ├── 040-writing.md
  ├── notes.md         # No number prefix = rendered, hidden from nav
  └── assets/          # Copied verbatim to the output root

Sections take their title from the first '# heading' and their subtitle from
a '> quote' line right after it.

Run 'simple-folio gen-config' to generate a documented config.toml.
Run 'simple-folio timeline' to preview the entrance choreography.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (scan manifest)
    #[arg(long, default_value = ".simple-folio-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Clone)]
struct TimelineArgs {
    /// Start as if the visitor prefers reduced motion
    #[arg(long)]
    reduced: bool,

    /// Flip the motion preference at this many seconds
    #[arg(long, value_name = "SECONDS")]
    flip_at: Option<f64>,

    /// Seconds to run before unmounting
    #[arg(long, value_name = "SECONDS", default_value_t = timeline::DEFAULT_DURATION)]
    duration: f64,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a manifest
    Scan,
    /// Copy content/assets/ to the output directory
    Assets(CacheArgs),
    /// Render index.html from the scan manifest
    Generate,
    /// Run the full pipeline: scan → assets → generate
    Build(CacheArgs),
    /// Validate content and motion config without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Play the page choreography on a virtual clock and print every cue
    Timeline(TimelineArgs),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let manifest_path = cli.temp_dir.join("manifest.json");

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Assets(cache_args) => {
            copy_assets(&manifest_path, &cli.source, &cli.output, &cache_args)?;
        }
        Command::Generate => {
            let result = generate::generate(&manifest_path, &cli.output)?;
            output::print_generate_output(&result);
        }
        Command::Build(cache_args) => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Copying assets");
            copy_assets(&manifest_path, &cli.source, &cli.output, &cache_args)?;

            println!("==> Stage 3: Generating HTML → {}", cli.output.display());
            let result = generate::generate(&manifest_path, &cli.output)?;
            output::print_generate_output(&result);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            for line in output::format_check_warnings(&manifest.config.motion_warnings()) {
                println!("{}", line);
            }
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Timeline(args) => {
            let manifest = scan::scan(&cli.source)?;
            let options = timeline::TimelineOptions {
                reduced: args.reduced,
                flip_at: args.flip_at,
                duration: args.duration,
                ..timeline::TimelineOptions::default()
            };
            let report = timeline::simulate(&manifest, &options);
            output::print_timeline_report(&report);
        }
    }

    Ok(())
}

fn write_manifest(manifest: &simple_folio::types::Manifest, temp_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(temp_dir.join("manifest.json"), json)
}

/// Copy assets on the rayon pool while a printer thread reports progress.
fn copy_assets(
    manifest_path: &Path,
    source: &Path,
    output_dir: &Path,
    cache_args: &CacheArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    init_thread_pool();
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_asset_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = assets::copy_assets(
        manifest_path,
        source,
        output_dir,
        !cache_args.no_cache,
        Some(tx),
    );
    printer
        .join()
        .map_err(|_| std::io::Error::other("progress printer panicked"))?;
    for line in output::format_asset_summary(&result?) {
        println!("{}", line);
    }
    Ok(())
}

/// Initialize the global rayon pool once; later calls are no-ops.
fn init_thread_pool() {
    let threads = std::thread::available_parallelism().map_or(1, |n| n.get());
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
