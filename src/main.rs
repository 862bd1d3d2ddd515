use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use stillframe::imaging::WebpBackend;
use stillframe::pipeline::{self, BuildConfig};
use stillframe::settings::BuildSettings;
use stillframe::{discover, output};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "stillframe")]
#[command(about = "Asset build pipeline for photo portfolios")]
#[command(long_about = "\
Asset build pipeline for photo portfolios

Your filesystem is the data source. Every subdirectory of the source root
is one gallery; every image inside it is one photograph.

Content structure:

  gallery/
  ├── bw/                          # Gallery \"bw\"
  │   ├── pier.jpg                 # Accepted: jpg, jpeg, png, webp, tiff, bmp
  │   └── dunes.png
  └── color/
      └── leaf.jpg

Each build produces, per gallery:

  <output>/<gallery>/thumb/<id>.webp    400px longest edge
  <output>/<gallery>/medium/<id>.webp   800px longest edge
  <output>/<gallery>/full/<id>.webp     1600px longest edge
  <output>/<gallery>/manifest.json      image list for the viewer

Unchanged images are skipped (mtime comparison; use --force to override).
Outputs whose sources are gone are deleted, and the gallery list in the
site configuration is kept in sync without touching display names or
other operator-edited fields.")]
#[command(version = version_string())]
struct Cli {
    /// Source root: one subdirectory per gallery
    #[arg(long, default_value = "gallery", global = true)]
    source: PathBuf,

    /// Output root for encoded variants and manifests
    #[arg(long, default_value = "web/public/assets/gallery", global = true)]
    output: PathBuf,

    /// Site configuration document (gallery list is synced into it)
    #[arg(long, default_value = "web/public/site.json", global = true)]
    site_config: PathBuf,

    /// Build settings file (size classes, quality)
    #[arg(long, default_value = "stillframe.toml", global = true)]
    settings: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Clone)]
struct BuildArgs {
    /// Reprocess all images, even if unchanged
    #[arg(long)]
    force: bool,

    /// Number of parallel encode workers (0 = one per CPU core)
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Process all galleries: encode, reconcile, sync config
    Build(BuildArgs),
    /// Validate the source tree without writing anything
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Build(args) => run_build(&cli, args),
        Command::Check => run_check(&cli),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_build(cli: &Cli, args: &BuildArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let settings = BuildSettings::load(&cli.settings)?;

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_build_event(&event);
        }
    });

    let config = BuildConfig {
        source_root: &cli.source,
        output_root: &cli.output,
        site_config: Some(&cli.site_config),
        settings: &settings,
        force: args.force,
        jobs: args.jobs,
    };
    let backend = WebpBackend::new();
    let result = pipeline::build(&backend, &config, Some(&tx));
    drop(tx);
    let _ = printer.join();

    let summary = result?;
    output::print_summary(&summary);

    Ok(if summary.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_check(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let ids = discover::discover_galleries(&cli.source)?;

    let mut galleries = Vec::with_capacity(ids.len());
    for id in &ids {
        let sources = discover::collect_sources(&cli.source.join(id))?;
        galleries.push((id.clone(), sources.len()));
    }

    for line in output::format_check_output(&galleries) {
        println!("{line}");
    }

    Ok(ExitCode::SUCCESS)
}
