//! seedfs CLI - apply declarative filesystem manifests

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use seedfs::{apply, build_fetch_plan, Context, FetchOp, LocalFetcher, Manifest, SystemLookup};

#[derive(Parser)]
#[command(name = "seedfs")]
#[command(about = "declarative filesystem materializer - fetch, verify, install")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// apply a manifest to a destination root
    Apply {
        /// manifest file (toml)
        manifest: PathBuf,

        /// destination root all declared paths resolve under
        #[arg(long, default_value = "/")]
        root: PathBuf,
    },

    /// print the ordered fetch plan without touching the filesystem
    Plan {
        /// manifest file (toml)
        manifest: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> seedfs::Result<()> {
    match cli.command {
        Commands::Apply { manifest, root } => {
            let manifest = Manifest::load(&manifest)?;
            let fetcher = LocalFetcher;
            let lookup = SystemLookup;
            let ctx = Context::new(&root, &fetcher, &lookup);
            apply(&ctx, &manifest)?;
        }

        Commands::Plan { manifest } => {
            let manifest = Manifest::load(&manifest)?;
            for file in &manifest.files {
                for op in build_fetch_plan(file)? {
                    let (mode, request) = match &op {
                        FetchOp::Replace(request) => ("replace", request),
                        FetchOp::Append(request) => ("append", request),
                    };
                    let verified = match &request.verify {
                        Some(v) => v.algorithm.name(),
                        None => "unverified",
                    };
                    println!(
                        "{} {} <- {} [{}]",
                        mode,
                        request.node.path.display(),
                        request.url,
                        verified
                    );
                }
            }
            for link in &manifest.links {
                let kind = if link.hard { "hardlink" } else { "symlink" };
                println!("{} {} -> {}", kind, link.node.path.display(), link.target);
            }
        }
    }

    Ok(())
}
