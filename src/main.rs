use anyhow::{bail, Context};
use chunk_trimmer::provider::region_position_from_path;
use chunk_trimmer::trim;
use chunk_trimmer::trim::{TrimConfig, DEFAULT_CUTOFF_TICKS};
use chunk_trimmer::{FolderRegionProvider, Region, RegionPosition};
use clap::{Parser, Subcommand};
use log::debug;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Tools for inspecting and removing barely visited chunks in region files.
#[derive(Parser)]
#[command(name = "chunk-trimmer", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every chunk of a region with its inhabited time.
    List {
        /// Region file to inspect.
        region: PathBuf,
    },
    /// Print the largest inhabited time of a region.
    Max {
        /// Region file to inspect.
        region: PathBuf,
    },
    /// Remove chunks inhabited for less than the cutoff.
    Trim {
        /// Region files or folders of region files.
        #[arg(required = true)]
        targets: Vec<PathBuf>,
        /// Inhabited time cutoff in ticks.
        #[arg(long, default_value_t = DEFAULT_CUTOFF_TICKS)]
        cutoff: i64,
        /// Report affected chunks without removing them.
        #[arg(long)]
        dry_run: bool,
    },
    /// Set the inhabited time of every chunk in a region to zero.
    Reset {
        /// Region file to rewrite.
        region: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::List { region } => list(&region),
        Command::Max { region } => max(&region),
        Command::Trim {
            targets,
            cutoff,
            dry_run,
        } => {
            let config = TrimConfig {
                cutoff_ticks: cutoff,
                dry_run,
            };

            trim_targets(&targets, &config)
        }
        Command::Reset { region } => reset(&region),
    }
}

/// The position only labels log output, unparsable names fall back to 0, 0.
fn region_position(path: &Path) -> RegionPosition {
    region_position_from_path(path).unwrap_or_else(|_| RegionPosition::new(0, 0))
}

fn open_region(path: &Path) -> anyhow::Result<Region<File>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open region file {}", path.display()))?;

    Region::load(region_position(path), file)
        .with_context(|| format!("Failed to load region file {}", path.display()))
}

fn open_region_mut(path: &Path) -> anyhow::Result<Region<File>> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .with_context(|| format!("Failed to open region file {}", path.display()))?;

    Region::load(region_position(path), file)
        .with_context(|| format!("Failed to load region file {}", path.display()))
}

fn list(path: &Path) -> anyhow::Result<()> {
    let mut region = open_region(path)?;

    for report in trim::list_chunks(&mut region)? {
        println!(
            "{} {} {}",
            report.position.x, report.position.z, report.inhabited_time
        );
    }

    Ok(())
}

fn max(path: &Path) -> anyhow::Result<()> {
    let mut region = open_region(path)?;
    let maximum = trim::max_inhabited_time(&mut region)?;

    println!("{}", maximum);

    Ok(())
}

fn reset(path: &Path) -> anyhow::Result<()> {
    let mut region = open_region_mut(path)?;
    let reset_count = trim::reset_inhabited_time(&mut region)?;

    println!("{} chunks reset", reset_count);

    Ok(())
}

fn trim_targets(targets: &[PathBuf], config: &TrimConfig) -> anyhow::Result<()> {
    let mut failed = false;

    for target in targets {
        if target.is_dir() {
            let provider = FolderRegionProvider::new(target);

            let positions: Vec<RegionPosition> = provider
                .iter_positions()
                .with_context(|| format!("Failed to list region files in {}", target.display()))?
                .collect();

            for position in positions {
                let region_path = provider.region_path(position);

                if let Err(error) = trim_file(&region_path, config) {
                    eprintln!("{}: {:#}", region_path.display(), error);
                    failed = true;
                }
            }
        } else if let Err(error) = trim_file(target, config) {
            eprintln!("{}: {:#}", target.display(), error);
            failed = true;
        }
    }

    if failed {
        bail!("Some region files could not be trimmed");
    }

    Ok(())
}

/// Trims one region file and prints a `file,x,z,ticks` record for every
/// affected chunk.
fn trim_file(path: &Path, config: &TrimConfig) -> anyhow::Result<()> {
    let mut region = open_region_mut(path)?;

    debug!(
        target: "chunk-trimmer",
        "Trimming region x: {}, z: {} at {}",
        region.position().x,
        region.position().z,
        path.display()
    );

    for report in trim::trim_chunks(&mut region, config)? {
        println!(
            "{},{},{},{}",
            path.display(),
            report.position.x,
            report.position.z,
            report.inhabited_time
        );
    }

    Ok(())
}
