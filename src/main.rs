//! DRS CLI - Command-line tool for DRS model containers.
//!
//! This is the main entry point for the `drs` command-line application.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use walkdir::WalkDir;

use drs::prelude::*;

/// DRS - model container inspection and re-encoding tool
#[derive(Parser)]
#[command(name = "drs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show header, model type and records of a DRS file
    Info {
        /// Input DRS file
        #[arg(short, long)]
        input: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify every DRS file in a file or directory
    Classify {
        /// DRS file or directory to scan
        #[arg(short, long, env = "DRS_INPUT")]
        input: PathBuf,
    },

    /// Decode a DRS file and encode it again
    Resave {
        /// Input DRS file
        #[arg(short, long)]
        input: PathBuf,

        /// Output DRS file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Check that a DRS file survives decode, encode, decode unchanged
    Verify {
        /// Input DRS file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write an empty container of a model type
    New {
        /// Model type, e.g. AnimatedUnit
        #[arg(short = 't', long = "type")]
        model_type: ModelType,

        /// Output DRS file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Info { input, json } => {
            cmd_info(&input, json)?;
        }
        Commands::Classify { input } => {
            cmd_classify(&input)?;
        }
        Commands::Resave { input, output } => {
            cmd_resave(&input, &output)?;
        }
        Commands::Verify { input } => {
            cmd_verify(&input)?;
        }
        Commands::New { model_type, output } => {
            cmd_new(model_type, &output)?;
        }
    }

    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> Result<()> {
    let handle = ContainerHandle::open(input).with_context(|| format!("Failed to decode {}", input.display()))?;
    let summary = handle.container().summary(handle.registry())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("File: {}", input.display());
    println!("Models: {}", summary.number_of_models);
    println!("Nodes: {} (root included)", summary.node_count);
    println!("Index table at {}", summary.node_information_offset);
    println!("Hierarchy table at {}", summary.node_hierarchy_offset);
    match (summary.model_type, summary.rule) {
        (Some(model_type), Some(rule)) => println!("Model type: {model_type} ({rule})"),
        _ => println!("Model type: unknown"),
    }
    if let Some(conflict) = summary.conflict {
        println!("  fallback chain would say {conflict}");
    }

    println!();
    println!("{:<24} {:>10} {:>10} {:>10}", "Node", "Offset", "Size", "CRC32C");
    for node in &summary.nodes {
        let offset = node.offset.map_or_else(|| "-".to_string(), |o| o.to_string());
        println!("{:<24} {:>10} {:>10} {:>10x}", node.name, offset, node.size, node.crc32c);
    }

    Ok(())
}

fn collect_drs_files(input: &Path) -> Vec<PathBuf> {
    if input.is_file() {
        return vec![input.to_path_buf()];
    }

    WalkDir::new(input)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("drs"))
        })
        .map(|entry| entry.into_path())
        .collect()
}

fn cmd_classify(input: &Path) -> Result<()> {
    let files = collect_drs_files(input);
    if files.is_empty() {
        anyhow::bail!("No .drs files found under {}", input.display());
    }

    println!("Classifying {} files...", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let results: Vec<_> = files
        .par_iter()
        .map(|path| {
            log::debug!("classifying {}", path.display());
            let result = fs::read(path)
                .map_err(drs::container::Error::from)
                .and_then(|data| Container::decode(&data, &PayloadRegistry::standard()))
                .map(|container| container.model_type());
            pb.inc(1);
            (path, result)
        })
        .collect();
    pb.finish_and_clear();

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut errors = 0;
    for (path, result) in &results {
        match result {
            Ok(model_type) => {
                let label = model_type.map_or_else(|| "unknown".to_string(), |t| t.to_string());
                println!("{label:<28} {}", path.display());
                *counts.entry(label).or_default() += 1;
            }
            Err(e) => {
                eprintln!("Error decoding {}: {}", path.display(), e);
                errors += 1;
            }
        }
    }

    println!("\nClassified {} files in {:?} ({} errors)", results.len() - errors, start.elapsed(), errors);
    for (label, count) in &counts {
        println!("{count:>8} {label}");
    }

    Ok(())
}

fn cmd_resave(input: &Path, output: &Path) -> Result<()> {
    println!("Re-encoding: {} -> {}", input.display(), output.display());

    let original = fs::read(input).context("Failed to read input file")?;
    log::info!("read {} ({} bytes)", input.display(), original.len());
    let mut handle = ContainerHandle::from_bytes(&original).context("Failed to decode DRS file")?;
    handle.save_to(output).context("Failed to encode DRS file")?;

    let written = fs::read(output).context("Failed to read back output file")?;
    if written == original {
        println!("Output is byte-identical to the input");
    } else {
        println!(
            "Output differs from the input ({} -> {} bytes, crc32c {:08x} -> {:08x})",
            original.len(),
            written.len(),
            crc::hash_bytes(&original),
            crc::hash_bytes(&written)
        );
    }

    Ok(())
}

fn cmd_verify(input: &Path) -> Result<()> {
    let handle = ContainerHandle::open(input).context("Failed to decode DRS file")?;
    let (bytes, differences) = handle.verify_round_trip().context("Failed to re-encode DRS file")?;
    log::info!("{}: re-encoded to {} bytes", input.display(), bytes.len());

    for difference in &differences {
        eprintln!("Mismatch: {difference}");
    }
    if !differences.is_empty() {
        anyhow::bail!("{} failed verification with {} mismatches", input.display(), differences.len());
    }

    println!(
        "{}: OK ({} nodes, {} bytes)",
        input.display(),
        handle.list_payload_node_names().len(),
        bytes.len()
    );

    Ok(())
}

fn cmd_new(model_type: ModelType, output: &Path) -> Result<()> {
    let mut handle = ContainerHandle::for_model_type(model_type)?;
    log::info!("authoring empty {model_type}");
    handle.save_to(output).context("Failed to write DRS file")?;

    println!(
        "Wrote empty {} with {} nodes to {}",
        model_type,
        handle.list_payload_node_names().len(),
        output.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("drs-cli-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_new_then_verify_and_classify() {
        let dir = temp_path("classify");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("unit.drs");

        cmd_new(ModelType::AnimatedUnit, &path).unwrap();
        cmd_verify(&path).unwrap();
        assert_eq!(collect_drs_files(&dir), vec![path.clone()]);
        cmd_classify(&dir).unwrap();

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let path = temp_path("garbage.drs");
        fs::write(&path, b"not a drs file").unwrap();
        assert!(cmd_verify(&path).is_err());
        let _ = fs::remove_file(&path);
    }
}
