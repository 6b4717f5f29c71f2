//! Main entry point for the pakmap CLI application.
//!
//! This binary extracts the embedded pak listing from a supported game
//! executable, read from the local filesystem or a remote HTTP URL, and
//! writes it out as a JSON mapping.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use pakmap::{Build, Cli, HttpRangeReader, LocalFileReader, MappingExporter, ReadAt};

/// Application entry point.
///
/// Parses command-line arguments, identifies the build from the image
/// name, and dispatches to the appropriate reader based on whether the
/// input is a local file or HTTP URL.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Identify the build before touching the image at all. Unrecognized
    // images are reported and produce no output, but are not a failure.
    let Some(build) = Build::detect_from_path(&cli.file) else {
        eprintln!(
            "{}: not a supported executable (expected DR1_us.exe or DR2_us.exe)",
            cli.file
        );
        return Ok(());
    };

    if cli.is_http_url() {
        // Handle a remote image via HTTP Range requests
        let reader = HttpRangeReader::new(cli.file.clone()).await?;
        let transferred_before = reader.transferred_bytes();
        let reader = Arc::new(reader);

        process_image(reader.clone(), build, &cli).await?;

        // Display network transfer statistics for HTTP sources
        if !cli.is_quiet() {
            let transferred = reader.transferred_bytes() - transferred_before;
            eprintln!("\nTotal bytes transferred: {}", format_size(transferred));
        }
    } else {
        // Handle a local image
        let reader = Arc::new(LocalFileReader::new(Path::new(&cli.file))?);
        process_image(reader, build, &cli).await?;
    }

    Ok(())
}

/// Walk one image and emit its mapping based on CLI options.
///
/// Three modes:
/// - List mode (`-l`): print pak names and file counts, write nothing
/// - Pipe mode (`-p`): print the JSON mapping on stdout
/// - Default: write the per-build mapping file
///
/// # Arguments
///
/// * `reader` - A reader implementing the `ReadAt` trait for random access
/// * `build` - The identified build, which fixes the table geometry
/// * `cli` - Parsed command-line arguments
///
/// # Returns
///
/// Returns `Ok(())` on success. Any walk failure aborts the run before
/// anything is written: the mapping is complete or absent, never partial.
async fn process_image<R: ReadAt + 'static>(reader: Arc<R>, build: Build, cli: &Cli) -> Result<()> {
    let exporter = MappingExporter::new(reader, build);

    let started = Instant::now();
    let entries = exporter.walk().await?;
    let elapsed = started.elapsed();

    if cli.list {
        for entry in &entries {
            println!("{} ({} files)", entry.name, entry.files.len());
        }
        return Ok(());
    }

    let pak_count = entries.len();
    let file_count: usize = entries.iter().map(|e| e.files.len()).sum();

    if cli.pipe {
        return exporter.export_to_stdout(entries).await;
    }

    let output_path = exporter
        .export_to_file(entries, cli.output_dir.as_deref().map(Path::new))
        .await?;

    if !cli.is_quiet() {
        println!(
            "Got {} paks, {} files in {:.2?}",
            pak_count, file_count, elapsed
        );
        println!("Wrote {}", output_path.display());
    }

    Ok(())
}

/// Format a byte size into a human-readable string.
///
/// Automatically selects the appropriate unit (bytes, KB, MB, GB)
/// based on the size magnitude.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
