use clap::Parser;
use log::{error, info, warn};
use std::path::Path;
use std::process;
use usvolume_core::cli::meta_image::write_volume;
use usvolume_core::cli::{setup_logging, Cli, OutputFormat};
use usvolume_core::{TextReport, VolumeInfo, VolumeReader};

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    let reader = match VolumeReader::open(&cli.file) {
        Ok(reader) => reader,
        Err(e) => {
            error!("Failed to read {}: {}", cli.file.display(), e);
            eprintln!("Error: Failed to read {}: {}", cli.file.display(), e);
            process::exit(1);
        }
    };

    let info = match reader.information() {
        Ok(info) => info,
        Err(e) if e.is_unsupported() => {
            info!("{} is not a supported volume: {}", cli.file.display(), e);
            eprintln!("Error: {} is not a supported ultrasound volume", cli.file.display());
            process::exit(2);
        }
        Err(e) => {
            error!("Malformed volume {}: {}", cli.file.display(), e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    output_info(&cli.file, &info, cli.format);

    if let Some(dir) = &cli.output_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Error: Failed to create {}: {}", dir.display(), e);
            process::exit(1);
        }
        let failed = write_volumes(&reader, &info, dir, &output_stem(&cli.file));
        if failed > 0 {
            eprintln!("Error: {} of {} volumes could not be written", failed, info.port_count());
            process::exit(1);
        }
    }
}

fn output_stem(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "volume".to_string())
}

/// Writes every port, returning the number of ports that failed
fn write_volumes(reader: &VolumeReader, info: &VolumeInfo, dir: &Path, stem: &str) -> usize {
    let mut failed = 0;
    for port in 0..info.port_count() {
        let result = reader
            .read_volume(info, port)
            .map_err(|e| e.to_string())
            .and_then(|voxels| {
                write_volume(dir, stem, port, &info.geometry, &voxels).map_err(|e| e.to_string())
            });

        match result {
            Ok(header) => info!("Wrote port {} to {}", port, header.display()),
            Err(e) => {
                warn!("Skipping port {}: {}", port, e);
                failed += 1;
            }
        }
    }
    failed
}

fn output_info(file: &Path, info: &VolumeInfo, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", TextReport::new(file, info));
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match serde_json::to_string_pretty(info) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}
