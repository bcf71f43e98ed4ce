use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process;
use usvolume_core::extraction::is_vendor_volume;
use usvolume_core::{Container, VolumeInfo, VolumeReader};

/// CLI tool for finding ultrasound volumes in a directory
#[derive(Parser, Debug)]
#[command(name = "usvolume-scan")]
#[command(about = "Find readable 3D/4D ultrasound volumes in a directory of DICOM files")]
#[command(version)]
struct Cli {
    /// Directory containing DICOM files
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
    /// File paths of readable volumes only (one per line)
    Paths,
}

/// Outcome of probing one file
#[derive(Debug)]
enum Probe {
    /// Readable volume
    Volume(VolumeInfo),
    /// Vendor ultrasound file with a layout this reader does not handle
    Unsupported(String),
    /// Claims a supported layout but cannot be decoded
    Malformed(String),
}

#[derive(Debug)]
struct ScanEntry {
    file_path: PathBuf,
    probe: Probe,
}

fn main() {
    let cli = Cli::parse();

    usvolume_core::cli::setup_logging(cli.verbose);

    // Verify directory exists
    if !cli.directory.is_dir() {
        eprintln!("Error: {} is not a directory", cli.directory.display());
        process::exit(1);
    }

    info!("Processing directory: {}", cli.directory.display());

    let dicom_files = match collect_dicom_files(&cli.directory) {
        Ok(files) => files,
        Err(e) => {
            error!("Failed to read directory: {}", e);
            eprintln!("Error: Failed to read directory: {}", e);
            process::exit(1);
        }
    };

    if dicom_files.is_empty() {
        eprintln!("Error: No DICOM files (.dcm) found in directory");
        process::exit(1);
    }

    info!("Found {} DICOM files", dicom_files.len());

    let entries: Vec<ScanEntry> = dicom_files
        .into_iter()
        .filter_map(|file_path| probe_file(&file_path).map(|probe| ScanEntry { file_path, probe }))
        .collect();

    info!("Found {} vendor ultrasound files", entries.len());

    output_entries(&entries, cli.format);
}

/// Probes one file; `None` for files from other vendors or modalities
fn probe_file(path: &Path) -> Option<Probe> {
    let container = match Container::load(path) {
        Ok(container) => container,
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            return None;
        }
    };

    if !is_vendor_volume(container.dicom()) {
        info!("Skipping {}: not a vendor ultrasound file", path.display());
        return None;
    }

    let reader = VolumeReader::from_container(container);
    let probe = match reader.information() {
        Ok(info) => Probe::Volume(info),
        Err(e) if e.is_unsupported() => {
            info!("{}: {}", path.display(), e);
            Probe::Unsupported(e.to_string())
        }
        Err(e) => {
            warn!("{}: {}", path.display(), e);
            Probe::Malformed(e.to_string())
        }
    };
    Some(probe)
}

fn collect_dicom_files(directory: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension() {
                // Accept .dcm and .dicom extensions
                if ext.eq_ignore_ascii_case("dcm") || ext.eq_ignore_ascii_case("dicom") {
                    files.push(path);
                }
            } else if is_dicom_file(&path) {
                // Scanners commonly export without extension
                info!("Found headerless DICOM file: {}", path.display());
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Checks for the 128-byte preamble followed by the "DICM" magic string
fn is_dicom_file(path: &Path) -> bool {
    use std::fs::File;
    use std::io::Read;

    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let mut buffer = [0u8; 132];
    match file.read(&mut buffer) {
        Ok(n) if n >= 132 => &buffer[128..132] == b"DICM",
        _ => false,
    }
}

fn output_entries(entries: &[ScanEntry], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", TextReport::new(entries));
        }
        OutputFormat::Paths => {
            for entry in entries {
                if let Probe::Volume(_) = entry.probe {
                    println!("{}", entry.file_path.display());
                }
            }
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match output_json(entries) {
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

#[cfg(feature = "json")]
fn output_json(entries: &[ScanEntry]) -> Result<String, serde_json::Error> {
    use serde::Serialize;

    #[derive(Serialize)]
    struct EntryJson<'a> {
        file_path: String,
        status: &'static str,
        info: Option<&'a VolumeInfo>,
        error: Option<&'a str>,
    }

    let json_entries: Vec<EntryJson> = entries
        .iter()
        .map(|entry| {
            let file_path = entry.file_path.display().to_string();
            match &entry.probe {
                Probe::Volume(info) => EntryJson {
                    file_path,
                    status: "volume",
                    info: Some(info),
                    error: None,
                },
                Probe::Unsupported(e) => EntryJson {
                    file_path,
                    status: "unsupported",
                    info: None,
                    error: Some(e),
                },
                Probe::Malformed(e) => EntryJson {
                    file_path,
                    status: "malformed",
                    info: None,
                    error: Some(e),
                },
            }
        })
        .collect();

    serde_json::to_string_pretty(&json_entries)
}

/// Text report for a directory scan
struct TextReport<'a> {
    entries: &'a [ScanEntry],
}

impl<'a> TextReport<'a> {
    fn new(entries: &'a [ScanEntry]) -> Self {
        Self { entries }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ultrasound Volume Scan")?;
        writeln!(f, "======================")?;
        writeln!(f)?;

        if self.entries.is_empty() {
            writeln!(f, "No vendor ultrasound files found")?;
        }

        for entry in self.entries {
            writeln!(f, "{}", entry.file_path.display())?;
            match &entry.probe {
                Probe::Volume(info) => {
                    let [x, y, z] = info.geometry.dimensions();
                    writeln!(f, "  Type: {}", info.volume_type.simple_name())?;
                    writeln!(f, "  Dimensions: {}x{}x{}", x, y, z)?;
                    writeln!(f, "  Ports: {}", info.port_count())?;
                    if info.has_doppler() {
                        writeln!(f, "  Doppler: yes")?;
                    }
                }
                Probe::Unsupported(e) => writeln!(f, "  Unsupported: {}", e)?,
                Probe::Malformed(e) => writeln!(f, "  Malformed: {}", e)?,
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;
    use usvolume_core::{Extent, Geometry, VolumeType, VoxelSpacing};

    #[test]
    fn test_is_dicom_file_with_valid_header() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test_dicom");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(&[0u8; 128]).unwrap();
        file.write_all(b"DICM").unwrap();
        file.write_all(b"additional data").unwrap();

        assert!(is_dicom_file(&file_path));
    }

    #[test]
    fn test_is_dicom_file_wrong_magic() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("wrong_magic");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(&[0u8; 128]).unwrap();
        file.write_all(b"NOTM").unwrap();

        assert!(!is_dicom_file(&file_path));
    }

    #[test]
    fn test_is_dicom_file_too_small() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("small_file");
        File::create(&file_path)
            .unwrap()
            .write_all(b"small")
            .unwrap();

        assert!(!is_dicom_file(&file_path));
    }

    #[test]
    fn test_collect_dicom_files() {
        let temp_dir = TempDir::new().unwrap();

        File::create(temp_dir.path().join("file1.dcm")).unwrap();
        File::create(temp_dir.path().join("file2.DCM")).unwrap();
        File::create(temp_dir.path().join("file3.dicom")).unwrap();
        File::create(temp_dir.path().join("file4.txt")).unwrap();
        File::create(temp_dir.path().join("headerless_other"))
            .unwrap()
            .write_all(b"not dicom")
            .unwrap();

        let files = collect_dicom_files(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_probe_non_dicom_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.dcm");
        File::create(&path).unwrap().write_all(b"broken").unwrap();
        assert!(probe_file(&path).is_none());
    }

    #[test]
    fn test_text_report() {
        let entries = vec![
            ScanEntry {
                file_path: PathBuf::from("a.dcm"),
                probe: Probe::Volume(VolumeInfo {
                    volume_type: VolumeType::Single3D,
                    geometry: Geometry::new(
                        Extent::from_dimensions([64, 64, 32]),
                        VoxelSpacing::new(0.5, 0.5, 0.5),
                        2,
                    ),
                    frame_series: None,
                }),
            },
            ScanEntry {
                file_path: PathBuf::from("b.dcm"),
                probe: Probe::Unsupported("Unsupported volume type: 'Native 2D'".to_string()),
            },
        ];

        let output = TextReport::new(&entries).to_string();
        assert!(output.contains("a.dcm\n  Type: 3d\n  Dimensions: 64x64x32\n  Ports: 2"));
        assert!(output.contains("  Doppler: yes"));
        assert!(output.contains("b.dcm\n  Unsupported: "));
    }
}
