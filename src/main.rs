// MRZ scanner command line: replays recorded OCR frames through a detection session

use clap::Parser;
use mrzscan::{
    models::{DocumentFormat, Observation},
    processing::GateMode,
    utils::MrzError,
    validation::ExpiryValidator,
    MrzScanner, ScanResult, ScanStats, ScannerConfig,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "mrzscan", version, about = "Extract and validate MRZ data from recorded OCR frames")]
struct Args {
    /// Frames file: one OCR candidate per line, frames separated by a blank line
    input: PathBuf,

    /// Document format (td1 or td3); overrides the config file
    #[arg(short, long)]
    format: Option<DocumentFormat>,

    /// JSON scanner configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep scanning after an accepted reading
    #[arg(long)]
    continuous: bool,

    /// Input lines are JSON arrays of observations, one frame per line
    #[arg(long)]
    json_input: bool,

    /// Print accepted readings as JSON
    #[arg(long)]
    json: bool,
}

fn read_frames(path: &Path, json_input: bool) -> Result<Vec<Vec<Observation>>, MrzError> {
    let content = std::fs::read_to_string(path)?;

    if json_input {
        return content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str::<Vec<Observation>>(line).map_err(MrzError::from))
            .collect();
    }

    let mut frames = Vec::new();
    let mut current = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                frames.push(std::mem::take(&mut current));
            }
        } else {
            current.push(Observation::new(line));
        }
    }
    if !current.is_empty() {
        frames.push(current);
    }
    Ok(frames)
}

// Function to print a detailed scan report
fn print_detailed_report(result: &ScanResult, config: &ScannerConfig) {
    let fields = &result.fields;
    println!("\n===============================================");
    println!("      MRZ SCAN DETAILED REPORT");
    println!("===============================================\n");

    println!("DOCUMENT INFORMATION:");
    println!("  Format: {}", fields.format);
    println!("  Document Type: {}", fields.document_type);
    println!("  Issuing Country: {}", fields.issuing_country);
    println!("  Document Number: {}", fields.document_number);
    println!("  Surname: {}", fields.surname);
    println!("  Given Names: {}", fields.given_names);
    println!("  Nationality: {}", fields.nationality);
    println!("  Date of Birth: {}", fields.date_of_birth);
    println!("  Sex: {}", fields.sex);
    println!("  Date of Expiry: {}", fields.date_of_expiry);
    println!("  Optional Data: {:?}", fields.optional_data);
    if fields.optional_data_2.is_some() {
        println!("  Optional Data 2: {:?}", fields.optional_data_2);
    }

    let today = config.field_parser().reference_date();
    let expiry = ExpiryValidator::validate(fields, today);
    println!(
        "\n  Expiry: {} ({} days remaining)",
        if !expiry.not_expired {
            "EXPIRED"
        } else if !expiry.is_valid {
            "INCONSISTENT DATES"
        } else {
            "VALID"
        },
        expiry.days_remaining
    );

    if let Some(region) = result.region {
        println!(
            "  MRZ Region: x={:.3} y={:.3} w={:.3} h={:.3}",
            region.x, region.y, region.width, region.height
        );
    }

    println!("\nMRZ:\n{}", result.mrz);
}

fn print_stats(stats: &ScanStats) {
    println!("\nSCAN STATISTICS:");
    println!("  Frames: {}", stats.frames);
    println!("  Observations: {}", stats.observations);
    println!("  Lines Stored: {}", stats.lines_stored);
    println!("  Validations: {}", stats.validations);
    println!("  Rejections: {}", stats.rejections);
    println!("  Successes: {}", stats.successes);
    if let Some(duration) = stats.last_scan_duration {
        println!("  Last Scan Duration: {:?}", duration);
    }
}

fn main() -> Result<(), MrzError> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ScannerConfig::from_json_file(path)?,
        None => ScannerConfig::default(),
    };
    if let Some(format) = args.format {
        config.format = format;
    }
    if args.continuous {
        config.mode = GateMode::Continuous;
    }

    let frames = read_frames(&args.input, args.json_input)?;
    log::info!("Replaying {} frames as {}", frames.len(), config.format);

    let mut scanner = MrzScanner::new(config.clone())?;
    let mut results = Vec::new();
    for frame in frames {
        if !scanner.is_open() {
            break;
        }
        let outcome = scanner.process_frame(frame);
        for rejection in &outcome.rejections {
            log::debug!("Rejected: {}", rejection);
        }
        results.extend(outcome.accepted);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if results.is_empty() {
        println!("No valid MRZ found");
        print_stats(scanner.stats());
    } else {
        for result in &results {
            print_detailed_report(result, &config);
        }
        print_stats(scanner.stats());
    }

    Ok(())
}
