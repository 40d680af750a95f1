use mrzscan::models::{DocumentFormat, Observation, Region};
use mrzscan::processing::GateMode;
use mrzscan::utils::MrzError;
use mrzscan::{MrzScanner, ScanEvent, ScannerConfig};

const LINE1: &str = "P<GBRPROCTOR<<DOUGLAS<JOHN<BEAUCHAMP<<<<<<<<";
const LINE2: &str = "5189313767GBR8310213M2507064<<<<<<<<<<<<<<<4";

// Simulated OCR output for consecutive video frames of the same passport
fn frames() -> Vec<Vec<Observation>> {
    let line1_region = Region::new(0.06, 0.78, 0.88, 0.05);
    let line2_region = Region::new(0.06, 0.85, 0.88, 0.05);
    vec![
        vec![
            Observation::new("PASSPORT"),
            Observation::new("P<GBRPROCTOR<<DOUGLAS<JOHN<BEAUCHAMP<<<<<").with_region(line1_region),
        ],
        vec![
            Observation::new(LINE1).with_region(line1_region),
            // 'O' read for '0' in the birth date
            Observation::new("5189313767GBR831O213M2507064<<<<<<<<<<<<<<<4").with_region(line2_region),
        ],
        vec![
            // wrong digit in the document number
            Observation::new("5189318767GBR8310213M2507064<<<<<<<<<<<<<<<4").with_region(line2_region),
        ],
        vec![
            Observation::new(LINE1).with_region(line1_region),
            Observation::new(format!(" {} ", LINE2)).with_region(line2_region),
        ],
        vec![Observation::new(LINE1), Observation::new(LINE2)],
    ]
}

fn main() -> Result<(), MrzError> {
    env_logger::init();

    println!("MRZ Scanner Demo");
    println!("----------------");

    let mut scanner = MrzScanner::new(ScannerConfig {
        format: DocumentFormat::TD3,
        mode: GateMode::SingleShot,
        ..ScannerConfig::default()
    })?;

    for (index, frame) in frames().into_iter().enumerate() {
        if !scanner.is_open() {
            println!("Frame {}: skipped, reading already accepted", index + 1);
            continue;
        }
        for observation in frame {
            match scanner.offer(observation) {
                ScanEvent::Ignored => println!("Frame {}: ignored candidate", index + 1),
                ScanEvent::Stored(role) => println!("Frame {}: stored {}", index + 1, role),
                ScanEvent::Rejected(reason) => println!("Frame {}: rejected, {}", index + 1, reason),
                ScanEvent::Suppressed => println!("Frame {}: suppressed", index + 1),
                ScanEvent::Accepted(result) => {
                    println!("Frame {}: ACCEPTED", index + 1);
                    println!("  Document Number: {}", result.fields.document_number);
                    println!("  Name: {}", result.fields.full_name());
                    println!("  Date of Birth: {}", result.fields.date_of_birth);
                    println!("  Date of Expiry: {}", result.fields.date_of_expiry);
                    println!("  Region: {:?}", result.region);
                }
            }
        }
    }

    println!("\n{:?}", scanner.stats());
    Ok(())
}
