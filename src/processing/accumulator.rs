use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{AccumulatedReading, DocumentFormat, LineRole, LineSlot, Observation, Region};
use crate::validation::LineClassifier;

/// What happens to stored lines after a complete reading fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Keep every line; later frames replace lines one at a time.
    #[default]
    RetainLines,
    /// Drop every line and start over.
    ClearOnReject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccumulatorEvent {
    pub role_filled: Option<LineRole>,
    /// The stored text of that role differs from before this offer.
    pub changed: bool,
    /// Set when this offer changed the stored lines and every required line
    /// is now present.
    pub ready_for_validation: bool,
}

/// Collects the best known candidate for each line of one document across
/// frames.
#[derive(Debug, Clone)]
pub struct ReadingAccumulator {
    reading: AccumulatedReading,
}

impl ReadingAccumulator {
    pub fn new(format: DocumentFormat) -> Self {
        ReadingAccumulator {
            reading: AccumulatedReading::new(format),
        }
    }

    pub fn format(&self) -> DocumentFormat {
        self.reading.format
    }

    pub fn reading(&self) -> &AccumulatedReading {
        &self.reading
    }

    pub fn is_complete(&self) -> bool {
        self.reading.is_complete()
    }

    pub fn is_empty(&self) -> bool {
        self.reading.format.roles().iter().all(|role| self.reading.slot(*role).is_none())
    }

    /// Classifies `observation` and stores it in the slot of its role. Text of
    /// the wrong shape leaves the accumulator untouched.
    pub fn offer(&mut self, observation: &Observation) -> AccumulatorEvent {
        let role = match LineClassifier::classify(&observation.text, self.reading.format) {
            Some(role) => role,
            None => return AccumulatorEvent::default(),
        };

        let slot = self.reading.slot_mut(role);
        let changed = slot
            .as_ref()
            .map_or(true, |existing| existing.text != observation.text);
        *slot = Some(LineSlot {
            text: observation.text.clone(),
            region: observation.region,
        });
        if changed {
            debug!("Stored {} {}: {}", self.reading.format, role, observation.text);
        }

        AccumulatorEvent {
            role_filled: Some(role),
            changed,
            ready_for_validation: changed && self.reading.is_complete(),
        }
    }

    pub fn reset(&mut self) {
        self.reading = AccumulatedReading::new(self.reading.format);
    }

    /// Union of the regions of every stored line that reported one.
    pub fn combined_region(&self) -> Option<Region> {
        let regions: Vec<Region> = self
            .reading
            .format
            .roles()
            .iter()
            .filter_map(|role| self.reading.slot(*role).and_then(|slot| slot.region))
            .collect();
        Region::union_all(regions.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE1: &str = "P<GBRPROCTOR<<DOUGLAS<JOHN<BEAUCHAMP<<<<<<<<";
    const LINE2: &str = "5189313767GBR8310213M2507064<<<<<<<<<<<<<<<4";

    #[test]
    fn test_ready_on_transition_only() {
        let mut acc = ReadingAccumulator::new(DocumentFormat::TD3);
        let first = acc.offer(&Observation::new(LINE1));
        assert_eq!(first.role_filled, Some(LineRole::Line1));
        assert!(!first.ready_for_validation);

        let second = acc.offer(&Observation::new(LINE2));
        assert_eq!(second.role_filled, Some(LineRole::Line2));
        assert!(second.ready_for_validation);

        // identical re-offer is harmless and does not ask for revalidation
        let again = acc.offer(&Observation::new(LINE2));
        assert_eq!(again.role_filled, Some(LineRole::Line2));
        assert!(!again.changed);
        assert!(!again.ready_for_validation);
        assert!(acc.is_complete());
    }

    #[test]
    fn test_overwrite_while_complete_is_ready() {
        let mut acc = ReadingAccumulator::new(DocumentFormat::TD3);
        acc.offer(&Observation::new(LINE1));
        let misread = LINE2.replacen("5189313767", "5189318767", 1);
        assert!(acc.offer(&Observation::new(misread)).ready_for_validation);

        let event = acc.offer(&Observation::new(LINE2));
        assert!(event.ready_for_validation);
        assert_eq!(acc.reading().line2.as_ref().map(|s| s.text.as_str()), Some(LINE2));
    }

    #[test]
    fn test_shape_mismatch_does_not_mutate() {
        let mut acc = ReadingAccumulator::new(DocumentFormat::TD3);
        acc.offer(&Observation::new(LINE1));
        let before = acc.reading().clone();

        for noise in ["", "PASSPORT", &LINE2[..43], "5189313767GBR831O213M2507064<<<<<<<<<<<<<<<4"] {
            let event = acc.offer(&Observation::new(noise));
            assert_eq!(event, AccumulatorEvent::default());
            assert_eq!(acc.reading(), &before);
        }
    }

    #[test]
    fn test_reset_clears_slots() {
        let mut acc = ReadingAccumulator::new(DocumentFormat::TD3);
        acc.offer(&Observation::new(LINE1));
        assert!(!acc.is_empty());
        acc.reset();
        assert!(acc.is_empty());
        assert_eq!(acc.format(), DocumentFormat::TD3);
    }

    #[test]
    fn test_combined_region() {
        let mut acc = ReadingAccumulator::new(DocumentFormat::TD3);
        assert_eq!(acc.combined_region(), None);
        acc.offer(&Observation::new(LINE1).with_region(Region::new(0.1, 0.8, 0.8, 0.05)));
        acc.offer(&Observation::new(LINE2).with_region(Region::new(0.1, 0.86, 0.8, 0.05)));
        let region = acc.combined_region().unwrap();
        assert!((region.y - 0.8).abs() < 1e-6);
        assert!((region.max_y() - 0.91).abs() < 1e-6);
    }
}
