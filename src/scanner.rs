use log::{debug, info, warn};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::config::ScannerConfig;
use crate::models::{AccumulatedReading, DocumentFields, LineRole, Observation, Region, ValidatedMrz};
use crate::processing::{
    normalize_candidate, DetectionGate, FieldParser, GateDecision, GateState, ReadingAccumulator,
    RetryPolicy,
};
use crate::utils::MrzError;
use crate::validation::{MrzValidator, Rejection};

/// An accepted reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResult {
    pub fields: DocumentFields,
    pub mrz: ValidatedMrz,
    /// Union of the regions of the lines that made up the reading.
    pub region: Option<Region>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// The gate is closed; nothing was done.
    Suppressed,
    /// The candidate fits no line of the session's format.
    Ignored,
    Stored(LineRole),
    Rejected(Rejection),
    Accepted(ScanResult),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    pub accepted: Vec<ScanResult>,
    pub rejections: Vec<Rejection>,
    pub stored: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub frames: u64,
    pub observations: u64,
    /// Offers that changed a stored line.
    pub lines_stored: u64,
    pub validations: u64,
    pub rejections: u64,
    pub successes: u64,
    /// Time from the first observation of an attempt to its acceptance.
    pub last_scan_duration: Option<Duration>,
}

/// One detection session: classifies, accumulates, validates and parses
/// observations from a single OCR stream until the gate closes.
pub struct MrzScanner {
    config: ScannerConfig,
    accumulator: ReadingAccumulator,
    gate: DetectionGate,
    parser: FieldParser,
    stats: ScanStats,
    scan_started: Option<Instant>,
}

impl MrzScanner {
    pub fn new(config: ScannerConfig) -> Result<Self, MrzError> {
        config.validate()?;
        Ok(MrzScanner {
            accumulator: ReadingAccumulator::new(config.format),
            gate: DetectionGate::new(config.mode),
            parser: config.field_parser(),
            stats: ScanStats::default(),
            scan_started: None,
            config,
        })
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.gate.is_open()
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn reading(&self) -> &AccumulatedReading {
        self.accumulator.reading()
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    pub fn offer(&mut self, observation: Observation) -> ScanEvent {
        if !self.gate.is_open() {
            return ScanEvent::Suppressed;
        }
        self.stats.observations += 1;
        if observation.confidence_rank >= self.config.candidates_per_region {
            return ScanEvent::Ignored;
        }
        self.scan_started.get_or_insert_with(Instant::now);

        let observation = if self.config.normalize_candidates {
            Observation {
                text: normalize_candidate(&observation.text),
                ..observation
            }
        } else {
            observation
        };

        let event = self.accumulator.offer(&observation);
        let role = match event.role_filled {
            Some(role) => role,
            None => return ScanEvent::Ignored,
        };
        if event.changed {
            self.stats.lines_stored += 1;
        }
        if !event.ready_for_validation {
            return ScanEvent::Stored(role);
        }
        self.validate_reading()
    }

    /// Offers every observation of one frame, stopping early once the gate
    /// closes.
    pub fn process_frame<I>(&mut self, observations: I) -> FrameOutcome
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut outcome = FrameOutcome::default();
        if !self.gate.is_open() {
            return outcome;
        }
        self.stats.frames += 1;

        for observation in observations {
            match self.offer(observation) {
                ScanEvent::Stored(_) => outcome.stored += 1,
                ScanEvent::Rejected(rejection) => outcome.rejections.push(rejection),
                ScanEvent::Accepted(result) => {
                    outcome.accepted.push(result);
                    if !self.gate.is_open() {
                        break;
                    }
                }
                ScanEvent::Suppressed => break,
                ScanEvent::Ignored => {}
            }
        }
        outcome
    }

    /// Reopens the gate and drops any partially accumulated reading.
    pub fn reset(&mut self) {
        self.gate.reset();
        self.accumulator.reset();
        self.scan_started = None;
        info!("Scanner reset");
    }

    fn validate_reading(&mut self) -> ScanEvent {
        self.stats.validations += 1;
        let mrz = match MrzValidator::validate(self.accumulator.reading()) {
            Ok(mrz) => mrz,
            Err(rejection) => return self.reject(rejection),
        };
        let fields = match self.parser.parse(&mrz) {
            Ok(fields) => fields,
            Err(e) => {
                warn!("Checksums passed but fields did not parse: {}", e);
                return self.reject(Rejection::FieldParseFailed(e.to_string()));
            }
        };
        let region = self.accumulator.combined_region();

        match self.gate.try_accept(fields) {
            GateDecision::Accepted(fields) => {
                self.stats.successes += 1;
                self.stats.last_scan_duration = self.scan_started.take().map(|start| start.elapsed());
                self.accumulator.reset();
                ScanEvent::Accepted(ScanResult { fields, mrz, region })
            }
            GateDecision::Suppressed => ScanEvent::Suppressed,
        }
    }

    fn reject(&mut self, rejection: Rejection) -> ScanEvent {
        self.stats.rejections += 1;
        if self.config.retry_policy == RetryPolicy::ClearOnReject {
            debug!("Clearing accumulated lines after rejection");
            self.accumulator.reset();
        }
        ScanEvent::Rejected(rejection)
    }
}

/// Thread-safe handle for feeding a scanner from a worker thread while other
/// threads poll it.
#[derive(Clone)]
pub struct SharedScanner {
    inner: Arc<Mutex<MrzScanner>>,
}

impl SharedScanner {
    pub fn new(scanner: MrzScanner) -> Self {
        SharedScanner {
            inner: Arc::new(Mutex::new(scanner)),
        }
    }

    // Scanner state is consistent between calls, so a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, MrzScanner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_open()
    }

    pub fn offer(&self, observation: Observation) -> ScanEvent {
        self.lock().offer(observation)
    }

    pub fn process_frame<I>(&self, observations: I) -> FrameOutcome
    where
        I: IntoIterator<Item = Observation>,
    {
        self.lock().process_frame(observations)
    }

    pub fn reset(&self) {
        self.lock().reset()
    }

    pub fn stats(&self) -> ScanStats {
        self.lock().stats().clone()
    }
}
