use log::info;
use serde::{Deserialize, Serialize};

use crate::models::DocumentFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateMode {
    /// Close after the first accepted reading until reset.
    #[default]
    SingleShot,
    /// Stay open and keep accepting readings.
    Continuous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Accepted(DocumentFields),
    Suppressed,
}

/// Stops further extraction once a reading has been accepted.
///
/// Callers should check [`DetectionGate::is_open`] before running OCR at all.
#[derive(Debug, Clone)]
pub struct DetectionGate {
    state: GateState,
    mode: GateMode,
}

impl DetectionGate {
    pub fn new(mode: GateMode) -> Self {
        DetectionGate {
            state: GateState::Open,
            mode,
        }
    }

    pub fn mode(&self) -> GateMode {
        self.mode
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == GateState::Open
    }

    pub fn try_accept(&mut self, fields: DocumentFields) -> GateDecision {
        if !self.is_open() {
            return GateDecision::Suppressed;
        }
        if self.mode == GateMode::SingleShot {
            self.state = GateState::Closed;
            info!("Accepted document {}, detection gate closed", fields.document_number);
        } else {
            info!("Accepted document {}", fields.document_number);
        }
        GateDecision::Accepted(fields)
    }

    pub fn reset(&mut self) {
        if self.state == GateState::Closed {
            info!("Detection gate reopened");
        }
        self.state = GateState::Open;
    }
}
