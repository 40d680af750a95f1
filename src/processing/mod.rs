pub mod accumulator;
pub mod gate;
pub mod normalize;
pub mod parser;

pub use accumulator::{AccumulatorEvent, ReadingAccumulator, RetryPolicy};
pub use gate::{DetectionGate, GateDecision, GateMode, GateState};
pub use normalize::normalize_candidate;
pub use parser::{DateKind, FieldParser};
