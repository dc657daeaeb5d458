pub mod pair;
pub mod signal;

pub use pair::{NumericField, PairRecord, PriceChange, TokenRef};
pub use signal::{RiskLevel, Signal, SignalKind, TimeWindow};
