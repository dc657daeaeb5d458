pub mod services;

pub use services::signal_analyzer::{Candidate, SkipReason, analyze_pair};
pub use services::signal_collector::SignalCollector;
pub use services::signal_formatter::{build_signal, format_signal, render_signal};
