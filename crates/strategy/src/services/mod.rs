pub mod signal_analyzer;
pub mod signal_collector;
pub mod signal_formatter;
