//! Tracing subscriber setup.
//!
//! The filter comes from `PARSLEY_LOG`, then `RUST_LOG`, and defaults to
//! `warn`. Output always goes to stderr so token dumps on stdout stay clean.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

fn build_filter() -> EnvFilter {
    if let Ok(value) = std::env::var("PARSLEY_LOG") {
        return EnvFilter::builder().parse_lossy(value);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

pub fn init_tracing(format: LogFormat) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }
}
