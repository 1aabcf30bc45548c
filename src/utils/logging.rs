//! Logging utilities for the application
//!
//! Sets up `tracing_subscriber` with an env-driven filter. Output goes to
//! stdout by default; setting `LOG_MODE=file` writes daily-rolled log files
//! under `LOG_DATA_DIR` (default `logs/`) instead.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Setup logging for the application
///
/// Reads `LOG_MODE`, `LOG_LEVEL` and `LOG_DATA_DIR` from the environment and
/// installs the global subscriber accordingly.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
	let mode = std::env::var("LOG_MODE").unwrap_or_else(|_| "stdout".to_string());
	if mode.eq_ignore_ascii_case("file") {
		let log_dir = std::env::var("LOG_DATA_DIR").unwrap_or_else(|_| "logs".to_string());
		let appender = tracing_appender::rolling::daily(log_dir, "governance-ledger.log");
		setup_logging_with_writer(appender)
	} else {
		setup_logging_with_writer(std::io::stdout)
	}
}

/// Setup logging for the application with a custom writer
pub fn setup_logging_with_writer<W>(
	writer: W,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	// RUST_LOG wins, then LOG_LEVEL, then info
	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| {
			std::env::var("LOG_LEVEL").map(EnvFilter::new)
		})
		.unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::registry()
		.with(filter)
		.with(
			fmt::layer()
				.with_writer(writer)
				.event_format(
					fmt::format()
						.with_level(true)
						.with_target(true)
						.with_thread_ids(false)
						.with_thread_names(false)
						.compact(),
				),
		)
		.try_init()?;
	Ok(())
}
