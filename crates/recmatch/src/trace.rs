use std::io::Write;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Env};

/// Install the global subscriber, writing logs to `writer`.
///
/// The returned guard flushes pending log lines when dropped, and must be kept
/// alive for as long as the program runs.
pub fn init_tracing(config: &Config, writer: impl Write + Send + 'static) -> WorkerGuard {
  let (appender, guard) = tracing_appender::non_blocking(writer);

  let logging_formatter = match config.env {
    Env::Dev => fmt::layer().compact().with_writer(appender).with_ansi(cfg!(not(test))).boxed(),
    Env::Production => json_subscriber::layer()
      .with_writer(appender)
      .flatten_event(true)
      .flatten_span_list_on_top_level(true)
      .with_current_span(false)
      .with_span_list(false)
      .boxed(),
  };

  let filter = EnvFilter::builder().try_from_env().unwrap_or_else(|_| EnvFilter::new("info"));

  if let Err(err) = tracing_subscriber::registry().with(filter.and_then(logging_formatter)).try_init() {
    eprintln!("could not install tracing subscriber: {err}");
  }

  guard
}
