mod config;
mod errors;
mod run;
mod trace;

use std::io::{self, Write};

use crate::config::Config;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
  let config = Config::from_env()?;
  let _guard = trace::init_tracing(&config, io::stderr());

  let output = run::run(&config).inspect_err(|err| tracing::error!(error = %err, "could not process records"))?;
  let mut stdout = io::stdout().lock();

  serde_json::to_writer_pretty(&mut stdout, &output)?;
  writeln!(stdout)?;

  Ok(())
}
