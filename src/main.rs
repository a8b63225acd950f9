//! Binary entrypoint: inject incidences into a metrics CSV, print the result.
//!
//! Usage:
//!   incidence-engine <metrics.csv> <incidences.json>              # injected table to stdout
//!   incidence-engine <metrics.csv> <incidences.json> -d           # differenced table instead
//!   incidence-engine <metrics.csv> <incidences.json> --cache DIR  # reuse cached artifacts
//!
//! The metrics file needs the endpoint-identifier and epoch-millis timestamp
//! columns; the incidences file is a JSON array of modification windows.

use std::env;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process;

use incidence_engine::{normalize, table, Config, Engine};

fn main() {
  let args: Vec<String> = env::args().skip(1).collect();

  let mut files: Vec<&str> = Vec::new();
  let mut differences = false;
  let mut cache_dir: Option<&str> = None;
  let mut i = 0;
  while i < args.len() {
    match args[i].as_str() {
      "-d" | "--differences" => differences = true,
      "--cache" => {
        i += 1;
        match args.get(i) {
          Some(dir) => cache_dir = Some(dir),
          None => usage(),
        }
      }
      arg if arg.starts_with('-') => usage(),
      arg => files.push(arg),
    }
    i += 1;
  }
  if files.len() != 2 {
    usage();
  }

  let config = Config::default();
  let engine = match cache_dir {
    Some(dir) => Engine::with_cache(config.clone(), dir).unwrap_or_else(|e| die(e)),
    None => Engine::new(config.clone()),
  };

  let metrics = table::load_table(Path::new(files[0]), &config).unwrap_or_else(|e| die(e));
  let definition =
    normalize::load_definition(Path::new(files[1]), &config).unwrap_or_else(|e| die(e));

  let injected = engine.injected(&metrics, &definition).unwrap_or_else(|e| die(e));
  let output = if differences {
    engine
      .differenced(&injected, &definition)
      .unwrap_or_else(|e| die(e))
  } else {
    injected
  };

  let stdout = io::stdout();
  let mut out = BufWriter::new(stdout.lock());
  if let Err(e) = table::write_csv(&output, &config, &mut out) {
    die(e);
  }
  let _ = out.flush();
}

fn usage() -> ! {
  eprintln!(
    "Usage: incidence-engine <metrics.csv> <incidences.json> [-d|--differences] [--cache DIR]"
  );
  eprintln!("  -d       Emit the per-endpoint differenced table instead of the injected one");
  eprintln!("  --cache  Directory for generated-table artifacts, reused across runs");
  process::exit(2);
}

fn die(e: impl std::fmt::Display) -> ! {
  eprintln!("incidence-engine: {}", e);
  process::exit(1);
}
