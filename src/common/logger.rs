use std::{fs, path::Path};

use tracing_subscriber::{
  EnvFilter,
  fmt::{self, time::LocalTime},
  prelude::*,
};

use crate::configs::Config;

pub fn init(config: &Config) {
  // Determine the base log level
  let log_level = config
    .logging
    .as_ref()
    .and_then(|l| l.level.as_deref())
    .unwrap_or("info");

  // Get any additional filters
  let filters = config
    .logging
    .as_ref()
    .and_then(|l| l.filters.as_deref())
    .unwrap_or("");

  let filter_str = if filters.is_empty() {
    log_level.to_string()
  } else {
    format!("{},{}", log_level, filters)
  };

  // Environment filter, allowing RUST_LOG to override the config
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

  let stdout_layer = fmt::layer()
    .with_timer(LocalTime::rfc_3339())
    .with_target(true)
    .with_file(false);

  // Optional file layer
  let file_layer = config
    .logging
    .as_ref()
    .and_then(|l| l.file.as_ref())
    .and_then(|file_config| {
      if let Some(parent) = Path::new(&file_config.path).parent() {
        if let Err(e) = fs::create_dir_all(parent) {
          eprintln!("Failed to create log directory: {}", e);
          return None;
        }
      }

      match fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&file_config.path)
      {
        Ok(file) => Some(
          fmt::layer()
            .with_writer(std::sync::Arc::new(file))
            .with_timer(LocalTime::rfc_3339())
            .with_target(true)
            .with_file(false)
            .with_ansi(false), // Files shouldn't usually have ANSI codes
        ),
        Err(e) => {
          eprintln!("Failed to open log file {}: {}", file_config.path, e);
          None
        }
      }
    });

  tracing_subscriber::registry()
    .with(env_filter)
    .with(stdout_layer)
    .with(file_layer)
    .init();
}
