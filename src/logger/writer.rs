//! Log file handling

use std::fs::{self, File, OpenOptions};

use crate::logger::{FileConfig, LoggerError};

/// Opens the log file, creating parent directories as needed.
///
/// With `append` unset an existing file is truncated.
pub(crate) fn open_log_file(config: &FileConfig) -> Result<File, LoggerError> {
    if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if config.append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }

    Ok(options.open(&config.path)?)
}
