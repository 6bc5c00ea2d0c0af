use crate::device::DeviceState;
use log::{debug, trace};
use std::fs;
use std::io;
use std::mem::{self, Discriminant};
use std::num::ParseFloatError;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const RECORD_FIELDS: usize = 4;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("record has {found} fields, expected at least {}", RECORD_FIELDS)]
    TooFewFields { found: usize },
    #[error("field `{field}` is not a number: {source}")]
    InvalidNumber {
        field: &'static str,
        #[source]
        source: ParseFloatError,
    },
    #[error("field `{field}` is not finite")]
    NonFinite { field: &'static str },
}

/// Parses one channel record. Only the first line counts; fields past the
/// fourth are ignored.
pub fn parse_record(text: &str) -> Result<DeviceState, ChannelError> {
    let line = text.trim().lines().next().unwrap_or_default();
    let fields: Vec<&str> = line.split(',').collect();
    if line.is_empty() || fields.len() < RECORD_FIELDS {
        let found = if line.is_empty() { 0 } else { fields.len() };
        return Err(ChannelError::TooFewFields { found });
    }

    Ok(DeviceState {
        x: parse_number("x", fields[0])?,
        y: parse_number("y", fields[1])?,
        battery_pct: parse_number("battery", fields[2])?,
        status: fields[3].trim().to_string(),
    })
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, ChannelError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|source| ChannelError::InvalidNumber { field, source })?;
    if !value.is_finite() {
        return Err(ChannelError::NonFinite { field });
    }
    Ok(value)
}

pub fn read_record(path: &Path) -> Result<DeviceState, ChannelError> {
    let text = fs::read_to_string(path).map_err(|source| ChannelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_record(&text)
}

/// Replaces the record at `path` by writing a sibling temp file and renaming
/// it over the target, so readers see either the old record or the new one.
pub fn write_record_atomic(path: &Path, state: &DeviceState) -> Result<(), ChannelError> {
    let mut tmp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "position".into());
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let io_err = |source| ChannelError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp_path, state.to_record()).map_err(io_err)?;
    fs::rename(&tmp_path, path).map_err(io_err)
}

/// Consumer side of the channel: hands out the latest snapshot, if any.
pub trait PositionSource {
    /// One non-blocking read attempt. `None` means "skip this tick".
    fn poll(&mut self) -> Option<DeviceState>;
}

pub struct FilePositionSource {
    path: PathBuf,
    last_failure: Option<Discriminant<ChannelError>>,
}

impl FilePositionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_failure: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PositionSource for FilePositionSource {
    fn poll(&mut self) -> Option<DeviceState> {
        match read_record(&self.path) {
            Ok(state) => {
                if self.last_failure.take().is_some() {
                    debug!("position channel {} recovered", self.path.display());
                }
                Some(state)
            }
            Err(err) => {
                let kind = mem::discriminant(&err);
                if self.last_failure != Some(kind) {
                    debug!("position channel {}: {}", self.path.display(), err);
                    self.last_failure = Some(kind);
                } else {
                    trace!("position channel {}: {}", self.path.display(), err);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_field_record() {
        let state = parse_record("5.0,5.0,87.3,MOWING\n").unwrap();
        assert_eq!(state, DeviceState::new(5.0, 5.0, 87.3, "MOWING"));
    }

    #[test]
    fn ignores_trailing_fields_and_padding() {
        let state = parse_record("  1.5, 2.5 ,99,IDLE,extra,42 ").unwrap();
        assert_eq!(state, DeviceState::new(1.5, 2.5, 99.0, "IDLE"));
    }

    #[test]
    fn only_first_line_is_read() {
        let state = parse_record("1,2,3,A\n4,5,6,B\n").unwrap();
        assert_eq!(state.status, "A");
    }

    #[test]
    fn too_few_fields_is_rejected() {
        assert!(matches!(
            parse_record("1,2"),
            Err(ChannelError::TooFewFields { found: 2 })
        ));
        assert!(matches!(
            parse_record("   \n"),
            Err(ChannelError::TooFewFields { found: 0 })
        ));
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert!(matches!(
            parse_record("x,2,3,MOWING"),
            Err(ChannelError::InvalidNumber { field: "x", .. })
        ));
        assert!(matches!(
            parse_record("1,NaN,3,MOWING"),
            Err(ChannelError::NonFinite { field: "y" })
        ));
        assert!(matches!(
            parse_record("1,2,inf,MOWING"),
            Err(ChannelError::NonFinite { field: "battery" })
        ));
    }

    #[test]
    fn empty_status_is_allowed() {
        let state = parse_record("1,2,3,").unwrap();
        assert_eq!(state.status, "");
    }

    #[test]
    fn missing_file_polls_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = FilePositionSource::new(dir.path().join("position.txt"));
        assert!(source.poll().is_none());
        assert!(source.poll().is_none());
    }

    #[test]
    fn malformed_file_polls_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("position.txt");
        fs::write(&path, "1,2").unwrap();
        let mut source = FilePositionSource::new(&path);
        assert!(source.poll().is_none());
    }

    #[test]
    fn atomic_write_is_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("position.txt");
        let mut source = FilePositionSource::new(&path);
        assert!(source.poll().is_none());

        write_record_atomic(&path, &DeviceState::new(3.0, 4.0, 55.5, "MOWING")).unwrap();
        let state = source.poll().unwrap();
        assert_eq!(state, DeviceState::new(3.0, 4.0, 55.5, "MOWING"));
        assert!(!dir.path().join("position.txt.tmp").exists());
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("position.txt");
        let result = write_record_atomic(&path, &DeviceState::new(0.0, 0.0, 0.0, "IDLE"));
        assert!(matches!(result, Err(ChannelError::Io { .. })));
    }
}
