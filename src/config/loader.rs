//! Reading, creating and quarantining the mapping file

use super::{ConfigError, ControlMapping, MappingFile};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Mapping file name, resolved against the working directory
pub const CONFIG_FILE: &str = "config.json";

/// Suffix appended to a mapping file that failed to parse
pub const QUARANTINE_SUFFIX: &str = ".corrupt";

/// Loads the mapping at `path`, writing the default mapping first if the file
/// does not exist.
///
/// A file that is not valid JSON is moved to `<path>.corrupt` and reported as
/// [`ConfigError::Malformed`]; the next start writes a fresh default.
pub fn load_or_create(path: &Path) -> Result<ControlMapping, ConfigError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No mapping file at {:?}, writing defaults", path);
            let mapping = ControlMapping::default_mapping();
            write_mapping(path, &mapping)?;
            return Ok(mapping);
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let file: MappingFile = match serde_json::from_slice(&bytes) {
        Ok(file) => file,
        Err(source) => {
            error!("Mapping file {:?} is malformed: {}", path, source);
            let quarantined = quarantine(path)?;
            return Err(ConfigError::Malformed {
                path: path.to_path_buf(),
                quarantined,
                source,
            });
        }
    };

    info!("Loaded mapping file {:?}", path);
    ControlMapping::try_from(file)
}

/// Writes `mapping` as four-space indented JSON with sorted ids
pub fn write_mapping(path: &Path, mapping: &ControlMapping) -> Result<(), ConfigError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    MappingFile::from(mapping)
        .serialize(&mut serializer)
        .map_err(ConfigError::Encode)?;

    fs::write(path, buf).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn quarantine_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(QUARANTINE_SUFFIX);
    PathBuf::from(name)
}

fn quarantine(path: &Path) -> Result<PathBuf, ConfigError> {
    let target = quarantine_path(path);
    fs::rename(path, &target).map_err(|source| ConfigError::Quarantine {
        path: path.to_path_buf(),
        source,
    })?;
    warn!("Moved malformed mapping file to {:?}", target);
    Ok(target)
}
