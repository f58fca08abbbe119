//! Load and merge the static and custom launcher descriptors.
//!
//! # Merge rules
//!
//! | field kind | fields | rule |
//! |---|---|---|
//! | ordered lists | `jvmOpts`, `args` | static entries, then custom entries |
//! | de-duplicated lists | `classpath`, `dirs` | static then custom, first occurrence wins |
//! | maps | `env` | union, custom overrides static on collision |
//! | scalars | `mainClass`, `javaHome`, `workingDir`, `serviceName` | custom if non-empty, else static |
//!
//! The merge is pure: the same two files always produce the same descriptor.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::{DescriptorFile, LaunchDescriptor, CONFIG_VERSION, JAVA_CONFIG_TYPE};

// ---------------------------------------------------------------------------
// 1. Load
// ---------------------------------------------------------------------------

/// Read both descriptors and merge them into one effective [`LaunchDescriptor`].
///
/// The static descriptor is required; a missing custom descriptor is treated
/// as empty.
pub fn load(static_path: &Path, custom_path: &Path) -> Result<LaunchDescriptor, ConfigError> {
    let static_file = read_static(static_path)?;
    let custom_file = read_custom(custom_path)?;
    merge(&static_file, &custom_file)
}

/// Read and parse the static descriptor.
///
/// Returns `ConfigError::MissingFile` if the file cannot be opened and
/// `ConfigError::Malformed` if it does not parse.
pub fn read_static(path: &Path) -> Result<DescriptorFile, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::MissingFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &contents)
}

/// Read and parse the custom descriptor; an absent file yields an empty descriptor.
pub fn read_custom(path: &Path) -> Result<DescriptorFile, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse(path, &contents),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(DescriptorFile::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parse one descriptor document. Blank documents parse as empty descriptors.
pub fn parse(path: &Path, contents: &str) -> Result<DescriptorFile, ConfigError> {
    if contents.trim().is_empty() {
        return Ok(DescriptorFile::default());
    }
    let file: DescriptorFile =
        serde_yaml::from_str(contents).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
    check_header(path, &file)?;
    Ok(file)
}

fn check_header(path: &Path, file: &DescriptorFile) -> Result<(), ConfigError> {
    if let Some(config_type) = file.config_type.as_deref() {
        if config_type != JAVA_CONFIG_TYPE {
            return Err(ConfigError::Invalid(format!(
                "{}: unsupported configType '{config_type}', expected '{JAVA_CONFIG_TYPE}'",
                path.display()
            )));
        }
    }
    if let Some(version) = file.config_version {
        if version != CONFIG_VERSION {
            return Err(ConfigError::Invalid(format!(
                "{}: unsupported configVersion {version}, expected {CONFIG_VERSION}",
                path.display()
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// 2. Merge
// ---------------------------------------------------------------------------

/// Merge a static and a custom descriptor.
///
/// Fails with `ConfigError::Invalid` if no non-empty `mainClass` survives.
pub fn merge(
    static_file: &DescriptorFile,
    custom_file: &DescriptorFile,
) -> Result<LaunchDescriptor, ConfigError> {
    let main_class = pick_scalar(&static_file.main_class, &custom_file.main_class)
        .ok_or_else(|| ConfigError::Invalid("mainClass must be set and non-empty".to_string()))?;

    let mut env = static_file.env.clone();
    env.extend(custom_file.env.clone());

    Ok(LaunchDescriptor {
        service_name: pick_scalar(&static_file.service_name, &custom_file.service_name),
        main_class,
        classpath: concat_unique(&static_file.classpath, &custom_file.classpath),
        jvm_opts: concat(&static_file.jvm_opts, &custom_file.jvm_opts),
        args: concat(&static_file.args, &custom_file.args),
        env,
        java_home: pick_scalar(&static_file.java_home, &custom_file.java_home),
        working_dir: pick_scalar(&static_file.working_dir, &custom_file.working_dir),
        dirs: concat_unique(&static_file.dirs, &custom_file.dirs),
    })
}

fn pick_scalar(static_value: &Option<String>, custom_value: &Option<String>) -> Option<String> {
    let non_empty = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();
    non_empty(custom_value).or_else(|| non_empty(static_value))
}

fn concat(first: &[String], second: &[String]) -> Vec<String> {
    first.iter().chain(second).cloned().collect()
}

fn concat_unique(first: &[String], second: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    first
        .iter()
        .chain(second)
        .filter(|entry| seen.insert(entry.as_str()))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
