//! Descriptor types for the launcher configuration files.
//!
//! [`DescriptorFile`] is the on-disk shape shared by the static (build-generated)
//! and custom (operator-owned) descriptors. Every field is optional at parse time;
//! required-ness is enforced after the merge, on the [`LaunchDescriptor`].
//!
//! All types are serializable/deserializable via serde + serde_yaml.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The only `configType` this launcher understands.
pub const JAVA_CONFIG_TYPE: &str = "java";

/// The only `configVersion` this launcher understands.
pub const CONFIG_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// On-disk descriptor
// ---------------------------------------------------------------------------

/// One launcher YAML file, either `launcher-static.yml` or `launcher-custom.yml`.
///
/// Keys are camelCase to stay stable with the build tooling that generates the
/// static file. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_home: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classpath: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jvm_opts: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    /// Directories (relative to the working directory) created before launch.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dirs: Vec<String>,
}

// ---------------------------------------------------------------------------
// Effective descriptor
// ---------------------------------------------------------------------------

/// The merged result of the static and custom descriptors.
///
/// Produced only by [`crate::loader::merge`]; `main_class` is guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    pub main_class: String,
    pub classpath: Vec<String>,
    pub jvm_opts: Vec<String>,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_home: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    pub dirs: Vec<String>,
}
