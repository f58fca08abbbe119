//! javainit configuration library: launcher descriptors, merge, command building.
//!
//! - [`types`]: on-disk [`DescriptorFile`] and merged [`LaunchDescriptor`]
//! - [`error`]: [`ConfigError`]
//! - [`loader`]: read + merge the static and custom descriptors
//! - [`command`]: turn a descriptor into a [`LaunchCommand`]

pub mod command;
pub mod error;
pub mod loader;
pub mod types;

pub use command::{build, LaunchCommand, LaunchContext};
pub use error::ConfigError;
pub use loader::{load, merge};
pub use types::{DescriptorFile, LaunchDescriptor};
