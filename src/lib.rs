//! otacheck - ROM and kernel update detection
//!
//! Reads the identity of the installed ROM and kernel from device-local
//! OTA metadata, caches it for the life of the process, and decides whether
//! externally obtained metadata describes a newer build.

pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod exec;
pub mod hash;
pub mod sink;
pub mod update;

pub use device::{BuildIdentity, IdentityCache, UpdateKind};
pub use error::{OtaError, OtaResult};
pub use update::{is_update_available, UpdateInfo};
