//! Installed build state of the device
//!
//! - [`props`]: reads properties and metadata files through a command executor
//! - [`identity`]: the `BuildIdentity` record and metadata/timestamp parsing
//! - [`cache`]: fill-once cache of everything read from the device

pub mod cache;
pub mod identity;
pub mod props;

pub use cache::IdentityCache;
pub use identity::{
    format_date, parse_date, parse_metadata, AbsentReason, BuildIdentity, MetadataOutcome,
};
pub use props::{PropertyReader, DEFAULT_SD_PATH};

use std::fmt;

/// Which installed component a check is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    Rom,
    Kernel,
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rom => "rom",
            Self::Kernel => "kernel",
        };
        write!(f, "{}", name)
    }
}

/// Which environment an SD card path is resolved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdCardKind {
    Os,
    Recovery,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_kind_display() {
        assert_eq!(UpdateKind::Rom.to_string(), "rom");
        assert_eq!(UpdateKind::Kernel.to_string(), "kernel");
    }
}
