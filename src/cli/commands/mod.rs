//! CLI command implementations

pub mod check;
pub mod completions;
pub mod config;
pub mod hash;
pub mod status;

pub use check::execute as check;
pub use completions::execute as completions;
pub use config::execute as config;
pub use hash::execute as hash;
pub use status::execute as status;
