pub mod config;
pub mod error;
pub mod git;
pub mod install;
pub mod logging;
pub mod paths;
pub mod preflight;
pub mod release;
pub mod scaffold;
pub mod target;
pub mod template;

// Re-export commonly used types
pub use config::Settings;
pub use error::CreateError;
pub use scaffold::{CreateOptions, Scaffold, ScaffoldReport};
