//! Template archives on disk.
//!
//! "Do X": Keep downloaded template archives and expand them into projects.
//!
//! - **cache**: tag-qualified store under `~/.rw/templates/`
//! - **extract**: safe zip materialization into a target directory

pub mod cache;
pub mod extract;

pub use cache::{CacheKey, CachedArchive, TemplateCache};
pub use extract::{extract, ExtractionManifest, ExtractionReport, GITIGNORE_TEMPLATE};
