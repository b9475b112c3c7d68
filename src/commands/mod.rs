pub mod create;
pub mod output;
pub mod version;
