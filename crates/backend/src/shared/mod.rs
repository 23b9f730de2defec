pub mod branding;
pub mod config;
pub mod format;
