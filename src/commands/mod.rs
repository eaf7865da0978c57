//! Resource operations invoked by Concourse
//!
//! # Modules
//!
//! - [`check`]: Reports product versions new since the last one seen
//! - [`download`]: Fetches the product files of one version (`in`)

pub mod check;
pub mod download;

pub use check::{CheckCommand, CheckError};
pub use download::{InCommand, InError};
