pub mod commands;
pub mod concourse;
pub mod config;
pub mod downloader;
pub mod filter;
pub mod logging;
pub mod pivnet;
pub mod versions;
