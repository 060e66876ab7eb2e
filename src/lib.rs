pub mod config;
pub mod ingest;
pub mod manifest;
pub mod split;
