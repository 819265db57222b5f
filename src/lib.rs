//! DVR recording library importer
//!
//! archivist folds the JSON sidecars an HDHomeRun DVR leaves beside each
//! recording into the SQLite catalog its Jellyfin companion reads, then
//! retires the sidecars into a recycle tree inside the library.

pub mod archive;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod probe;
pub mod reconcile;
pub mod walk;
