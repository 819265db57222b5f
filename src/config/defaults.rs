//! Default values for configuration

/// Default seconds to wait between probe retries after a 503
pub fn default_probe_backoff_secs() -> u64 {
    1
}

/// Default probe request timeout in seconds
pub fn default_probe_timeout_secs() -> u64 {
    30
}

/// Default user agent
pub fn default_probe_user_agent() -> String {
    format!("archivist/{} (DVR Library Import)", env!("CARGO_PKG_VERSION"))
}

/// Default catalog database file name, shared with the Jellyfin companion tools
pub fn default_database_name() -> String {
    "Com.ZachDeibert.MediaTools.Hdhr.Dvr.Jellyfin.db".to_string()
}

/// Default recycle directory name
pub fn default_recycle_dir() -> String {
    ".recycle-bin".to_string()
}
