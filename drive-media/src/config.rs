use crate::error::FetchError;

pub const API_KEY_VAR: &str = "DRIVE_API_KEY";
pub const GALLERY_FOLDER_VAR: &str = "GALLERY_FOLDER_ID";
pub const VIDEO_FOLDER_VAR: &str = "VIDEO_FOLDER_ID";

/// Deployment configuration, read from the environment once at the entry point
/// and passed into the fetcher by parameter. The core never does ambient env
/// lookups, so it can be driven with injected values in tests.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub gallery_folder_id: String,
    pub video_folder_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self, FetchError> {
        Ok(Self {
            api_key: require_env(API_KEY_VAR)?,
            gallery_folder_id: require_env(GALLERY_FOLDER_VAR)?,
            video_folder_id: require_env(VIDEO_FOLDER_VAR)?,
        })
    }
}

/// Reads one required variable; unset and blank both count as missing.
pub fn require_env(name: &'static str) -> Result<String, FetchError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(FetchError::Configuration(name)),
    }
}
