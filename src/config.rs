use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{ExtractError, Result};

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
/// Navigation and extraction budget when `EXTRACT_TIMEOUT_SECS` is unset (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Runtime settings for one extraction run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorConfig {
    /// Origin serving the render-only `/pdf-maker` view.
    pub base_url: String,
    /// Browser executable. `None` lets chromiumoxide locate one.
    pub chrome_executable: Option<PathBuf>,
    pub temp_directory: PathBuf,
    pub timeout: Duration,
}

impl ExtractorConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv().ok()` beforehand to pick up a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::Config` if `TEMP_DIRECTORY` is unset or `EXTRACT_TIMEOUT_SECS` is
    /// not a number of seconds.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`], reading variables through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base_url = var("PDF_MAKER_URL")
            .or_else(|| var("VERCEL_URL").map(|host| format!("https://{}", host)))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let chrome_executable = var("PUPPETEER_EXECUTABLE_PATH")
            .or_else(|| var("CHROME_BIN"))
            .map(PathBuf::from);

        let temp_directory = var("TEMP_DIRECTORY")
            .map(PathBuf::from)
            .ok_or_else(|| {
                ExtractError::Config("TEMP_DIRECTORY environment variable not set".to_string())
            })?;

        let timeout_secs = match var("EXTRACT_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ExtractError::Config(format!("Invalid EXTRACT_TIMEOUT_SECS '{}': {}", raw, e))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(ExtractorConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            chrome_executable,
            temp_directory,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Where rasterized elements are written.
    pub fn screenshots_dir(&self) -> PathBuf {
        self.temp_directory.join("screenshots")
    }

    /// URL of the render-only view of one presentation.
    pub fn presentation_url(&self, presentation_id: &str) -> String {
        format!("{}/pdf-maker?id={}", self.base_url, presentation_id)
    }
}
