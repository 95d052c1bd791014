//! Runtime configuration.
//!
//! Reads configuration from a `.env` file in the working directory and
//! from environment variables. Environment variables take precedence
//! over the `.env` file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::collect::ARCHIVE_SUFFIX;

/// Default filename of the install script inside the source tree. The
/// script's basename is also the sole member of the ignore set.
pub const DEFAULT_INSTALL_SCRIPT: &str = "install.sh";

/// Default filename of the intermediate payload archive.
pub const DEFAULT_PAYLOAD_NAME: &str = "payload.tgz";

/// Default gzip level for both archives.
pub const DEFAULT_GZIP_LEVEL: u32 = 6;

/// Relpack configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Install script filename (default: install.sh)
    pub install_script: String,
    /// Intermediate payload archive filename (default: payload.tgz)
    pub payload_name: String,
    /// Gzip level, 0-9 (default: 6)
    pub gzip_level: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            install_script: DEFAULT_INSTALL_SCRIPT.to_string(),
            payload_name: DEFAULT_PAYLOAD_NAME.to_string(),
            gzip_level: DEFAULT_GZIP_LEVEL,
        }
    }
}

impl Config {
    /// Load configuration from `.env` and the environment.
    ///
    /// `.env` is looked up in `base_dir`; KEY=value lines, `#` comments
    /// and surrounding quotes are handled the same way for both sources.
    pub fn load(base_dir: &Path) -> Self {
        let mut vars = HashMap::new();

        let env_path = base_dir.join(".env");
        if let Ok(content) = fs::read_to_string(&env_path) {
            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    vars.insert(key.trim().to_string(), value.to_string());
                }
            }
        }

        // Environment variables override the .env file.
        for (key, value) in std::env::vars() {
            vars.insert(key, value);
        }

        Self::from_vars(&vars)
    }

    fn from_vars(vars: &HashMap<String, String>) -> Self {
        let install_script = vars
            .get("RELPACK_INSTALL_SCRIPT")
            .filter(|name| !name.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_INSTALL_SCRIPT.to_string());

        // The payload must keep the archive suffix, otherwise the
        // collector's stale sweep would never reclaim leftover copies.
        let payload_name = match vars.get("RELPACK_PAYLOAD_NAME") {
            Some(name) if name.ends_with(ARCHIVE_SUFFIX) => name.clone(),
            Some(name) => {
                eprintln!(
                    "  [WARN] RELPACK_PAYLOAD_NAME {:?} does not end in {}; using {}",
                    name, ARCHIVE_SUFFIX, DEFAULT_PAYLOAD_NAME
                );
                DEFAULT_PAYLOAD_NAME.to_string()
            }
            None => DEFAULT_PAYLOAD_NAME.to_string(),
        };

        let gzip_level = vars
            .get("RELPACK_GZIP_LEVEL")
            .and_then(|level| level.parse::<u32>().ok())
            .filter(|level| *level <= 9)
            .unwrap_or(DEFAULT_GZIP_LEVEL);

        Self {
            install_script,
            payload_name,
            gzip_level,
        }
    }
}
