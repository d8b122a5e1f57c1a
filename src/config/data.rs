use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ArcPath, ArcStr, log::LogLevel};

/// Options for path-based configuration values.
#[derive(Debug, Clone, Copy)]
pub enum PathOpt {
    /// Directory where log files are stored
    LogDir,
    /// Directory holding one response-cache file per browsing session
    SessionDir,
}

/// Options for numeric configuration values.
#[derive(Debug, Clone, Copy)]
pub enum USizeOpt {
    /// Maximum age of log files in days before they are deleted
    MaxAge,
    /// Timeout for network requests in seconds
    Timeout,
    /// Quiet period of the search debouncer in milliseconds
    DebounceMs,
}

/// Options for string configuration values.
#[derive(Debug, Clone, Copy)]
pub enum StrOpt {
    /// Version-namespaced root of the REST API, without a trailing slash
    ApiRoot,
}

/// The configuration data structure that holds all configurable values.
///
/// Missing keys in a configuration file take their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Data {
    /// Root of the REST API
    api_root: ArcStr,
    /// Timeout for network requests in seconds
    timeout: usize,
    /// Quiet period of the search debouncer in milliseconds
    debounce_ms: usize,
    /// Directory for the session-scoped response cache
    session_dir: ArcPath,
    /// Directory where log files are stored
    log_dir: ArcPath,
    /// Minimum level printed to stderr when the logger is flushed
    log_level: LogLevel,
    /// Maximum age of log files in days, 0 keeps them forever
    max_age: usize,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            api_root: ArcStr::from("http://localhost:5000/api/v1"),
            timeout: 30,
            debounce_ms: 300,
            session_dir: ArcPath::from(Path::new("/tmp/pricewatch/sessions")),
            log_dir: ArcPath::from(Path::new("/tmp/pricewatch/logs")),
            log_level: LogLevel::Warning,
            max_age: 0,
        }
    }
}

impl Data {
    pub fn path(&self, opt: PathOpt) -> ArcPath {
        match opt {
            PathOpt::LogDir => self.log_dir.clone(),
            PathOpt::SessionDir => self.session_dir.clone(),
        }
    }

    pub fn set_path(&mut self, opt: PathOpt, path: ArcPath) {
        match opt {
            PathOpt::LogDir => self.log_dir = path,
            PathOpt::SessionDir => self.session_dir = path,
        }
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn set_log_level(&mut self, level: LogLevel) {
        self.log_level = level;
    }

    pub fn usize(&self, opt: USizeOpt) -> usize {
        match opt {
            USizeOpt::MaxAge => self.max_age,
            USizeOpt::Timeout => self.timeout,
            USizeOpt::DebounceMs => self.debounce_ms,
        }
    }

    pub fn set_usize(&mut self, opt: USizeOpt, value: usize) {
        match opt {
            USizeOpt::MaxAge => self.max_age = value,
            USizeOpt::Timeout => self.timeout = value,
            USizeOpt::DebounceMs => self.debounce_ms = value,
        }
    }

    pub fn string(&self, opt: StrOpt) -> ArcStr {
        match opt {
            StrOpt::ApiRoot => self.api_root.clone(),
        }
    }

    /// Sets a string value. The API root is stored without trailing slashes.
    pub fn set_string(&mut self, opt: StrOpt, value: ArcStr) {
        match opt {
            StrOpt::ApiRoot => self.api_root = ArcStr::from(value.trim_end_matches('/')),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_default_values() {
        let data = Data::default();
        assert_eq!(data.log_level(), LogLevel::Warning);
        assert_eq!(&*data.string(StrOpt::ApiRoot), "http://localhost:5000/api/v1");
        assert_eq!(data.usize(USizeOpt::Timeout), 30);
        assert_eq!(data.usize(USizeOpt::DebounceMs), 300);
        assert_eq!(data.usize(USizeOpt::MaxAge), 0);
        assert_eq!(
            data.path(PathOpt::SessionDir).to_str().unwrap(),
            "/tmp/pricewatch/sessions"
        );
    }

    #[test]
    fn test_api_root_trailing_slash_is_dropped() {
        let mut data = Data::default();
        data.set_string(StrOpt::ApiRoot, ArcStr::from("https://prices.example/api/v1//"));
        assert_eq!(&*data.string(StrOpt::ApiRoot), "https://prices.example/api/v1");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let data: Data = toml::from_str("timeout = 5\nlog_level = \"Error\"\n").unwrap();
        assert_eq!(data.usize(USizeOpt::Timeout), 5);
        assert_eq!(data.log_level(), LogLevel::Error);
        assert_eq!(data.usize(USizeOpt::DebounceMs), 300);
    }

    #[test]
    fn test_data_serialization() {
        let mut data = Data::default();
        data.set_log_level(LogLevel::Info);
        data.set_path(PathOpt::LogDir, ArcPath::from(Path::new("/custom/log")));
        data.set_usize(USizeOpt::DebounceMs, 150);

        let toml = toml::to_string_pretty(&data).unwrap();
        let deserialized: Data = toml::from_str(&toml).unwrap();
        assert_eq!(data, deserialized);
    }
}
