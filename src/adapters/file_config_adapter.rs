//! INI file configuration adapter.

use crate::domain::error::PlotlineError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PlotlineError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| PlotlineError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, PlotlineError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| PlotlineError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[indicator]
type = sma
source = close

[render]
title = Daily SMA
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("indicator", "type"),
            Some("sma".to_string())
        );
        assert_eq!(
            adapter.get_string("render", "title"),
            Some("Daily SMA".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[indicator]\nlength = 10\n").unwrap();
        assert_eq!(adapter.get_string("indicator", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn section_names_are_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[Indicator]\nType = EMA\n").unwrap();
        assert_eq!(adapter.get_string("indicator", "type"), Some("EMA".to_string()));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[render]\ncolor = rgb(255, 0, 0)\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("render", "color"),
            Some("rgb(255, 0, 0)".to_string())
        );
    }

    #[test]
    fn from_file_reports_parse_error_for_missing_file() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/config.ini").unwrap_err();
        assert!(
            matches!(err, PlotlineError::ConfigParse { ref file, .. } if file.contains("config.ini"))
        );
    }
}
