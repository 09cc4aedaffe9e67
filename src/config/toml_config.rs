use crate::core::pace::Pace;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub classification: Option<ClassificationSection>,
    pub filter: Option<FilterSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationSection {
    /// MM:SS per km
    pub interval_pace: Option<String>,
    pub min_interval_distance: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSection {
    pub name_pattern: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub output_path: Option<String>,
    pub file_name: Option<String>,
    pub per_lap: Option<bool>,
    pub intervals_only: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ACTIVITY_NAME})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn interval_pace(&self) -> Result<Option<Pace>> {
        self.classification
            .as_ref()
            .and_then(|c| c.interval_pace.as_deref())
            .map(|text| {
                text.parse::<Pace>()
                    .map_err(|e| EtlError::InvalidConfigValueError {
                        field: "classification.interval_pace".to_string(),
                        value: text.to_string(),
                        reason: e.to_string(),
                    })
            })
            .transpose()
    }

    pub fn min_interval_distance(&self) -> Option<f64> {
        self.classification
            .as_ref()
            .and_then(|c| c.min_interval_distance)
    }

    pub fn name_pattern(&self) -> Option<&str> {
        self.filter.as_ref().and_then(|f| f.name_pattern.as_deref())
    }

    pub fn start_date(&self) -> Result<Option<NaiveDate>> {
        self.filter
            .as_ref()
            .and_then(|f| f.start_date.as_deref())
            .map(|d| validation::parse_date("filter.start_date", d))
            .transpose()
    }

    pub fn end_date(&self) -> Result<Option<NaiveDate>> {
        self.filter
            .as_ref()
            .and_then(|f| f.end_date.as_deref())
            .map(|d| validation::parse_date("filter.end_date", d))
            .transpose()
    }

    pub fn output(&self) -> OutputSection {
        self.output.clone().unwrap_or_default()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(pace) = self.interval_pace()? {
            validation::validate_positive("classification.interval_pace", pace.secs_per_km())?;
        }
        if let Some(distance) = self.min_interval_distance() {
            validation::validate_non_negative("classification.min_interval_distance", distance)?;
        }
        if let Some(pattern) = self.name_pattern() {
            validation::validate_regex("filter.name_pattern", pattern)?;
        }
        if let (Some(start), Some(end)) = (self.start_date()?, self.end_date()?) {
            validation::validate_date_range("filter", start, end)?;
        }

        let output = self.output();
        if let Some(path) = &output.output_path {
            validation::validate_path("output.output_path", path)?;
        }
        if let Some(name) = &output.file_name {
            validation::validate_non_empty_string("output.file_name", name)?;
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[classification]
interval_pace = "03:50"
min_interval_distance = 200.0

[filter]
name_pattern = "(?i)track"
start_date = "2020-01-01"
end_date = "2020-12-31"

[output]
output_path = "./reports"
file_name = "track.csv"
per_lap = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.interval_pace().unwrap().unwrap().secs_per_km(), 230.0);
        assert_eq!(config.min_interval_distance(), Some(200.0));
        assert_eq!(config.name_pattern(), Some("(?i)track"));
        assert_eq!(
            config.start_date().unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 1)
        );
        assert_eq!(config.output().per_lap, Some(true));
        assert_eq!(config.output().intervals_only, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.interval_pace().unwrap().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("INTERVAL_ETL_TEST_PATTERN", "Intervals");

        let toml_content = r#"
[filter]
name_pattern = "${INTERVAL_ETL_TEST_PATTERN}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.name_pattern(), Some("Intervals"));

        std::env::remove_var("INTERVAL_ETL_TEST_PATTERN");
    }

    #[test]
    fn test_config_validation() {
        let bad_pace = TomlConfig::from_toml_str("[classification]\ninterval_pace = \"4:15\"\n").unwrap();
        assert!(bad_pace.validate().is_err());

        let zero_pace = TomlConfig::from_toml_str("[classification]\ninterval_pace = \"00:00\"\n").unwrap();
        assert!(zero_pace.validate().is_err());

        let reversed = TomlConfig::from_toml_str(
            "[filter]\nstart_date = \"2021-01-01\"\nend_date = \"2020-01-01\"\n",
        )
        .unwrap();
        assert!(reversed.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[classification\n").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\nfile_name = \"weekly.csv\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output().file_name.as_deref(), Some("weekly.csv"));
    }
}
