//! Configuration validation for the `[ichimoku]` section.
//!
//! Every key is optional. Present keys must parse; absent keys fall back to
//! the engine defaults (thresholds stay undefined).

use crate::domain::error::IchimokuError;
use crate::domain::indicator::ichimoku::MAX_PERIOD;
use crate::domain::indicator::SignalField;
use crate::ports::config_port::ConfigPort;
use tracing::warn;

pub const SECTION: &str = "ichimoku";

const PERIOD_KEYS: [&str; 3] = ["tenkan_period", "kijun_period", "senkou_b_period"];

const KNOWN_KEYS: [&str; 8] = [
    "signal",
    "hot_threshold",
    "cold_threshold",
    "render",
    "tenkan_period",
    "kijun_period",
    "senkou_b_period",
    "displacement",
];

pub fn validate_ichimoku_config(config: &dyn ConfigPort) -> Result<(), IchimokuError> {
    for key in unknown_keys(config) {
        warn!(section = SECTION, key = %key, "ignoring unknown config key");
    }
    validate_threshold(config, "hot_threshold")?;
    validate_threshold(config, "cold_threshold")?;
    validate_signal(config)?;
    validate_render(config)?;
    for key in PERIOD_KEYS {
        validate_count(config, key, 1)?;
    }
    validate_count(config, "displacement", 0)?;
    Ok(())
}

/// Keys in the section that nothing reads, usually typos.
pub fn unknown_keys(config: &dyn ConfigPort) -> Vec<String> {
    config
        .keys(SECTION)
        .into_iter()
        .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
        .collect()
}

fn invalid(key: &str, reason: impl Into<String>) -> IchimokuError {
    IchimokuError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Reads an optional threshold. Absent or blank means undefined.
pub fn read_threshold(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<f64>, IchimokuError> {
    let Some(raw) = config.get_string(SECTION, key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(invalid(key, format!("{key} must be a finite number"))),
    }
}

fn validate_threshold(config: &dyn ConfigPort, key: &str) -> Result<(), IchimokuError> {
    read_threshold(config, key).map(|_| ())
}

fn validate_signal(config: &dyn ConfigPort) -> Result<(), IchimokuError> {
    let Some(raw) = config.get_string(SECTION, "signal") else {
        return Ok(());
    };
    let fields = SignalField::parse_list(&raw).map_err(|e| invalid("signal", e))?;
    if fields.is_empty() {
        return Err(invalid("signal", "signal must name at least one line"));
    }
    Ok(())
}

fn validate_render(config: &dyn ConfigPort) -> Result<(), IchimokuError> {
    match config.get_string(SECTION, "render") {
        Some(raw)
            if !matches!(
                raw.trim().to_lowercase().as_str(),
                "true" | "yes" | "1" | "false" | "no" | "0"
            ) =>
        {
            Err(invalid("render", "render must be a boolean"))
        }
        _ => Ok(()),
    }
}

fn validate_count(
    config: &dyn ConfigPort,
    key: &str,
    minimum: i64,
) -> Result<(), IchimokuError> {
    let Some(raw) = config.get_string(SECTION, key) else {
        return Ok(());
    };
    let maximum = MAX_PERIOD as i64;
    match raw.trim().parse::<i64>() {
        Ok(v) if (minimum..=maximum).contains(&v) => Ok(()),
        Ok(_) => Err(invalid(
            key,
            format!("{key} must be between {minimum} and {maximum}"),
        )),
        Err(_) => Err(invalid(key, format!("{key} must be an integer"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MockConfig {
        data: HashMap<(String, String), String>,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                data: HashMap::new(),
            }
        }

        fn set(mut self, key: &str, value: &str) -> Self {
            self.data
                .insert((SECTION.to_string(), key.to_string()), value.to_string());
            self
        }
    }

    impl ConfigPort for MockConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.data
                .get(&(section.to_string(), key.to_string()))
                .cloned()
        }

        fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn keys(&self, section: &str) -> Vec<String> {
            let mut keys: Vec<String> = self
                .data
                .keys()
                .filter(|(s, _)| s == section)
                .map(|(_, k)| k.clone())
                .collect();
            keys.sort();
            keys
        }
    }

    fn assert_invalid(config: &MockConfig, expected_key: &str) {
        match validate_ichimoku_config(config) {
            Err(IchimokuError::ConfigInvalid { section, key, .. }) => {
                assert_eq!(section, SECTION);
                assert_eq!(key, expected_key);
            }
            other => panic!("expected ConfigInvalid for {expected_key}, got {other:?}"),
        }
    }

    #[test]
    fn empty_section_is_valid() {
        assert!(validate_ichimoku_config(&MockConfig::new()).is_ok());
    }

    #[test]
    fn full_section_is_valid() {
        let config = MockConfig::new()
            .set("hot_threshold", "0.5")
            .set("cold_threshold", "-1")
            .set("signal", "leading_span_a,leading_span_b")
            .set("render", "yes")
            .set("tenkan_period", "9")
            .set("kijun_period", "26")
            .set("senkou_b_period", "52")
            .set("displacement", "26");
        assert!(validate_ichimoku_config(&config).is_ok());
    }

    #[test]
    fn threshold_must_be_numeric() {
        assert_invalid(&MockConfig::new().set("hot_threshold", "lots"), "hot_threshold");
        assert_invalid(&MockConfig::new().set("cold_threshold", "NaN"), "cold_threshold");
    }

    #[test]
    fn read_threshold_absent_and_blank_are_undefined() {
        assert_eq!(read_threshold(&MockConfig::new(), "hot_threshold").unwrap(), None);
        let blank = MockConfig::new().set("hot_threshold", "  ");
        assert_eq!(read_threshold(&blank, "hot_threshold").unwrap(), None);
    }

    #[test]
    fn read_threshold_zero_is_defined() {
        let config = MockConfig::new().set("hot_threshold", "0");
        assert_eq!(read_threshold(&config, "hot_threshold").unwrap(), Some(0.0));
    }

    #[test]
    fn unknown_signal_field() {
        assert_invalid(&MockConfig::new().set("signal", "span_a,chikou"), "signal");
    }

    #[test]
    fn empty_signal_list() {
        assert_invalid(&MockConfig::new().set("signal", " , "), "signal");
    }

    #[test]
    fn render_must_be_boolean() {
        assert_invalid(&MockConfig::new().set("render", "sometimes"), "render");
    }

    #[test]
    fn zero_period_rejected() {
        assert_invalid(&MockConfig::new().set("kijun_period", "0"), "kijun_period");
    }

    #[test]
    fn non_integer_period_rejected() {
        assert_invalid(&MockConfig::new().set("tenkan_period", "nine"), "tenkan_period");
    }

    #[test]
    fn zero_displacement_allowed() {
        assert!(validate_ichimoku_config(&MockConfig::new().set("displacement", "0")).is_ok());
    }

    #[test]
    fn negative_displacement_rejected() {
        assert_invalid(&MockConfig::new().set("displacement", "-3"), "displacement");
    }

    #[test]
    fn oversized_displacement_rejected() {
        let config = MockConfig::new().set("displacement", &i64::MAX.to_string());
        assert_invalid(&config, "displacement");
    }

    #[test]
    fn period_above_bound_rejected() {
        let config = MockConfig::new().set("senkou_b_period", &(MAX_PERIOD + 1).to_string());
        assert_invalid(&config, "senkou_b_period");
        let at_bound = MockConfig::new().set("senkou_b_period", &MAX_PERIOD.to_string());
        assert!(validate_ichimoku_config(&at_bound).is_ok());
    }

    #[test]
    fn misspelled_key_is_reported_not_rejected() {
        let config = MockConfig::new()
            .set("hot_treshold", "1")
            .set("render", "no");
        assert_eq!(unknown_keys(&config), vec!["hot_treshold"]);
        assert!(validate_ichimoku_config(&config).is_ok());
    }
}
