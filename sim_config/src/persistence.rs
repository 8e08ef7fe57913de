//! JSON configuration format
//!
//! Versioned so the format can change without misreading old files.

use crate::error::{ConfigError, ConfigResult};
use crate::SimulationConfig;

/// Serializes a configuration to pretty JSON bytes
pub fn serialize_config(config: &SimulationConfig) -> ConfigResult<Vec<u8>> {
    serde_json::to_vec_pretty(config).map_err(|e| ConfigError::SerializationFailed(e.to_string()))
}

/// Deserializes a configuration from JSON bytes
///
/// Optional fields take their defaults; `run_time_budget` must be present.
pub fn deserialize_config(bytes: &[u8]) -> ConfigResult<SimulationConfig> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;

    if value.get("run_time_budget").is_none() {
        return Err(ConfigError::MissingField("run_time_budget"));
    }

    let config: SimulationConfig = serde_json::from_value(value)
        .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;

    // Check version compatibility
    if config.version != SimulationConfig::CURRENT_VERSION {
        return Err(ConfigError::UnsupportedVersion(config.version));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProcessSpec;
    use sim_random::DeviateKind;

    #[test]
    fn test_serialize_deserialize() {
        let config = SimulationConfig::new(2000)
            .with_process(30)
            .with_process(0)
            .with_alpha(0.25)
            .with_seed(7)
            .with_deviate(DeviateKind::Uniform);

        let bytes = serialize_config(&config).unwrap();
        let back = deserialize_config(&bytes).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_minimal_document_takes_defaults() {
        let config = deserialize_config(br#"{"run_time_budget": 50}"#).unwrap();
        assert_eq!(config.version, SimulationConfig::CURRENT_VERSION);
        assert_eq!(config.process_count, 5);
        assert_eq!(config.run_time_average, 1000);
        assert!(config.processes.is_empty());
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_processes_field() {
        let config = deserialize_config(
            br#"{"run_time_budget": 50, "processes": [{"io_interval": 3}, {"io_interval": 9}]}"#,
        )
        .unwrap();
        assert_eq!(
            config.processes,
            vec![ProcessSpec { io_interval: 3 }, ProcessSpec { io_interval: 9 }]
        );
    }

    #[test]
    fn test_missing_budget() {
        let result = deserialize_config(br#"{"process_count": 3}"#);
        assert!(matches!(
            result,
            Err(ConfigError::MissingField("run_time_budget"))
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let result = deserialize_config(br#"{"version": 999, "run_time_budget": 10}"#);
        assert!(matches!(result, Err(ConfigError::UnsupportedVersion(999))));
    }

    #[test]
    fn test_invalid_json() {
        let result = deserialize_config(b"not valid json");
        assert!(matches!(result, Err(ConfigError::DeserializationFailed(_))));
    }

    #[test]
    fn test_wrong_field_type() {
        let result = deserialize_config(br#"{"run_time_budget": "soon"}"#);
        assert!(matches!(result, Err(ConfigError::DeserializationFailed(_))));
    }
}
