//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{DispatchConfig, LogOutput, LoggingConfig, StrandConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &StrandConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_dispatch_config(&config.dispatch)?;
    config.catalog()?;
    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.file_path is required when logging.output is 'file'",
        ));
    }
    Ok(())
}

/// Validates dispatch settings.
fn validate_dispatch_config(dispatch: &DispatchConfig) -> ConfigResult<()> {
    if dispatch.channel_capacity == 0 {
        return Err(ConfigError::validation(
            "dispatch.channel_capacity must be greater than 0",
        ));
    }

    if dispatch.timeout_ms == Some(0) {
        return Err(ConfigError::validation(
            "dispatch.timeout_ms must be greater than 0",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&StrandConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let mut config = StrandConfig::default();
        config.dispatch.channel_capacity = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = StrandConfig::default();
        config.dispatch.timeout_ms = Some(0);
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));

        config.dispatch.timeout_ms = Some(1);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_file_output_requires_path() {
        let mut config = StrandConfig::default();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some("strand.log".into());
        assert!(validate_config(&config).is_ok());
    }
}
