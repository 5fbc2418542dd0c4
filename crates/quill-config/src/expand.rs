//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a configuration
/// string.
///
/// `field` names the config field being expanded and only appears in
/// error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let expanded = shellexpand::env_with_context(value, |raw: &str| {
        let (name, default) = match raw.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (raw, None),
        };
        match std::env::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => match default {
                Some(default) => Ok(Some(default.to_owned())),
                None => Err(format!("${{{name}}} not set")),
            },
            Err(std::env::VarError::NotUnicode(_)) => {
                Err(format!("${{{name}}} contains invalid unicode"))
            }
        }
    })
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: e.cause,
    })?;
    Ok(expanded.into_owned())
}
