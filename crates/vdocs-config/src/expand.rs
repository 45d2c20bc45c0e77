//! Environment variable expansion for configuration strings.
//!
//! Supports `${VAR}` (error if unset) and `${VAR:-default}`. Bare `$VAR`
//! is kept as written.

use std::env::VarError;
use std::sync::LazyLock;

use regex::Regex;

use crate::ConfigError;

/// `${VAR}` references without a default value.
static REQUIRED_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the config key and is reported in errors.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    // Bare `$VAR` is left alone; only braced references expand.
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    for caps in REQUIRED_VAR_RE.captures_iter(value) {
        let name = &caps[1];
        if std::env::var_os(name).is_none() {
            return Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("${{{name}}} not set"),
            });
        }
    }

    shellexpand::env_with_context(value, |name| match std::env::var(name) {
        Ok(v) => Ok(Some(v)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(format!("${{{name}}} is not valid UTF-8")),
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: e.cause,
    })
}
