//! `SITERC_*` environment overrides

use figment::providers::Env;

use super::value::{Map, Value};

pub const ENV_PREFIX: &str = "SITERC_";

/// Options set through the environment.
///
/// `SITERC_PACKAGE_HANDLER=cvs` becomes `package-handler = "cvs"`. Values are
/// kept as the raw strings the shell passed, so `0755` stays `"0755"`; tagged
/// keys can only come from files.
pub fn load_environment() -> Map {
    Env::prefixed(ENV_PREFIX)
        .iter()
        .map(|(key, value)| {
            let key = key.as_str().to_ascii_lowercase().replace('_', "-");
            tracing::debug!("Environment sets '{}'", key);
            (key, Value::String(value))
        })
        .collect()
}
