//! Helpers for reading configuration values out of the environment.
use std::{env, fmt::Display, str::FromStr};

use log::*;

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Read a boolean flag from the environment variable `name`.
pub fn env_flag(name: &str, default: bool) -> bool {
    parse_boolean_flag(env::var(name).ok(), default)
}

/// Read and parse the environment variable `name`. If it is missing, or cannot be parsed, the default is returned and
/// the reason is logged.
pub fn env_parse_or<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(name) {
        Ok(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            warn!("🪛️ {s} is not a valid value for {name}. {e}. Using the default, {default}, instead.");
            default
        }),
        Err(_) => {
            debug!("🪛️ {name} is not set. Using the default, {default}.");
            default
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn boolean_flags() {
        assert!(parse_boolean_flag(Some(" Yes ".into()), false));
        assert!(!parse_boolean_flag(Some("off".into()), true));
        assert!(parse_boolean_flag(Some("maybe".into()), true));
        assert!(!parse_boolean_flag(None, false));
    }

    #[test]
    fn parse_with_fallback() {
        env::set_var("LPG_TEST_HELPERS_PORT", "8361");
        assert_eq!(env_parse_or("LPG_TEST_HELPERS_PORT", 1u16), 8361);
        env::set_var("LPG_TEST_HELPERS_PORT", "not-a-port");
        assert_eq!(env_parse_or("LPG_TEST_HELPERS_PORT", 1u16), 1);
        assert_eq!(env_parse_or("LPG_TEST_HELPERS_UNSET", 7u64), 7);
    }
}
