//! # Configuration
//!
//! Runtime settings read from environment variables. Every variable has a
//! default so the service starts with no configuration at all; a value that is
//! present but malformed is a startup error.
//!
//! The three policy switches cover behavior the marketplace leaves open:
//! whether an identity may own several handyman profiles, whether a booking
//! that is no longer pending may be cancelled again, and whether protected
//! screens check the caller's role. Each default keeps the permissive behavior.

use anyhow::{anyhow, Context, Result};
use std::{env, fmt, net::SocketAddr, path::PathBuf, str::FromStr};
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite:handyman.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";

/// How many handyman profiles a single identity may create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfilePolicy {
    #[default]
    Unenforced,
    OnePerIdentity,
}

/// Which bookings the cancel operation accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelPolicy {
    /// Any booking owned by the caller; cancelling twice rewrites the same status
    #[default]
    Unguarded,
    PendingOnly,
}

/// Whether protected screens distinguish customers from handymen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleEnforcement {
    #[default]
    Unenforced,
    Enforced,
}

impl FromStr for ProfilePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "unenforced" => Ok(ProfilePolicy::Unenforced),
            "one-per-identity" => Ok(ProfilePolicy::OnePerIdentity),
            other => Err(anyhow!("Unknown profile policy: {}", other)),
        }
    }
}

impl FromStr for CancelPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "unguarded" => Ok(CancelPolicy::Unguarded),
            "pending-only" => Ok(CancelPolicy::PendingOnly),
            other => Err(anyhow!("Unknown cancel policy: {}", other)),
        }
    }
}

impl FromStr for RoleEnforcement {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "unenforced" => Ok(RoleEnforcement::Unenforced),
            "enforced" => Ok(RoleEnforcement::Enforced),
            other => Err(anyhow!("Unknown role enforcement: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
    /// Directory with a built front-end bundle, served for non-API paths
    pub static_dir: Option<PathBuf>,
    pub profile_policy: ProfilePolicy,
    pub cancel_policy: CancelPolicy,
    pub role_enforcement: RoleEnforcement,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            static_dir: None,
            profile_policy: ProfilePolicy::default(),
            cancel_policy: CancelPolicy::default(),
            role_enforcement: RoleEnforcement::default(),
        }
    }
}

impl AppConfig {
    /// Load the configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            database_url: try_load(&lookup, "HANDYMAN_DATABASE_URL", DEFAULT_DATABASE_URL)?,
            bind_addr: try_load(&lookup, "HANDYMAN_BIND_ADDR", DEFAULT_BIND_ADDR)?,
            cors_origin: try_load(&lookup, "HANDYMAN_CORS_ORIGIN", DEFAULT_CORS_ORIGIN)?,
            static_dir: lookup("HANDYMAN_STATIC_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            profile_policy: try_load(&lookup, "HANDYMAN_PROFILE_POLICY", "unenforced")?,
            cancel_policy: try_load(&lookup, "HANDYMAN_CANCEL_POLICY", "unguarded")?,
            role_enforcement: try_load(&lookup, "HANDYMAN_ROLE_ENFORCEMENT", "unenforced")?,
        };

        Ok(config)
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse::<T>()
        .map_err(|e| anyhow!("{}", e))
        .with_context(|| format!("Invalid {key} value: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.cors_origin, DEFAULT_CORS_ORIGIN);
        assert!(config.static_dir.is_none());
        assert_eq!(config.profile_policy, ProfilePolicy::Unenforced);
        assert_eq!(config.cancel_policy, CancelPolicy::Unguarded);
        assert_eq!(config.role_enforcement, RoleEnforcement::Unenforced);
    }

    #[test]
    fn test_policies_are_parsed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("HANDYMAN_PROFILE_POLICY", "one-per-identity"),
            ("HANDYMAN_CANCEL_POLICY", "Pending-Only"),
            ("HANDYMAN_ROLE_ENFORCEMENT", "enforced"),
            ("HANDYMAN_BIND_ADDR", "0.0.0.0:8000"),
            ("HANDYMAN_STATIC_DIR", "../web/dist"),
        ]))
        .unwrap();

        assert_eq!(config.profile_policy, ProfilePolicy::OnePerIdentity);
        assert_eq!(config.cancel_policy, CancelPolicy::PendingOnly);
        assert_eq!(config.role_enforcement, RoleEnforcement::Enforced);
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.static_dir, Some(PathBuf::from("../web/dist")));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[("HANDYMAN_CANCEL_POLICY", "sometimes")]));
        assert!(result.is_err());

        let result = AppConfig::from_lookup(lookup_from(&[("HANDYMAN_BIND_ADDR", "not-an-address")]));
        assert!(result.is_err());
    }
}
