use std::str::FromStr;

const DEFAULT_ENDPOINT: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// What attaching an already attached pair does.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AttachPolicy {
    /// Report the existing association and succeed.
    #[default]
    Idempotent,
    /// Reject the attach as a conflict.
    Strict,
}

impl FromStr for AttachPolicy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "idempotent" => Ok(Self::Idempotent),
            "strict" => Ok(Self::Strict),
            _ => Err(anyhow::anyhow!("unknown attach policy: {value}")),
        }
    }
}

/// How host environment labels are compared when listing by environment.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum EnvironmentMatch {
    #[default]
    Exact,
    IgnoreCase,
}

impl EnvironmentMatch {
    pub fn matches(&self, candidate: &str, environment: &str) -> bool {
        match self {
            Self::Exact => candidate == environment,
            Self::IgnoreCase => candidate.to_lowercase() == environment.to_lowercase(),
        }
    }
}

impl FromStr for EnvironmentMatch {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "ignore-case" | "ignore_case" => Ok(Self::IgnoreCase),
            _ => Err(anyhow::anyhow!("unknown environment match: {value}")),
        }
    }
}

/// Runtime settings, read from the process environment (and `.env`).
#[derive(Clone, Debug)]
pub struct Settings {
    pub endpoint: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub attach_policy: AttachPolicy,
    pub environment_match: EnvironmentMatch,
    pub jaeger_service_name: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            attach_policy: AttachPolicy::default(),
            environment_match: EnvironmentMatch::default(),
            jaeger_service_name: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .parse()
                .map_err(|err| anyhow::anyhow!("invalid DATABASE_MAX_CONNECTIONS {value}: {err}"))?,
            None => defaults.max_connections,
        };

        let attach_policy = match lookup("ATTACH_POLICY") {
            Some(value) => value.parse()?,
            None => defaults.attach_policy,
        };

        let environment_match = match lookup("ENVIRONMENT_MATCH") {
            Some(value) => value.parse()?,
            None => defaults.environment_match,
        };

        Ok(Self {
            endpoint: lookup("ENDPOINT").unwrap_or(defaults.endpoint),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            max_connections,
            attach_policy,
            environment_match,
            jaeger_service_name: lookup("JAEGER_SERVICE_NAME").filter(|name| !name.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(settings.endpoint, "0.0.0.0:8080");
        assert_eq!(settings.database_url, None);
        assert_eq!(settings.max_connections, 20);
        assert_eq!(settings.attach_policy, AttachPolicy::Idempotent);
        assert_eq!(settings.environment_match, EnvironmentMatch::Exact);
    }

    #[test]
    fn test_overrides_from_environment() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("ENDPOINT", "127.0.0.1:9000"),
            ("DATABASE_URL", "postgres://localhost/fedhub"),
            ("DATABASE_MAX_CONNECTIONS", "5"),
            ("ATTACH_POLICY", "Strict"),
            ("ENVIRONMENT_MATCH", "ignore-case"),
        ]))
        .unwrap();

        assert_eq!(settings.endpoint, "127.0.0.1:9000");
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/fedhub")
        );
        assert_eq!(settings.max_connections, 5);
        assert_eq!(settings.attach_policy, AttachPolicy::Strict);
        assert_eq!(settings.environment_match, EnvironmentMatch::IgnoreCase);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Settings::from_lookup(lookup_from(&[("ATTACH_POLICY", "sometimes")])).is_err());
        assert!(
            Settings::from_lookup(lookup_from(&[("DATABASE_MAX_CONNECTIONS", "many")])).is_err()
        );
    }

    #[test]
    fn test_environment_matching() {
        assert!(EnvironmentMatch::Exact.matches("prod", "prod"));
        assert!(!EnvironmentMatch::Exact.matches("Prod", "prod"));
        assert!(EnvironmentMatch::IgnoreCase.matches("Prod", "prod"));
        assert!(!EnvironmentMatch::IgnoreCase.matches("production", "prod"));
    }
}
