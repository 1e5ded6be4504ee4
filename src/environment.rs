use crate::consts::cli_consts::DEFAULT_PORT;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Deployment environment of the server, read from `PASCANI_ENV`.
#[derive(Clone, Default, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local development. Always listens on the default port.
    #[default]
    Development,
    /// Production. Listens on `PORT`.
    Production,
}

impl Environment {
    /// Reads `PASCANI_ENV`, falling back to development.
    pub fn from_env() -> Self {
        std::env::var("PASCANI_ENV")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Port to listen on, given the value of the `PORT` variable.
    pub fn port(&self, port_var: Option<&str>) -> u16 {
        match self {
            Environment::Development => DEFAULT_PORT,
            Environment::Production => match port_var.map(str::parse::<u16>) {
                Some(Ok(port)) => port,
                Some(Err(_)) => {
                    log::warn!("Ignoring invalid PORT, using {}", DEFAULT_PORT);
                    DEFAULT_PORT
                }
                None => DEFAULT_PORT,
            },
        }
    }

    /// Port to listen on, reading `PORT` from the process environment.
    pub fn port_from_env(&self) -> u16 {
        self.port(std::env::var("PORT").ok().as_deref())
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(()),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_environment() {
        assert_eq!("production".parse(), Ok(Environment::Production));
        assert_eq!("PROD".parse(), Ok(Environment::Production));
        assert_eq!("Development".parse(), Ok(Environment::Development));
        assert_eq!("staging".parse::<Environment>(), Err(()));
        assert_eq!(Environment::default(), Environment::Development);
    }

    #[test]
    fn test_development_ignores_port_variable() {
        assert_eq!(Environment::Development.port(Some("8080")), 3000);
        assert_eq!(Environment::Development.port(None), 3000);
    }

    #[test]
    fn test_production_uses_port_variable() {
        assert_eq!(Environment::Production.port(Some("8080")), 8080);
        assert_eq!(Environment::Production.port(None), 3000);
        assert_eq!(Environment::Production.port(Some("http")), 3000);
    }
}
