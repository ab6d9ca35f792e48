use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use tracing::debug;

pub const DEFAULT_SERVER_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_API_PREFIX: &str = "api";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
pub struct Env {
    #[serde(default = "default_server_address")]
    pub server_address: IpAddr,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_server_address() -> IpAddr {
    DEFAULT_SERVER_ADDRESS
}

fn default_server_port() -> u16 {
    DEFAULT_SERVER_PORT
}

fn default_api_prefix() -> String {
    DEFAULT_API_PREFIX.to_owned()
}

fn default_cors_origin() -> String {
    DEFAULT_CORS_ORIGIN.to_owned()
}

/// Reads `.env` if there is one, then the process environment.
pub fn get_env() -> Result<Env, EnvError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(EnvError::from)
}

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
}

#[cfg(test)]
mod tests {
    use crate::config::{DEFAULT_API_PREFIX, DEFAULT_CORS_ORIGIN, Env};
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn empty_environment_uses_defaults() {
        let env: Env = envy::from_iter(Vec::<(String, String)>::new()).unwrap();

        assert_eq!(env.server_address, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(env.server_port, 3000);
        assert_eq!(env.api_prefix, DEFAULT_API_PREFIX);
        assert_eq!(env.cors_origin, DEFAULT_CORS_ORIGIN);
    }

    #[test]
    fn keys_override_defaults() {
        let vars = [
            ("SERVER_ADDRESS", "127.0.0.1"),
            ("SERVER_PORT", "8080"),
            ("API_PREFIX", "v2"),
            ("CORS_ORIGIN", "https://postboard.test"),
        ]
        .map(|(key, value)| (key.to_owned(), value.to_owned()));
        let env: Env = envy::from_iter(vars).unwrap();

        assert_eq!(env.server_address, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(env.server_port, 8080);
        assert_eq!(env.api_prefix, "v2");
        assert_eq!(env.cors_origin, "https://postboard.test");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let vars = [("SERVER_PORT".to_owned(), "not-a-port".to_owned())];
        assert!(envy::from_iter::<_, Env>(vars).is_err());
    }
}
