//! Process configuration read from environment variables

use anyhow::{Context, Result};
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_YEAR_MIN: i64 = 2015;

/// Connection settings for Neo4j's HTTP API
#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Neo4jConfig {
    /// Read `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD` and `NEO4J_DATABASE`
    pub fn from_env() -> Result<Self> {
        let uri = require("NEO4J_URI")?;
        let user = require("NEO4J_USER")?;
        let password = require("NEO4J_PASSWORD")?;
        let database = std::env::var("NEO4J_DATABASE").unwrap_or_else(|_| "neo4j".to_string());

        let config = Self { uri, user, password, database };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.uri.starts_with("http://") || self.uri.starts_with("https://") {
            return Ok(());
        }

        // Bolt-style URIs from a driver .env: point at the HTTP connector instead
        if let Some((scheme, rest)) = self.uri.split_once("://") {
            let host = rest
                .split(['/', ':'])
                .next()
                .filter(|h| !h.is_empty())
                .unwrap_or("localhost");
            anyhow::bail!(
                "NEO4J_URI uses the '{}' scheme, but this service talks to Neo4j's HTTP API; \
                 set NEO4J_URI=http://{}:7474 (the HTTP port, not Bolt's 7687)",
                scheme,
                host
            );
        }
        anyhow::bail!(
            "NEO4J_URI must be the HTTP endpoint (e.g. http://localhost:7474), got '{}'",
            self.uri
        );
    }
}

/// Settings shared by the server and ingest binaries
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub lahman_dir: PathBuf,
    pub year_min: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(v) => v.parse().with_context(|| format!("Invalid PORT '{}'", v))?,
            Err(_) => DEFAULT_PORT,
        };
        let year_min = match std::env::var("YEAR_MIN") {
            Ok(v) => v.parse().with_context(|| format!("Invalid YEAR_MIN '{}'", v))?,
            Err(_) => DEFAULT_YEAR_MIN,
        };
        let lahman_dir = std::env::var("LAHMAN_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/lahman"));

        Ok(Self { port, lahman_dir, year_min })
    }

    pub fn people_csv(&self) -> PathBuf {
        self.lahman_dir.join("People.csv")
    }

    pub fn batting_csv(&self) -> PathBuf {
        self.lahman_dir.join("Batting.csv")
    }
}

fn require(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Missing environment variable {}", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bolt_uri_is_rejected() {
        let config = Neo4jConfig {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "password".to_string(),
            database: "neo4j".to_string(),
        };
        assert!(config.validate().is_err());

        let config = Neo4jConfig { uri: "http://localhost:7474".to_string(), ..config };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bolt_uri_error_points_to_http_port() {
        let config = Neo4jConfig {
            uri: "neo4j://graph.internal:7687".to_string(),
            user: "neo4j".to_string(),
            password: "password".to_string(),
            database: "neo4j".to_string(),
        };
        let msg = config.validate().unwrap_err().to_string();
        assert!(msg.contains("'neo4j' scheme"), "{}", msg);
        assert!(msg.contains("http://graph.internal:7474"), "{}", msg);

        let config = Neo4jConfig { uri: "localhost".to_string(), ..config };
        let msg = config.validate().unwrap_err().to_string();
        assert!(msg.contains("http://localhost:7474"), "{}", msg);
    }

    #[test]
    fn test_csv_paths() {
        let config = Config {
            port: DEFAULT_PORT,
            lahman_dir: PathBuf::from("/data/lahman"),
            year_min: DEFAULT_YEAR_MIN,
        };
        assert_eq!(config.people_csv(), PathBuf::from("/data/lahman/People.csv"));
        assert_eq!(config.batting_csv(), PathBuf::from("/data/lahman/Batting.csv"));
    }
}
