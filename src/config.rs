//! Configuration for fishdex
//!
//! CLI arguments and environment variable handling using clap. A `.env` file
//! is loaded by `main` before parsing.

use clap::Parser;
use std::net::SocketAddr;
use uuid::Uuid;

/// fishdex - fish species catalog and catch-unlock service
#[derive(Parser, Debug, Clone)]
#[command(name = "fishdex")]
#[command(about = "Fish species catalog and catch-unlock service")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8001")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGO_URL", default_value = "mongodb://localhost:27017")]
    pub mongo_url: String,

    /// MongoDB database name
    #[arg(long, env = "DB_NAME", default_value = "fishdex")]
    pub db_name: String,

    /// Identifier recorded on the seed marker when this instance seeds
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Fall back to in-memory storage when MongoDB is unreachable
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Maximum species returned by GET /api/fish
    #[arg(long, env = "FISH_LIST_LIMIT", default_value = "1000")]
    pub list_limit: i64,

    /// Reject unlocks for species ids not in the catalog
    #[arg(long, env = "STRICT_UNLOCK", default_value = "false")]
    pub strict_unlock: bool,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.db_name.trim().is_empty() {
            return Err("DB_NAME must not be empty".to_string());
        }

        if self.list_limit <= 0 {
            return Err("FISH_LIST_LIMIT must be greater than zero".to_string());
        }

        if !(self.mongo_url.starts_with("mongodb://") || self.mongo_url.starts_with("mongodb+srv://")) {
            return Err(format!(
                "MONGO_URL must start with mongodb:// or mongodb+srv:// (got '{}')",
                self.mongo_url
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["fishdex"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = parse(&[
            "--listen",
            "127.0.0.1:9000",
            "--db-name",
            "pesca",
            "--list-limit",
            "50",
            "--strict-unlock",
        ]);
        assert_eq!(args.listen, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(args.db_name, "pesca");
        assert_eq!(args.list_limit, 50);
        assert!(args.strict_unlock);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_list_limit() {
        let args = parse(&["--list-limit", "0"]);
        assert!(args.validate().unwrap_err().contains("FISH_LIST_LIMIT"));
    }

    #[test]
    fn test_rejects_empty_db_name() {
        let args = parse(&["--db-name", " "]);
        assert!(args.validate().unwrap_err().contains("DB_NAME"));
    }

    #[test]
    fn test_rejects_non_mongo_url() {
        let args = parse(&["--mongo-url", "postgres://localhost/fish"]);
        assert!(args.validate().unwrap_err().contains("MONGO_URL"));

        let args = parse(&["--mongo-url", "mongodb+srv://cluster.example.net"]);
        assert!(args.validate().is_ok());
    }
}
