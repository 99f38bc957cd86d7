//! Command line and environment configuration for the server.

use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use clap::{Parser, ValueEnum};

use crate::stores::TimestampPolicy;

/// The REST API server for recording and listing expenses.
///
/// Every option may also be set with the environment variable named in its help.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH", default_value = "./expenses.db")]
    pub db_path: PathBuf,

    /// The address to serve the API from.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Directory of the static frontend files.
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// What to do with stored timestamps that cannot be parsed.
    #[arg(long, env = "TIMESTAMP_POLICY", value_enum, default_value_t = TimestampPolicyArg::Lenient)]
    pub timestamp_policy: TimestampPolicyArg,

    /// Also write debug logs to this file.
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// The socket address the server should bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The policy the expense store should apply to unparseable timestamps.
    pub fn store_timestamp_policy(&self) -> TimestampPolicy {
        self.timestamp_policy.into()
    }
}

/// The command line values for [TimestampPolicy].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimestampPolicyArg {
    /// Substitute the current time and log a warning.
    Lenient,
    /// Fail the read.
    Strict,
}

impl From<TimestampPolicyArg> for TimestampPolicy {
    fn from(value: TimestampPolicyArg) -> Self {
        match value {
            TimestampPolicyArg::Lenient => TimestampPolicy::Lenient,
            TimestampPolicyArg::Strict => TimestampPolicy::Strict,
        }
    }
}
