//! Command-line and environment arguments for the broker process.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{load_config, ConfigError, ConfigOverrides};
use crate::config::schema::BrokerConfig;

#[derive(Parser, Debug)]
#[command(name = "service-broker")]
#[command(about = "Open Service Broker API server", long_about = None)]
pub struct Args {
    /// Port to listen on
    #[arg(short = 'p', long, env = "PORT")]
    pub port: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long, env = "BROKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Basic auth username
    #[arg(long, env = "AUTH_USER", hide_env_values = true)]
    pub auth_user: Option<String>,

    /// Basic auth password
    #[arg(long, env = "AUTH_PASS", hide_env_values = true)]
    pub auth_pass: Option<String>,

    /// Syslog drain URL returned with bindings
    #[arg(long, env = "SYSLOG_DRAIN_URL")]
    pub syslog_drain_url: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port.clone(),
            auth_user: self.auth_user.clone(),
            auth_pass: self.auth_pass.clone(),
            syslog_drain_url: self.syslog_drain_url.clone(),
        }
    }

    /// Merge the file (if any) with flag and environment values.
    pub fn resolve(&self) -> Result<BrokerConfig, ConfigError> {
        load_config(self.config.as_deref(), &self.overrides())
    }
}
