//! Command-line configuration.

use clap::{Parser, ValueEnum};

/// Book checkout ledger node.
#[derive(Parser, Debug)]
#[command(name = "checkout-ledger", version, about)]
pub struct Args {
    /// Address the HTTP API listens on.
    #[arg(long, short = 'b', env = "LEDGER_BIND", default_value = "127.0.0.1:3000")]
    pub bind: String,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, env = "LEDGER_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, env = "LEDGER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable output for local runs.
    Pretty,
    /// JSON lines for log aggregation.
    Json,
}
