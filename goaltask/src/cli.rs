//! CLI definition

use clap::Parser;
use std::path::PathBuf;

/// goaltask - Goal-to-Task Converter
#[derive(Debug, Parser)]
#[command(
    name = "goaltask",
    about = "Web tool that turns a goal into an HTML task breakdown",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Listen address, overrides server.bind
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,
}
