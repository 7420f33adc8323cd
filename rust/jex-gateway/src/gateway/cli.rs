use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use url::Url;

#[derive(Debug, Parser)]
#[clap(name = "jex")]
#[clap(about = "JEX job dispatch gateway", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Connect to the message bus and start accepting job requests
    Serve {
        /// Path to the gateway's TOML configuration
        #[clap(long, value_parser, default_value = "jex.toml")]
        config: PathBuf,

        /// Optional origin to allow CORS for
        #[clap(short, long, value_parser)]
        cors_origin: Option<Url>,

        /// The IP address of the interface that the gateway should bind to
        #[clap(short, long, value_parser, default_value = "0.0.0.0")]
        interface: IpAddr,

        /// The port that the gateway should listen on
        #[clap(short, long, value_parser, default_value = "60000")]
        port: u16,
    },
}
