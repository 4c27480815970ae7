use clap::{Parser, Subcommand};
use ipgeo::lens::utils::OutputFormat;
use ipgeo::IpgeoConfig;
use tracing::Level;

mod commands;

use commands::interactive::InteractiveArgs;
use commands::lookup::LookupArgs;
use commands::validate::ValidateArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.ipgeo/ipgeo.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output format: table, markdown, text, json, json-pretty, json-line, psv
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the geolocation of an IP address.
    Lookup(LookupArgs),

    /// Check whether inputs are well-formed IPv4 or IPv6 addresses.
    Validate(ValidateArgs),

    /// Start an interactive lookup session.
    Interactive(InteractiveArgs),

    /// Show the effective configuration.
    Config,
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            // filter spans/events with level DEBUG or higher.
            .with_max_level(Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = match IpgeoConfig::new(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: unable to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let ok = match cli.command {
        Commands::Lookup(args) => commands::lookup::run(&config, args, cli.format),
        Commands::Validate(args) => commands::validate::run(args, cli.format),
        Commands::Interactive(args) => commands::interactive::run(&config, args, cli.format),
        Commands::Config => commands::config::run(&config, cli.format),
    };

    if !ok {
        std::process::exit(1);
    }
}
