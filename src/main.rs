use clap::Parser;
use triage::adapter::inbound::cli::command::{CheckCommand, Cli, ColorChoice, Commands};
use triage::adapter::inbound::cli::output::{self, OutputConfig};
use triage::adapter::inbound::cli::{check, classify, config};
use triage::error::{Error, Result};
use triage::infrastructure::config::settings::Config;

const EXIT_FAILURE: i32 = 1;
const EXIT_CONFIG: i32 = 2;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }

    let config_path = cli.config.as_deref();
    let config = match config::load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            output::error(&config::describe_error(&e, config_path));
            std::process::exit(EXIT_CONFIG);
        }
    };

    init_logging(&config, cli.verbose);

    if let Err(e) = run(&cli.command, &config, config_path).await {
        output::error(&e.to_string());
        let code = match e {
            Error::Config(_) => EXIT_CONFIG,
            _ => EXIT_FAILURE,
        };
        std::process::exit(code);
    }
}

async fn run(
    command: &Commands,
    config: &Config,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    match command {
        Commands::Classify(args) => classify::execute(args, config).await,
        Commands::Check(CheckCommand::Config) => check::config::execute_config(config, config_path),
    }
}

fn init_logging(config: &Config, verbose: u8) {
    let logging = match verbose {
        0 => config.logging.clone(),
        1 => config.logging.with_level("info"),
        _ => config.logging.with_level("debug"),
    };
    logging.init();
}
