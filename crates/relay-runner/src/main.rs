//! `relay-board` command-line tool.

use std::process::ExitCode;

use clap::Parser;
use relay_pattern::RelayBoardPattern;
use relay_runner::cli::describe_pattern;
use relay_runner::{find_port, open_port, run_pattern, Cli, CliCommand, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Encode { plain } => {
            println!("{}", relay_serial::encode(&plain)?);
        }
        CliCommand::Decode { encoded } => {
            println!("{}", relay_serial::decode(&encoded)?);
        }
        CliCommand::Check { file } => {
            let pattern = RelayBoardPattern::from_file(&file)?;
            println!("{}", describe_pattern(&pattern));
        }
        CliCommand::Run(args) => {
            let pattern = args.load_pattern()?;
            let options = args.options();
            let timeout = options.timeout;
            let reports = run_pattern(
                &pattern,
                &options,
                |location| {
                    let port_name = find_port(&location.device_number)?;
                    debug!("Device {} is on {}", location.device_number, port_name);
                    Ok(port_name)
                },
                |port_name: String| open_port(&port_name, timeout),
            )?;
            for report in reports {
                if let Some(info) = &report.info {
                    println!("{}", info);
                }
                println!("{}: {:?}", report.serial_number, report.state);
            }
        }
    }
    Ok(())
}
