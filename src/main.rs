use std::io::{self, Write};
use std::path::Path;
use std::process;
use log::{error, LevelFilter};

use metapeek::commands::{cli, CommandFactory, MetapeekCommandFactory};
use metapeek::utils::logger::Logger;

fn main() {
    let matches = cli().get_matches();

    let verbose = matches.get_flag("verbose");
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    // stdout carries records only, so every logger writes elsewhere
    match matches.get_one::<String>("log-file") {
        Some(log_file) => {
            if let Err(e) = Logger::init_global_logger(Path::new(log_file), level, verbose) {
                eprintln!("Error setting up global logger: {}", e);
                process::exit(1);
            }
        }
        None => {
            let default_level = if verbose { "debug" } else { "warn" };
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
                .target(env_logger::Target::Stderr)
                .init();
        }
    }

    let factory = MetapeekCommandFactory::new();

    let command = match factory.create_command(&matches) {
        Ok(command) => command,
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = command.execute(&mut out) {
        let _ = out.flush();
        error!("Command execution error: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
