use clap::{Parser, Subcommand};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use std::error::Error;
use std::path::Path;
use std::process::exit;
use subnet_check::config::{self, ENV_SUBNETS_FILE};
use subnet_check::models::Classification;
use subnet_check::output::{classification_json, print_check, print_classification};

/// Check IP addresses against CIDR subnets.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct App {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output (up to 2 levels)
    #[arg(global = true, short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Print whether an address belongs to any of the subnets
    Check {
        address: String,
        /// Subnets in CIDR notation, IPv4 and IPv6 may be mixed
        subnets: Vec<String>,
        /// JSON file with a "subnets" list, used when no subnet is given
        #[arg(long, value_name = "PATH", env = ENV_SUBNETS_FILE)]
        subnets_file: Option<String>,
    },
    /// Print the named ranges an address belongs to
    Classify {
        address: String,
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    if Path::new("log4rs.yml").exists() {
        if let Err(e) = log4rs::init_file("log4rs.yml", Default::default()) {
            eprintln!("Error initializing log4rs from log4rs.yml: {e}");
        }
        return;
    }

    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level));
    match config {
        Ok(config) => {
            if let Err(e) = log4rs::init_config(config) {
                eprintln!("Error initializing logging: {e}");
            }
        }
        Err(e) => eprintln!("Error building logging config: {e}"),
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Check {
            address,
            subnets,
            subnets_file,
        } => {
            let subnets = config::resolve_subnets(subnets, subnets_file.as_deref())?;
            let checker = subnet_check::create_checker(&subnets)?;
            log::debug!("checking {address} against {} subnets", subnets.len());
            print_check(&address, checker.check(&address)?);
        }
        Command::Classify { address, json } => {
            let classification = Classification::of(&address)?;
            if json {
                println!("{}", classification_json(&classification)?);
            } else {
                print_classification(&classification);
            }
        }
    }
    Ok(())
}

fn main() {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let app = App::parse();
    init_logging(app.verbose);
    log::info!("#Start main()");

    if let Err(err) = run(app.command) {
        log::error!("{err}");
        eprintln!("error: {err}");
        exit(2);
    }
}
