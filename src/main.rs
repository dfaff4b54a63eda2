use std::{process::ExitCode, time::Duration};

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::{
    model::draft::{DraftInput, DEFAULT_PATCH},
    service::{
        draft_parser::normalize_draft,
        predictapi::{
            client::PredictionClient,
            config::{ClientConfig, DEFAULT_BASE_URL},
        },
    },
    ui::repl,
};

mod model;
mod service;
mod ui;

/// Estimate League of Legends win probability from draft context
#[derive(Parser, Debug)]
#[command(name = "draftdiff")]
#[command(version, about, long_about = None)]
struct Args {
    /// Root url of the prediction service, `/predict` is appended
    #[arg(long, env = "DRAFTDIFF_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Give up on a request after this many seconds (waits indefinitely if unset)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a single draft and print the estimate
    Predict {
        /// Champions in pick order, comma separated
        #[arg(long, default_value = "")]
        champions: String,

        /// Lanes matching the champions, comma separated
        #[arg(long, default_value = "")]
        lanes: String,

        /// Rune choices as slot:choice pairs, comma separated
        #[arg(long, default_value = "")]
        runes: String,

        #[arg(long, default_value = DEFAULT_PATCH)]
        patch: String,

        /// Evaluate the red side instead of the blue side
        #[arg(long)]
        red_side: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = ClientConfig::new(&args.base_url).with_timeout(args.timeout_secs.map(Duration::from_secs));
    tracing::info!("Using prediction service at {}", config.base_url);
    let client = PredictionClient::new(config);

    match args.command {
        Some(Command::Predict {
            champions,
            lanes,
            runes,
            patch,
            red_side,
        }) => {
            let input = DraftInput {
                champions_text: champions,
                lanes_text: lanes,
                runes_text: runes,
                patch,
                blue_side: !red_side,
            };
            predict_once(&client, &input)
        }
        None => match repl::run(client, DraftInput::default()) {
            Ok(_) => ExitCode::SUCCESS,
            Err(error) => {
                println!("Error occured while running REPL:\n{}\n", error);
                ExitCode::FAILURE
            }
        },
    }
}

fn predict_once(client: &PredictionClient, input: &DraftInput) -> ExitCode {
    let draft = normalize_draft(input);
    match client.predict(&draft) {
        Ok(result) => {
            println!("Win probability: {}", result);
            ExitCode::SUCCESS
        }
        Err(error) if error.is_transport() => {
            eprintln!("Could not reach the prediction service: {}", error);
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("Prediction failed: {}", error);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set up logging: {}", error);
    }
}
