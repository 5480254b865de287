mod conversion;
mod form;
mod gold;
mod numeric;
mod session;
mod usd;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn, Level};

use crate::conversion::ConversionForm;
use crate::form::{Form, FormError};
use crate::gold::GoldForm;
use crate::session::{csv_to_event_iterator, replay};
use crate::usd::UsdForm;

#[derive(Parser, Debug)]
#[clap(version, about = "Gold and USD purchase calculators")]
struct Args {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a session against the gold position tracker
    Gold { session_filepath: PathBuf },
    /// Replay a session against the USD average purchase tracker
    Usd { session_filepath: PathBuf },
    /// Replay a session against the gold conversion form
    Convert { session_filepath: PathBuf },
    /// Price one gram of 18K gold in Toman
    Quote {
        /// Toman per 1 USD
        #[clap(long)]
        rate: String,
        /// Gold price per troy ounce in USD
        #[clap(long)]
        xau: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run_session(form: &mut dyn Form, session_filepath: PathBuf) -> anyhow::Result<()> {
    info!(path = %session_filepath.display(), "replaying session");
    let events = csv_to_event_iterator(&session_filepath)
        .with_context(|| format!("failed to open session {}", session_filepath.display()))?;
    let applied = replay(form, events);
    info!(applied, "session finished");
    Ok(())
}

fn quote(rate: &str, xau: &str) -> Result<ConversionForm, FormError> {
    let mut form = ConversionForm::default();
    form.input("rate", rate)?;
    form.input("xau", xau)?;
    form.submit();
    Ok(form)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let form: Box<dyn Form> = match args.command {
        Command::Gold { session_filepath } => {
            let mut form = GoldForm::default();
            run_session(&mut form, session_filepath)?;
            info!(positions = form.tracker().positions().len(), "gold tracker ready");
            Box::new(form)
        }
        Command::Usd { session_filepath } => {
            let mut form = UsdForm::default();
            run_session(&mut form, session_filepath)?;
            info!(
                transactions = form.tracker().transactions().len(),
                "usd tracker ready"
            );
            Box::new(form)
        }
        Command::Convert { session_filepath } => {
            let mut form = ConversionForm::default();
            run_session(&mut form, session_filepath)?;
            if form.result().is_none() {
                warn!("session never submitted the conversion form");
            }
            Box::new(form)
        }
        Command::Quote { rate, xau } => Box::new(quote(&rate, &xau)?),
    };

    print!("{}", form);
    Ok(())
}
