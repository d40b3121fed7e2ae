use clap::Parser;
use wasm_bindgen::prelude::*;

pub use game::WebGame;

mod audio;
mod game;
mod storage;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub(crate) struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Name stored with a new high score
    #[arg(short, long)]
    name: Option<String>,

    /// Lives per game
    #[arg(short, long)]
    lives: Option<u32>,
}

impl Args {
    /// Arguments ride in the location hash, e.g. `#-vv&--seed=42`.
    pub(crate) fn from_location() -> Result<Self, clap::Error> {
        let location_hash = gloo::utils::window()
            .location()
            .hash()
            .unwrap_or_else(|_| "".to_string());
        Self::from_hash(&location_hash)
    }

    fn from_hash(hash: &str) -> Result<Self, clap::Error> {
        Self::try_parse_from(hash.split(['#', '&']))
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let args = Args::from_location().expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    log::debug!("args: {args:?}");
}
