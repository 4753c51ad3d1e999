use anyhow::Result;
use argh::FromArgs;
use phonebook::{Interpreter, Settings, logging};
use std::path::PathBuf;
use tracing::info;

#[derive(FromArgs)]
/// Interactive phonebook backed by a JSON file.
struct Args {
    #[argh(option, short = 'f')]
    /// phonebook file; defaults to $PHONEBOOK_FILE, then phonebook.json.
    file: Option<PathBuf>,

    #[argh(option)]
    /// records shown per page (default 5).
    page_size: Option<usize>,
}

fn main() {
    logging::init();
    let args: Args = argh::from_env();
    if let Err(err) = run(args) {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let settings = Settings::from_env(args.file, args.page_size)?;
    info!(file = %settings.data_file.display(), page_size = settings.page_size, "starting phonebook");
    Interpreter::with_settings(settings).repl()
}
