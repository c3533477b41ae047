use gtfs_fetch::cli::Cli;
use gtfs_fetch::logging;

fn main() {
    // Initialize logging as early as possible.
    logging::init_logging().expect("failed to initialize logging");

    // Parse CLI and dispatch.
    if let Err(err) = Cli::run_from_args() {
        eprintln!("gtfs-fetch error: {:#}", err);
        std::process::exit(1);
    }
}
