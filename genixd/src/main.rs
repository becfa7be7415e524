use genix_core::log::{error, info};
use genixd_lib::{args::parse_args, daemon::start};
use std::process::exit;

pub fn main() {
    let args = parse_args();

    match start(&args) {
        Ok(active) => info!("Parameters for {} are ready", active.network_name()),
        Err(err) => {
            // The logger may not be installed yet
            eprintln!("{err}");
            if err.is_fatal() {
                error!("Refusing to start: {err}");
            }
            exit(1);
        }
    }
}
