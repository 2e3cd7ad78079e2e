//! clrtools binary entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    match clrtools::cli::run() {
        Ok(status) => status.into(),
        Err(err) => {
            if let Some(usage) = err.downcast_ref::<clap::Error>() {
                usage.exit();
            }
            eprintln!("Error: {:?}", err);
            ExitCode::FAILURE
        }
    }
}
