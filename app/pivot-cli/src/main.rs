//! FILENAME: app/pivot-cli/src/main.rs
// PURPOSE: Command-line entry point with unified logging.
// FORMAT: seq|level|category|message

use clap::Parser;
use pivot_cli::{logging, run, Args};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.log_level(), args.log_file.as_deref())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&args, &mut out)?;

    log::logger().flush();
    Ok(())
}
