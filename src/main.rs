//! dapp CLI entry point

use std::process;

fn main() {
    dapp::logging::init();

    let exit_code = dapp::cli::run(std::env::args_os().skip(1));

    process::exit(exit_code);
}
