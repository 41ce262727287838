mod cli;
mod models;
mod sources;

use clap::Parser;

fn main() {
    env_logger::init();

    let cli = cli::Cli::parse();

    if let Err(e) = cli::run(cli) {
        eprintln!("오류: {:#}", e);
        std::process::exit(1);
    }
}
