use std::process::ExitCode;

use clap::Parser;
use gh_activity::{app, cli::Cli, report::Report};

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match app::run(&cli).await {
        Ok(digest) => {
            println!("{}", Report(&digest));
            Ok(ExitCode::SUCCESS)
        },
        Err(e) if e.is_user_not_found() => {
            eprintln!("No GitHub user named {:?}", cli.username);
            Ok(ExitCode::FAILURE)
        },
        Err(e) => Err(e.into()),
    }
}
