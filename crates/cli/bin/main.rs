use std::process::ExitCode;

use clap::Parser;

use query_compiler_cli::{init_logging, run, Options};

#[tokio::main]
pub async fn main() -> ExitCode {
    let options = Options::parse();
    init_logging(options.verbose);

    match run(&options).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
