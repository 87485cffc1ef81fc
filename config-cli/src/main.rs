use std::io::IsTerminal;

use clap::Parser;
use qe_config_cli::Cli;
use qe_config_cli::EXIT_INTERNAL;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so that stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let code = match cli.run(&mut stdout.lock(), &mut stderr.lock()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            EXIT_INTERNAL
        }
    };
    std::process::exit(code);
}
