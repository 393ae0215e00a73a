use clap::Parser;
use mention::cli::commands::Cli;
use mention::cli::handlers;
use mention::logging;

fn main() {
    let cli = Cli::parse();
    let workspace_dir = cli.workspace_dir.clone();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = mention::tui::run(workspace_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            logging::init_cli();
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
