use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use partner::{
    cli::{Cli, Commands, ManifestCommands},
    command::Partner,
    config::Paths,
    error::AppError,
    fetch::{GitHubFetcher, GitLabFetcher, http_client},
    menu::run_menu,
    table,
};

/// Environment variable controlling log output
const LOG_ENV: &str = "PARTNER_LOG";

/// Logs go to stderr so tables on stdout stay clean
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// Main
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let working_dir = std::env::current_dir()?;
    let partner = Partner::new(Paths::from_env(&working_dir)?);

    match cli.command {
        Some(Commands::Manifest(command)) => run_manifest(&partner, command),
        Some(Commands::Set { ids }) => {
            let active = partner.template_set(&ids)?;
            println!("{} {}", "active coauthors:".green(), active.len());
            Ok(())
        }
        Some(Commands::Status) => print_table(&partner.template_status()?),
        Some(Commands::Clear) => partner.template_clear(),
        None => run_menu(&partner),
    }
}

fn run_manifest(partner: &Partner, command: ManifestCommands) -> Result<(), AppError> {
    match command {
        ManifestCommands::Add { id, name, email } => {
            partner.manifest_add(&id, &name, &email)?;
            println!("{} {}", "added coauthor:".green(), id);
        }
        ManifestCommands::GitHubAdd { usernames, base_url } => {
            let fetcher = GitHubFetcher::new(http_client()?, base_url);
            for coauthor in partner.manifest_fetch_add(&fetcher, &usernames)? {
                println!("{} {}", "added coauthor:".green(), coauthor.id);
            }
        }
        ManifestCommands::GitLabAdd { usernames, base_url } => {
            let fetcher = GitLabFetcher::new(http_client()?, base_url);
            for coauthor in partner.manifest_fetch_add(&fetcher, &usernames)? {
                println!("{} {}", "added coauthor:".green(), coauthor.id);
            }
        }
        ManifestCommands::List => print_table(&partner.manifest_list()?)?,
        ManifestCommands::Remove { ids } => {
            partner.manifest_remove(&ids)?;
            println!("{} {}", "removed coauthors:".green(), ids.join(", "));
        }
    }
    Ok(())
}

fn print_table(coauthors: &[partner::coauthor::Coauthor]) -> Result<(), AppError> {
    table::write_coauthors(&mut std::io::stdout().lock(), coauthors)?;
    Ok(())
}
