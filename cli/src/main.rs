use clap::{Parser, Subcommand};
use skirmish_cli::CliContext;
use skirmish_cli::commands;
use skirmish_cli::readline;
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), String> {
    init_logging();
    let mut ctx = CliContext::new();

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &mut ctx) {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

/// Log to stderr so tables and JSON on stdout stay clean. `RUST_LOG`
/// overrides the default `info` level.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Parser)]
#[command(version, about = "Action moments from replay event logs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a match from the replay directory, or from an explicit file
    Load {
        #[arg(short, long)]
        match_id: u64,
        #[arg(short, long)]
        path: Option<String>,
    },
    /// List the players of the loaded match
    Players,
    /// Action moments of the match, or of one hero
    Highlights {
        #[arg(long)]
        hero: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Attack windows against one hero
    Windows {
        #[arg(long)]
        hero: String,
        #[arg(long)]
        json: bool,
    },
    /// Health signals of one hero
    Signals {
        #[arg(long)]
        hero: String,
        #[arg(long, allow_hyphen_values = true)]
        start: Option<i64>,
        #[arg(long, allow_hyphen_values = true)]
        end: Option<i64>,
    },
    Config,
    SetDirectory {
        #[arg(short, long)]
        path: String,
    },
    Exit,
}

fn respond(line: &str, ctx: &mut CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "skirmish".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Load { match_id, path }) => {
            commands::load(ctx, *match_id, path.as_deref())?
        }
        Some(Commands::Players) => commands::players(ctx)?,
        Some(Commands::Highlights { hero, json }) => {
            commands::highlights(ctx, hero.as_deref(), *json)?
        }
        Some(Commands::Windows { hero, json }) => commands::windows(ctx, hero, *json)?,
        Some(Commands::Signals { hero, start, end }) => {
            commands::signals(ctx, hero, *start, *end)?
        }
        Some(Commands::Config) => commands::show_settings(ctx)?,
        Some(Commands::SetDirectory { path }) => commands::set_directory(ctx, path)?,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
