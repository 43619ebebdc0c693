use anyhow::Result;
use clap::{Parser, Subcommand};
use inkboard_generator::app::App;
use inkboard_generator::models::Config;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "inkboard-generator")]
#[command(about = "Turn scene ideas into illustrated stories")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a story and image for a scene idea and save it.
    Create {
        #[arg(long)]
        owner: String,
        #[arg(value_name = "SCENE")]
        scene_idea: String,
    },
    /// Replace the journal entry of a saved creation.
    Journal {
        #[arg(long)]
        owner: String,
        #[arg(value_name = "ID", value_parser = parse_creation_id)]
        creation_id: Uuid,
        #[arg(value_name = "TEXT")]
        text: String,
    },
    /// List an owner's creations, newest first.
    List {
        #[arg(long)]
        owner: String,
    },
    /// Show one creation.
    Show {
        #[arg(long)]
        owner: String,
        #[arg(value_name = "ID", value_parser = parse_creation_id)]
        creation_id: Uuid,
    },
}

fn parse_creation_id(input: &str) -> std::result::Result<Uuid, String> {
    Uuid::parse_str(input.trim())
        .map_err(|_| format!("Invalid creation id '{}'. Expected a UUID", input))
}

fn print_json<T: Serialize>(value: &T) -> inkboard_generator::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(app: &App, command: Command) -> inkboard_generator::Result<()> {
    match command {
        Command::Create { owner, scene_idea } => {
            let creation = app.create_creation(&owner, &scene_idea).await?;
            print_json(&creation)
        }
        Command::Journal {
            owner,
            creation_id,
            text,
        } => {
            app.save_journal(&owner, creation_id, &text).await?;
            info!("Journal saved");
            Ok(())
        }
        Command::List { owner } => {
            let creations = app.list_creations(&owner).await?;
            print_json(&creations)
        }
        Command::Show { owner, creation_id } => {
            let creation = app.find_creation(&owner, creation_id).await?;
            print_json(&creation)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkboard_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    match App::new(&config).await {
        Ok(app) => match run(&app, args.command).await {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Command failed: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_creation_id, CliArgs, Command};
    use clap::Parser;

    #[test]
    fn test_parse_creation_id_valid() {
        let parsed = parse_creation_id(" 67e55044-10b1-426f-9247-bb680e5fe0c8 ").unwrap();
        assert_eq!(parsed.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn test_parse_creation_id_invalid() {
        let err = parse_creation_id("not-a-uuid").unwrap_err();
        assert!(err.contains("UUID"));
    }

    #[test]
    fn test_create_subcommand() {
        let args = CliArgs::try_parse_from([
            "inkboard-generator",
            "create",
            "--owner",
            "alice",
            "a harbor at dusk",
        ])
        .unwrap();

        match args.command {
            Command::Create { owner, scene_idea } => {
                assert_eq!(owner, "alice");
                assert_eq!(scene_idea, "a harbor at dusk");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_journal_requires_valid_id() {
        let result = CliArgs::try_parse_from([
            "inkboard-generator",
            "journal",
            "--owner",
            "alice",
            "42",
            "some text",
        ]);
        assert!(result.is_err());
    }
}
