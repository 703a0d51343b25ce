use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{AlertThresholds, Category, Engine, Statistics};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "repas_admin")]
#[command(about = "Admin utilities for Repas (inspect the event, remove guests)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./data/repas.db?mode=rwc"
    )]
    database_url: String,

    /// Servings per guest below which `stats` warns.
    #[arg(
        long,
        env = "REPAS__ALERTS__MIN_SERVINGS_PER_GUEST",
        default_value_t = AlertThresholds::default().min_servings_per_guest
    )]
    min_servings_per_guest: f64,

    /// Guest count from which `stats` flags an event with no contributions.
    #[arg(
        long,
        env = "REPAS__ALERTS__CROWD_SIZE",
        default_value_t = AlertThresholds::default().crowd_size
    )]
    crowd_size: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the dashboard figures and alerts.
    Stats,
    Guests(Guests),
    Contributions(Contributions),
}

#[derive(Args, Debug)]
struct Guests {
    #[command(subcommand)]
    command: GuestsCommand,
}

#[derive(Subcommand, Debug)]
enum GuestsCommand {
    List,
    /// Remove a guest and their contributions.
    Remove(GuestRemoveArgs),
}

#[derive(Args, Debug)]
struct GuestRemoveArgs {
    #[arg(long)]
    id: i32,
}

#[derive(Args, Debug)]
struct Contributions {
    #[command(subcommand)]
    command: ContributionsCommand,
}

#[derive(Subcommand, Debug)]
enum ContributionsCommand {
    List(ContributionListArgs),
}

#[derive(Args, Debug)]
struct ContributionListArgs {
    /// Category code: SALTY, SWEET, DRINK or SIDE.
    #[arg(long, value_parser = parse_category)]
    category: Option<Category>,
}

fn parse_category(raw: &str) -> Result<Category, String> {
    Category::from_code(&raw.to_uppercase()).ok_or_else(|| format!("unknown category: {raw}"))
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

impl Cli {
    fn thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            min_servings_per_guest: self.min_servings_per_guest,
            crowd_size: self.crowd_size,
        }
    }
}

fn print_stats(stats: &Statistics) {
    println!("guests:          {}", stats.guests_count);
    println!("contributions:   {}", stats.contributions_count);
    println!("servings:        {}", stats.total_servings);
    println!("per guest:       {}", stats.servings_per_guest);
    for (category, totals) in stats.by_category.iter() {
        let mark = if stats.category_coverage[category] {
            "x"
        } else {
            " "
        };
        println!(
            "[{mark}] {} {:<14} {:>3} items {:>4} servings",
            category.emoji(),
            category.label(),
            totals.count,
            totals.servings
        );
    }
    for alert in &stats.alerts {
        println!("{}: {}", alert.kind.as_str(), alert.message);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder()
        .database(db)
        .thresholds(cli.thresholds())
        .build()
        .await?;

    match cli.command {
        Command::Stats => print_stats(&engine.statistics().await?),
        Command::Guests(Guests {
            command: GuestsCommand::List,
        }) => {
            let guests = engine.list_guests().await?;
            for entry in &guests {
                let guest = &entry.guest;
                println!("#{} {} {}", guest.id, guest.first_name, guest.last_name);
                if let Some(comment) = &guest.comment {
                    println!("    note: {comment}");
                }
                for contribution in &entry.contributions {
                    println!(
                        "    {} {} x{}",
                        contribution.category.emoji(),
                        contribution.description,
                        contribution.servings
                    );
                }
            }
            println!("{} guests", guests.len());
        }
        Command::Guests(Guests {
            command: GuestsCommand::Remove(args),
        }) => {
            let guest = match engine.guest(args.id).await {
                Ok(guest) => guest,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            };
            let removed = engine.delete_guest(guest.id).await?;
            println!(
                "removed guest: {} {} ({removed} contributions)",
                guest.first_name, guest.last_name
            );
        }
        Command::Contributions(Contributions {
            command: ContributionsCommand::List(args),
        }) => {
            let board = engine.contribution_board(args.category).await?;
            for (category, entries) in board.grouped.iter() {
                if args.category.is_some_and(|filter| filter != category) {
                    continue;
                }
                let totals = board.totals.by_category[category];
                println!(
                    "{} {} ({} items, {} servings)",
                    category.emoji(),
                    category.label(),
                    totals.count,
                    totals.servings
                );
                for entry in entries {
                    let owner = entry
                        .guest
                        .as_ref()
                        .map(|g| format!("{} {}", g.first_name, g.last_name))
                        .unwrap_or_else(|| "?".to_string());
                    println!(
                        "    #{} {} x{} ({owner})",
                        entry.contribution.id,
                        entry.contribution.description,
                        entry.contribution.servings
                    );
                }
            }
            println!(
                "{} contributions, {} servings",
                board.totals.total_contributions, board.totals.total_servings
            );
        }
    }

    Ok(())
}
