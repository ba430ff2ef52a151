use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

mod catalog;
mod db;
mod models;
mod report;
mod scoring;
mod suggest;
mod workflow;

#[derive(Parser)]
#[command(name = "pesantren-reports")]
#[command(about = "Administrative reporting for pesantren principals and the foundation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import scored supervision items from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Recompute and store the supervision aggregate for one teacher
    Score {
        #[arg(long)]
        teacher: String,
        #[arg(long)]
        period: String,
        #[arg(long)]
        json: bool,
    },
    /// Submit a draft supervision for foundation review
    Submit {
        #[arg(long)]
        teacher: String,
        #[arg(long)]
        period: String,
    },
    /// Forward a submitted supervision to the foundation (locks it)
    SendFoundation {
        #[arg(long)]
        teacher: String,
        #[arg(long)]
        period: String,
    },
    /// Activity report workflow
    #[command(subcommand)]
    Activity(ActivityCommand),
    /// RAB budget proposal workflow
    #[command(subcommand)]
    Rab(RabCommand),
    /// Print a template suggestion for a report or proposal text
    Suggest {
        #[arg(long, value_enum)]
        kind: suggest::SuggestionKind,
        #[arg(long)]
        title: String,
    },
    /// Generate a markdown supervision report
    Report {
        #[arg(long)]
        period: String,
        #[arg(long)]
        teacher: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Print the supervision indicator catalog
    Catalog,
}

#[derive(Subcommand)]
enum ActivityCommand {
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        period: String,
    },
    Send {
        #[arg(long)]
        title: String,
        #[arg(long)]
        period: String,
    },
}

#[derive(Subcommand)]
enum RabCommand {
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        period: String,
    },
    Approve {
        #[arg(long)]
        title: String,
        #[arg(long)]
        period: String,
        #[arg(long)]
        note: Option<String>,
    },
    Reject {
        #[arg(long)]
        title: String,
        #[arg(long)]
        period: String,
        #[arg(long)]
        note: String,
    },
    /// Reopen a rejected proposal as a draft for revision
    Reopen {
        #[arg(long)]
        title: String,
        #[arg(long)]
        period: String,
    },
}

async fn connect_pool() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Suggest { kind, title } => {
            println!("{}", suggest::suggest(kind, &title));
        }
        Commands::Catalog => {
            let mut current_category = 0;
            for indicator in catalog::INDICATORS {
                if indicator.category_number != current_category {
                    current_category = indicator.category_number;
                    println!("{}. {}", indicator.category_number, indicator.category_name);
                }
                println!(
                    "   {}.{} {}",
                    indicator.category_number, indicator.indicator_number, indicator.text
                );
            }
        }
        Commands::InitDb => {
            let pool = connect_pool().await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect_pool().await?;
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let pool = connect_pool().await?;
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} supervision items from {}.", csv.display());
        }
        Commands::Score {
            teacher,
            period,
            json,
        } => {
            let pool = connect_pool().await?;
            let record = db::fetch_supervision(&pool, &teacher, &period).await?;
            let aggregate = scoring::aggregate(&record.items)?;
            if record.status != workflow::ReviewStatus::SentToFoundation {
                db::store_aggregate(&pool, record.id, &aggregate).await?;
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&aggregate)?);
            } else {
                println!(
                    "{} ({}) — {}: {}/{} = {}%",
                    record.teacher_name,
                    record.unit,
                    record.period,
                    aggregate.total_score,
                    aggregate.max_score,
                    aggregate.percentage
                );
                println!(
                    "Kategori {} [{}] — {}",
                    aggregate.category.label(),
                    aggregate.category.color(),
                    aggregate.category.recommendation()
                );
            }
        }
        Commands::Submit { teacher, period } => {
            let pool = connect_pool().await?;
            let record = db::fetch_supervision(&pool, &teacher, &period).await?;
            let next = record.status.submit()?;
            let aggregate = scoring::aggregate(&record.items)?;
            db::store_aggregate(&pool, record.id, &aggregate).await?;
            db::set_supervision_status(&pool, record.id, next).await?;
            println!(
                "Supervision for {teacher} in {period} submitted ({}%, {}).",
                aggregate.percentage,
                aggregate.category.label()
            );
        }
        Commands::SendFoundation { teacher, period } => {
            let pool = connect_pool().await?;
            let record = db::fetch_supervision(&pool, &teacher, &period).await?;
            let next = record.status.send_to_foundation()?;
            db::set_supervision_status(&pool, record.id, next).await?;
            println!("Supervision for {teacher} in {period} sent to the foundation.");
        }
        Commands::Activity(command) => {
            let pool = connect_pool().await?;
            match command {
                ActivityCommand::Submit { title, period } => {
                    let activity = db::fetch_activity_report(&pool, &title, &period).await?;
                    let next = activity.status.submit()?;
                    db::set_activity_status(&pool, activity.id, next).await?;
                    println!(
                        "Activity report '{}' ({}) submitted: {}",
                        activity.title, activity.period, activity.description
                    );
                }
                ActivityCommand::Send { title, period } => {
                    let activity = db::fetch_activity_report(&pool, &title, &period).await?;
                    let next = activity.status.send_to_foundation()?;
                    db::set_activity_status(&pool, activity.id, next).await?;
                    println!("Activity report '{}' sent to the foundation.", activity.title);
                }
            }
        }
        Commands::Rab(command) => {
            let pool = connect_pool().await?;
            match command {
                RabCommand::Submit { title, period } => {
                    let proposal = db::fetch_rab(&pool, &title, &period).await?;
                    let next = proposal.status.submit()?;
                    db::set_rab_status(&pool, proposal.id, next, None).await?;
                    println!(
                        "RAB proposal '{}' ({}, Rp {}) submitted: {}",
                        proposal.title, proposal.period, proposal.amount, proposal.justification
                    );
                }
                RabCommand::Approve {
                    title,
                    period,
                    note,
                } => {
                    let proposal = db::fetch_rab(&pool, &title, &period).await?;
                    let next = proposal.status.approve()?;
                    db::set_rab_status(&pool, proposal.id, next, note.as_deref()).await?;
                    println!("RAB proposal '{title}' approved.");
                }
                RabCommand::Reject {
                    title,
                    period,
                    note,
                } => {
                    let proposal = db::fetch_rab(&pool, &title, &period).await?;
                    let next = proposal.status.reject()?;
                    db::set_rab_status(&pool, proposal.id, next, Some(&note)).await?;
                    println!("RAB proposal '{title}' rejected: {note}");
                }
                RabCommand::Reopen { title, period } => {
                    let proposal = db::fetch_rab(&pool, &title, &period).await?;
                    let next = proposal.status.reopen()?;
                    db::set_rab_status(&pool, proposal.id, next, None).await?;
                    match proposal.foundation_note.as_deref() {
                        Some(note) => println!(
                            "RAB proposal '{}' reopened as draft (foundation note: {note}).",
                            proposal.title
                        ),
                        None => println!("RAB proposal '{}' reopened as draft.", proposal.title),
                    }
                }
            }
        }
        Commands::Report {
            period,
            teacher,
            out,
        } => {
            let pool = connect_pool().await?;
            let records =
                db::fetch_supervisions_for_period(&pool, &period, teacher.as_deref()).await?;
            let mut entries = Vec::new();
            for record in records {
                let aggregate = scoring::aggregate(&record.items)?;
                if record.status != workflow::ReviewStatus::SentToFoundation {
                    db::store_aggregate(&pool, record.id, &aggregate).await?;
                }
                entries.push((record, aggregate));
            }
            let report = report::build_report(&period, teacher.as_deref(), &entries);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
