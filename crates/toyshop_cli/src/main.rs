//! `toyshop` command-line front end.
//!
//! # Responsibility
//! - Turn user actions into service calls and print the resulting rows.
//! - Own process setup: `.env` loading, logging, the connection provider.
//!
//! # Invariants
//! - Every failure ends with a one-line message on stderr and a non-zero exit.

mod output;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use log::error;
use output::{render_rows, TableRow};
use std::error::Error;
use std::process::ExitCode;
use toyshop_core::db::open_location;
use toyshop_core::{
    init_logging, ConnectionProvider, EntityId, EventRow, EventService, Money,
    SqliteEventRepository, SqliteToyRepository, StoreConfig, ToyDraft, ToyRow, ToyService,
};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(name = "toyshop", version, about = "Toy shop catalogue and calendar")]
struct Cli {
    /// Print rows as JSON instead of a text table.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage the toy catalogue.
    #[command(subcommand)]
    Toy(ToyCommand),
    /// Manage calendar events.
    #[command(subcommand)]
    Event(EventCommand),
}

#[derive(Debug, Subcommand)]
enum ToyCommand {
    /// Show every toy.
    List,
    Add(ToyFields),
    Edit {
        id: EntityId,
        #[command(flatten)]
        fields: ToyFields,
    },
    Delete {
        id: EntityId,
    },
    /// Delete every toy with exactly this name.
    DeleteByName {
        name: String,
    },
    /// Toys suitable for every age from MIN_AGE to MAX_AGE.
    Search {
        min_age: u32,
        max_age: u32,
        /// cost, name or quantity; other values leave the result unsorted.
        #[arg(long, default_value = "")]
        order: String,
    },
    /// Most expensive toy for the ages that fits the budget.
    MostExpensive {
        min_age: u32,
        max_age: u32,
        #[arg(long)]
        budget: Money,
    },
    /// Multiply cost by PERCENTAGE/100 for toys suitable for the ages.
    IncreaseCost {
        min_age: u32,
        max_age: u32,
        #[arg(long)]
        percentage: u32,
    },
}

#[derive(Debug, Args)]
struct ToyFields {
    #[arg(long)]
    name: String,
    /// Amount such as `149.99` or `149,99 ₽`.
    #[arg(long)]
    cost: Money,
    #[arg(long)]
    quantity: u32,
    #[arg(long)]
    min_age: u32,
    #[arg(long)]
    max_age: u32,
}

impl From<ToyFields> for ToyDraft {
    fn from(fields: ToyFields) -> Self {
        Self {
            name: fields.name,
            cost: fields.cost,
            quantity: fields.quantity,
            age_lower: fields.min_age,
            age_upper: fields.max_age,
        }
    }
}

#[derive(Debug, Subcommand)]
enum EventCommand {
    /// Show every event.
    List,
    /// Show events dated today.
    Today,
    /// Show events on a date (YYYY-MM-DD).
    On { date: NaiveDate },
    Add {
        description: String,
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Edit {
        id: EntityId,
        description: String,
        #[arg(long)]
        date: NaiveDate,
    },
    Delete {
        id: EntityId,
    },
}

fn main() -> ExitCode {
    if let Err(err) = skip_missing_env_file(dotenvy::dotenv()) {
        eprintln!("error: cannot load .env: {err}");
        return ExitCode::FAILURE;
    }
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// A missing `.env` is normal; a malformed one is an error.
fn skip_missing_env_file<T>(result: dotenvy::Result<T>) -> dotenvy::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err),
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = StoreConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir)?;
    }

    let mut provider = ConnectionProvider::new();
    provider.set(open_location(&config.db)?);

    match cli.command {
        Command::Toy(command) => run_toy(&provider, command, cli.json),
        Command::Event(command) => run_event(&provider, command, cli.json),
    }
}

fn run_toy(provider: &ConnectionProvider, command: ToyCommand, json: bool) -> CliResult<()> {
    let service = ToyService::new(SqliteToyRepository::from_provider(provider)?);

    match command {
        ToyCommand::List => print_rows(&service.catalog()?, json),
        ToyCommand::Add(fields) => {
            let toy = service.add_toy(&fields.into())?;
            print_rows(&[ToyRow::from_toy(&toy)?], json)
        }
        ToyCommand::Edit { id, fields } => {
            let toy = service.edit_toy(id, &fields.into())?;
            print_rows(&[ToyRow::from_toy(&toy)?], json)
        }
        ToyCommand::Delete { id } => {
            service.remove_toy(id)?;
            println!("deleted toy {id}");
            Ok(())
        }
        ToyCommand::DeleteByName { name } => {
            let removed = service.remove_by_name(&name)?;
            println!("deleted {removed} toy(s)");
            Ok(())
        }
        ToyCommand::Search {
            min_age,
            max_age,
            order,
        } => print_rows(&service.search_rows(min_age, max_age, &order)?, json),
        ToyCommand::MostExpensive {
            min_age,
            max_age,
            budget,
        } => match service.most_expensive(min_age, max_age, budget)? {
            Some(toy) => print_rows(&[ToyRow::from_toy(&toy)?], json),
            None => {
                println!("no toy for ages {min_age}-{max_age} within {budget}");
                Ok(())
            }
        },
        ToyCommand::IncreaseCost {
            min_age,
            max_age,
            percentage,
        } => {
            let changed = service.increase_cost(min_age, max_age, percentage)?;
            println!("updated cost of {changed} toy(s)");
            Ok(())
        }
    }
}

fn run_event(provider: &ConnectionProvider, command: EventCommand, json: bool) -> CliResult<()> {
    let service = EventService::new(SqliteEventRepository::from_provider(provider)?);

    match command {
        EventCommand::List => print_rows(&service.catalog()?, json),
        EventCommand::Today => {
            let rows: Vec<EventRow> = service.todays_events()?.iter().map(EventRow::from).collect();
            print_rows(&rows, json)
        }
        EventCommand::On { date } => {
            let rows: Vec<EventRow> = service.events_on(date)?.iter().map(EventRow::from).collect();
            print_rows(&rows, json)
        }
        EventCommand::Add { description, date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let event = service.add_event(&description, date)?;
            print_rows(&[EventRow::from(&event)], json)
        }
        EventCommand::Edit {
            id,
            description,
            date,
        } => {
            let event = service.edit_event(id, &description, date)?;
            print_rows(&[EventRow::from(&event)], json)
        }
        EventCommand::Delete { id } => {
            service.remove_event(id)?;
            println!("deleted event {id}");
            Ok(())
        }
    }
}

fn print_rows<T: TableRow>(rows: &[T], json: bool) -> CliResult<()> {
    println!("{}", render_rows(rows, json)?);
    Ok(())
}
