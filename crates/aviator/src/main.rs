use std::collections::BTreeMap;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use aviator::storage::DynamoDbBackend;
use aviator::telemetry::{init_tracing, TracingObserver};
use aviator::{Config, KvStore, MeasurementService, ReservationService, StationService};
use aviator_core::errors::{ErrorResponse, Locale};
use aviator_core::measurement::Measurement;
use aviator_core::reservation::{ListReservations, Reservation, ReservationError};
use aviator_core::station::{Station, StationError, StationPatch};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

/// Aviator - Aircraft reservations for flying clubs
#[derive(Parser, Debug)]
#[command(name = "aviator")]
#[command(version, about, long_about = None)]
struct Cli {
    /// DynamoDB table holding every entity
    #[arg(long, global = true, env = "DYNAMODB_TABLE_NAME")]
    table: Option<String>,

    /// Club whose reservations are managed
    #[arg(long, global = true, env = "AVIATOR_TENANT_ID")]
    tenant: Option<String>,

    /// Language of error messages (en, fr)
    #[arg(long, global = true, env = "AVIATOR_LANGUAGE")]
    language: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage aircraft reservations
    Reservations {
        #[command(subcommand)]
        command: ReservationCommand,
    },
    /// Manage weather stations
    Stations {
        #[command(subcommand)]
        command: StationCommand,
    },
    /// Manage station measurements
    Measurements {
        #[command(subcommand)]
        command: MeasurementCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ReservationCommand {
    /// Book an aircraft
    Create(ReservationArgs),
    /// Replace an existing reservation
    Update {
        #[arg(long)]
        id: String,
        #[command(flatten)]
        reservation: ReservationArgs,
    },
    /// Show one reservation
    Get {
        #[arg(long)]
        id: String,
    },
    /// List reservations page by page
    List {
        /// Maximum number of reservations per page
        #[arg(long)]
        limit: Option<i32>,
        /// Token returned by the previous page
        #[arg(long)]
        next_token: Option<String>,
    },
    /// Cancel a reservation
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Args, Debug)]
struct ReservationArgs {
    /// Aircraft registration, e.g. HB-KFQ
    #[arg(long)]
    aircraft: String,
    /// Kind of reservation, e.g. private or school
    #[arg(long = "type")]
    reservation_type: String,
    #[arg(long)]
    pilot: String,
    #[arg(long)]
    instructor: Option<String>,
    /// Start of the slot (RFC 3339)
    #[arg(long)]
    start: DateTime<Utc>,
    /// End of the slot (RFC 3339)
    #[arg(long)]
    end: DateTime<Utc>,
    #[arg(long, default_value = "")]
    remarks: String,
}

impl ReservationArgs {
    fn into_reservation(self) -> Reservation {
        let reservation = Reservation::new(
            self.aircraft,
            self.reservation_type,
            self.pilot,
            self.start,
            self.end,
        )
        .with_remarks(self.remarks);

        match self.instructor {
            Some(instructor) => reservation.with_instructor(instructor),
            None => reservation,
        }
    }
}

#[derive(Subcommand, Debug)]
enum StationCommand {
    /// Register a station, optionally with a first measurement
    Create {
        #[arg(long)]
        longitude: String,
        #[arg(long)]
        latitude: String,
        /// Tag as key=value, repeatable
        #[arg(long = "tag", value_parser = parse_tag)]
        tags: Vec<(String, String)>,
        /// Temperature of the first measurement (°C)
        #[arg(long, requires = "barometer", allow_hyphen_values = true)]
        temperature: Option<i64>,
        /// Pressure of the first measurement (hPa)
        #[arg(long, requires = "temperature")]
        barometer: Option<i64>,
    },
    /// Show one station
    Get {
        #[arg(long)]
        id: String,
    },
    /// List every station
    List,
    /// Change a station's position or tags
    Tag {
        #[arg(long)]
        id: String,
        #[arg(long)]
        longitude: Option<String>,
        #[arg(long)]
        latitude: Option<String>,
        /// Tag as key=value, repeatable
        #[arg(long = "tag", value_parser = parse_tag)]
        tags: Vec<(String, String)>,
    },
}

#[derive(Subcommand, Debug)]
enum MeasurementCommand {
    /// Record one measurement
    Record {
        #[arg(long)]
        station: String,
        /// Degrees Celsius
        #[arg(long, allow_hyphen_values = true)]
        temperature: i64,
        /// Hectopascal
        #[arg(long)]
        barometer: i64,
        /// Instant of the reading (RFC 3339, default: now)
        #[arg(long)]
        measured_at: Option<DateTime<Utc>>,
    },
    /// List a station's measurements chronologically
    List {
        #[arg(long)]
        station: String,
        /// Inclusive lower bound (RFC 3339)
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        /// Inclusive upper bound (RFC 3339)
        #[arg(long)]
        to: Option<DateTime<Utc>>,
    },
    /// Delete measurements taken before an instant
    Purge {
        #[arg(long)]
        station: String,
        /// Exclusive upper bound (RFC 3339)
        #[arg(long)]
        before: DateTime<Utc>,
    },
}

fn parse_tag(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, val)) if !key.is_empty() => Ok((key.to_string(), val.to_string())),
        _ => Err(format!("expected key=value, got `{value}`")),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Localized error document for failures the domain knows about.
fn error_response(error: &anyhow::Error, locale: Locale) -> Option<ErrorResponse> {
    if let Some(error) = error.downcast_ref::<ReservationError>() {
        return Some(error.response(locale));
    }
    error
        .downcast_ref::<StationError>()
        .map(|error| error.response(locale))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(table) = cli.table.clone() {
        config.table_name = table;
    }
    if let Some(tenant) = cli.tenant.clone() {
        config.tenant_id = tenant;
    }
    if let Some(language) = cli.language.clone() {
        config.language = language;
    }

    init_tracing(config.log_format);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(error = %error, "Command failed");
            match error_response(&error, config.locale()) {
                Some(response) => match serde_json::to_string_pretty(&response) {
                    Ok(body) => println!("{body}"),
                    Err(_) => eprintln!("{error}"),
                },
                None => eprintln!("Error: {error:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &Config) -> Result<()> {
    let backend = DynamoDbBackend::from_config(config).await;
    let store = KvStore::new(backend);
    tracing::debug!(table = %config.table_name, tenant = %config.tenant_id, "Using table");

    match command {
        Command::Reservations { command } => {
            let service = ReservationService::new(store, TracingObserver);
            let tenant = config.tenant();

            match command {
                ReservationCommand::Create(args) => {
                    print_json(&service.create(&tenant, args.into_reservation()).await?)
                }
                ReservationCommand::Update { id, reservation } => {
                    let reservation = reservation.into_reservation().with_id(id);
                    print_json(&service.replace(&tenant, reservation).await?)
                }
                ReservationCommand::Get { id } => print_json(&service.get(&tenant, &id).await?),
                ReservationCommand::List { limit, next_token } => {
                    let params = ListReservations { limit, next_token };
                    print_json(&service.list(&tenant, &params).await?)
                }
                ReservationCommand::Delete { id } => {
                    service.delete(&tenant, &id).await?;
                    print_json(&serde_json::json!({ "id": id, "deleted": true }))
                }
            }
        }
        Command::Stations { command } => {
            let service = StationService::new(store);

            match command {
                StationCommand::Create {
                    longitude,
                    latitude,
                    tags,
                    temperature,
                    barometer,
                } => {
                    let mut station = Station::new(longitude, latitude);
                    station.tags = tags.into_iter().collect();
                    let initial = match (temperature, barometer) {
                        (Some(temperature), Some(barometer)) => Some(Measurement::new(
                            String::new(),
                            temperature,
                            barometer,
                            Utc::now(),
                        )),
                        (None, None) => None,
                        _ => return Err(anyhow!("temperature and barometer go together")),
                    };
                    print_json(&service.create(station, initial).await?)
                }
                StationCommand::Get { id } => print_json(&service.get(&id).await?),
                StationCommand::List => print_json(&service.list().await?),
                StationCommand::Tag {
                    id,
                    longitude,
                    latitude,
                    tags,
                } => {
                    let patch = StationPatch {
                        longitude,
                        latitude,
                        tags: (!tags.is_empty())
                            .then(|| tags.into_iter().collect::<BTreeMap<_, _>>()),
                    };
                    print_json(&service.update(&id, &patch).await?)
                }
            }
        }
        Command::Measurements { command } => {
            let service = MeasurementService::new(store);

            match command {
                MeasurementCommand::Record {
                    station,
                    temperature,
                    barometer,
                    measured_at,
                } => {
                    let measurement = Measurement::new(
                        station,
                        temperature,
                        barometer,
                        measured_at.unwrap_or_else(Utc::now),
                    );
                    print_json(&service.record(measurement).await?)
                }
                MeasurementCommand::List { station, from, to } => {
                    print_json(&service.list(&station, from, to).await?)
                }
                MeasurementCommand::Purge { station, before } => {
                    print_json(&service.purge(&station, before).await?)
                }
            }
        }
    }
}
