//! `wellsync` command line.
//!
//! # Responsibility
//! - Manage facilities and their contact details in the local store.
//! - Run registry imports and print the outcome.
//! - Map failures to stderr messages and stable exit codes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::info;
use rusqlite::Connection;
use uuid::Uuid;
use wellsync_core::db::open_db;
use wellsync_core::{
    init_from_config, load_config_or_default, render_facility_export, ContactResponse,
    FacilityDetails, FacilityService, FileRegistryFetcher, HttpRegistryFetcher, ImportError,
    ImportService, RegistryFetcher, SqliteFacilityRepository, SqliteWellRepository,
    WellsyncConfig,
};

const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_CONFIG: u8 = 2;
const EXIT_NOT_FOUND: u8 = 3;
const EXIT_NO_MATCHES: u8 = 4;
const EXIT_REGISTRY: u8 = 5;

#[derive(Parser)]
#[command(name = "wellsync")]
#[command(about = "Reconcile facility API numbers against the RBDMS well registry")]
#[command(version)]
struct Cli {
    /// TOML config file; defaults apply when it does not exist.
    #[arg(long, global = true, env = "WELLSYNC_CONFIG", default_value = "wellsync.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a facility
    Add {
        /// Facility name
        #[arg(long)]
        name: String,
        /// Comma-delimited API numbers
        #[arg(long, default_value = "")]
        api_numbers: String,
    },
    /// List facilities by name
    List,
    /// Show a facility with its contact and wells
    Show { id: Uuid },
    /// Save facility details and the contact response
    #[command(after_help = "\
Omitted flags keep their stored value. Contact name, company, phone number
and email must be non-blank after merging.")]
    Save {
        id: Uuid,
        #[command(flatten)]
        details: DetailArgs,
    },
    /// Replace a facility's wells from the registry
    Import {
        id: Uuid,
        /// Read a local registry CSV snapshot instead of downloading
        #[arg(long, value_name = "CSV")]
        registry_file: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a plain-text facility export
    Export {
        id: Uuid,
        /// Output file; stdout when omitted
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Delete a facility with its contact and wells
    Delete { id: Uuid },
}

#[derive(Args)]
struct DetailArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    api_numbers: Option<String>,
    #[arg(long)]
    contact_name: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    street: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    zip: Option<String>,
    #[arg(long)]
    phone_number: Option<String>,
    #[arg(long)]
    email: Option<String>,
}

#[derive(Debug)]
struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(code: u8, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: None,
        }
    }

    fn error(message: impl ToString) -> Self {
        Self::new(EXIT_ERROR, message.to_string())
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(err.code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config_or_default(&cli.config)
        .map_err(|err| CliError::new(EXIT_CONFIG, err.to_string()))?;
    init_from_config(&config.logging).map_err(|err| CliError::new(EXIT_CONFIG, err))?;

    let mut conn = open_db(&config.storage.db_path).map_err(CliError::error)?;
    info!(
        "event=cli_start module=cli status=ok version={}",
        env!("CARGO_PKG_VERSION")
    );

    match cli.command {
        Commands::Add { name, api_numbers } => cmd_add(&mut conn, &name, &api_numbers),
        Commands::List => cmd_list(&mut conn),
        Commands::Show { id } => cmd_show(&mut conn, id),
        Commands::Save { id, details } => cmd_save(&mut conn, id, details),
        Commands::Import {
            id,
            registry_file,
            json,
        } => cmd_import(&mut conn, &config, id, registry_file.as_deref(), json),
        Commands::Export { id, output } => cmd_export(&mut conn, id, output.as_deref()),
        Commands::Delete { id } => cmd_delete(&mut conn, id),
    }
}

fn facility_service(
    conn: &mut Connection,
) -> Result<FacilityService<SqliteFacilityRepository<'_>>, CliError> {
    let repo = SqliteFacilityRepository::try_new(conn).map_err(CliError::error)?;
    Ok(FacilityService::new(repo))
}

fn service_error(err: wellsync_core::FacilityServiceError) -> CliError {
    use wellsync_core::FacilityServiceError as E;
    match err {
        E::FacilityNotFound(_) => CliError::new(EXIT_NOT_FOUND, err.to_string())
            .with_hint("run `wellsync list` to see facility ids"),
        E::MissingRequiredField(_) => CliError::new(EXIT_CONFIG, err.to_string()),
        E::Repo(_) => CliError::error(err),
    }
}

fn cmd_add(conn: &mut Connection, name: &str, api_numbers: &str) -> Result<(), CliError> {
    let service = facility_service(conn)?;
    let facility = service
        .add_facility(name, api_numbers)
        .map_err(service_error)?;
    println!("{}", facility.id);
    Ok(())
}

fn cmd_list(conn: &mut Connection) -> Result<(), CliError> {
    let service = facility_service(conn)?;
    for facility in service.list_facilities().map_err(CliError::error)? {
        println!(
            "{}\t{}\t{}",
            facility.id,
            facility.name,
            facility.api_numbers.len()
        );
    }
    Ok(())
}

fn cmd_show(conn: &mut Connection, id: Uuid) -> Result<(), CliError> {
    print!("{}", export_text(conn, id)?);
    Ok(())
}

fn cmd_save(conn: &mut Connection, id: Uuid, args: DetailArgs) -> Result<(), CliError> {
    let mut service = facility_service(conn)?;
    let facility = service.require_facility(id).map_err(service_error)?;
    let stored = service
        .get_contact(id)
        .map_err(CliError::error)?
        .unwrap_or_default();

    let keep = |arg: Option<String>, current: Option<String>| arg.or(current);
    let details = FacilityDetails {
        facility_name: args.name.unwrap_or(facility.name),
        api_numbers: args
            .api_numbers
            .unwrap_or_else(|| facility.api_numbers.join(",")),
        contact: ContactResponse {
            name: keep(args.contact_name, stored.name),
            title: keep(args.title, stored.title),
            company: keep(args.company, stored.company),
            street: keep(args.street, stored.street),
            city: keep(args.city, stored.city),
            state: keep(args.state, stored.state),
            zip: keep(args.zip, stored.zip),
            phone_number: keep(args.phone_number, stored.phone_number),
            email: keep(args.email, stored.email),
        },
    };

    let saved = service.save_details(id, &details).map_err(service_error)?;
    println!("Saved {} ({} API numbers)", saved.name, saved.api_numbers.len());
    Ok(())
}

fn cmd_import(
    conn: &mut Connection,
    config: &WellsyncConfig,
    id: Uuid,
    registry_file: Option<&Path>,
    json: bool,
) -> Result<(), CliError> {
    match registry_file {
        Some(path) => run_import(conn, id, FileRegistryFetcher::new(path), json),
        None => {
            let fetcher =
                HttpRegistryFetcher::new(config.registry.url.clone(), config.registry.timeout())
                    .map_err(|err| CliError::new(EXIT_REGISTRY, err.to_string()))?;
            run_import(conn, id, fetcher, json)
        }
    }
}

fn run_import<F: RegistryFetcher>(
    conn: &mut Connection,
    id: Uuid,
    fetcher: F,
    json: bool,
) -> Result<(), CliError> {
    let facility = facility_service(conn)?
        .require_facility(id)
        .map_err(service_error)?;
    let repo = SqliteWellRepository::try_new(conn).map_err(CliError::error)?;
    let mut service = ImportService::new(repo, fetcher);

    let report = match service.import_wells(&facility) {
        Ok(report) => report,
        Err(ImportError::NoMatchesImported(report)) => {
            print_report(&report, json)?;
            return Err(CliError::new(
                EXIT_NO_MATCHES,
                "no well data was imported; existing wells were left unchanged",
            ));
        }
        Err(err @ ImportError::NoApiNumbers(_)) => {
            return Err(CliError::new(EXIT_CONFIG, err.to_string())
                .with_hint("add API numbers with `wellsync save <id> --api-numbers ...`"))
        }
        Err(err @ ImportError::RegistryUnavailable(_)) => {
            return Err(CliError::new(EXIT_REGISTRY, err.to_string()))
        }
        Err(err) => return Err(CliError::error(err)),
    };
    print_report(&report, json)
}

fn print_report(report: &wellsync_core::ImportReport, json: bool) -> Result<(), CliError> {
    if json {
        let rendered = serde_json::to_string_pretty(report).map_err(CliError::error)?;
        println!("{rendered}");
    } else {
        for line in report.summary_lines() {
            println!("{line}");
        }
    }
    Ok(())
}

fn cmd_export(conn: &mut Connection, id: Uuid, output: Option<&Path>) -> Result<(), CliError> {
    let text = export_text(conn, id)?;
    match output {
        Some(path) => {
            std::fs::write(path, text).map_err(|err| {
                CliError::error(format!("failed to write `{}`: {err}", path.display()))
            })?;
            println!("Exported to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn export_text(conn: &mut Connection, id: Uuid) -> Result<String, CliError> {
    let (facility, contact) = {
        let service = facility_service(conn)?;
        let facility = service.require_facility(id).map_err(service_error)?;
        let contact = service.get_contact(id).map_err(CliError::error)?;
        (facility, contact)
    };
    let wells = {
        use wellsync_core::WellRepository;
        SqliteWellRepository::try_new(conn)
            .and_then(|repo| repo.list_well_records(id))
            .map_err(CliError::error)?
    };
    Ok(render_facility_export(&facility, contact.as_ref(), &wells))
}

fn cmd_delete(conn: &mut Connection, id: Uuid) -> Result<(), CliError> {
    let mut service = facility_service(conn)?;
    service.delete_facility(id).map_err(service_error)?;
    println!("Deleted {id}");
    Ok(())
}
