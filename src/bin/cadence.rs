//! Command-line host for recurring task generation.
//!
//! Usage:
//!
//! ```text
//! cadence --data-dir <DIR> [--settings <FILE>] <COMMAND>
//! ```
//!
//! Configs are kept in `<DIR>/configs.json` and delivered tasks in
//! `<DIR>/tasks.json`. `catch-up` is meant for a periodic trigger (cron,
//! systemd timer); `generate` is the operator-facing on-demand pass and
//! prints a summary, with the diagnostic trace when `--trace` is given.

use camino::Utf8PathBuf;
use cadence::{
    recurrence::{
        adapters::fs::{JsonFileConfigStore, JsonFileTaskSink},
        domain::{
            ConfigId, ConfigurationError, Frequency, GenerationConfig, NewGenerationConfig,
            RecurrenceRule, TaskTemplate, format_occurrence_date,
        },
        ports::{ConfigStore, ConfigStoreError, TaskSinkError},
        services::{GenerationError, GenerationRunner, RunTarget},
    },
    settings::{RunnerSettings, SettingsError},
    telemetry,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use mockable::DefaultClock;
use std::io::{self, Write};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "cadence", about = "Recurring compliance task generation")]
struct Cli {
    /// Directory holding `configs.json` and `tasks.json`.
    #[arg(long, env = "CADENCE_DATA_DIR")]
    data_dir: Utf8PathBuf,

    /// Optional JSON settings file.
    #[arg(long, env = "CADENCE_SETTINGS")]
    settings: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate pending tasks for every active config.
    CatchUp,
    /// Generate tasks ahead of time for one config or all active ones.
    Generate {
        /// Config to process; all active configs when omitted.
        #[arg(long)]
        config: Option<Uuid>,
        /// Print the diagnostic trace.
        #[arg(long)]
        trace: bool,
    },
    /// Clear a config's cursor so generation restarts from its start date.
    Reset {
        /// Config to reset.
        #[arg(long)]
        config: Uuid,
    },
    /// Register a new recurring duty.
    Add(AddArgs),
    /// List stored configs.
    List,
    /// List the tasks a config has generated.
    Tasks {
        /// Config whose tasks to list.
        #[arg(long)]
        config: Uuid,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FrequencyArg {
    Daily,
    Weekly,
    Monthly,
}

impl From<FrequencyArg> for Frequency {
    fn from(value: FrequencyArg) -> Self {
        match value {
            FrequencyArg::Daily => Self::Daily,
            FrequencyArg::Weekly => Self::Weekly,
            FrequencyArg::Monthly => Self::Monthly,
        }
    }
}

#[derive(Debug, clap::Args)]
struct AddArgs {
    /// Operator-facing name.
    #[arg(long)]
    name: String,
    /// Free-text description.
    #[arg(long)]
    description: Option<String>,
    /// Recurrence frequency.
    #[arg(long, value_enum)]
    frequency: FrequencyArg,
    /// Weekday for weekly rules (Monday = 0).
    #[arg(long)]
    weekday: Option<u8>,
    /// Day of month for monthly rules.
    #[arg(long)]
    day_of_month: Option<u8>,
    /// Assignee identifier; repeat for several.
    #[arg(long = "assignee", required = true)]
    assignees: Vec<String>,
    /// First occurrence (YYYY-MM-DD).
    #[arg(long)]
    start: NaiveDate,
    /// Last date occurrences may fall on (YYYY-MM-DD).
    #[arg(long)]
    end: Option<NaiveDate>,
    /// Days before each occurrence that its tasks are created.
    #[arg(long, default_value_t = 0)]
    lead_days: u32,
    /// Look-ahead for on-demand runs.
    #[arg(long)]
    days_ahead: Option<u32>,
    /// Title template; `{date}` is replaced with the occurrence date.
    #[arg(long)]
    title: Option<String>,
    /// Body template; `{date}` is replaced with the occurrence date.
    #[arg(long)]
    body: Option<String>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Store(#[from] ConfigStoreError),
    #[error(transparent)]
    Sink(#[from] TaskSinkError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("failed to install the log subscriber: {0}")]
    Telemetry(#[from] tracing_subscriber::util::TryInitError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

type Runner = GenerationRunner<JsonFileConfigStore, JsonFileTaskSink, DefaultClock>;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    telemetry::init("info")?;
    let cli = Cli::parse();

    let settings = match cli.settings.as_deref() {
        Some(path) => RunnerSettings::load(path)?,
        None => RunnerSettings::default(),
    };
    let store = Arc::new(JsonFileConfigStore::open(&cli.data_dir)?);
    let sink = Arc::new(JsonFileTaskSink::open(&cli.data_dir)?);
    let runner: Runner =
        GenerationRunner::new(Arc::clone(&store), Arc::clone(&sink), Arc::new(DefaultClock))
            .with_settings(settings);

    let mut out = io::stdout().lock();
    match cli.command {
        Command::CatchUp => catch_up(&runner, &mut out).await,
        Command::Generate { config, trace } => {
            let target = config.map_or(RunTarget::All, |id| {
                RunTarget::Config(ConfigId::from_uuid(id))
            });
            let report = runner.run_on_demand(target).await?;
            writeln!(out, "{}", report.summary(trace))?;
            Ok(())
        }
        Command::Reset { config } => {
            let reset = runner.reset_cursor(ConfigId::from_uuid(config)).await?;
            writeln!(
                out,
                "Generation status reset for '{}'; tasks will be generated again from {}.",
                reset.name(),
                reset.start_date()
            )?;
            Ok(())
        }
        Command::Add(args) => add(&*store, args, &mut out).await,
        Command::List => list(&store, &mut out),
        Command::Tasks { config } => tasks(&sink, ConfigId::from_uuid(config), &mut out),
    }
}

async fn catch_up(runner: &Runner, out: &mut impl Write) -> Result<(), CliError> {
    for outcome in runner.run_catch_up().await? {
        let cursor = outcome
            .last_generated_date
            .map_or_else(|| "never".to_owned(), |date| date.to_string());
        writeln!(
            out,
            "{}: {} occurrences, {} tasks created, cursor {cursor}",
            outcome.config_id, outcome.occurrences_processed, outcome.tasks_created
        )?;
        for err in &outcome.errors {
            writeln!(out, "  error: {err}")?;
        }
    }
    Ok(())
}

async fn add(
    store: &JsonFileConfigStore,
    args: AddArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let rule = RecurrenceRule::from_parts(args.frequency.into(), args.weekday, args.day_of_month)?;
    let defaults = TaskTemplate::default();
    let template = TaskTemplate::new(
        args.title.unwrap_or_else(|| defaults.title().to_owned()),
        args.body.unwrap_or_else(|| defaults.body().to_owned()),
    )?;

    let mut request = NewGenerationConfig::new(args.name, rule, args.assignees, args.start)
        .with_lead_days(args.lead_days)
        .with_template(template);
    if let Some(description) = args.description {
        request = request.with_description(description);
    }
    if let Some(end) = args.end {
        request = request.with_end_date(end);
    }
    if let Some(days) = args.days_ahead {
        request = request.with_days_to_generate_ahead(days);
    }

    let config = GenerationConfig::new(request)?;
    store.save(&config).await?;
    writeln!(out, "{}", config.id())?;
    Ok(())
}

fn list(store: &JsonFileConfigStore, out: &mut impl Write) -> Result<(), CliError> {
    for config in store.load_all()? {
        let cursor = config
            .last_generated_date()
            .map_or_else(|| "never".to_owned(), |date| date.to_string());
        writeln!(
            out,
            "{}  {}  {}  active={}  last={cursor}  total={}",
            config.id(),
            config.name(),
            config.rule(),
            config.is_active(),
            config.total_generated()
        )?;
        if let Some(description) = config.description() {
            writeln!(out, "    {description}")?;
        }
    }
    Ok(())
}

fn tasks(sink: &JsonFileTaskSink, config_id: ConfigId, out: &mut impl Write) -> Result<(), CliError> {
    for record in sink
        .records()?
        .into_iter()
        .filter(|record| record.request.config_id() == config_id)
    {
        writeln!(
            out,
            "{}  {}  {}  {}",
            record.handle,
            format_occurrence_date(record.request.occurrence_date()),
            record.request.assignee(),
            record.request.title()
        )?;
    }
    Ok(())
}
