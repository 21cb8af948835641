use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use datamapper_core::config::{strict_from_env_value, tumor_cell_content_method_from_env_value};
use datamapper_core::{
    CoreConfig, MtbDataMapper, PropertyCatalogue, QueryExecutor, SqlPropertyCatalogue,
    SqliteExecutor,
};
use mtb::{Mtb, TumorCellContentMethod};

const DATABASE_ENV: &str = "DATAMAPPER_DATABASE";
const STRICT_ENV: &str = "DATAMAPPER_STRICT";
const CELL_CONTENT_METHOD_ENV: &str = "DATAMAPPER_TUMOR_CELL_CONTENT_METHOD";

#[derive(Parser)]
#[command(name = "datamapper")]
#[command(about = "Maps documentation database records into MTB documents")]
struct Cli {
    /// SQLite database holding the documentation tables (overrides DATAMAPPER_DATABASE)
    #[arg(long, global = true)]
    database: Option<PathBuf>,
    /// Abort on a failure in any section instead of leaving optional sections empty
    #[arg(long, global = true)]
    strict: bool,
    /// How tumor cell content was determined (overrides DATAMAPPER_TUMOR_CELL_CONTENT_METHOD)
    #[arg(long, value_enum, global = true)]
    tumor_cell_content_method: Option<CellContentMethod>,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json, global = true)]
    format: Format,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map the root record with the given database id
    MapId {
        /// Root record id
        id: i64,
    },
    /// Map the root record with the given case number
    MapCase {
        /// Case number (fallnummermv)
        case_id: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CellContentMethod {
    Histologic,
    Bioinformatic,
}

impl From<CellContentMethod> for TumorCellContentMethod {
    fn from(method: CellContentMethod) -> Self {
        match method {
            CellContentMethod::Histologic => TumorCellContentMethod::Histologic,
            CellContentMethod::Bioinformatic => TumorCellContentMethod::Bioinformatic,
        }
    }
}

/// Resolve configuration once from the environment and command line.
///
/// Command line values take precedence; `--strict` can only switch strict mode on.
fn resolve_config(cli: &Cli) -> anyhow::Result<CoreConfig> {
    let database = match &cli.database {
        Some(path) => path.clone(),
        None => std::env::var(DATABASE_ENV)
            .map(PathBuf::from)
            .with_context(|| format!("no database given: pass --database or set {DATABASE_ENV}"))?,
    };
    let strict = cli.strict || strict_from_env_value(std::env::var(STRICT_ENV).ok())?;
    let method = match cli.tumor_cell_content_method {
        Some(method) => method.into(),
        None => {
            tumor_cell_content_method_from_env_value(std::env::var(CELL_CONTENT_METHOD_ENV).ok())?
        }
    };

    Ok(CoreConfig::new(database, strict)?.with_tumor_cell_content_method(method))
}

fn render(mtb: &Mtb, format: Format) -> anyhow::Result<String> {
    let text = match format {
        Format::Json => mtb.render_json()?,
        Format::Yaml => mtb.render_yaml()?,
    };
    Ok(text)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("datamapper=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let executor: Rc<dyn QueryExecutor> = Rc::new(
        SqliteExecutor::open_read_only(config.database_path()).with_context(|| {
            format!("cannot open database {}", config.database_path().display())
        })?,
    );
    let properties: Rc<dyn PropertyCatalogue> =
        Rc::new(SqlPropertyCatalogue::new(Rc::clone(&executor)));
    let mapper = MtbDataMapper::from_config(executor, properties, &config);

    let mtb = match &cli.command {
        Commands::MapId { id } => mapper
            .get_by_id(*id)
            .with_context(|| format!("mapping record {id} failed"))?,
        Commands::MapCase { case_id } => mapper
            .get_by_case_id(case_id)
            .with_context(|| format!("mapping case {case_id} failed"))?,
    };

    println!("{}", render(&mtb, cli.format)?);
    Ok(())
}
