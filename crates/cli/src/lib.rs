use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use command::CommandHandler;
use config::EngineConfig;
use dex_protocol::{
    serialize_json, Query, Record, SearchMode, StatRange, TypesResponse, DEFAULT_LIMIT,
};
use dex_search::ExplainedHit;
use dex_store::{import, CatalogFile};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

mod command;
mod config;
mod http_api;
mod server_security;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "dex")]
#[command(about = "Hybrid lexical + fuzzy search over a creature catalog", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Catalog file (env: DEX_CATALOG, default: catalog.json)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Scoring profile file (JSON or TOML) or built-in name (env: DEX_PROFILE)
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    /// Run without the lexical text index (env: DEX_TEXT_INDEX=0)
    #[arg(long, global = true)]
    no_text_index: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search(SearchArgs),

    /// List every type present in the catalog
    Types(TypesArgs),

    /// Execute a JSON Command API request
    Command(CommandArgs),

    /// Convert an upstream feed dump into a catalog file
    Import(ImportArgs),

    /// Serve the search API over HTTP
    ServeHttp(ServeArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// Free-text query; omit to list filter matches by name
    query: Option<String>,

    /// Only records of this type
    #[arg(long = "type")]
    category: Option<String>,

    #[arg(long)]
    min_attack: Option<u32>,

    #[arg(long)]
    max_attack: Option<u32>,

    #[arg(long)]
    min_defense: Option<u32>,

    #[arg(long)]
    max_defense: Option<u32>,

    #[arg(long)]
    min_hp: Option<u32>,

    #[arg(long)]
    max_hp: Option<u32>,

    #[arg(long)]
    min_speed: Option<u32>,

    #[arg(long)]
    max_speed: Option<u32>,

    /// Maximum number of results
    #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// fulltext | semantic | hybrid
    #[arg(long, default_value = "hybrid")]
    mode: SearchMode,

    /// Show which path produced each result and its similarity
    #[arg(long)]
    explain: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl SearchArgs {
    fn to_query(&self) -> Query {
        Query {
            text: self.query.clone(),
            category: self.category.clone(),
            power: StatRange::new(self.min_attack, self.max_attack),
            resilience: StatRange::new(self.min_defense, self.max_defense),
            hp: StatRange::new(self.min_hp, self.max_hp),
            speed: StatRange::new(self.min_speed, self.max_speed),
            limit: self.limit,
            mode: self.mode,
        }
    }
}

#[derive(Args)]
struct TypesArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CommandArgs {
    /// Inline JSON payload (mutually exclusive with --file)
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Path to file containing JSON payload
    #[arg(long)]
    file: Option<PathBuf>,

    /// Pretty-print JSON response
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct ImportArgs {
    /// JSON array of upstream detail documents
    #[arg(long)]
    from: PathBuf,

    /// Catalog file to write (default: the global catalog path)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address, e.g. 127.0.0.1:3000
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: String,

    /// Allow binding to non-loopback addresses
    #[arg(long)]
    public: bool,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers.
    let json_output = match &cli.command {
        Commands::Command(_) => true,
        Commands::Search(args) => args.json,
        Commands::Types(args) => args.json,
        Commands::Import(args) => args.json,
        Commands::ServeHttp(_) => false,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = EngineConfig::resolve(cli.catalog, cli.profile, cli.no_text_index);

    match cli.command {
        Commands::Search(args) => run_search(args, &config).await?,
        Commands::Types(args) => run_types(args, &config).await?,
        Commands::Command(args) => run_command(args, &config).await?,
        Commands::Import(args) => run_import(args, &config).await?,
        Commands::ServeHttp(args) => serve_http(args, &config).await?,
    }

    Ok(())
}

async fn run_search(args: SearchArgs, config: &EngineConfig) -> Result<()> {
    let opened = config.open().await?;
    let query = args.to_query();

    if args.explain {
        let hits = opened.engine.search_explained(&query).await?;
        if args.json {
            print_stdout(&serde_json::to_string_pretty(&hits)?)?;
        } else {
            print_explained(&hits)?;
        }
        return Ok(());
    }

    let response = opened.engine.search(&query).await?;
    if args.json {
        print_stdout(&serde_json::to_string_pretty(&response)?)?;
    } else if response.data.is_empty() {
        print_stdout("No results")?;
    } else {
        for (i, record) in response.data.iter().enumerate() {
            print_stdout(&format!("{}. {}", i + 1, describe(record)))?;
        }
    }
    Ok(())
}

fn print_explained(hits: &[ExplainedHit]) -> Result<()> {
    if hits.is_empty() {
        return print_stdout("No results");
    }
    for (i, hit) in hits.iter().enumerate() {
        let source = serde_json::to_value(hit.source)?;
        let source = source.as_str().unwrap_or_default();
        let line = match hit.similarity {
            Some(similarity) => format!(
                "{}. {}  <{source}, similarity {similarity:.1}>",
                i + 1,
                describe(&hit.record)
            ),
            None => format!("{}. {}  <{source}>", i + 1, describe(&hit.record)),
        };
        print_stdout(&line)?;
    }
    Ok(())
}

fn describe(record: &Record) -> String {
    format!(
        "{} [{}]  hp {} atk {} def {} spd {}",
        record.name,
        record.categories.join(", "),
        record.stats.hp,
        record.stats.power,
        record.stats.resilience,
        record.stats.speed
    )
}

async fn run_types(args: TypesArgs, config: &EngineConfig) -> Result<()> {
    let opened = config.open().await?;
    let types = opened.engine.types().await?;
    if args.json {
        print_stdout(&serialize_json(&TypesResponse { types })?)?;
    } else {
        for name in types {
            print_stdout(&name)?;
        }
    }
    Ok(())
}

async fn run_command(args: CommandArgs, config: &EngineConfig) -> Result<()> {
    let raw = read_payload(&args)?;
    let opened = config.open().await?;
    let handler = CommandHandler::new(opened.engine, opened.records);

    let response = command::execute_raw(&handler, &raw).await;

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serialize_json(&response)?
    };
    print_stdout(&output)?;

    if response.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn read_payload(args: &CommandArgs) -> Result<String> {
    if let Some(raw) = &args.json {
        return Ok(raw.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read JSON from stdin")?;

    if buffer.trim().is_empty() {
        anyhow::bail!("Command request is empty. Provide --json, --file, or pipe JSON via stdin.");
    }

    Ok(buffer)
}

async fn run_import(args: ImportArgs, config: &EngineConfig) -> Result<()> {
    let out = args.out.unwrap_or_else(|| config.catalog.clone());
    let report = import::import_feed(&args.from)
        .await
        .with_context(|| format!("Failed to read feed {}", args.from.display()))?;

    let imported = report.records.len();
    CatalogFile::new(report.records)
        .save(&out)
        .await
        .with_context(|| format!("Failed to write catalog {}", out.display()))?;

    if args.json {
        print_stdout(&serialize_json(&serde_json::json!({
            "records": imported,
            "skipped": report.skipped,
            "out": out.display().to_string(),
        }))?)?;
    } else {
        print_stdout(&format!(
            "Imported {imported} records ({} skipped) into {}",
            report.skipped,
            out.display()
        ))?;
    }
    Ok(())
}

async fn serve_http(args: ServeArgs, config: &EngineConfig) -> Result<()> {
    server_security::checked_bind_addrs(&args.bind, args.public).await?;
    let opened = config.open().await?;

    let state = Arc::new(http_api::HttpState {
        commands: CommandHandler::new(opened.engine.clone(), opened.records),
        engine: opened.engine,
        catalog_records: opened.records,
    });
    let app = http_api::router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    let local_addr = listener.local_addr()?;
    let base_url = format!("http://{local_addr}");

    print_stdout(&format!("Serving search API: {base_url}/api/pokemon/search"))?;
    print_stdout(&format!("Health endpoint: {base_url}/health"))?;
    if args.public {
        print_stdout("Public bind enabled (--public)")?;
    }
    print_stdout(&format!("Try: curl '{base_url}/api/pokemon/search?query=char&limit=5'"))?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn search_flags_map_to_query() {
        let cli = Cli::try_parse_from([
            "dex", "search", "char", "--type", "fire", "--min-attack", "60", "--max-speed", "100",
            "--limit", "5", "--mode", "semantic",
        ])
        .unwrap();
        let Commands::Search(args) = cli.command else {
            panic!("expected search");
        };
        let query = args.to_query();
        assert_eq!(query.trimmed_text(), Some("char"));
        assert_eq!(query.category.as_deref(), Some("fire"));
        assert_eq!(query.power, StatRange::at_least(60));
        assert_eq!(query.speed, StatRange::at_most(100));
        assert_eq!(query.limit, 5);
        assert_eq!(query.mode, SearchMode::Semantic);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["dex", "search", "mew", "--mode", "vector"]).is_err());
    }
}
