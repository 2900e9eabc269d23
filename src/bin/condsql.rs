//! condsql: dry-run compiler for condition trees
//!
//! # Usage
//!
//! ```bash
//! # Compile a filter read from a file
//! condsql compile --op query --where filter.json --table users
//!
//! # Update with a payload, Postgres placeholders, filter from stdin
//! echo '{"op":"EQ","field":"name","value":"Tom"}' \
//!     | condsql compile --op update --dialect postgres --where - --set set.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use condsql::prelude::*;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "condsql")]
#[command(version)]
#[command(about = "Compile condition trees to SQL templates or documents", long_about = None)]
#[command(after_help = "EXAMPLES:
    condsql compile --op query --where filter.json --table users
    condsql compile --op update --dialect postgres --where - --set set.json
    condsql dialects")]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ./condsql.toml, then the user config dir)
    #[arg(long, global = true, env = "CONDSQL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a condition tree
    Compile {
        /// insert, query, update, delete or exec
        #[arg(long)]
        op: OpKind,

        /// Dialect (defaults to the configured one)
        #[arg(short, long)]
        dialect: Option<Dialect>,

        /// Filter / insert payload / RAW node as JSON; '-' reads stdin
        #[arg(short = 'w', long = "where")]
        filter: Option<String>,

        /// Update payload as JSON; '-' reads stdin
        #[arg(short, long)]
        set: Option<String>,

        /// Table name to render into the template
        #[arg(short, long)]
        table: Option<String>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// List supported dialects
    Dialects,
    /// Print the effective configuration
    Config {
        /// Read this file instead of discovering one
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "condsql=debug" } else { "condsql=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Compile {
            op,
            dialect,
            filter,
            set,
            table,
            format,
        } => {
            let mut config = load_config(cli.config.as_ref())?;
            if let Some(d) = dialect {
                config.dialect = d.name().to_string();
            }
            let filter = filter.as_deref().map(read_tree).transpose()?;
            let set = set.as_deref().map(read_tree).transpose()?;
            compile(&config, *op, filter.as_ref(), set.as_ref(), table.as_deref(), *format)
        }
        Commands::Dialects => {
            show_dialects();
            Ok(())
        }
        Commands::Config { path } => {
            let config = load_config(path.as_ref().or(cli.config.as_ref()))?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(p) => Config::load(p).with_context(|| format!("loading {}", p.display()))?,
        None => Config::discover()?,
    };
    Ok(config)
}

fn read_tree(source: &str) -> Result<ConditionNode> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading tree from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading {}", source))?
    };
    serde_json::from_str(&text).with_context(|| format!("parsing tree from {}", source))
}

fn compile(
    config: &Config,
    op: OpKind,
    filter: Option<&ConditionNode>,
    set: Option<&ConditionNode>,
    table: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let dialect = config.dialect()?;
    let compiler = CachedCompiler::from_config(config)?;
    let query = compiler.compile_cached(op, filter, set)?;

    let rendered = match (table, dialect.is_sql(), op) {
        (Some(t), true, op) if op != OpKind::Exec => {
            Some(query.render(&dialect.generator().quote_identifier(t)))
        }
        _ => None,
    };

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "dialect": dialect.name(),
                "op": op.name(),
                "template": query.template,
                "sql": rendered,
                "args": query.args,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("{} {} ({})", "Dialect:".dimmed(), dialect.name().cyan(), op);
            println!("{}", "Template:".green().bold());
            println!("{}", query.template.white());
            if let Some(sql) = &rendered {
                println!();
                println!("{}", "SQL:".green().bold());
                println!("{}", sql.white());
            }
            if !query.args.is_empty() {
                println!();
                println!("{}", "Bindings:".cyan());
                for (i, arg) in query.args.iter().enumerate() {
                    println!("  {} = {}", i + 1, arg.to_string().yellow());
                }
            }
        }
    }
    Ok(())
}

fn show_dialects() {
    println!("{}", "Dialects".cyan().bold());
    println!();
    println!("  {:<3} {:<10} {:<10} {}", "ID", "NAME", "QUOTE", "PLACEHOLDER");
    for dialect in Dialect::ALL {
        let (quote, placeholder) = if dialect.is_sql() {
            let generator = dialect.generator();
            (generator.quote_identifier("col"), generator.placeholder(1))
        } else {
            ("-".to_string(), "(inline)".to_string())
        };
        println!(
            "  {:<3} {:<10} {:<10} {}",
            dialect.id(),
            dialect.name().yellow(),
            quote,
            placeholder
        );
    }
}
