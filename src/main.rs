use clap::{Parser as ClapParser, Subcommand};
use rql_engine::cli::{self, CheckOptions, CheckResult, CliError, OutputFormat};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "rql")]
#[command(about = "RQL - tokenize, parse, and validate Resource Query Language expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log routing decisions to stderr (honours RQL_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Register an extra function as name=kind (kind: select, where, group, order, page)
    #[arg(long = "function", global = true)]
    functions: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tokens of an expression
    Tokenize {
        /// The RQL expression (reads from stdin if not provided)
        expr: Option<String>,

        /// Output JSON
        #[arg(short, long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Parse an expression and print its terms in canonical form
    Parse {
        /// The RQL expression (reads from stdin if not provided)
        expr: Option<String>,

        /// Accept a=b and a=op=b shorthand at top level
        #[arg(short, long)]
        operator: bool,

        /// Output the term tree as JSON
        #[arg(short, long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Parse an expression and validate its column references
    Check {
        /// The RQL expression (reads from stdin if not provided)
        expr: Option<String>,

        /// Accept a=b and a=op=b shorthand at top level
        #[arg(short, long)]
        operator: bool,
    },

    /// Route clauses into a query and print each clause with paging and sorting
    Query {
        /// One or more RQL clauses
        #[arg(required = true)]
        clauses: Vec<String>,

        /// Output JSON
        #[arg(short, long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'rql docs' to list categories)
        category: String,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::try_from_env("RQL_LOG").unwrap_or_else(|_| "debug".into())
    } else {
        tracing_subscriber::EnvFilter::try_from_env("RQL_LOG").unwrap_or_else(|_| "off".into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let registry = cli::build_registry(&cli.functions)?;

    match cli.command {
        Commands::Tokenize { expr, json, pretty } => {
            let expr = read_expr(expr)?;
            println!("{}", cli::execute_tokenize(&expr, OutputFormat::from_flags(json, pretty))?);
        }
        Commands::Parse {
            expr,
            operator,
            json,
            pretty,
        } => {
            let options = CheckOptions {
                expr: read_expr(expr)?,
                operator,
                format: OutputFormat::from_flags(json, pretty),
            };
            println!("{}", cli::execute_parse(&options)?);
        }
        Commands::Check { expr, operator } => {
            let options = CheckOptions {
                expr: read_expr(expr)?,
                operator,
                format: OutputFormat::Text,
            };
            match cli::execute_check(&options, &registry)? {
                CheckResult::Valid(canonical) => println!("Valid: {}", canonical),
                CheckResult::Invalid(errors) => return Err(CliError::Invalid(errors)),
            }
        }
        Commands::Query { clauses, json, pretty } => {
            println!(
                "{}",
                cli::execute_query(&clauses, &registry, OutputFormat::from_flags(json, pretty))?
            );
        }
        Commands::Docs => print!("{}", cli::get_docs_overview()),
        Commands::Doc { category } => print!("{}", cli::get_doc_category(&category)?),
    }
    Ok(())
}

fn read_expr(expr: Option<String>) -> Result<String, CliError> {
    match expr {
        Some(s) => Ok(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
        }
        None => Err(CliError::NoInput),
    }
}
