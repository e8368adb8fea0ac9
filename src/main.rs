use clap::{Parser as ClapParser, Subcommand};
use jsonpath_lang::cli::{self, CliError, QueryOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "jsonpath")]
#[command(about = "jsonpath - Select values from JSON documents with RFC 9535 JSONPath queries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query against a JSON document
    Query {
        /// The JSONPath query, e.g. '$.store.book[?@.price < 10]'
        query: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Print the normalized path of each node along with its value
        #[arg(long)]
        paths: bool,
    },

    /// Validate a query and print its canonical form
    Check {
        /// The JSONPath query to validate
        query: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Query {
            query,
            input,
            pretty,
            paths,
        } => run_query(query, input, pretty, paths),
        Commands::Check { query } => cli::execute_check(&query).map(|result| {
            println!("{}", result.canonical);
            if result.singular {
                println!("singular query");
            }
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_query(
    query: String,
    input: Option<String>,
    pretty: bool,
    paths: bool,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = QueryOptions {
        query,
        input,
        paths,
    };

    let output = cli::execute_query(&options)?;
    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }?;
    println!("{}", json);
    Ok(())
}
