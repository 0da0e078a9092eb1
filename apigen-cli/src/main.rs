use std::path::PathBuf;

use apigen_cli::commands::{make, plan, GenerateOpts};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "apigen",
    version,
    about = "apigen - generate layered CRUD API components for Laravel-style projects"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate model, migration, repository, DTO, service, filter,
    /// exception, requests, resource, controller and route
    Make {
        /// Resource name (e.g. "customer order")
        name: String,
        /// API version (default V1)
        version: Option<String>,
        #[command(flatten)]
        opts: OptArgs,
    },
    /// Show the planned artifacts without writing anything
    Plan {
        /// Resource name
        name: String,
        /// API version (default V1)
        version: Option<String>,
        #[command(flatten)]
        opts: OptArgs,
    },
}

#[derive(Args)]
struct OptArgs {
    /// Project root (default: current directory)
    #[arg(long)]
    base_dir: Option<PathBuf>,
    /// Overwrite the model without asking
    #[arg(long, conflicts_with = "no_overwrite")]
    force: bool,
    /// Never overwrite an existing model
    #[arg(long)]
    no_overwrite: bool,
    /// Only these artifact kinds (e.g. service,controller,routes)
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,
    /// Use `php artisan make:*` for models, migrations, requests and resources
    #[arg(long)]
    artisan: bool,
    /// Pluralize with English rules instead of appending "s"
    #[arg(long)]
    english_plurals: bool,
}

impl From<OptArgs> for GenerateOpts {
    fn from(args: OptArgs) -> Self {
        GenerateOpts {
            base_dir: args.base_dir,
            force: args.force,
            no_overwrite: args.no_overwrite,
            only: args.only,
            artisan: args.artisan,
            english_plurals: args.english_plurals,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    apigen_cli::init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Make {
            name,
            version,
            opts,
        } => make::run(&name, version.as_deref(), &opts.into()),
        Commands::Plan {
            name,
            version,
            opts,
        } => plan::run(&name, version.as_deref(), &opts.into()),
    };

    if let Err(e) = result {
        eprintln!("{}", colored::Colorize::red(format!("Error: {e}").as_str()));
        std::process::exit(1);
    }
}
