mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "A Markdown blog generator with paginated listings", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum NewContentKind {
    Post,
    Page,
}

#[derive(Subcommand)]
enum Commands {
    New {
        name: String,
    },
    Create {
        #[arg(value_enum)]
        kind: NewContentKind,

        #[arg(long)]
        title: String,

        /// Defaults to the slugified title
        #[arg(long)]
        slug: Option<String>,

        /// Defaults to today for posts
        #[arg(long)]
        date: Option<String>,

        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        #[arg(long)]
        summary: Option<String>,

        #[arg(long, short)]
        input: Option<PathBuf>,
    },
    Build {
        #[arg(long, short)]
        input: Option<PathBuf>,

        #[arg(long, short, default_value = "dist")]
        output: PathBuf,

        #[arg(long)]
        drafts: bool,

        #[arg(long)]
        base_url: Option<String>,

        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        clean: bool,
    },
    Serve {
        #[arg(long, short)]
        input: Option<PathBuf>,

        #[arg(long)]
        drafts: bool,

        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value = "5000")]
        port: u16,

        #[arg(long)]
        open: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::New { name } => commands::new_site(&name),
        Commands::Create {
            kind,
            title,
            slug,
            date,
            tags,
            summary,
            input,
        } => commands::create_content(
            input.as_deref(),
            &commands::NewContent {
                slug: slug.as_deref(),
                date: date.as_deref(),
                tags: &tags,
                summary: summary.as_deref(),
                ..commands::NewContent::new(kind, &title)
            },
        )
        .map(|_| ()),
        Commands::Build {
            input,
            output,
            drafts,
            base_url,
            clean,
        } => commands::build_site(input.as_deref(), &output, drafts, base_url.as_deref(), clean),
        Commands::Serve {
            input,
            drafts,
            host,
            port,
            open,
        } => commands::serve_site(input.as_deref(), drafts, &host, port, open).await,
    };

    if let Err(error) = result {
        tracing::error!("{error}");
        std::process::exit(1);
    }
}
