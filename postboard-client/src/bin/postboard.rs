use clap::{Args, Parser, Subcommand};
use postboard_client::{
    Gateway, GatewayConfig, GatewayError, config::ConfigError, resources::ListPage,
};
use postboard_common::model::{
    Id,
    post::{CreatePost, UpdatePost},
    user::{CreateUser, UpdateUser},
};
use serde::Serialize;
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "postboard")]
#[command(about = "Manage the users and posts of a postboard server", long_about = None)]
struct Cli {
    /// API base address, e.g. http://localhost:3000/api
    #[arg(long)]
    base_url: Option<String>,

    /// Per attempt timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Retries after the first failed attempt
    #[arg(long)]
    retries: Option<u32>,

    /// Delay before the first retry in milliseconds, doubled for each further retry
    #[arg(long)]
    backoff_ms: Option<u64>,

    /// Never retry create, update and delete calls
    #[arg(long)]
    no_retry_writes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Work with users
    #[command(subcommand)]
    Users(UserCommand),
    /// Work with posts
    #[command(subcommand)]
    Posts(PostCommand),
}

#[derive(Args)]
struct PageArgs {
    #[arg(long)]
    offset: Option<usize>,
    #[arg(long)]
    limit: Option<usize>,
}

impl From<PageArgs> for ListPage {
    fn from(args: PageArgs) -> Self {
        Self {
            offset: args.offset,
            limit: args.limit,
        }
    }
}

#[derive(Subcommand)]
enum UserCommand {
    List(PageArgs),
    Get {
        id: u64,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    Delete {
        id: u64,
    },
}

#[derive(Subcommand)]
enum PostCommand {
    List(PageArgs),
    Get {
        id: u64,
    },
    /// Posts written by one user
    ByUser {
        user_id: u64,
        #[command(flatten)]
        page: PageArgs,
    },
    Create {
        #[arg(long)]
        user_id: u64,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    Update {
        id: u64,
        #[arg(long)]
        user_id: Option<u64>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },
    Delete {
        id: u64,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("Could not print response: {0}")]
    Print(#[from] serde_json::Error),
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postboard_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn config(cli: &Cli) -> Result<GatewayConfig, ConfigError> {
    let mut config = GatewayConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if let Some(retries) = cli.retries {
        config.retries = retries;
    }
    if let Some(backoff_ms) = cli.backoff_ms {
        config.backoff_ms = backoff_ms;
    }
    if cli.no_retry_writes {
        config.retry_writes = false;
    }
    Ok(config)
}

fn print(value: &impl Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_users(gateway: &Gateway, command: UserCommand) -> Result<(), CliError> {
    let users = gateway.users();
    match command {
        UserCommand::List(page) => print(&users.list_page(page.into()).await?),
        UserCommand::Get { id } => print(&users.get(Id::new(id)).await?),
        UserCommand::Create {
            name,
            username,
            email,
        } => print(
            &users
                .create(&CreateUser {
                    name,
                    username,
                    email,
                })
                .await?,
        ),
        UserCommand::Update {
            id,
            name,
            username,
            email,
        } => print(
            &users
                .update(
                    Id::new(id),
                    &UpdateUser {
                        name,
                        username,
                        email,
                    },
                )
                .await?,
        ),
        UserCommand::Delete { id } => print(&users.delete(Id::new(id)).await?),
    }
}

async fn run_posts(gateway: &Gateway, command: PostCommand) -> Result<(), CliError> {
    let posts = gateway.posts();
    match command {
        PostCommand::List(page) => print(&posts.list_page(page.into()).await?),
        PostCommand::Get { id } => print(&posts.get(Id::new(id)).await?),
        PostCommand::ByUser { user_id, page } => {
            print(&posts.by_user_page(Id::new(user_id), page.into()).await?)
        }
        PostCommand::Create {
            user_id,
            title,
            body,
        } => print(
            &posts
                .create(&CreatePost {
                    user_id: Id::new(user_id),
                    title,
                    body,
                })
                .await?,
        ),
        PostCommand::Update {
            id,
            user_id,
            title,
            body,
        } => print(
            &posts
                .update(
                    Id::new(id),
                    &UpdatePost {
                        user_id: user_id.map(Id::new),
                        title,
                        body,
                    },
                )
                .await?,
        ),
        PostCommand::Delete { id } => print(&posts.delete(Id::new(id)).await?),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let gateway = Gateway::new(&config(&cli)?)?;

    match cli.command {
        Command::Users(command) => run_users(&gateway, command).await,
        Command::Posts(command) => run_posts(&gateway, command).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    install_tracing();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
