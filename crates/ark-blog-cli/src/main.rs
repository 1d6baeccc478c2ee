//! Ark Blog terminal client

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use ark_blog::api::{AuthService, BlogService, TagService};
use ark_blog::session::{FileSessionStore, Session};
use ark_http_client::HttpClient;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use url::Url;

mod config;
mod env_vars;
mod sub_commands;
mod utils;

use crate::config::Settings;

const DEFAULT_WORK_DIR: &str = ".ark-blog";

/// Read, write and publish posts on an Ark Blog backend
#[derive(Parser)]
#[command(name = "ark-blog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to working dir
    #[arg(short, long)]
    work_dir: Option<PathBuf>,
    /// Settings file, `config.toml` in the working dir by default
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Logging level
    #[arg(short, long, default_value = "error")]
    log_level: Level,
    /// API base URL, overrides the settings
    #[arg(long)]
    api_url: Option<String>,
    /// Proxy URL, overrides the settings
    #[arg(short, long)]
    proxy: Option<Url>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Top, editor's picks and latest posts
    Feed,
    /// Posts carrying a tag
    Tagged(sub_commands::tagged::TaggedSubCommand),
    /// Published posts, one page at a time
    Posts(sub_commands::posts::PostsSubCommand),
    /// Show one post
    Post(sub_commands::post::PostSubCommand),
    /// Delete a post
    Delete(sub_commands::delete::DeleteSubCommand),
    /// List every tag
    Tags,
    /// Log in and keep the session
    Login(sub_commands::login::LoginSubCommand),
    /// Create an account
    Register(sub_commands::register::RegisterSubCommand),
    /// Forget the session
    Logout,
    /// Show whether a session is stored
    Status,
    /// Write a new post
    New(sub_commands::new_post::NewPostSubCommand),
    /// Update a post created earlier
    Save(sub_commands::save::SaveSubCommand),
    /// Upload an image
    UploadImage(sub_commands::upload_image::UploadImageSubCommand),
    /// Download an asset
    Download(sub_commands::download::DownloadSubCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();
    let default_filter = args.log_level;

    let hyper_filter = "hyper=warn,reqwest=warn";

    let env_filter = EnvFilter::new(format!("{},{}", default_filter, hyper_filter));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let work_dir = match &args.work_dir {
        Some(work_dir) => work_dir.clone(),
        None => home::home_dir()
            .ok_or(anyhow!("Could not find home directory"))?
            .join(DEFAULT_WORK_DIR),
    };

    fs::create_dir_all(&work_dir)?;

    let mut settings = Settings::new(&work_dir, args.config.clone())?.from_env();
    if let Some(api_url) = &args.api_url {
        settings.api.base_url = api_url.clone();
    }

    tracing::debug!("Using API at {}", settings.api.base_url);

    let mut builder = HttpClient::builder(settings.api.base_url.clone())
        .retries(settings.http.retries)
        .json_timeout(settings.http.json_timeout())
        .file_timeout(settings.http.file_timeout())
        .danger_accept_invalid_certs(settings.http.accept_invalid_certs)
        .user_agent(format!("ark-blog/{}", env!("CARGO_PKG_VERSION")));

    let proxy = match &args.proxy {
        Some(proxy) => Some(proxy.clone()),
        None => settings.http.proxy.as_deref().map(Url::parse).transpose()?,
    };
    if let Some(proxy) = proxy {
        builder = builder.proxy(proxy);
    }

    let client = builder.build()?;

    let session = Session::new(Arc::new(FileSessionStore::in_dir(&work_dir)));

    let blog = BlogService::new(client.clone(), session.clone());
    let tags = TagService::new(client.clone(), session.clone());
    let auth = AuthService::new(client, session.clone());

    let asset_base_url = settings.api.asset_base_url.as_str();

    match &args.command {
        Commands::Feed => sub_commands::feed::feed(&blog, asset_base_url).await,
        Commands::Tagged(sub_command_args) => {
            sub_commands::tagged::tagged(&blog, asset_base_url, sub_command_args).await
        }
        Commands::Posts(sub_command_args) => {
            sub_commands::posts::posts(&blog, asset_base_url, sub_command_args).await
        }
        Commands::Post(sub_command_args) => {
            sub_commands::post::post(&blog, asset_base_url, sub_command_args).await
        }
        Commands::Delete(sub_command_args) => {
            sub_commands::delete::delete(&blog, sub_command_args).await
        }
        Commands::Tags => sub_commands::tags::tags(tags).await,
        Commands::Login(sub_command_args) => {
            sub_commands::login::login(&auth, sub_command_args).await
        }
        Commands::Register(sub_command_args) => {
            sub_commands::register::register(&auth, sub_command_args).await
        }
        Commands::Logout => sub_commands::logout::logout(&auth),
        Commands::Status => sub_commands::status::status(&session),
        Commands::New(sub_command_args) => {
            sub_commands::new_post::new_post(&blog, &session, asset_base_url, sub_command_args)
                .await
        }
        Commands::Save(sub_command_args) => {
            sub_commands::save::save(&blog, &session, asset_base_url, sub_command_args).await
        }
        Commands::UploadImage(sub_command_args) => {
            sub_commands::upload_image::upload_image(&blog, asset_base_url, sub_command_args)
                .await
        }
        Commands::Download(sub_command_args) => {
            sub_commands::download::download(&blog, asset_base_url, sub_command_args).await
        }
    }
}
