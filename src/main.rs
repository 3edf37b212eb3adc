//! `maxstudio` -- terminal front end for the MaxStudio video catalog.
//!
//! # Environment variables
//!
//! | Variable                | Default                          | Description                  |
//! |-------------------------|----------------------------------|------------------------------|
//! | `MAXSTUDIO_GRAPHQL_URL` | `http://localhost:8000/graphql/` | GraphQL endpoint             |
//! | `RUST_LOG`              | `maxstudio=warn`                 | Log filter (tracing syntax)  |

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use maxstudio::config::Config;
use maxstudio::graphql::{ApiClient, HttpTransport};
use maxstudio::playback::{ExternalPlayer, HlsEngine};
use maxstudio::render;
use maxstudio::storage::{FileStore, KeyValueStore, NoopStore};
use maxstudio::views::account::RegisterForm;
use maxstudio::views::ingest::SERVER_PATH_HINT;
use maxstudio::views::{
    AccountView, CatalogView, DetailView, HistoryNavigator, IngestView, LoginView, Route,
    SavedView, ViewState,
};

#[derive(Parser, Debug)]
#[command(name = "maxstudio", version, about = "Browse, search and play the MaxStudio video catalog")]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// GraphQL endpoint, overrides config and environment
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Do not read or persist the credential
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the catalog
    Browse {
        /// Server-side genre filter
        #[arg(long)]
        genre: Option<String>,
        /// Case-insensitive text filter over title and description
        #[arg(long, short)]
        query: Option<String>,
    },
    /// List genres present in the catalog
    Genres,
    /// Show one video
    Show { id: String },
    /// Play one video in the configured player
    Play {
        id: String,
        /// Hand the master playlist straight to the player
        #[arg(long)]
        native: bool,
    },
    /// Sign in and store the token
    Login {
        #[arg(long, short)]
        username: Option<String>,
        #[arg(long, env = "MAXSTUDIO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Ask the backend to ingest a file already on its filesystem
    #[command(after_help = SERVER_PATH_HINT)]
    Ingest {
        #[arg(long)]
        title: Option<String>,
        /// Path on the backend host, e.g. /tmp/movie.mp4 (see below)
        #[arg(long)]
        file: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        genre: Option<String>,
    },
    /// List saved videos
    Saved,
    /// Check that the backend answers
    Health,
    /// Show the signed-in account
    Whoami,
    /// Create an account
    Register {
        #[arg(long, short)]
        username: Option<String>,
        #[arg(long, env = "MAXSTUDIO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
}

struct App {
    config: Config,
    http: reqwest::Client,
    store: Arc<dyn KeyValueStore>,
    client: ApiClient,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint.clone() {
        config.graphql_url = endpoint;
    }

    let store: Arc<dyn KeyValueStore> = if cli.ephemeral {
        Arc::new(NoopStore)
    } else {
        match config.storage_dir() {
            Some(dir) => {
                let dir = dir.to_str().context("Storage path is not valid UTF-8")?;
                Arc::new(FileStore::new(dir)?)
            }
            None => {
                tracing::warn!("No home directory found, credentials will not persist");
                Arc::new(NoopStore)
            }
        }
    };

    let http = reqwest::Client::new();
    let transport = HttpTransport::with_client(http.clone(), config.graphql_url.clone(), store.clone());
    tracing::debug!(endpoint = %transport.endpoint(), "GraphQL transport ready");
    let client = ApiClient::new(Arc::new(transport));

    let app = App {
        config,
        http,
        store,
        client,
    };
    app.run(cli.command).await
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "maxstudio=debug" } else { "maxstudio=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

impl App {
    async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Browse { genre, query } => self.browse(genre, query).await,
            Command::Genres => self.genres().await,
            Command::Show { id } => self.show(&id).await,
            Command::Play { id, native } => self.play(&id, native).await,
            Command::Login { username, password } => self.login(username, password).await,
            Command::Ingest {
                title,
                file,
                description,
                genre,
            } => self.ingest(title, file, description, genre).await,
            Command::Saved => self.saved().await,
            Command::Health => self.health().await,
            Command::Whoami => self.whoami().await,
            Command::Register {
                username,
                password,
                email,
            } => self.register(username, password, email).await,
        }
    }

    async fn browse(&self, genre: Option<String>, query: Option<String>) -> Result<()> {
        let mut view = CatalogView::new(self.client.clone());
        view.set_genre(genre);
        view.set_query(query.unwrap_or_default());
        eprintln!("{}", render::LOADING);
        view.load().await;
        println!("{}", render::catalog(view.state(), &view.cards(), &view.genres()));
        finish(view.state())
    }

    async fn genres(&self) -> Result<()> {
        let mut view = CatalogView::new(self.client.clone());
        view.load().await;
        for genre in view.genres() {
            println!("{genre}");
        }
        finish(view.state())
    }

    async fn show(&self, id: &str) -> Result<()> {
        let mut view = DetailView::new(self.client.clone(), id);
        view.load().await;
        println!("{}", render::detail(view.state()));
        finish(view.state())
    }

    async fn play(&self, id: &str, native: bool) -> Result<()> {
        let mut view = DetailView::new(self.client.clone(), id)
            .with_media_base(self.config.graphql_url.as_str());
        view.load().await;
        println!("{}", render::detail(view.state()));
        finish(view.state())?;

        let streaming = &self.config.streaming;
        let engine = HlsEngine::new(
            self.http.clone(),
            streaming.enabled && !native,
            streaming.max_bandwidth,
        );
        let cancel = view.cancel_handle();
        let interrupt = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Interrupted");
                    cancel.cancel();
                }
            }
        });

        let player = ExternalPlayer::new(&self.config.player);
        view.attach(&engine, Box::new(player)).await;
        println!("{}", render::playback(view.playback()));

        if !cancel.is_cancelled() && view.element_mut().and_then(|e| e.source()).is_some() {
            eprintln!("Press Ctrl-C to stop");
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = view.wait_for_element() => {}
            }
        }
        interrupt.abort();
        view.unmount();
        Ok(())
    }

    async fn login(&self, username: Option<String>, password: Option<String>) -> Result<()> {
        let navigator = Arc::new(HistoryNavigator::default());
        let view = LoginView::new(self.client.clone(), self.store.clone(), navigator.clone());

        let username = match username {
            Some(u) => u,
            None => Input::<String>::new().with_prompt("Username").interact_text()?,
        };
        let password = match password {
            Some(p) => p,
            None => Password::new().with_prompt("Password").interact()?,
        };
        view.edit(|form| form.with_username(username).with_password(password));

        eprintln!("Signing in…");
        match view.submit().await {
            Ok(_) if navigator.current() == Some(Route::Catalog) => {
                println!("Signed in");
                self.browse(None, None).await
            }
            Ok(_) => {
                println!("No token received");
                Ok(())
            }
            Err(e) => bail!(render::error_line(&e.to_string())),
        }
    }

    async fn ingest(
        &self,
        title: Option<String>,
        file: Option<String>,
        description: Option<String>,
        genre: Option<String>,
    ) -> Result<()> {
        let view = IngestView::new(self.client.clone());
        let interactive = title.is_none() || file.is_none();

        let title = match title {
            Some(t) => t,
            None => Input::<String>::new().with_prompt("Title").interact_text()?,
        };
        let file = match file {
            Some(f) => f,
            None => {
                eprintln!("{SERVER_PATH_HINT}");
                Input::<String>::new()
                    .with_prompt("Server file path (inside backend container)")
                    .interact_text()?
            }
        };
        let description = match description {
            Some(d) => d,
            None if interactive => Input::<String>::new()
                .with_prompt("Description")
                .allow_empty(true)
                .interact_text()?,
            None => String::new(),
        };
        let genre = match genre {
            Some(g) => g,
            None if interactive => Input::<String>::new()
                .with_prompt("Genre")
                .allow_empty(true)
                .interact_text()?,
            None => String::new(),
        };

        view.edit(|form| {
            form.with_title(title)
                .with_server_path(file)
                .with_description(description)
                .with_genre_name(genre)
        });

        eprintln!("Submitting…");
        match view.submit().await {
            Ok(_) => {
                if let Some(notice) = view.notice() {
                    println!("{notice}");
                }
                Ok(())
            }
            Err(e) => bail!(render::error_line(&e.to_string())),
        }
    }

    async fn saved(&self) -> Result<()> {
        let mut view = SavedView::new(self.client.clone());
        view.load().await;
        println!("{}", render::saved(view.state(), &view.links()));
        finish(view.state())
    }

    async fn health(&self) -> Result<()> {
        let state = AccountView::new(self.client.clone()).health().await;
        match &state {
            ViewState::Ready(status) => println!("{} {status}", self.config.graphql_url),
            ViewState::Failed(message) => println!("{}", render::error_line(message)),
            _ => println!("{} no status", self.config.graphql_url),
        }
        finish(&state)
    }

    async fn whoami(&self) -> Result<()> {
        let state = AccountView::new(self.client.clone()).whoami().await;
        match &state {
            ViewState::Ready(account) => println!("{}", render::account(account)),
            ViewState::Failed(message) => println!("{}", render::error_line(message)),
            _ => println!("Not signed in"),
        }
        finish(&state)
    }

    async fn register(
        &self,
        username: Option<String>,
        password: Option<String>,
        email: Option<String>,
    ) -> Result<()> {
        let form = RegisterForm {
            username: match username {
                Some(u) => u,
                None => Input::<String>::new().with_prompt("Username").interact_text()?,
            },
            password: match password {
                Some(p) => p,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Repeat password", "Passwords do not match")
                    .interact()?,
            },
            email: email.unwrap_or_default(),
        };

        match AccountView::new(self.client.clone()).register(&form).await {
            Ok(Some(account)) => println!("Registered {}", render::account(&account)),
            Ok(None) => println!("Registered {}", form.username),
            Err(e) => bail!(render::error_line(&e.to_string())),
        }
        Ok(())
    }
}

/// Map a failed view state to a non-zero exit.
fn finish<T>(state: &ViewState<T>) -> Result<()> {
    match state {
        ViewState::Failed(_) => bail!("Request failed"),
        _ => Ok(()),
    }
}
