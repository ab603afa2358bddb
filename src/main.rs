// Main entry point
use clap::Parser;
use colored::Colorize;
use std::net::SocketAddr;
use std::sync::Arc;
use task_lingo::application::tasks::TaskService;
use task_lingo::domain::model::{Session, TaskScope};
use task_lingo::domain::traits::{AuthProvider, TaskStore};
use task_lingo::infrastructure::config::{self, load_config, Config};
use task_lingo::infrastructure::network::http::create_client;
use task_lingo::infrastructure::network::relay::RelayTranslator;
use task_lingo::infrastructure::storage::memory::MemoryTaskStore;
use task_lingo::infrastructure::storage::session::{clear_session, load_session, save_session};
use task_lingo::infrastructure::storage::supabase::{SupabaseAuth, SupabaseTaskStore};
use task_lingo::interfaces::cli::{Cli, Command};
use task_lingo::interfaces::commands::{run_action, Action, Output};
use task_lingo::interfaces::http;
use task_lingo::interfaces::shell::Shell;
use task_lingo::presentation::theme::Theme;
use task_lingo::state::AppState;
use tokio::sync::watch;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config()?;

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    if cli.generate_config {
        config::generate_config_sample()?;
        return Ok(());
    }
    if cli.status {
        print_status(&config).await;
        return Ok(());
    }

    if let Err(msg) = cli.check_memory_flag() {
        eprintln!("{}", msg.red());
        std::process::exit(2);
    }

    let Some(command) = cli.command else {
        eprintln!("{}", "Please provide a command (try --help)".red());
        std::process::exit(1);
    };

    let theme_name = cli.theme.as_deref().unwrap_or(config.theme.as_str());
    let output = Output {
        json: cli.json,
        theme: Theme::from_name(theme_name),
        enable_emoji: config.enable_emoji,
    };

    let action = match command {
        Command::Serve { listen } => return serve(config, listen).await,
        Command::Languages => Action::Languages,
        Command::List => Action::List,
        Command::Add { text } => Action::Add(text.join(" ")),
        Command::Done { id } => Action::Toggle(id),
        Command::Edit { id, text } => Action::Edit(id, text.join(" ")),
        Command::Delete { id } => Action::Delete(id),
        Command::Translate { id, lang } => Action::Translate { id, lang },
        Command::Login {
            email,
            password,
            signup,
        } => {
            let client = ClientContext::build(&config, cli.memory).await?;
            let auth = client.require_auth()?;
            let session = if signup {
                auth.sign_up(&email, &password).await?
            } else {
                auth.sign_in(&email, &password).await?
            };
            save_session(&config::get_session_path(), &session).await?;
            println!("{} {}", "Signed in as".green(), describe(&session));
            return Ok(());
        }
        Command::Logout => {
            let client = ClientContext::build(&config, cli.memory).await?;
            let auth = client.require_auth()?;
            let result = auth.sign_out().await;
            clear_session(&config::get_session_path()).await?;
            result?;
            println!("{}", "Signed out".green());
            return Ok(());
        }
        Command::Whoami => {
            let client = ClientContext::build(&config, cli.memory).await?;
            match client.auth.as_ref().and_then(|a| a.session()) {
                Some(session) => println!("{}", describe(&session)),
                None => println!("Not signed in"),
            }
            return Ok(());
        }
        Command::Shell { lang } => {
            let client = ClientContext::build(&config, cli.memory).await?;
            let shell = Shell {
                service: client.service,
                auth: client.auth,
                session_path: config::get_session_path(),
                output,
                lang: lang.unwrap_or_else(|| config.default_lang.clone()),
            };
            shell.run().await?;
            return Ok(());
        }
    };

    let client = ClientContext::build(&config, cli.memory).await?;
    match run_action(&client.service, action, &config.default_lang, &output).await {
        Ok(printed) => {
            if !printed.is_empty() {
                println!("{}", printed.trim_end());
            }
            Ok(())
        }
        Err(e) => {
            output.notify_error(&e);
            std::process::exit(1);
        }
    }
}

/// Run the translation relay until Ctrl-C
async fn serve(config: Config, listen: Option<SocketAddr>) -> anyhow::Result<()> {
    let addr = match listen {
        Some(addr) => addr,
        None => config.server.listen.parse()?,
    };
    let state = AppState::new(&config)?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    http::serve(state, addr, shutdown).await
}

/// Handles for the client side, constructed explicitly per run
struct ClientContext {
    service: TaskService,
    auth: Option<Arc<dyn AuthProvider>>,
}

impl ClientContext {
    async fn build(config: &Config, memory: bool) -> anyhow::Result<Self> {
        let http_client = create_client()?;
        let translator = Arc::new(RelayTranslator::new(
            http_client.clone(),
            config.relay_url.clone(),
        ));

        if memory {
            if config.scope == TaskScope::PerUser {
                info!("In-memory store has no users; tasks are shared");
            }
            let (_, sessions) = watch::channel::<Option<Session>>(None);
            let store: Arc<dyn TaskStore> = Arc::new(MemoryTaskStore::new());
            let service = TaskService::new(store, translator, TaskScope::Shared, sessions);
            return Ok(Self {
                service,
                auth: None,
            });
        }

        let (url, anon_key) = config.supabase_credentials()?;
        let session_path = config::get_session_path();
        let saved = load_session(&session_path).await?;
        let auth = SupabaseAuth::new(http_client.clone(), url, anon_key)
            .with_session(saved)
            .persist_to(session_path);
        if let Err(e) = auth.refresh_if_expired().await {
            warn!("Could not refresh the saved session: {}", e);
        }

        let auth: Arc<dyn AuthProvider> = Arc::new(auth);
        let store = SupabaseTaskStore::new(
            http_client,
            url,
            anon_key,
            &config.supabase.table,
            auth.clone(),
        );
        let service = TaskService::new(Arc::new(store), translator, config.scope, auth.subscribe());

        Ok(Self {
            service,
            auth: Some(auth),
        })
    }

    fn require_auth(&self) -> anyhow::Result<Arc<dyn AuthProvider>> {
        self.auth
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Sign-in is unavailable with the in-memory store"))
    }
}

fn describe(session: &Session) -> String {
    match &session.user.email {
        Some(email) => format!("{} ({})", email, session.user.id),
        None => session.user.id.clone(),
    }
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &config::Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_level()));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            // Log to file
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn print_status(config: &Config) {
    println!("{}", "Task Lingo Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!(
        "Config: {}",
        config::get_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found".to_string())
    );

    match config.supabase_credentials() {
        Ok((url, _)) => println!("Supabase: {} (table {})", url, config.supabase.table),
        Err(_) => println!("Supabase: Not configured"),
    }

    let session = load_session(&config::get_session_path())
        .await
        .ok()
        .flatten();
    match session {
        Some(session) => println!("Session: {}", describe(&session)),
        None => println!("Session: Not signed in"),
    }

    if config.groq_api_key().is_ok() {
        println!("Groq API: Configured ({})", config.groq.model);
    } else {
        println!("Groq API: Not configured");
    }

    println!("Relay: {}", config.relay_url);
    println!("Task scope: {:?}", config.scope);
    println!("Default language: {}", config.default_lang);
}
