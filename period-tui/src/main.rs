use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use period_tui::api::{ApiClient, DevBackend, DEV_PASSWORD};
use period_tui::app::App;
use period_tui::cli::{Cli, Commands};
use period_tui::config::PeriodConfig;
use period_tui::panel::{derive_panel, PanelItem};
use period_tui::time_utils::local_today;
use period_tui::types::{AuthState, SelectedDate};
use period_tui::{bootstrap, logging, login, runtime, session_store};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = PeriodConfig::load()?;
    if let Err(e) = logging::init(&config.log_path()?) {
        eprintln!("Warning: {:#}", e);
    }

    match cli.command {
        Commands::Run => run_real_mode(&config).await,
        Commands::Dev => run_dev_mode().await,
        Commands::Login => login::run_login(&config).await,
        Commands::Logout => login::run_logout(&config).await,
        Commands::ConfigPath => {
            let path = PeriodConfig::ensure_exists()?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Show { date, dev } => show_date(&config, &date, dev).await,
    }
}

async fn run_real_mode(config: &PeriodConfig) -> Result<()> {
    let cookies = session_store::load_cookies()?;
    let client = ApiClient::new(&config.api_url, cookies)
        .with_context(|| format!("Invalid api_url in config: {}", config.api_url))?
        .with_persistence();

    let app = run_session(client, false).await?;
    if app.account_deleted {
        session_store::clear_session()?;
    }
    print_farewell(&app);
    Ok(())
}

async fn run_dev_mode() -> Result<()> {
    println!("Dev mode: in-memory data, account password is \"{}\".", DEV_PASSWORD);
    let client = ApiClient::dev(DevBackend::new(local_today()))?;
    let app = run_session(client, true).await?;
    print_farewell(&app);
    Ok(())
}

async fn run_session(mut client: ApiClient, dev_mode: bool) -> Result<App> {
    let mut app = App::new(local_today(), AuthState::Anonymous, dev_mode);
    bootstrap::initialize_app_state(&mut app, &mut client).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app, &mut client).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "event loop failed");
        return Err(err);
    }
    Ok(app)
}

fn print_farewell(app: &App) {
    if app.account_deleted {
        if let Some(status) = &app.status {
            println!("{}", status.text);
        }
    }
}

/// Print the panel a day selection would show, without the terminal UI.
async fn show_date(config: &PeriodConfig, raw_date: &str, dev: bool) -> Result<()> {
    let date: SelectedDate = raw_date
        .parse()
        .with_context(|| format!("Invalid date: {}", raw_date))?;

    let mut client = if dev {
        ApiClient::dev(DevBackend::new(local_today()))?
    } else {
        ApiClient::new(&config.api_url, session_store::load_cookies()?)?
    };

    let auth = client.check_session().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "session check failed");
        AuthState::Anonymous
    });
    let info = match client.period_info(date).await {
        Ok(info) => Some(info),
        Err(e) => {
            eprintln!("Warning: period info unavailable ({}), showing basic actions", e);
            None
        }
    };

    let panel = derive_panel(date, auth, info.as_ref());
    println!("{}", panel.title);
    for item in &panel.items {
        match item {
            PanelItem::Action(_) => println!("  - {}", item.text()),
            _ => println!("  {}", item.text()),
        }
    }
    Ok(())
}
