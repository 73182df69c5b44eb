use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};

use crate::api::{ApiClient, ApiError};
use crate::config::PeriodConfig;
use crate::session_store;

/// Prompt for credentials, log in against the server and save its cookies.
pub async fn run_login(config: &PeriodConfig) -> Result<()> {
    print!("邮箱: ");
    io::stdout().flush()?;
    let mut email = String::new();
    io::stdin()
        .lock()
        .read_line(&mut email)
        .context("Failed to read email")?;
    let password = rpassword::prompt_password("密码: ").context("Failed to read password")?;

    let mut client = ApiClient::new(&config.api_url, vec![])?;
    match client.login(email.trim(), &password).await {
        Ok(()) => {}
        Err(ApiError::Rejected(message)) => bail!("登录失败: {}", message),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to log in at {}", config.api_url))
        }
    }

    session_store::save_cookies(client.cookies())?;
    tracing::info!(api_url = %config.api_url, "logged in");
    println!("Login successful. Session saved.");
    Ok(())
}

/// End the server session if there is one and remove the local cookies.
pub async fn run_logout(config: &PeriodConfig) -> Result<()> {
    let cookies = session_store::load_cookies()?;
    if !cookies.is_empty() {
        let mut client = ApiClient::new(&config.api_url, cookies)?;
        if let Err(e) = client.logout().await {
            tracing::warn!(error = %e, "server logout failed");
            eprintln!("Warning: could not reach server to log out: {}", e);
        }
    }

    session_store::clear_session()?;
    println!("Logged out. Local session removed.");
    Ok(())
}
