use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::{io::Write, os::unix::fs::OpenOptionsExt};

use crate::config::PeriodConfig;

fn secure_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?
            .write_all(content.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, content)?;
    }

    Ok(())
}

pub fn cookies_path() -> Result<PathBuf> {
    Ok(PeriodConfig::root_dir()?.join("cookies"))
}

/// One `name=value` pair per line.
pub fn parse_cookies(raw: &str) -> Vec<(String, String)> {
    raw.lines()
        .filter_map(|line| {
            let mut parts = line.splitn(2, '=');
            let name = parts.next()?.trim().to_string();
            let value = parts.next()?.trim().to_string();
            if name.is_empty() {
                None
            } else {
                Some((name, value))
            }
        })
        .collect()
}

pub fn format_cookies(cookies: &[(String, String)]) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Load saved server cookies. Returns an empty list when not logged in.
pub fn load_cookies() -> Result<Vec<(String, String)>> {
    let path = cookies_path()?;
    if !path.exists() {
        return Ok(vec![]);
    }

    let raw = std::fs::read_to_string(&path).context("Failed to read cookies file")?;
    Ok(parse_cookies(&raw))
}

pub fn save_cookies(cookies: &[(String, String)]) -> Result<()> {
    let path = cookies_path()?;
    secure_write(path.as_path(), &format_cookies(cookies))
}

pub fn clear_session() -> Result<()> {
    let path = cookies_path()?;
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_file_round_trips_and_skips_junk() {
        let raw = "csrftoken=abc\nsessionid = s3ss10n \n\n=orphan\nbroken";
        let cookies = parse_cookies(raw);
        assert_eq!(
            cookies,
            vec![
                ("csrftoken".to_string(), "abc".to_string()),
                ("sessionid".to_string(), "s3ss10n".to_string()),
            ]
        );
        assert_eq!(format_cookies(&cookies), "csrftoken=abc\nsessionid=s3ss10n");
    }

    #[cfg(unix)]
    #[test]
    fn secure_write_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = std::env::temp_dir().join(format!("period-tui-store-{}", std::process::id()));
        let path = dir.join("cookies");
        secure_write(&path, "sessionid=x").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "sessionid=x");
        std::fs::remove_dir_all(dir).unwrap();
    }
}
