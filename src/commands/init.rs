use std::io::{self, Write};

use crate::config::{parse_api_url, Config, DEFAULT_API_URL, DEFAULT_VIEWPORT_ROWS};
use crate::error::{FeedError, Result};

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        let answer = prompt(&format!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        ))?;

        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("User Feed Configuration");
    println!("=======================\n");

    let api_url = prompt(&format!("API base URL [{DEFAULT_API_URL}]: "))?;
    let api_url = if api_url.is_empty() {
        None
    } else {
        parse_api_url(&api_url)?;
        Some(api_url)
    };

    let rows = prompt(&format!("Visible cards in browse [{DEFAULT_VIEWPORT_ROWS}]: "))?;
    let viewport_rows = if rows.is_empty() {
        None
    } else {
        let rows = rows
            .parse::<u16>()
            .ok()
            .filter(|r| (1..=50).contains(r))
            .ok_or_else(|| FeedError::InvalidInput(format!("{rows} is not between 1 and 50")))?;
        Some(rows)
    };

    let config = Config {
        api_url,
        viewport_rows,
    };
    let contents = toml::to_string(&config)
        .map_err(|e| FeedError::InvalidInput(format!("could not encode config: {e}")))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| FeedError::ConfigWrite {
            path: config_path.clone(),
            source: e,
        })?;
    }

    std::fs::write(&config_path, contents).map_err(|e| FeedError::ConfigWrite {
        path: config_path.clone(),
        source: e,
    })?;

    println!("\nConfig saved to {}", config_path.display());
    println!("You can now run 'userfeed browse'!");

    Ok(())
}
