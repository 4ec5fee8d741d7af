use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const RETRY_DELAY_MS: u64 = 500;

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// GETs a text body, retrying transport and status failures up to `attempts` times.
pub fn fetch_text(url: &str, attempts: usize, timeout: Duration) -> Result<String> {
    let client = http_client()?;
    let attempts = attempts.max(1);
    let mut last_err = None;
    for attempt in 0..attempts {
        let resp = client
            .get(url)
            .header(USER_AGENT, "league-analyzer/0.1")
            .header(ACCEPT, "text/csv,text/plain,*/*")
            .timeout(timeout)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text());
        match resp {
            Ok(body) => return Ok(body),
            Err(err) => {
                tracing::warn!(url, attempt = attempt + 1, attempts, error = %err, "fetch failed");
                last_err = Some(anyhow!("request failed: {err}"));
                if attempt + 1 < attempts {
                    std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS * (attempt as u64 + 1)));
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow!("fetch failed: {url}")))
}
