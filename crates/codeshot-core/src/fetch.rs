use log::{debug, info};
use std::time::Duration;

use crate::text::truncate_code;
use crate::{Error, FetchSettings, Result};

const MAX_REDIRECTS: u32 = 5;

/// Downloads source text from `url`, following redirects. Oversized bodies
/// are cut to the fetch caps and tagged with a trailing
/// `# codeshot:truncated lines=<n> chars=<n>` comment.
pub fn fetch_code(url: &str, settings: &FetchSettings) -> Result<String> {
    let agent = ureq::AgentBuilder::new()
        .timeout(Duration::from_millis(settings.timeout_ms))
        .redirects(MAX_REDIRECTS)
        .user_agent(&settings.user_agent)
        .build();

    debug!("fetching code from {url}");
    let response = match agent.get(url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(status, _)) => {
            return Err(Error::Fetch {
                url: url.to_string(),
                reason: format!("status code {status}"),
            });
        }
        Err(err) => {
            return Err(Error::Fetch {
                url: url.to_string(),
                reason: err.to_string(),
            });
        }
    };
    let body = response.into_string().map_err(|err| Error::Fetch {
        url: url.to_string(),
        reason: err.to_string(),
    })?;

    Ok(match truncate_code(&body, settings.max_chars, settings.max_lines) {
        Some(cut) => {
            info!(
                "truncated fetched code from {url}: {} lines, {} chars",
                cut.original_lines, cut.original_chars
            );
            format!(
                "{}\n\n# codeshot:truncated lines={} chars={}",
                cut.text, cut.original_lines, cut.original_chars
            )
        }
        None => body,
    })
}
