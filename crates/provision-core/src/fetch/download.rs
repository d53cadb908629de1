//! Single-stream HTTP GET into a local file.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use crate::config::HttpConfig;

/// Downloads `url` with one blocking GET, writing the body to `dest`.
/// Follows redirects; any non-2xx final status is an error.
/// Returns the number of bytes written.
pub fn download_to_file(url: &str, dest: &Path, http: &HttpConfig) -> Result<u64> {
    let file = File::create(dest).with_context(|| format!("create {}", dest.display()))?;
    let mut writer = BufWriter::new(file);
    let mut written: u64 = 0;
    let mut write_error: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(http.connect_timeout_secs))?;
    easy.low_speed_limit(http.low_speed_limit_bytes)?;
    easy.low_speed_time(Duration::from_secs(http.low_speed_time_secs))?;
    if let Some(agent) = &http.user_agent {
        easy.useragent(agent)?;
    }

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match writer.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = write_error {
        return Err(e).with_context(|| format!("write {}", dest.display()));
    }
    performed.context("GET request failed")?;

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        anyhow::bail!("GET {} returned HTTP {}", url, code);
    }

    writer
        .flush()
        .with_context(|| format!("flush {}", dest.display()))?;
    tracing::debug!(url, bytes = written, path = %dest.display(), "download finished");
    Ok(written)
}
