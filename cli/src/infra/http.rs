//! HTTP implementation of the `ReleaseClient` port.
//!
//! Blocking `ureq` agent. Downloads stream through `<dest>.partial` in 64 KiB
//! chunks and resume with a `Range` request when a partial file is present.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::ReleaseClient;

const USER_AGENT: &str = concat!("qnode/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const CHUNK_SIZE: usize = 64 * 1024;

/// Production release client.
pub struct UreqReleaseClient {
    agent: ureq::Agent,
}

impl UreqReleaseClient {
    #[must_use]
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        Self { agent }
    }

    fn get(&self, url: &str, range_from: u64) -> Result<ureq::Response, ureq::Error> {
        let req = self.agent.get(url);
        let req = if range_from > 0 {
            req.set("Range", &format!("bytes={range_from}-"))
        } else {
            req
        };
        req.call()
    }

    fn do_download(
        &self,
        url: &str,
        dest: &Path,
        partial: &Path,
        existing: u64,
        show_progress: bool,
        allow_retry: bool,
    ) -> Result<u64> {
        let response = match self.get(url, existing) {
            Ok(r) => r,
            Err(ureq::Error::Status(416, _)) if allow_retry => {
                std::fs::remove_file(partial).ok();
                return self.do_download(url, dest, partial, 0, show_progress, false);
            }
            Err(ureq::Error::Status(code, _)) => anyhow::bail!("download failed: HTTP {code} for {url}"),
            Err(e) => return Err(anyhow::Error::new(e).context(format!("download interrupted: {url}"))),
        };

        let status = response.status();
        let (mut file, start_pos) = open_partial_file(status, partial, existing)?;
        let total = response
            .header("Content-Length")
            .and_then(|v| v.parse::<u64>().ok())
            .map(|len| if status == 206 { start_pos + len } else { len });
        tracing::debug!(url, status, ?total, resume_from = start_pos, "download started");

        let pb = make_progress_bar(show_progress, total, start_pos, file_label(dest));
        let mut reader = response.into_reader();
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut written = start_pos;
        loop {
            let n = reader.read(&mut buf).context("download interrupted")?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])
                .with_context(|| format!("writing {}", partial.display()))?;
            written += n as u64;
            pb.inc(n as u64);
        }
        pb.finish_and_clear();
        file.sync_all().context("flushing download")?;
        drop(file);

        if let Some(t) = total
            && written != t
        {
            anyhow::bail!("download truncated: got {written} of {t} bytes from {url}");
        }
        std::fs::rename(partial, dest)
            .with_context(|| format!("finalizing {}", dest.display()))?;
        Ok(written)
    }
}

impl Default for UreqReleaseClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseClient for UreqReleaseClient {
    fn fetch_text(&self, url: &str) -> Result<String> {
        tracing::debug!(url, "fetching");
        match self.get(url, 0) {
            Ok(resp) => resp
                .into_string()
                .with_context(|| format!("reading response from {url}")),
            Err(ureq::Error::Status(code, _)) => anyhow::bail!("HTTP {code} fetching {url}"),
            Err(e) => Err(anyhow::Error::new(e).context(format!("cannot reach {url}"))),
        }
    }

    fn download(&self, url: &str, dest: &Path, show_progress: bool) -> Result<u64> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let partial = partial_path(dest);
        let existing = partial.metadata().map(|m| m.len()).unwrap_or(0);
        self.do_download(url, dest, &partial, existing, show_progress, true)
    }
}

/// `<dest>.partial`, keeping the original extension.
#[must_use]
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut s = dest.as_os_str().to_owned();
    s.push(".partial");
    PathBuf::from(s)
}

fn file_label(dest: &Path) -> String {
    dest.file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned())
}

fn open_partial_file(status: u16, partial: &Path, existing: u64) -> Result<(File, u64)> {
    match status {
        206 => {
            let file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(partial)
                .context("opening partial file")?;
            Ok((file, existing))
        }
        200 => {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(partial)
                .context("opening partial file")?;
            Ok((file, 0))
        }
        other => anyhow::bail!("download failed: HTTP {other}"),
    }
}

fn make_progress_bar(
    show: bool,
    total: Option<u64>,
    start_pos: u64,
    label: String,
) -> indicatif::ProgressBar {
    if !show {
        return indicatif::ProgressBar::hidden();
    }
    let pb = total.map_or_else(indicatif::ProgressBar::new_spinner, indicatif::ProgressBar::new);
    let template = if total.is_some() {
        "  {msg}\n    {bar:40.cyan/dim} {percent}%  {bytes}/{total_bytes}  {bytes_per_sec}"
    } else {
        "  {spinner:.cyan} {msg}  {bytes}"
    };
    pb.set_style(
        indicatif::ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
            .progress_chars("━━─"),
    );
    pb.set_message(label);
    pb.set_position(start_pos);
    pb
}
