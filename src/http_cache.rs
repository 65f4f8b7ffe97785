use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ETAG, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use serde::{Deserialize, Serialize};

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "teams_terminal";
const CACHE_FILE: &str = "http_cache.json";
const LOGO_DIR: &str = "logos";

static CACHE: Mutex<Option<HttpCacheFile>> = Mutex::new(None);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct HttpCacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: u64,
}

/// GETs `url` as text. Entries younger than `max_age` are served without touching the
/// network; older ones are revalidated with their validators.
pub fn fetch_json_cached(
    client: &Client,
    url: &str,
    extra_headers: &[(&str, &str)],
    max_age: Duration,
) -> Result<String> {
    let cached_entry = {
        let mut guard = CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let cache = guard.get_or_insert_with(load_cache_file);
        cache.entries.get(url).cloned()
    };

    let now = now_secs();
    if let Some(entry) = cached_entry.as_ref()
        && is_fresh(entry.fetched_at, now, max_age)
    {
        tracing::debug!(url, "http cache hit");
        return Ok(entry.body.clone());
    }

    let mut req = client.get(url);
    for (name, value) in extra_headers {
        req = req.header(*name, *value);
    }
    if let Some(entry) = cached_entry.as_ref() {
        if let Some(etag) = entry.etag.as_ref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = entry.last_modified.as_ref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    tracing::debug!(url, "http request");
    let resp = req.send().context("request failed")?;
    let status = resp.status();
    let headers = resp.headers().clone();
    if status == StatusCode::NOT_MODIFIED {
        if let Some(mut entry) = cached_entry {
            entry.fetched_at = now;
            let body = entry.body.clone();
            store_entry(url, entry);
            return Ok(body);
        }
        return Err(anyhow::anyhow!("received 304 without cache body"));
    }

    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {}: {}", status, body));
    }

    let header_string = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    };
    let entry = CacheEntry {
        body: body.clone(),
        etag: header_string(ETAG),
        last_modified: header_string(LAST_MODIFIED),
        fetched_at: now,
    };
    store_entry(url, entry);
    Ok(body)
}

/// Forgets the stored body for `url` so the next fetch goes to the network.
pub fn invalidate(url: &str) {
    let mut guard = CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let cache = guard.get_or_insert_with(load_cache_file);
    if cache.entries.remove(url).is_some() {
        let _ = save_cache_file(cache);
    }
}

/// GETs binary content (team logos). Logos never change for a given url, so a stored
/// file is always reused.
pub fn fetch_bytes_cached(client: &Client, url: &str) -> Result<Vec<u8>> {
    let path = cache_dir().map(|dir| dir.join(LOGO_DIR).join(cache_file_name(url)));
    if let Some(path) = path.as_ref()
        && let Ok(bytes) = fs::read(path)
        && !bytes.is_empty()
    {
        return Ok(bytes);
    }

    let resp = client.get(url).send().context("logo request failed")?;
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {} for {}", status, url));
    }
    let bytes = resp.bytes().context("failed reading logo body")?.to_vec();

    if let Some(path) = path
        && let Some(dir) = path.parent()
    {
        fs::create_dir_all(dir).ok();
        if let Err(err) = fs::write(&path, &bytes) {
            tracing::debug!(error = %err, "could not store logo");
        }
    }
    Ok(bytes)
}

fn store_entry(key: &str, entry: CacheEntry) {
    let mut guard = CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let cache = guard.get_or_insert_with(load_cache_file);
    cache.version = CACHE_VERSION;
    cache.entries.insert(key.to_string(), entry);
    if let Err(err) = save_cache_file(cache) {
        tracing::debug!(error = %err, "could not persist http cache");
    }
}

fn load_cache_file() -> HttpCacheFile {
    let Some(path) = cache_dir().map(|dir| dir.join(CACHE_FILE)) else {
        return HttpCacheFile::default();
    };
    let Ok(raw) = fs::read_to_string(path) else {
        return HttpCacheFile::default();
    };
    let cache = serde_json::from_str::<HttpCacheFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return HttpCacheFile::default();
    }
    cache
}

fn save_cache_file(cache: &HttpCacheFile) -> Result<()> {
    let Some(dir) = cache_dir() else {
        return Ok(());
    };
    fs::create_dir_all(&dir).ok();
    let path = dir.join(CACHE_FILE);
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize http cache")?;
    fs::write(&tmp, json).context("write http cache")?;
    fs::rename(&tmp, &path).context("swap http cache")?;
    Ok(())
}

/// `$XDG_CACHE_HOME/teams_terminal`, falling back to `~/.cache/teams_terminal`.
pub fn cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn is_fresh(fetched_at: u64, now: u64, max_age: Duration) -> bool {
    fetched_at <= now && now - fetched_at < max_age.as_secs()
}

fn cache_file_name(url: &str) -> String {
    let stripped = url
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    stripped
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
