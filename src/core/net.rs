// src/core/net.rs

// Blocking GET with a session cookie and a small, polite retry loop.

use std::{thread, time::Duration};

use reqwest::blocking::Client;
use reqwest::header::{COOKIE, USER_AGENT};

use crate::config::consts::REQUEST_PAUSE_MS;
use crate::config::options::NetOptions;
use crate::error::HarvestError;

pub fn build_client(opts: &NetOptions) -> Result<Client, HarvestError> {
    let client = Client::builder()
        .timeout(opts.timeout)
        .build()?;
    Ok(client)
}

pub fn http_get(client: &Client, opts: &NetOptions, url: &str) -> Result<String, HarvestError> {
    let mut attempt = 0u32;
    loop {
        match get_once(client, opts, url) {
            Ok(body) => return Ok(body),
            // 4xx won't get better by asking again
            Err(HarvestError::Status { status, .. }) if (400..500).contains(&status) => {
                return Err(HarvestError::Status { status, url: s!(url) });
            }
            Err(e) if attempt < opts.retries => {
                attempt += 1;
                logd!("GET {url} failed ({e}); retry {attempt}/{}", opts.retries);
                thread::sleep(Duration::from_millis(REQUEST_PAUSE_MS * attempt as u64));
            }
            Err(e) => return Err(e),
        }
    }
}

fn get_once(client: &Client, opts: &NetOptions, url: &str) -> Result<String, HarvestError> {
    let mut req = client.get(url).header(USER_AGENT, &opts.user_agent);
    if let Some(cookie) = &opts.cookie {
        req = req.header(COOKIE, cookie);
    }
    let resp = req.send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(HarvestError::Status { status: status.as_u16(), url: s!(url) });
    }
    Ok(resp.text()?)
}
