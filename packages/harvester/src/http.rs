//! HTTP client wrapper for downloading IATI documents.

use std::io::{self, Read};
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::{HTTP_CONNECT_TIMEOUT_SECS, HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::error::{HarvesterError, Result};

/// Maximum number of attempts for transient failures.
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Result of a single request attempt.
enum Attempt {
    Done(Vec<u8>),
    /// Worth retrying; carries the reason for the final error message.
    Transient(String),
}

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` with request and connect timeouts and the
/// crate user agent.
pub fn create_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Download content from a URL with retry logic.
///
/// Connection failures, timeouts (including while reading the body) and
/// 5xx responses are retried with exponential backoff. The body is never
/// buffered past `max_size` bytes, whether or not the server sends a
/// `Content-Length`.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `url` - URL to download from
/// * `max_size` - Largest accepted body in bytes
///
/// # Returns
/// Raw bytes of the response body
pub fn download_bytes(client: &Client, url: &str, max_size: u64) -> Result<Vec<u8>> {
    let mut reason = String::from("no attempt made");

    for attempt in 1..=MAX_RETRIES {
        if attempt > 1 {
            let delay = backoff_delay(attempt);
            tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying after delay");
            thread::sleep(delay);
        }

        match try_download(client, url, max_size)? {
            Attempt::Done(bytes) => {
                tracing::debug!(url, size = bytes.len(), "Downloaded");
                return Ok(bytes);
            }
            Attempt::Transient(message) => {
                tracing::warn!(%url, attempt, max_retries = MAX_RETRIES, %message, "Transient failure");
                reason = message;
            }
        }
    }

    Err(HarvesterError::RetriesExhausted {
        attempts: MAX_RETRIES,
        message: reason,
    })
}

/// 500ms before the second attempt, doubling after that.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(RETRY_BASE_DELAY_MS << attempt.saturating_sub(2))
}

fn try_download(client: &Client, url: &str, max_size: u64) -> Result<Attempt> {
    let response = match client.get(url).send() {
        Ok(response) => response,
        Err(e) if e.is_connect() || e.is_timeout() => return Ok(Attempt::Transient(e.to_string())),
        Err(e) => return Err(e.into()),
    };

    let status = response.status();
    if status.is_server_error() {
        return Ok(Attempt::Transient(format!("Server error: {status}")));
    }
    // 4xx won't succeed on retry
    let response = response.error_for_status()?;

    if let Some(size) = response.content_length() {
        check_size(url, size, max_size)?;
    }
    match read_limited(response, url, max_size) {
        Ok(bytes) => Ok(Attempt::Done(bytes)),
        Err(HarvesterError::Io(e)) if is_timeout(&e) => Ok(Attempt::Transient(e.to_string())),
        Err(e) => Err(e),
    }
}

/// Read at most `max_size` bytes from `body`, failing as soon as one more
/// byte arrives.
fn read_limited(body: impl Read, url: &str, max_size: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    body.take(max_size.saturating_add(1)).read_to_end(&mut bytes)?;
    check_size(url, bytes.len() as u64, max_size)?;
    Ok(bytes)
}

fn is_timeout(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::TimedOut
        || err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
            .is_some_and(reqwest::Error::is_timeout)
}

fn check_size(url: &str, size: u64, limit: u64) -> Result<()> {
    if size > limit {
        return Err(HarvesterError::ResponseTooLarge {
            url: url.to_string(),
            size,
            limit,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_create_client() {
        let client = create_client();
        assert!(client.is_ok());
    }

    #[test]
    fn test_check_size() {
        assert!(check_size("u", 10, 10).is_ok());
        assert!(matches!(
            check_size("u", 11, 10),
            Err(HarvesterError::ResponseTooLarge { size: 11, limit: 10, .. })
        ));
    }

    #[test]
    fn test_backoff_delay() {
        assert_eq!(backoff_delay(2), Duration::from_millis(500));
        assert_eq!(backoff_delay(3), Duration::from_millis(1000));
    }

    #[test]
    fn test_read_limited_stops_one_past_limit() {
        let body = Cursor::new(vec![b'x'; 1 << 20]);
        assert!(matches!(
            read_limited(body, "u", 16),
            Err(HarvesterError::ResponseTooLarge { size: 17, limit: 16, .. })
        ));
        assert_eq!(read_limited(Cursor::new(b"abc"), "u", 3).unwrap(), b"abc");
    }

    #[test]
    fn test_timeout_detection() {
        assert!(is_timeout(&io::Error::new(io::ErrorKind::TimedOut, "slow")));
        assert!(!is_timeout(&io::Error::new(io::ErrorKind::Other, "reset")));
    }
}
