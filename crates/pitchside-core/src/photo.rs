// Player photo resolution with a placeholder fallback.
//
// Fetch failures never reach the caller: a timeout, transport error or
// non-success status all resolve to the placeholder image.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

/// Generic profile silhouette shown when a photo cannot be fetched.
pub const DEFAULT_PLACEHOLDER_URL: &str =
    "https://www.pngitem.com/pimgs/m/146-1468479_my-profile-icon-blank-profile-picture-circle-hd.png";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// The image a page should display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Photo {
    Remote {
        url: String,
        #[serde(skip)]
        bytes: Vec<u8>,
    },
    Placeholder {
        url: String,
    },
}

impl Photo {
    pub fn url(&self) -> &str {
        match self {
            Photo::Remote { url, .. } | Photo::Placeholder { url } => url,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Photo::Placeholder { .. })
    }
}

/// Best-effort photo fetcher with a bounded per-request timeout.
#[derive(Debug, Clone)]
pub struct PhotoResolver {
    http: reqwest::Client,
    timeout: Duration,
    placeholder_url: String,
}

impl PhotoResolver {
    pub fn new(timeout: Duration, placeholder_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), timeout, placeholder_url)
    }

    /// Use a preconfigured HTTP client (proxy settings, headers).
    pub fn with_client(
        http: reqwest::Client,
        timeout: Duration,
        placeholder_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            timeout,
            placeholder_url: placeholder_url.into(),
        }
    }

    fn placeholder(&self) -> Photo {
        Photo::Placeholder {
            url: self.placeholder_url.clone(),
        }
    }

    /// Fetch `url`, falling back to the placeholder on any failure.
    pub async fn resolve(&self, url: Option<&str>) -> Photo {
        let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
            return self.placeholder();
        };

        let response = match self.http.get(url).timeout(self.timeout).send().await {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => {
                warn!("photo fetch timed out after {:?}: {}", self.timeout, url);
                return self.placeholder();
            }
            Err(e) => {
                debug!("photo fetch failed for {}: {}", url, e);
                return self.placeholder();
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "photo unavailable: {}", url);
            return self.placeholder();
        }

        match response.bytes().await {
            Ok(bytes) => Photo::Remote {
                url: url.to_string(),
                bytes: bytes.to_vec(),
            },
            Err(e) => {
                debug!("photo body read failed for {}: {}", url, e);
                self.placeholder()
            }
        }
    }
}

impl Default for PhotoResolver {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_PLACEHOLDER_URL)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const PLACEHOLDER: &str = "http://placeholder.invalid/blank.png";

    /// Serve a single canned HTTP response on a local port; returns the URL.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}/photo.png")
    }

    fn resolver(timeout: Duration) -> PhotoResolver {
        // Local test servers must not be routed through an ambient proxy.
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        PhotoResolver::with_client(http, timeout, PLACEHOLDER)
    }

    #[tokio::test]
    async fn success_returns_remote_photo() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 3\r\nConnection: close\r\n\r\nPNG",
        )
        .await;
        let photo = resolver(Duration::from_secs(5)).resolve(Some(&url)).await;
        assert_eq!(
            photo,
            Photo::Remote {
                url: url.clone(),
                bytes: b"PNG".to_vec()
            }
        );
        assert!(!photo.is_placeholder());
    }

    #[tokio::test]
    async fn not_found_falls_back_to_placeholder() {
        let url = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let photo = resolver(Duration::from_secs(5)).resolve(Some(&url)).await;
        assert!(photo.is_placeholder());
        assert_eq!(photo.url(), PLACEHOLDER);
    }

    #[tokio::test]
    async fn unresponsive_server_times_out_to_placeholder() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hold = tokio::spawn(async move {
            let accepted = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(accepted);
        });

        let photo = resolver(Duration::from_millis(200))
            .resolve(Some(&format!("http://{addr}/slow.png")))
            .await;
        assert!(photo.is_placeholder());
        hold.abort();
    }

    #[tokio::test]
    async fn connection_refused_falls_back() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let photo = resolver(Duration::from_secs(2))
            .resolve(Some(&format!("http://{addr}/gone.png")))
            .await;
        assert!(photo.is_placeholder());
    }

    #[test]
    fn serialized_photo_omits_bytes() {
        let remote = Photo::Remote {
            url: "http://x/p.png".into(),
            bytes: vec![1, 2, 3],
        };
        assert_eq!(
            serde_json::to_value(&remote).unwrap(),
            serde_json::json!({ "kind": "remote", "url": "http://x/p.png" })
        );
    }

    #[tokio::test]
    async fn missing_or_blank_url_is_placeholder() {
        let r = resolver(Duration::from_secs(1));
        assert!(r.resolve(None).await.is_placeholder());
        assert!(r.resolve(Some("   ")).await.is_placeholder());
        assert!(r.resolve(Some("not a url")).await.is_placeholder());
    }
}
