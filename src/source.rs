//! Flipdeck - Deck sources
//!
//! Fetches the raw deck text from a published URL, a local file, or stdin.
//! A non-success HTTP status is reported as an error rather than handed to
//! the parser.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::error::FetchError;

/// Where the deck text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// HTTP(S) URL, e.g. a spreadsheet published with `output=csv`
    Url(String),
    /// Local file
    File(PathBuf),
    /// Standard input (`-`)
    Stdin,
}

/// Settings for remote fetches
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl Source {
    /// Interpret a command line argument
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            Source::Stdin
        } else if arg.starts_with("http://") || arg.starts_with("https://") {
            Source::Url(arg.to_string())
        } else {
            Source::File(PathBuf::from(arg))
        }
    }

    /// Short name for titles and status lines
    pub fn display_name(&self) -> String {
        match self {
            Source::Url(url) => {
                let without_query = url.split(['?', '#']).next().unwrap_or(url);
                let host = without_query
                    .split("://")
                    .nth(1)
                    .and_then(|rest| rest.split('/').next())
                    .unwrap_or(without_query);
                host.to_string()
            }
            Source::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            Source::Stdin => "<stdin>".to_string(),
        }
    }

    /// Retrieve the full text
    pub async fn fetch(&self, options: &FetchOptions) -> Result<String, FetchError> {
        match self {
            Source::Url(url) => fetch_url(url, options).await,
            Source::File(path) => {
                info!("Reading deck from {}", path.display());
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| FetchError::Io {
                        origin: path.display().to_string(),
                        source,
                    })
            }
            Source::Stdin => {
                info!("Reading deck from stdin");
                let mut text = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut text)
                    .await
                    .map_err(|source| FetchError::Io {
                        origin: "stdin".to_string(),
                        source,
                    })?;
                Ok(text)
            }
        }
    }
}

async fn fetch_url(url: &str, options: &FetchOptions) -> Result<String, FetchError> {
    let transport = |source: reqwest::Error| FetchError::Transport {
        url: url.to_string(),
        source,
    };

    let client = Client::builder()
        .user_agent(concat!("flipdeck/", env!("CARGO_PKG_VERSION")))
        .timeout(options.timeout)
        .build()
        .map_err(transport)?;

    info!("Fetching deck from {}", url);
    let resp = client.get(url).send().await.map_err(transport)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let text = resp.text().await.map_err(transport)?;
    debug!("Fetched {} bytes", text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port and return its URL
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });
        format!("http://{}/deck.csv", addr)
    }

    #[test]
    fn test_parse_source() {
        assert_eq!(Source::parse("-"), Source::Stdin);
        assert_eq!(
            Source::parse("https://example.com/pub?output=csv"),
            Source::Url("https://example.com/pub?output=csv".into())
        );
        assert_eq!(
            Source::parse("decks/capitals.csv"),
            Source::File(PathBuf::from("decks/capitals.csv"))
        );
    }

    #[test]
    fn test_display_name() {
        let url = Source::parse("https://docs.example.com/spreadsheets/d/e/abc/pub?gid=0&output=csv");
        assert_eq!(url.display_name(), "docs.example.com");
        assert_eq!(Source::parse("decks/capitals.csv").display_name(), "capitals.csv");
        assert_eq!(Source::Stdin.display_name(), "<stdin>");
    }

    #[tokio::test]
    async fn test_fetch_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "question,answer").unwrap();
        writeln!(file, "What is 2+2?,4").unwrap();

        let source = Source::File(file.path().to_path_buf());
        let text = source.fetch(&FetchOptions::default()).await.unwrap();
        assert!(text.starts_with("question,answer\n"));
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let source = Source::File(PathBuf::from("/definitely/not/here.csv"));
        let err = source.fetch(&FetchOptions::default()).await.unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }

    #[tokio::test]
    async fn test_fetch_url_success() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nContent-Length: 22\r\nConnection: close\r\n\r\nquestion,answer\nQ?,A!\n",
        )
        .await;
        let text = Source::Url(url).fetch(&FetchOptions::default()).await.unwrap();
        assert_eq!(text, "question,answer\nQ?,A!\n");
    }

    #[tokio::test]
    async fn test_fetch_url_non_success_status() {
        let url = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let err = Source::Url(url).fetch(&FetchOptions::default()).await.unwrap_err();
        match err {
            FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 404),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_url_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{}/deck.csv", addr);
        let err = Source::Url(url).fetch(&FetchOptions::default()).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
