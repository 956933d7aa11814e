//! Fetches remote files and stores them in the destination directory.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;

use crate::error::{ConfigError, FetchError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Single-attempt retrieval of a remote resource.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;
}

/// Fetches over HTTP with a bounded timeout per request.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        Ok(response.bytes().await?)
    }
}

/// Flat directory that fetched files are written into.
#[derive(Debug, Clone)]
pub struct Destination {
    dir: PathBuf,
}

impl Destination {
    /// Opens an existing directory, checking that files can be created in it.
    pub fn open(dir: &Path) -> Result<Self, ConfigError> {
        let metadata =
            fs::metadata(dir).map_err(|_| ConfigError::MissingDestination(dir.to_path_buf()))?;
        if !metadata.is_dir() {
            return Err(ConfigError::NotADirectory(dir.to_path_buf()));
        }

        let probe = dir.join(".mrms-write-probe");
        fs::write(&probe, b"")
            .and_then(|_| fs::remove_file(&probe))
            .map_err(|source| ConfigError::Unwritable {
                path: dir.to_path_buf(),
                source,
            })?;

        Ok(Destination {
            dir: dir.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Writes `content` under `file_name`, replacing any previous file.
    pub fn store(&self, file_name: &str, content: &[u8]) -> Result<PathBuf> {
        let file_path = self.dir.join(file_name);
        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write `{}`", file_path.display()))?;

        Ok(file_path)
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        time::sleep,
    };

    #[test]
    fn should_open_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let destination = Destination::open(temp_dir.path()).unwrap();

        assert_eq!(destination.path(), temp_dir.path());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn should_reject_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        assert!(matches!(
            Destination::open(&missing),
            Err(ConfigError::MissingDestination(_))
        ));
    }

    #[test]
    fn should_reject_file_as_destination() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("file.txt");
        fs::write(&file_path, b"x").unwrap();

        assert!(matches!(
            Destination::open(&file_path),
            Err(ConfigError::NotADirectory(_))
        ));
    }

    #[test]
    fn should_overwrite_stored_file() {
        let temp_dir = TempDir::new().unwrap();
        let destination = Destination::open(temp_dir.path()).unwrap();

        destination.store("a.grib2.gz", b"first").unwrap();
        let path = destination.store("a.grib2.gz", b"second").unwrap();

        assert_eq!(fs::read(path).unwrap(), b"second");
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn should_build_http_fetcher() {
        assert!(HttpFetcher::new(Duration::from_secs(5)).is_ok());
    }

    /// Serves one connection on localhost: reads the request head, then
    /// writes `response` (or holds the socket open when `None`).
    async fn serve_once(response: Option<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            match response {
                Some(response) => {
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                }
                None => sleep(Duration::from_secs(5)).await,
            }
        });

        format!("http://{}/2023/04/30/file.grib2.gz", addr)
    }

    #[tokio::test]
    async fn should_return_body_on_success() {
        let url = serve_once(Some(
            "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\ngrib!",
        ))
        .await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let body = fetcher.fetch(&url).await.unwrap();

        assert_eq!(body.as_ref(), b"grib!");
    }

    #[tokio::test]
    async fn should_fail_on_not_found() {
        let url = serve_once(Some(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        ))
        .await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        assert!(matches!(
            fetcher.fetch(&url).await,
            Err(FetchError::Status(404))
        ));
    }

    #[tokio::test]
    async fn should_fail_on_server_error() {
        let url = serve_once(Some(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        ))
        .await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        assert!(matches!(
            fetcher.fetch(&url).await,
            Err(FetchError::Status(500))
        ));
    }

    #[tokio::test]
    async fn should_time_out_when_server_never_replies() {
        let url = serve_once(None).await;
        let fetcher = HttpFetcher::new(Duration::from_millis(200)).unwrap();

        match fetcher.fetch(&url).await {
            Err(FetchError::Request(e)) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
