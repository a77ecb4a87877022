use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_LENGTH;
use reqwest::StatusCode;

use crate::config::ShareConfig;
use crate::error::DownloadError;
use crate::progress::Progress;

pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Public WebDAV shares authenticate with this fixed user name; the share
/// password is the credential.
pub const SHARE_USERNAME: &str = "password";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Complete { bytes: u64 },
    /// The body ended at a different length than `Content-Length` announced.
    /// The file holds exactly the `received` bytes.
    SizeMismatch { declared: u64, received: u64 },
}

impl Outcome {
    pub fn bytes_written(&self) -> u64 {
        match *self {
            Outcome::Complete { bytes } => bytes,
            Outcome::SizeMismatch { received, .. } => received,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete { .. })
    }
}

pub struct Downloader {
    client: Client,
    chunk_size: usize,
}

impl Downloader {
    pub fn new(chunk_size: usize) -> Result<Self, DownloadError> {
        if chunk_size == 0 {
            return Err(DownloadError::InvalidChunkSize);
        }

        // Transfers may legitimately run for a long time.
        let client = Client::builder().timeout(None::<Duration>).build()?;

        Ok(Self { client, chunk_size })
    }

    pub fn download(
        &self,
        share: &ShareConfig,
        destination: &Path,
        progress: &mut dyn Progress,
    ) -> Result<Outcome, DownloadError> {
        log::info!("Downloading from {} to {:?}", share.link, destination);

        let response = self
            .client
            .get(&share.link)
            .basic_auth(SHARE_USERNAME, Some(&share.password))
            .send()?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED => {
                log::error!("Share rejected the password for {}", share.link);
                return Err(DownloadError::Unauthorized);
            }
            status => {
                log::error!("Download failed with status: {}", status);
                return Err(DownloadError::Status(status));
            }
        }

        let declared = declared_length(&response);
        let outcome = stream_to_file(response, declared, destination, self.chunk_size, progress)?;

        match outcome {
            Outcome::Complete { bytes } => {
                log::info!("Download completed: {} bytes", bytes)
            }
            Outcome::SizeMismatch { declared, received } => log::warn!(
                "Download size mismatch for {:?}: declared {}, received {}",
                destination,
                declared,
                received
            ),
        }

        Ok(outcome)
    }
}

/// Downloads `url` into `destination` with a fresh client.
pub fn download(
    url: &str,
    password: &str,
    destination: &Path,
    chunk_size: usize,
    progress: &mut dyn Progress,
) -> Result<Outcome, DownloadError> {
    Downloader::new(chunk_size)?.download(&ShareConfig::new(url, password), destination, progress)
}

/// `Content-Length` of the response, 0 when absent or unparsable.
fn declared_length(response: &Response) -> u64 {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

/// Writes `body` to `destination` in chunks of `chunk_size` bytes, creating
/// missing parent directories. A `declared` of 0 means the size is unknown
/// and is never reported as a mismatch.
pub fn stream_to_file<R: Read>(
    mut body: R,
    declared: u64,
    destination: &Path,
    chunk_size: usize,
    progress: &mut dyn Progress,
) -> Result<Outcome, DownloadError> {
    if chunk_size == 0 {
        return Err(DownloadError::InvalidChunkSize);
    }

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DownloadError::io(parent, e))?;
    }

    let mut file = fs::File::create(destination).map_err(|e| DownloadError::io(destination, e))?;

    progress.start((declared != 0).then_some(declared));
    let copied = copy_chunks(&mut body, &mut file, destination, chunk_size, progress);
    progress.finish();
    let received = copied?;

    if declared != 0 && received != declared {
        Ok(Outcome::SizeMismatch { declared, received })
    } else {
        Ok(Outcome::Complete { bytes: received })
    }
}

fn copy_chunks<R: Read>(
    body: &mut R,
    file: &mut fs::File,
    destination: &Path,
    chunk_size: usize,
    progress: &mut dyn Progress,
) -> Result<u64, DownloadError> {
    let mut buf = vec![0u8; chunk_size];
    let mut received = 0u64;

    loop {
        let (n, failure) = fill_chunk(body, &mut buf);

        if n > 0 {
            file.write_all(&buf[..n])
                .map_err(|e| DownloadError::io(destination, e))?;
            received += n as u64;
            progress.advance(n as u64);
        }

        if let Some(e) = failure {
            // Keep what arrived before the fault on disk.
            file.flush().map_err(|e| DownloadError::io(destination, e))?;
            return Err(DownloadError::Body(e));
        }

        if n < buf.len() {
            break;
        }
    }

    file.flush().map_err(|e| DownloadError::io(destination, e))?;
    Ok(received)
}

/// Reads until `buf` is full, the stream ends, or a read fails. Returns the
/// bytes read so far together with the failure, if any.
fn fill_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> (usize, Option<std::io::Error>) {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return (filled, Some(e)),
        }
    }
    (filled, None)
}
