use crate::conf::StartPosition;
use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncSeekExt, BufReader};

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("log source {path} is not available")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WatchError {
    fn open(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            Self::SourceUnavailable { path, source }
        } else {
            Self::Read { path, source }
        }
    }

    fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Byte cursor over a file that only grows, except when it is truncated.
#[derive(Debug)]
pub struct LogTail {
    path: PathBuf,
    start: StartPosition,
    cursor: u64,

    /// Whether the cursor has been placed by a first successful open.
    positioned: bool,

    /// The file was missing before the first successful open, so everything
    /// in it is new.
    appeared_late: bool,
}

impl LogTail {
    pub fn new(path: impl Into<PathBuf>, start: StartPosition) -> Self {
        Self {
            path: path.into(),
            start,
            cursor: 0,
            positioned: false,
            appeared_late: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Read every complete line after the cursor.
    ///
    /// A trailing line without its newline stays unread until the newline
    /// arrives. On error the cursor does not move, so the next poll reads the
    /// same lines again.
    pub async fn poll(&mut self) -> Result<Vec<String>, WatchError> {
        let file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(err) => {
                if !self.positioned {
                    self.appeared_late = true;
                }
                return Err(WatchError::open(&self.path, err));
            }
        };

        let len = file
            .metadata()
            .await
            .map_err(|err| WatchError::read(&self.path, err))?
            .len();

        if !self.positioned {
            self.positioned = true;
            if self.start == StartPosition::End && !self.appeared_late {
                self.cursor = len;
                tracing::debug!(
                    path = %self.path.display(),
                    offset = len,
                    "tailing from end of file"
                );
            }
        }

        if len < self.cursor {
            tracing::info!(
                path = %self.path.display(),
                offset = self.cursor,
                len,
                "log source truncated; reading from start"
            );
            self.cursor = 0;
        }

        if len == self.cursor {
            return Ok(Vec::new());
        }

        let mut reader = BufReader::new(file);
        reader
            .seek(SeekFrom::Start(self.cursor))
            .await
            .map_err(|err| WatchError::read(&self.path, err))?;

        let (lines, consumed) = read_complete_lines(&mut reader)
            .await
            .map_err(|err| WatchError::read(&self.path, err))?;
        self.cursor += consumed;

        Ok(lines)
    }
}

/// Read every newline-terminated line from `reader`.
///
/// Returns the lines and the bytes they span. A trailing partial line is left
/// uncounted. Nothing is returned on error, so the caller's offset must not
/// move either.
pub(crate) async fn read_complete_lines<R>(reader: &mut R) -> io::Result<(Vec<String>, u64)>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = Vec::new();
    let mut consumed = 0u64;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).await?;

        if read == 0 || buf.last() != Some(&b'\n') {
            break;
        }

        consumed += read as u64;
        let line = String::from_utf8_lossy(&buf);
        lines.push(line.trim_end_matches(['\n', '\r']).to_string());
    }

    Ok((lines, consumed))
}
