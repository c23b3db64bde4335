use crate::traits::SeenStore;
use crate::types::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Seen-set kept in a newline-delimited text file, one link per line.
///
/// The file only ever grows. Appends go through a mutex so two writers in
/// the same process never interleave partial lines.
pub struct FileSeenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl SeenStore for FileSeenStore {
    async fn load(&self) -> Result<HashSet<String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No seen file at {}, starting empty", self.path.display());
                return Ok(HashSet::new());
            }
            Err(e) => return Err(e.into()),
        };

        let links: HashSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        debug!("Loaded {} seen links from {}", links.len(), self.path.display());
        Ok(links)
    }

    async fn record(&self, link: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{}\n", link.trim()).as_bytes()).await?;
        file.flush().await?;
        file.sync_data().await?;

        Ok(())
    }
}
