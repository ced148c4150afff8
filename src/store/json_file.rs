use async_trait::async_trait;
use log::debug;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::RegistryStore;
use crate::errors::StoreError;
use crate::models::ServiceConfig;

/// Registry persisted as a tab-indented JSON array
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RegistryStore for JsonFileStore {
    async fn read_all(&self) -> Result<Vec<ServiceConfig>, StoreError> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StoreError::Empty),
            Err(e) => return Err(StoreError::Io(e)),
        };

        if contents.iter().all(u8::is_ascii_whitespace) {
            return Err(StoreError::Empty);
        }

        Ok(serde_json::from_slice(&contents)?)
    }

    async fn write_all(&self, records: &[ServiceConfig]) -> Result<(), StoreError> {
        let contents = encode(records)?;
        let path = self.path.clone();

        debug!("Writing {} services to {}", records.len(), path.display());

        tokio::task::spawn_blocking(move || replace_file(&path, &contents))
            .await
            .map_err(|e| StoreError::Io(io::Error::other(e)))?
    }
}

fn encode(records: &[ServiceConfig]) -> Result<Vec<u8>, StoreError> {
    let mut contents = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut contents, PrettyFormatter::with_indent(b"\t"));
    records
        .serialize(&mut serializer)
        .map_err(StoreError::Encode)?;
    Ok(contents)
}

/// Write to a sibling temp file, then rename it over the target
fn replace_file(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| StoreError::Io(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ServiceConfig> {
        (0..3)
            .map(|i| ServiceConfig::new(format!("test-{}", i), "https://test.url"))
            .collect()
    }

    #[tokio::test]
    async fn test_missing_and_blank_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("services.json"));
        assert!(matches!(store.read_all().await, Err(StoreError::Empty)));

        std::fs::write(store.path(), "  \n").unwrap();
        assert!(matches!(store.read_all().await, Err(StoreError::Empty)));
    }

    #[tokio::test]
    async fn test_malformed_file_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("services.json"));
        std::fs::write(store.path(), "{\"name\": ").unwrap();

        assert!(matches!(store.read_all().await, Err(StoreError::Decode(_))));
    }

    #[tokio::test]
    async fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data").join("services.json"));

        let records = sample();
        store.write_all(&records).await.unwrap();
        assert_eq!(store.read_all().await.unwrap(), records);

        store.write_all(&[]).await.unwrap();
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_document_is_tab_indented() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("services.json"));
        store
            .write_all(&[ServiceConfig::new("a", "https://a.test").with_auto_ping(false)])
            .await
            .unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            contents,
            "[\n\t{\n\t\t\"name\": \"a\",\n\t\t\"url\": \"https://a.test\",\n\t\t\"ping\": false\n\t}\n]"
        );
    }

    #[tokio::test]
    async fn test_write_replaces_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("services.json"));
        store.write_all(&sample()).await.unwrap();

        let smaller = vec![ServiceConfig::new("only", "https://only.test")];
        store.write_all(&smaller).await.unwrap();
        assert_eq!(store.read_all().await.unwrap(), smaller);

        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
