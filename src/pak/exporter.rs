use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::io::ReadAt;
use anyhow::Result;

use super::builds::Build;
use super::walker::{ListingWalker, PakEntry};

/// Mapping exporter: walks an image and persists the name → file-list
/// mapping as pretty-printed JSON
pub struct MappingExporter<R: ReadAt> {
    walker: ListingWalker<R>,
    build: Build,
}

impl<R: ReadAt> MappingExporter<R> {
    pub fn new(reader: Arc<R>, build: Build) -> Self {
        Self {
            walker: ListingWalker::new(reader, build.offsets(), build.sentinel()),
            build,
        }
    }

    /// Walk the image's listing table
    pub async fn walk(&self) -> Result<Vec<PakEntry>> {
        Ok(self.walker.walk().await?)
    }

    /// Project entries into the persisted mapping form.
    ///
    /// Keys are the generated pak names; `bg_%03d` sorts lexicographically
    /// in slot order, so the map iterates in the same order the entries
    /// were found. Names are unique by construction (the slot index is
    /// monotonic), so nothing is ever overwritten here.
    pub fn mapping(entries: Vec<PakEntry>) -> BTreeMap<String, Vec<String>> {
        entries.into_iter().map(|e| (e.name, e.files)).collect()
    }

    /// Serialize entries as the final JSON document
    pub fn to_json(&self, entries: Vec<PakEntry>) -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::mapping(entries))?)
    }

    /// Write the mapping to its per-build file, returning the path written.
    ///
    /// The file name is fixed per build; `dir` only chooses where it goes
    /// (current directory when `None`).
    pub async fn export_to_file(
        &self,
        entries: Vec<PakEntry>,
        dir: Option<&Path>,
    ) -> Result<PathBuf> {
        let json = self.to_json(entries)?;

        let output_path = match dir {
            Some(dir) => {
                fs::create_dir_all(dir).await?;
                dir.join(self.build.mapping_file_name())
            }
            None => PathBuf::from(self.build.mapping_file_name()),
        };

        let mut file = fs::File::create(&output_path).await?;
        file.write_all(json.as_bytes()).await?;

        Ok(output_path)
    }

    /// Write the mapping to stdout
    pub async fn export_to_stdout(&self, entries: Vec<PakEntry>) -> Result<()> {
        let json = self.to_json(entries)?;

        let mut stdout = tokio::io::stdout();
        stdout.write_all(json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;

        Ok(())
    }
}
