use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One asset that was fetched and rewritten into the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedAsset {
    /// Absolute URL the asset was fetched from.
    pub url: String,
    /// Value written into the page, relative to the output directory.
    pub local_path: String,
    pub size: u64,
}

/// Where a mirrored page ended up on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorResult {
    pub html_file_path: PathBuf,
    pub assets_directory_path: PathBuf,
    pub assets: Vec<LocalizedAsset>,
}

impl MirrorResult {
    pub fn new(html_file_path: PathBuf, assets_directory_path: PathBuf) -> Self {
        Self {
            html_file_path,
            assets_directory_path,
            assets: Vec::new(),
        }
    }

    pub fn total_bytes(&self) -> u64 {
        self.assets.iter().map(|a| a.size).sum()
    }
}

/// Progress notifications emitted while a page is mirrored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorEvent {
    /// The unmodified page body was written.
    PageSaved { path: PathBuf },
    /// Number of local assets that will be fetched.
    AssetsFound { total: usize },
    AssetSaved {
        url: String,
        path: PathBuf,
        size: u64,
    },
    /// The rewritten page replaced the original on disk.
    Finished { html_file_path: PathBuf },
}
