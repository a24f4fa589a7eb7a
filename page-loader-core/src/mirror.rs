use crate::charset::decode_html;
use crate::config::MirrorConfig;
use crate::error::{MirrorError, Result};
use crate::fetcher::{fetch_page, fetch_resource};
use crate::filename::{assets_dir_name, format_filename};
use crate::locality::resolve_local;
use crate::page::{AssetReference, HtmlPage};
use crate::result::{LocalizedAsset, MirrorEvent, MirrorResult};
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(&MirrorEvent) + Send + Sync>;

/// Downloads one page and the same-host assets it references.
///
/// Work is strictly sequential: the page, then each asset in document order.
/// Any failure aborts the run and whatever was already written stays on disk.
pub struct PageMirror {
    client: Client,
    progress_callback: Option<ProgressCallback>,
}

impl PageMirror {
    pub fn new() -> Result<Self> {
        Self::with_config(&MirrorConfig::default())
    }

    pub fn with_config(config: &MirrorConfig) -> Result<Self> {
        Ok(Self {
            client: config.build_client()?,
            progress_callback: None,
        })
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn emit(&self, event: MirrorEvent) {
        if let Some(ref callback) = self.progress_callback {
            callback(&event);
        }
    }

    pub async fn download(&self, url: &str, output_dir: impl AsRef<Path>) -> Result<MirrorResult> {
        let output_dir = output_dir.as_ref();
        info!("requested url: {}", url);
        info!("output path: {}", output_dir.display());

        ensure_directory(output_dir).await?;
        let page_url = parse_page_url(url)?;

        let fetched = fetch_page(&self.client, &page_url).await?;

        // The untouched page goes to disk first so an aborted run still leaves it behind.
        let html_filename = format_filename(&page_url);
        let html_path = output_dir.join(&html_filename);
        tokio::fs::write(&html_path, &fetched.body)
            .await
            .map_err(|e| MirrorError::io(&html_path, e))?;
        info!("write html file: {}", html_path.display());
        self.emit(MirrorEvent::PageSaved {
            path: html_path.clone(),
        });

        let assets_dir_name = assets_dir_name(&html_filename);
        let assets_dir = output_dir.join(&assets_dir_name);
        tokio::fs::create_dir_all(&assets_dir)
            .await
            .map_err(|e| MirrorError::io(&assets_dir, e))?;
        info!("create directory for assets: {}", assets_dir.display());

        let text = decode_html(&fetched.body, fetched.content_type.as_deref());
        let page = HtmlPage::parse(&text);
        let local_assets = Self::local_assets(&page, &page_url)?;
        info!("Found {} local assets", local_assets.len());
        self.emit(MirrorEvent::AssetsFound {
            total: local_assets.len(),
        });

        let mut result = MirrorResult::new(html_path.clone(), assets_dir.clone());

        for (reference, asset_url) in &local_assets {
            let asset_filename = format_filename(asset_url);
            let asset_path = assets_dir.join(&asset_filename);

            let size = fetch_resource(&self.client, asset_url, &asset_path).await?;

            let local_path = format!("{}/{}", assets_dir_name, asset_filename);
            reference.rewrite(&local_path);
            debug!(
                "Rewrote {} {} -> {}",
                reference.attribute(),
                reference.url(),
                local_path
            );

            self.emit(MirrorEvent::AssetSaved {
                url: asset_url.to_string(),
                path: asset_path,
                size,
            });
            result.assets.push(LocalizedAsset {
                url: asset_url.to_string(),
                local_path,
                size,
            });
        }

        // Nothing was rewritten, so the raw body already on disk is the final page.
        if !local_assets.is_empty() {
            page.declare_utf8()?;
            let html = page
                .serialize()
                .map_err(|e| MirrorError::io(&html_path, e))?;
            tokio::fs::write(&html_path, html)
                .await
                .map_err(|e| MirrorError::io(&html_path, e))?;
        }

        info!(
            "Page saved to {} with {} assets ({} bytes)",
            html_path.display(),
            result.assets.len(),
            result.total_bytes()
        );
        self.emit(MirrorEvent::Finished {
            html_file_path: html_path,
        });

        Ok(result)
    }

    /// References on `page` that point at the page's own host, paired with
    /// their absolute URLs, in document order.
    fn local_assets(page: &HtmlPage, page_url: &Url) -> Result<Vec<(AssetReference, Url)>> {
        let assets = page
            .asset_references()?
            .into_iter()
            .filter_map(|reference| match resolve_local(reference.url(), page_url) {
                Some(absolute) => Some((reference, absolute)),
                None => {
                    debug!("Skipping {} (not a local asset)", reference.url());
                    None
                }
            })
            .collect();

        Ok(assets)
    }
}

/// Mirror `url` into `output_dir` with the default configuration.
pub async fn download(url: &str, output_dir: impl AsRef<Path>) -> Result<MirrorResult> {
    PageMirror::new()?.download(url, output_dir).await
}

async fn ensure_directory(path: &Path) -> Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        _ => Err(MirrorError::InvalidDirectory(path.to_path_buf())),
    }
}

fn parse_page_url(url: &str) -> Result<Url> {
    let invalid = |reason: String| MirrorError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(parsed),
        "http" | "https" => Err(invalid("missing host".to_string())),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}
