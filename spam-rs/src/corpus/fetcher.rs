//! Corpus index scraping and archive download

use scraper::{Html, Selector};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

use super::archive::{archive_stem, decompress, detect_compression, unpack_tar};
use super::types::{Compression, CorpusArchive};
use crate::config::CorpusConfig;
use crate::error::{Result, SpamError};

/// Downloads and unpacks corpus archives listed on an index page
pub struct CorpusFetcher {
    client: reqwest::Client,
    index_url: Url,
    base_url: Url,
    link_start: usize,
    link_end: usize,
    work_dir: PathBuf,
}

impl CorpusFetcher {
    /// Create a fetcher from corpus configuration
    pub fn new(config: &CorpusConfig) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            index_url: parse_url(&config.index_url)?,
            base_url: parse_url(&config.base_url)?,
            link_start: config.link_start,
            link_end: config.link_end,
            work_dir: config.work_dir.clone(),
        })
    }

    /// Download, decompress and unpack every selected archive.
    ///
    /// Returns the top-level entries of the working directory. The first
    /// failure aborts the whole fetch.
    pub async fn fetch_all(&self) -> Result<Vec<String>> {
        tokio::fs::create_dir_all(&self.work_dir).await?;

        let links = self.fetch_index().await?;
        info!("Found {} links on {}", links.len(), self.index_url);

        let selected = select_links(&links, self.link_start, self.link_end)?;
        info!("Downloading {} archives", selected.len());

        for (offset, link) in selected.iter().enumerate() {
            if link.is_empty() {
                return Err(SpamError::Parse(format!(
                    "anchor {} has no href",
                    self.link_start + offset
                )));
            }
            let (url, path) = self.download(link).await?;
            let archive = self.extract(url, &path)?;
            info!(
                "Extracted {} into {}",
                archive.url,
                archive.folder.display()
            );
        }

        list_entries(&self.work_dir)
    }

    /// Fetch the index page and return its anchor targets
    pub async fn fetch_index(&self) -> Result<Vec<String>> {
        let html = self
            .client
            .get(self.index_url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        extract_links(&html)
    }

    /// Download one link into the working directory
    pub async fn download(&self, link: &str) -> Result<(Url, PathBuf)> {
        let url = self
            .base_url
            .join(link)
            .map_err(|e| SpamError::Parse(format!("bad link {}: {}", link, e)))?;
        let file_name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| SpamError::Parse(format!("no file name in {}", url)))?
            .to_string();

        debug!("Downloading {}", url);
        let bytes = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let path = self.work_dir.join(&file_name);
        tokio::fs::write(&path, &bytes).await?;
        debug!("Saved {} bytes to {}", bytes.len(), path.display());

        Ok((url, path))
    }

    /// Decompress and unpack a downloaded archive next to it
    pub fn extract(&self, url: Url, path: &Path) -> Result<CorpusArchive> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SpamError::Archive(format!("bad archive path {}", path.display())))?;
        let stem = archive_stem(file_name);
        let folder = self.work_dir.join(stem);

        // A plain tar is unpacked where it was downloaded
        let tar_path = match detect_compression(path)? {
            Compression::None => path.to_path_buf(),
            _ => {
                let tar_path = self.work_dir.join(format!("{}.tar", stem));
                decompress(path, &tar_path)?;
                tar_path
            }
        };
        unpack_tar(&tar_path, &folder)?;

        Ok(CorpusArchive {
            url: url.to_string(),
            path: path.to_path_buf(),
            tar_path,
            folder,
        })
    }
}

fn parse_url(s: &str) -> Result<Url> {
    Url::parse(s).map_err(|e| SpamError::Config(format!("bad URL {}: {}", s, e)))
}

/// Every anchor's `href` in document order; anchors without one yield an
/// empty string so positions are preserved.
pub fn extract_links(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("a").map_err(|e| SpamError::Parse(format!("bad selector: {:?}", e)))?;

    Ok(document
        .select(&selector)
        .map(|a| a.value().attr("href").unwrap_or_default().to_string())
        .collect())
}

/// Links at 1-based positions `start..=end`.
///
/// A range running past the end is clamped; a range selecting nothing is an
/// error.
pub fn select_links(links: &[String], start: usize, end: usize) -> Result<&[String]> {
    if start == 0 || start > end || start > links.len() {
        return Err(SpamError::Parse(format!(
            "link range {}..={} selects nothing from {} links",
            start,
            end,
            links.len()
        )));
    }
    if end > links.len() {
        warn!(
            "Link range ends at {} but the index only has {} links",
            end,
            links.len()
        );
    }
    Ok(&links[start - 1..end.min(links.len())])
}

/// Sorted names of the top-level entries of `dir`
pub fn list_entries(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}
