use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;
use walkdir::WalkDir;

use fwmap::map::codec;
use fwmap::map::ingest::{Entry, ingest};
use fwmap::map::MapState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadRequest {
    OpenMap(PathBuf),
    ImportDir(PathBuf),
}

impl LoadRequest {
    pub fn path(&self) -> &Path {
        match self {
            Self::OpenMap(path) | Self::ImportDir(path) => path,
        }
    }
}

impl fmt::Display for LoadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenMap(path) => write!(f, "map {}", path.display()),
            Self::ImportDir(path) => write!(f, "directory {}", path.display()),
        }
    }
}

pub fn load(request: &LoadRequest) -> Result<MapState> {
    match request {
        LoadRequest::OpenMap(path) => codec::read_file(path)
            .with_context(|| format!("failed to open map {}", path.display())),
        LoadRequest::ImportDir(dir) => {
            let entries = collect_entries(dir)?;
            Ok(ingest(&entries))
        }
    }
}

/// Every regular file under `dir`, keyed by its path relative to `dir`'s parent so the
/// chosen folder becomes the single root. Symlinks are not followed.
pub fn collect_entries(dir: &Path) -> Result<Vec<Entry>> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }
    let dir = dir
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", dir.display()))?;
    let root_name = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    let mut entries = Vec::new();
    for entry in WalkDir::new(&dir).follow_links(false).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = forward_slash_path(entry.path().strip_prefix(&dir).unwrap_or(entry.path()));
        let path = match &root_name {
            Some(root) => format!("{root}/{relative}"),
            None => relative,
        };
        let size_bytes = entry
            .metadata()
            .with_context(|| format!("failed to stat {}", entry.path().display()))?
            .len();

        entries.push(Entry::new(path, size_bytes));
    }

    debug!(dir = %dir.display(), files = entries.len(), "collected directory entries");
    Ok(entries)
}

fn forward_slash_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
