//! Display sinks for rendered figures

use std::path::{Path, PathBuf};

use crate::canvas::Canvas;
use crate::errors::PlotError;

/// Something that can present a rendered canvas under a window title
pub trait Viewer {
    fn display(&mut self, canvas: &Canvas, title: &str) -> Result<(), PlotError>;
}

/// Writes each displayed figure to `<dir>/<title>.png` instead of opening a
/// window. The title is reduced to lowercase ASCII letters, digits and `-`.
#[derive(Debug, Clone)]
pub struct SnapshotViewer {
    dir: PathBuf,
    last: Option<PathBuf>,
}

impl Default for SnapshotViewer {
    fn default() -> Self {
        SnapshotViewer::new(std::env::temp_dir())
    }
}

impl SnapshotViewer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SnapshotViewer {
            dir: dir.into(),
            last: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the most recent snapshot
    pub fn last_path(&self) -> Option<&Path> {
        self.last.as_deref()
    }

    pub fn path_for(&self, title: &str) -> PathBuf {
        self.dir.join(format!("{}.png", slugify(title)))
    }
}

impl Viewer for SnapshotViewer {
    fn display(&mut self, canvas: &Canvas, title: &str) -> Result<(), PlotError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(title);
        canvas.save(&path)?;
        crate::log::info!(path = %path.display(), "figure snapshot written");
        self.last = Some(path);
        Ok(())
    }
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("figure");
    }
    slug
}
