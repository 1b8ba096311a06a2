//! File-backed frame source
//!
//! Stands in for a camera on headless machines: cycles over still images in
//! a directory, feeding them into the gesture sampler as if they were live
//! frames.

use std::fs;
use std::path::{Path, PathBuf};

use super::FrameSource;
use crate::gateway::ImageFrame;
use crate::{Error, Result};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Frame source that cycles over image files in a directory
pub struct FileFrameSource {
    dir: PathBuf,
    frames: Vec<PathBuf>,
    next: usize,
    active: bool,
}

impl FileFrameSource {
    /// Point the source at a directory of still images
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            frames: Vec::new(),
            next: 0,
            active: false,
        }
    }

    fn scan(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut frames: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            })
            .collect();
        frames.sort();
        Ok(frames)
    }
}

impl FrameSource for FileFrameSource {
    fn start(&mut self) -> Result<()> {
        let frames = Self::scan(&self.dir)
            .map_err(|e| Error::Media(format!("cannot open frame directory: {e}")))?;

        if frames.is_empty() {
            return Err(Error::Media(format!(
                "no image files in {}",
                self.dir.display()
            )));
        }

        tracing::debug!(dir = %self.dir.display(), frames = frames.len(), "frame source ready");
        self.frames = frames;
        self.next = 0;
        self.active = true;
        Ok(())
    }

    fn grab(&mut self) -> Result<ImageFrame> {
        if !self.active {
            return Err(Error::Media("frame source not started".to_string()));
        }

        let path = &self.frames[self.next % self.frames.len()];
        self.next += 1;

        let bytes = fs::read(path).map_err(|e| Error::Media(e.to_string()))?;
        tracing::trace!(path = %path.display(), bytes = bytes.len(), "frame captured");
        Ok(ImageFrame::from_bytes(&bytes))
    }

    fn stop(&mut self) {
        if self.active {
            self.active = false;
            self.frames.clear();
            tracing::debug!("frame source released");
        }
    }
}
