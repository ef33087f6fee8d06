//! Display step: where finished figures go

use chrono::Local;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::info;
use uuid::Uuid;

use super::raster::rasterize;
use crate::error::Result;
use crate::figure::Figure;
use crate::fonts;

/// Receives every figure a component finishes drawing.
pub trait FigureSink {
    fn show(&mut self, figure: &Figure) -> Result<()>;
}

/// Rasterizes figures and writes them as PNG files:
/// `<dir>/<figure-name>_<timestamp>_<id>.png`
#[derive(Debug, Clone)]
pub struct PngSink {
    dir: PathBuf,
    last_path: Option<PathBuf>,
}

impl PngSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_path: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the most recently written figure
    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }
}

impl FigureSink for PngSink {
    fn show(&mut self, figure: &Figure) -> Result<()> {
        let image = rasterize(figure, fonts::get())?;
        fs::create_dir_all(&self.dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let id = Uuid::new_v4().simple().to_string();
        let path = self
            .dir
            .join(format!("{}_{}_{}.png", figure.name, timestamp, &id[..8]));
        image.save(&path)?;

        info!(
            "Wrote {} ({}x{}) to {}",
            figure.name,
            figure.width,
            figure.height,
            path.display()
        );
        self.last_path = Some(path);
        Ok(())
    }
}

/// Keeps shown figures in memory; clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    shown: Rc<RefCell<Vec<Figure>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.shown.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shown.borrow().is_empty()
    }

    pub fn last(&self) -> Option<Figure> {
        self.shown.borrow().last().cloned()
    }

    pub fn figures(&self) -> Vec<Figure> {
        self.shown.borrow().clone()
    }
}

impl FigureSink for MemorySink {
    fn show(&mut self, figure: &Figure) -> Result<()> {
        self.shown.borrow_mut().push(figure.clone());
        Ok(())
    }
}
