use crate::error::{ChunkerError, Result};
use crate::types::Document;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const TEXT_EXTENSION: &str = "txt";

/// Loads `.txt` documents from a single file or a directory tree
#[derive(Debug, Clone)]
pub struct TextFileLoader {
    path: PathBuf,
}

impl TextFileLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read every matching file, attributing each to its file name
    ///
    /// Directories are walked recursively in file-name order so the result is stable.
    pub fn load_documents(&self) -> Result<Vec<Document>> {
        let documents = if self.path.is_dir() {
            self.load_directory()?
        } else if self.path.is_file() && is_text_file(&self.path) {
            vec![load_file(&self.path)?]
        } else {
            return Err(ChunkerError::unsupported_path(format!(
                "{} is neither a directory nor a .{TEXT_EXTENSION} file",
                self.path.display()
            )));
        };

        log::info!(
            "Loaded {} documents from {}",
            documents.len(),
            self.path.display()
        );
        Ok(documents)
    }

    fn load_directory(&self) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for entry in WalkDir::new(&self.path).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && is_text_file(entry.path()) {
                documents.push(load_file(entry.path())?);
            }
        }
        Ok(documents)
    }
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == TEXT_EXTENSION)
}

fn load_file(path: &Path) -> Result<Document> {
    let text = std::fs::read_to_string(path)?;
    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    log::debug!("Read {} ({} bytes)", path.display(), text.len());
    Ok(Document::new(text, source))
}
