//! Directory-backed source provider.
//!
//! Each supported file in the inbox directory is one document; a sibling
//! `<name>.processed` marker keeps consumed documents out of later cycles.

use std::fs;
use std::io;
use std::path::PathBuf;

use ledgermatch_core::error::SourceError;
use ledgermatch_core::source::{Attachment, DocumentRef, SourceDocument, SourceProvider};

const SUPPORTED: &[&str] = &[
    "pdf", "html", "htm", "txt", "png", "jpg", "jpeg", "tiff", "bmp",
];

pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("inbox directory not found: {}", root.display()),
            ));
        }
        Ok(Self { root })
    }

    fn marker(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.processed"))
    }
}

impl SourceProvider for DirSource {
    fn list_unprocessed(&self) -> Result<Vec<DocumentRef>, SourceError> {
        let entries = fs::read_dir(&self.root).map_err(|e| SourceError::List(e.to_string()))?;

        let mut refs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SourceError::List(e.to_string()))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !SUPPORTED.contains(&extension.to_lowercase().as_str()) {
                continue;
            }
            if self.marker(name).exists() {
                continue;
            }
            refs.push(DocumentRef::new(name));
        }

        // Stable processing order across cycles.
        refs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(refs)
    }

    fn fetch(&self, document: &DocumentRef) -> Result<SourceDocument, SourceError> {
        let path = self.root.join(&document.id);
        let fetch_err = |e: io::Error| SourceError::Fetch {
            id: document.id.clone(),
            reason: e.to_string(),
        };

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let mut doc = SourceDocument {
            subject: document.id.clone(),
            ..Default::default()
        };

        match extension.as_str() {
            "txt" => doc.text = Some(fs::read_to_string(&path).map_err(fetch_err)?),
            "html" | "htm" => doc.html = Some(fs::read_to_string(&path).map_err(fetch_err)?),
            _ => doc.attachments.push(Attachment {
                file_name: document.id.clone(),
                content: fs::read(&path).map_err(fetch_err)?,
            }),
        }

        Ok(doc)
    }

    fn mark_processed(&mut self, document: &DocumentRef) -> Result<(), SourceError> {
        fs::write(self.marker(&document.id), "")
            .map_err(|_| SourceError::MarkProcessed(document.id.clone()))
    }
}
