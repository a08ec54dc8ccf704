//! Zip container I/O.
//!
//! Every entry is kept in its original order with its compression method,
//! so rewriting a package only changes the parts that were replaced.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::DocxError;

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    data: Vec<u8>,
    method: CompressionMethod,
    is_dir: bool,
}

/// An opened document package.
#[derive(Debug, Clone, Default)]
pub struct Package {
    entries: Vec<Entry>,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every entry of a zip container into memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            entries.push(Entry {
                name: file.name().to_string(),
                method: file.compression(),
                is_dir: file.is_dir(),
                data,
            });
        }
        Ok(Self { entries })
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.data.as_slice())
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Replace a part's bytes, or append it as a new deflated entry.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(Entry {
                name: name.to_string(),
                data,
                method: CompressionMethod::Deflated,
                is_dir: false,
            }),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        self.to_bytes_with(&[])
    }

    /// Write the package, substituting the given parts without touching `self`.
    pub fn to_bytes_with(&self, overrides: &[(&str, &[u8])]) -> Result<Vec<u8>, DocxError> {
        let save = |e: zip::result::ZipError| DocxError::Save(e.to_string());
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for entry in &self.entries {
            // Methods we cannot re-encode (Deflate64, bzip2, ...) fall back to deflate.
            let method = match entry.method {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let options = SimpleFileOptions::default().compression_method(method);
            if entry.is_dir {
                writer.add_directory(entry.name.as_str(), options).map_err(save)?;
                continue;
            }
            let data = overrides
                .iter()
                .find(|(name, _)| *name == entry.name)
                .map(|(_, data)| *data)
                .unwrap_or(entry.data.as_slice());
            writer.start_file(entry.name.as_str(), options).map_err(save)?;
            writer
                .write_all(data)
                .map_err(|e| DocxError::Save(e.to_string()))?;
        }

        let cursor = writer.finish().map_err(save)?;
        Ok(cursor.into_inner())
    }
}
