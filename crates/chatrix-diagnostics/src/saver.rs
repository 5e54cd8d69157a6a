//! Local save-as targets for exported files

use parking_lot::Mutex;
use std::sync::Arc;

use crate::Result;

/// Offers a file to the operator as a local download
pub trait FileSaver {
    fn save_file_as(&self, contents: Vec<u8>, mime_type: &str, file_name: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub file_name: String,
    pub mime_type: String,
    pub contents: Vec<u8>,
}

/// Keeps saved files in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySaver {
    saved: Arc<Mutex<Vec<SavedFile>>>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Vec<SavedFile> {
        self.saved.lock().clone()
    }
}

impl FileSaver for MemorySaver {
    fn save_file_as(&self, contents: Vec<u8>, mime_type: &str, file_name: &str) -> Result<()> {
        self.saved.lock().push(SavedFile {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            contents,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_saver() {
        let saver = MemorySaver::new();
        saver
            .save_file_as(b"{}".to_vec(), "application/json", "logs.json")
            .unwrap();

        let saved = saver.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].file_name, "logs.json");
        assert_eq!(saved[0].contents, b"{}");
    }
}
