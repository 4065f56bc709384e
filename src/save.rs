use crate::error::{AppError, Result};
use crate::message::ChatMessage;

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{File, create_dir_all, read_dir, write};
use std::path::{Path, PathBuf};

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// On-disk transcript: `{character, timestamp, messages}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Transcript {
    pub character: String,
    pub timestamp: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Clone, Debug)]
pub struct TranscriptManager {
    dir: PathBuf,
    pub available_transcripts: Vec<PathBuf>,
}

impl TranscriptManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            available_transcripts: Self::scan_dir(&dir),
            dir,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn refresh(&mut self) {
        self.available_transcripts = Self::scan_dir(&self.dir);
    }

    // Newest first; file names embed a sortable timestamp.
    fn scan_dir(dir: &Path) -> Vec<PathBuf> {
        let Ok(entries) = read_dir(dir) else {
            return Vec::new();
        };

        let mut transcripts: Vec<PathBuf> = entries
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.is_file() && path.extension()? == "json" {
                    Some(path)
                } else {
                    None
                }
            })
            .collect();
        transcripts.sort_by(|a, b| {
            transcript_timestamp(b)
                .cmp(&transcript_timestamp(a))
                .then_with(|| b.cmp(a))
        });
        transcripts
    }

    pub fn save(&mut self, character: &str, messages: &[ChatMessage]) -> Result<PathBuf> {
        if messages.is_empty() {
            return Err(AppError::NothingToSave);
        }
        create_dir_all(&self.dir)?;

        let transcript = Transcript {
            character: character.to_string(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            messages: messages.to_vec(),
        };
        let path = self
            .dir
            .join(format!("{}_{}.json", transcript.character, transcript.timestamp));
        write(&path, serde_json::to_string_pretty(&transcript)?)?;
        log::info!("Transcript saved to {}", path.display());

        self.refresh();
        Ok(path)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Transcript> {
        let file = File::open(path.as_ref())?;
        let transcript = serde_json::from_reader(file)?;
        Ok(transcript)
    }
}

// `sherlock_20250101_120000.json` -> `20250101_120000`
fn transcript_timestamp(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| {
            let bytes = stem.len();
            (bytes >= 15 && stem.is_char_boundary(bytes - 15))
                .then(|| stem[bytes - 15..].to_string())
        })
        .unwrap_or_default()
}

/// Display label for a transcript file.
pub fn transcript_label(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string()
}
