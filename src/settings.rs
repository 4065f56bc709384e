// Import necessary libraries and modules for file I/O and serialization.
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

// Define a structure to hold application settings with serialization and deserialization capabilities.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Settings {
    pub primary_model: String, // Model that speaks as the persona.
    pub helper_model: String,  // Cheaper model for search decisions and summaries.
    pub temperature: f32,
    pub max_tokens: u32,
    pub search_enabled: bool, // Initial state of the search toggle.
    pub max_search_results: usize,
    pub transcript_dir: PathBuf,
    pub debug_mode: bool, // Flag to enable or disable debug logging.
}

// Implement the Default trait for Settings to provide a method to create default settings.
impl Default for Settings {
    fn default() -> Self {
        Settings {
            primary_model: "gpt-4o".to_string(),
            helper_model: "gpt-4o-mini".to_string(),
            temperature: 0.8,
            max_tokens: 2000,
            search_enabled: true,
            max_search_results: 5,
            transcript_dir: PathBuf::from("chat_history"),
            debug_mode: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    // Load settings from the default file path, falling back to defaults.
    pub fn load() -> Self {
        match get_data_dir() {
            Some(dir) => Self::load_settings_from_file(dir.join("settings.json")).unwrap_or_default(),
            None => Self::default(),
        }
    }

    // Save current settings to the default file path.
    pub fn save(&self) -> io::Result<()> {
        let dir = get_data_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No home directory"))?;
        self.save_to_file(dir.join("settings.json"))
    }

    // Load settings from a specified file path.
    pub fn load_settings_from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let data = fs::read_to_string(path)?; // Read settings from file.
        let settings = serde_json::from_str(&data)?; // Deserialize JSON data into settings.
        Ok(settings)
    }

    // Save current settings to a specified file path.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?; // Create the directory if it doesn't exist.
        }
        let mut file = fs::File::create(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }
}

// Base directory for settings and logs: ~/persona_chat/data
pub fn get_data_dir() -> Option<PathBuf> {
    dir::home_dir().map(|home| home.join("persona_chat").join("data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{ "primary_model": "gpt-4o-ca", "debug_mode": true }"#).unwrap();

        let settings = Settings::load_settings_from_file(&path).unwrap();
        assert_eq!(settings.primary_model, "gpt-4o-ca");
        assert!(settings.debug_mode);
        assert_eq!(settings.helper_model, "gpt-4o-mini");
        assert_eq!(settings.max_search_results, 5);
    }
}
