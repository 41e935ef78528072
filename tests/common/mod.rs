use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use madan::config::Config;
use madan::intent::ExternalSurface;
use madan::render::{ChatEntry, Renderer};
use madan::speech::Speaker;
use madan::storage::SledStore;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn create_temp_store() -> (Arc<SledStore>, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let store = SledStore::new(tmp.path().join("store")).expect("failed to open store");
    (Arc::new(store), tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Configuration pointing the provider at a mock server, voice off
#[allow(dead_code)]
pub fn config_for_server(uri: &str) -> Config {
    let mut config = Config::default();
    config.provider.api_url = format!("{}/api/v1/chat/completions", uri);
    config.provider.api_key = Some("test-key".to_string());
    config.provider.model = "test/model".to_string();
    config.voice.output_enabled = false;
    config
}

#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingRenderer {
    entries: Mutex<Vec<ChatEntry>>,
    notices: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingRenderer {
    pub fn entries(&self) -> Vec<ChatEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, entry: &ChatEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }

    fn notice(&self, text: &str) {
        self.notices.lock().unwrap().push(text.to_string());
    }
}

#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingSpeaker {
    spoken: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingSpeaker {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, text: &str) -> madan::Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn cancel(&self) {}
}

/// Surface that records opened URLs instead of launching a browser
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingSurface {
    opened: Mutex<Vec<String>>,
    closed: Mutex<usize>,
}

#[allow(dead_code)]
impl RecordingSurface {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn closed(&self) -> usize {
        *self.closed.lock().unwrap()
    }
}

impl ExternalSurface for RecordingSurface {
    fn open_url(&self, url: &str) {
        self.opened.lock().unwrap().push(url.to_string());
    }

    fn close_media(&self) {
        *self.closed.lock().unwrap() += 1;
    }
}
