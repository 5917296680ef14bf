//! Test configuration builder writing `main.toml` to a temp dir

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestConfigBuilder {
    temp_dir: TempDir,
    sections: Vec<(String, Vec<String>)>,
    top_level: Vec<String>,
}

pub struct TestConfig {
    pub temp_dir: TempDir,
    pub config_path: PathBuf,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            temp_dir,
            sections: Vec::new(),
            top_level: Vec::new(),
        }
    }

    /// Top-level `key = value` line, value given as TOML
    pub fn with_top_level(mut self, key: &str, value: &str) -> Self {
        self.top_level.push(format!("{} = {}", key, value));
        self
    }

    /// `key = value` line in `[section]`, value given as TOML
    pub fn with(mut self, section: &str, key: &str, value: &str) -> Self {
        let line = format!("{} = {}", key, value);
        match self.sections.iter_mut().find(|(name, _)| name == section) {
            Some((_, lines)) => lines.push(line),
            None => self.sections.push((section.to_string(), vec![line])),
        }
        self
    }

    pub fn to_toml(&self) -> String {
        let mut toml = String::new();
        for line in &self.top_level {
            toml.push_str(line);
            toml.push('\n');
        }
        for (name, lines) in &self.sections {
            toml.push_str(&format!("\n[{}]\n", name));
            for line in lines {
                toml.push_str(line);
                toml.push('\n');
            }
        }
        toml
    }

    pub fn build(self) -> TestConfig {
        let config_dir = self.temp_dir.path().join("config");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        let config_path = config_dir.join("main.toml");
        fs::write(&config_path, self.to_toml()).expect("Failed to write main.toml");

        TestConfig {
            temp_dir: self.temp_dir,
            config_path,
        }
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
