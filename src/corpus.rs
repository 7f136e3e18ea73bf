use crate::error::ConfigurationError;
use std::io::BufRead;
use std::path::Path;

/// The candidate reply lines, plus their lowercase forms at the same indices.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCorpus {
    lines: Vec<String>,
    lines_lower: Vec<String>,
}

impl LineCorpus {
    /// Read one candidate per line, skipping blank ones.
    /// `name` is only used in error messages.
    pub fn load<R: BufRead>(source: R, name: &str) -> Result<Self, ConfigurationError> {
        let mut lines = Vec::new();
        for line in source.lines() {
            let line = line.map_err(|source| ConfigurationError::Unreadable {
                what: "corpus",
                path: name.into(),
                source,
            })?;
            let line = line.trim();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }

        if lines.is_empty() {
            return Err(ConfigurationError::EmptyCorpus(name.to_string()));
        }

        let lines_lower = lines.iter().map(|l| l.to_lowercase()).collect();
        Ok(Self { lines, lines_lower })
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigurationError> {
        let file = std::fs::File::open(path).map_err(|source| ConfigurationError::Unreadable {
            what: "corpus",
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(std::io::BufReader::new(file), &path.display().to_string())
    }

    /// Replace both sequences with a fresh load. On error the current lines are kept.
    pub fn reload<R: BufRead>(&mut self, source: R, name: &str) -> Result<(), ConfigurationError> {
        *self = Self::load(source, name)?;
        Ok(())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn lines_lower(&self) -> &[String] {
        &self.lines_lower
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
