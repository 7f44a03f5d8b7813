use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::form::{ValueMap, values_to_json};

use super::DocumentFormat;

/// Destination for a serialized submission.
#[derive(Debug, Clone)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }
}

/// Serializes a submitted value map to one or more destinations.
#[derive(Debug, Clone)]
pub struct SubmissionWriter {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destinations: Vec<OutputDestination>,
}

impl SubmissionWriter {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }

    pub fn write(&self, values: &ValueMap) -> Result<()> {
        if self.destinations.is_empty() {
            return Ok(());
        }
        let payload = self.serialize(values)?;
        for destination in &self.destinations {
            write_payload(destination, &payload).with_context(|| match destination {
                OutputDestination::Stdout => "failed to write to stdout".to_string(),
                OutputDestination::File(path) => {
                    format!("failed to write to file {}", path.display())
                }
            })?;
        }
        Ok(())
    }

    fn serialize(&self, values: &ValueMap) -> Result<String> {
        let json = values_to_json(values);
        match self.format {
            DocumentFormat::Json => {
                if self.pretty {
                    serde_json::to_string_pretty(&json).context("failed to serialize JSON")
                } else {
                    serde_json::to_string(&json).context("failed to serialize JSON")
                }
            }
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => {
                serde_yaml::to_string(&json).context("failed to serialize YAML")
            }
            #[cfg(feature = "toml")]
            DocumentFormat::Toml => {
                if self.pretty {
                    toml::to_string_pretty(&json).context("failed to serialize TOML")
                } else {
                    toml::to_string(&json).context("failed to serialize TOML")
                }
            }
        }
    }
}

fn write_payload(destination: &OutputDestination, payload: &str) -> Result<()> {
    match destination {
        OutputDestination::Stdout => {
            let mut stdout = io::stdout();
            stdout
                .write_all(payload.as_bytes())
                .and_then(|_| stdout.write_all(b"\n"))
                .context("failed to flush stdout")?;
            stdout.flush().context("failed to flush stdout")
        }
        OutputDestination::File(path) => {
            let mut file = File::create(path)?;
            file.write_all(payload.as_bytes())?;
            file.write_all(b"\n")?;
            file.flush()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldValue;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn sample_values() -> ValueMap {
        let mut values = ValueMap::new();
        values.insert("email".into(), FieldValue::text("a@b.co"));
        values
    }

    #[test]
    fn no_destinations_is_a_noop() {
        let writer = SubmissionWriter::new(DocumentFormat::Json).with_destinations(Vec::new());
        writer.write(&sample_values()).unwrap();
    }

    #[test]
    fn writes_submission_to_file() {
        let filename = format!(
            "dynform-test-{}.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        );
        let path = std::env::temp_dir().join(filename);
        let writer = SubmissionWriter::new(DocumentFormat::Json)
            .with_destinations(vec![OutputDestination::file(&path)]);
        writer.write(&sample_values()).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"email\""));
        assert!(contents.contains("a@b.co"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn compact_json_stays_on_one_line() {
        let writer = SubmissionWriter::new(DocumentFormat::Json).with_pretty(false);
        let payload = writer.serialize(&sample_values()).unwrap();
        assert!(!payload.contains('\n'));
    }
}
