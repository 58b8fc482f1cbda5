use std::path::PathBuf;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors that can occur while saving or loading a Q-table snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unsupported snapshot format version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("snapshot declares {0} actions, must be at least 1")]
    NoActions(usize),

    #[error("entry {state} has {found} values, expected {expected}")]
    ValueCount {
        state: String,
        found: usize,
        expected: usize,
    },

    #[error("entry {0} is not a valid encoded state")]
    InvalidState(String),

    #[error("duplicate entry for {0}")]
    DuplicateState(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the optional on-screen renderer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("rendering unavailable: {0}")]
    Unavailable(String),

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors writing run artifacts (JSON, CSV, plots).
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create run directory {path}: {source}")]
    RunDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no runs found under {0}")]
    NoRuns(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error_display() {
        let err = PersistenceError::ValueCount {
            state: "(0, 1, 0, 1, -1, 2)".to_string(),
            found: 2,
            expected: 3,
        };
        assert_eq!(
            err.to_string(),
            "entry (0, 1, 0, 1, -1, 2) has 2 values, expected 3"
        );
    }

    #[test]
    fn test_render_error_display() {
        let err = RenderError::Unavailable("built without the `tui` feature".to_string());
        assert_eq!(
            err.to_string(),
            "rendering unavailable: built without the `tui` feature"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("alpha must be in (0, 1]".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: alpha must be in (0, 1]"
        );
    }
}
