use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PvdError {
    #[error("Invalid field name: {0:?}")]
    InvalidName(String),

    #[error("Empty index range: start {start} is after end {end}")]
    EmptyRange { start: usize, end: usize },

    #[error("Index range {start}..={end} exceeds {max} timesteps")]
    TooManyTimesteps { start: usize, end: usize, max: usize },

    #[error("Timestep scale must be finite, got {0}")]
    InvalidScale(f64),

    #[error("No output files found for {name} in {dir:?}")]
    NoDatasets { name: String, dir: PathBuf },

    #[error("Bad generator arguments: {0}")]
    BadArgs(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PvdError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PvdError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Generator(#[from] PvdError),
}

impl LaunchError {
    // Status a shell would report for the same failure
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound => 127,
            LaunchError::Spawn { .. } => 126,
            LaunchError::Generator(_) => 1,
        }
    }
}
