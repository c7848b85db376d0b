use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;

// Last timestep index written by the standard model run
pub const DEFAULT_END_INDEX: usize = 1416;

// Fields exported by the model, in regeneration order
pub const DEFAULT_FIELDS: [&str; 6] = [
    "Elevation2d",
    "Elevation3d",
    "Velocity2d",
    "Velocity3d",
    "VertVelo3d",
    "Salinity3d",
];

pub const DEFAULT_GENERATOR: &str = "generatePVD.py";

// Zero padding of the index in per-timestep file names
pub const INDEX_WIDTH: usize = 5;

// Upper bound on entries in one collection
pub const MAX_DATASETS: usize = 1_000_000;

// VTK file flavour referenced from the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Extension {
    Vtu,
    #[default]
    Pvtu,
}

impl Extension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Extension::Vtu => "vtu",
            Extension::Pvtu => "pvtu",
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Options shared by every collection a run generates
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    pub start: usize,
    pub extension: Extension,
    pub timestep_scale: f64,
    pub skip_missing: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            start: 0,
            extension: Extension::default(),
            timestep_scale: 1.0,
            skip_missing: false,
        }
    }
}

// Inputs for one collection file
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionConfig {
    pub out_dir: PathBuf,
    pub name: String,
    pub end: usize,
    pub options: GeneratorOptions,
}

impl CollectionConfig {
    pub fn new(out_dir: impl Into<PathBuf>, name: impl Into<String>, end: usize) -> Self {
        CollectionConfig {
            out_dir: out_dir.into(),
            name: name.into(),
            end,
            options: GeneratorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }
}
