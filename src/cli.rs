use crate::config::{DEFAULT_END_INDEX, Extension, GeneratorOptions};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Regenerate ParaView collection (.pvd) files for model output fields
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Regenerate the collections of every exported field
    Batch(BatchArgs),
    /// Write the collection of a single field
    Generate(GenerateArgs),
}

#[derive(ClapArgs, Debug)]
pub struct BatchArgs {
    /// Output directory holding the per-field timestep files
    pub out_dir: String,

    /// Last timestep index to include
    #[arg(short, long, default_value_t = DEFAULT_END_INDEX)]
    pub end: usize,

    /// Field to regenerate, repeat to replace the default list
    #[arg(short, long = "field", value_name = "NAME")]
    pub fields: Vec<String>,

    /// External generator to spawn instead of the built-in one
    #[arg(short, long, value_name = "PATH")]
    pub program: Option<String>,

    /// Print the generator command lines without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Write a CSV report of every call
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    #[command(flatten)]
    pub generator: GeneratorArgs,
}

#[derive(ClapArgs, Debug)]
pub struct GenerateArgs {
    /// Output directory; the .pvd is written here
    #[arg(short = 'd', long = "directory")]
    pub out_dir: PathBuf,

    /// Field name
    #[arg(short = 'n', long = "name")]
    pub name: String,

    /// Last timestep index to include
    #[arg(short, long)]
    pub end: usize,

    /// First timestep index to include
    #[arg(short, long, default_value_t = 0)]
    pub start: usize,

    #[command(flatten)]
    pub generator: GeneratorArgs,
}

#[derive(ClapArgs, Debug)]
pub struct GeneratorArgs {
    /// Extension of the referenced timestep files
    #[arg(long, value_enum, default_value_t = Extension::Pvtu)]
    pub extension: Extension,

    /// Timestep value written per index step
    #[arg(long, default_value_t = 1.0)]
    pub timestep_scale: f64,

    /// Leave out indices whose timestep file does not exist
    #[arg(long)]
    pub skip_missing: bool,
}

impl GeneratorArgs {
    // True when any flag differs from its default
    pub fn is_set(&self) -> bool {
        self.options(0) != GeneratorOptions::default()
    }

    pub fn options(&self, start: usize) -> GeneratorOptions {
        GeneratorOptions {
            start,
            extension: self.extension,
            timestep_scale: self.timestep_scale,
            skip_missing: self.skip_missing,
        }
    }
}

pub fn get_args() -> Args {
    Args::parse()
}
