use crate::batch::Invocation;
use crate::collection::Collection;
use crate::config::{CollectionConfig, GeneratorOptions};
use crate::error::{LaunchError, PvdError};
use crate::io::pvd::write_pvd;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

// Result of one generator call
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchOutput {
    pub exit_code: i32,
    // Known only when the collection was built in-process
    pub datasets: Option<usize>,
}

pub trait Launcher {
    fn launch(&self, invocation: &Invocation) -> Result<LaunchOutput, LaunchError>;
}

// Runs an external generator program with the invocation's arguments
pub struct ExternalLauncher;

impl Launcher for ExternalLauncher {
    fn launch(&self, invocation: &Invocation) -> Result<LaunchOutput, LaunchError> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .status()
            .map_err(|source| LaunchError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        Ok(LaunchOutput {
            exit_code: shell_status(status),
            datasets: None,
        })
    }
}

// Exit status as a shell reports it: the code, or 128 + signal number
pub fn shell_status(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

// Builds and writes the collection without leaving the process
pub struct InProcessLauncher {
    pub options: GeneratorOptions,
}

impl InProcessLauncher {
    pub fn new(options: GeneratorOptions) -> Self {
        InProcessLauncher { options }
    }
}

impl Launcher for InProcessLauncher {
    fn launch(&self, invocation: &Invocation) -> Result<LaunchOutput, LaunchError> {
        let cfg = parse_generator_args(&invocation.args, &self.options)?;
        let collection = Collection::build(&cfg)?;
        let path = write_pvd(&cfg.out_dir, &collection)?;
        tracing::debug!(path = %path.display(), datasets = collection.datasets.len(), "Wrote collection");

        Ok(LaunchOutput {
            exit_code: 0,
            datasets: Some(collection.datasets.len()),
        })
    }
}

// Read back the -d/-e/-n/-s flags the batch planner emits
pub fn parse_generator_args(
    args: &[String],
    defaults: &GeneratorOptions,
) -> Result<CollectionConfig, PvdError> {
    let mut out_dir: Option<PathBuf> = None;
    let mut end: Option<usize> = None;
    let mut name: Option<String> = None;
    let mut options = defaults.clone();

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| PvdError::BadArgs(format!("missing value for {flag}")))?;
        match flag.as_str() {
            "-d" => out_dir = Some(PathBuf::from(value)),
            "-e" => end = Some(parse_index(flag, value)?),
            "-s" => options.start = parse_index(flag, value)?,
            "-n" => name = Some(value.clone()),
            other => return Err(PvdError::BadArgs(format!("unknown flag {other}"))),
        }
    }

    let out_dir = out_dir.ok_or_else(|| PvdError::BadArgs("missing -d".to_string()))?;
    let end = end.ok_or_else(|| PvdError::BadArgs("missing -e".to_string()))?;
    let name = name.ok_or_else(|| PvdError::BadArgs("missing -n".to_string()))?;

    Ok(CollectionConfig::new(out_dir, name, end).with_options(options))
}

fn parse_index(flag: &str, value: &str) -> Result<usize, PvdError> {
    value
        .parse::<usize>()
        .map_err(|_| PvdError::BadArgs(format!("{flag} expects a non-negative integer, got {value:?}")))
}
