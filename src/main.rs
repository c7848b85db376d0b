use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod batch;
mod cli;
mod collection;
mod config;
mod error;
mod io;
mod launcher;

use batch::{plan, run_batch};
use cli::{BatchArgs, Command, GenerateArgs, get_args};
use collection::Collection;
use config::{CollectionConfig, DEFAULT_FIELDS, DEFAULT_GENERATOR};
use io::pvd::write_pvd;
use launcher::{ExternalLauncher, InProcessLauncher, Launcher};

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "pvdgen=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match get_args().command {
        Command::Batch(args) => run_batch_command(args),
        Command::Generate(args) => run_generate_command(args),
    }
}

fn run_generate_command(args: GenerateArgs) -> Result<ExitCode> {
    let cfg = CollectionConfig::new(&args.out_dir, &args.name, args.end)
        .with_options(args.generator.options(args.start));

    let collection = Collection::build(&cfg)
        .with_context(|| format!("Failed to build collection for {}", cfg.name))?;
    let path = write_pvd(&cfg.out_dir, &collection)
        .with_context(|| format!("Failed to write collection for {}", cfg.name))?;

    println!(
        "Wrote {} ({} timesteps)",
        path.display(),
        collection.datasets.len()
    );
    Ok(ExitCode::SUCCESS)
}

fn run_batch_command(args: BatchArgs) -> Result<ExitCode> {
    let fields = batch_fields(&args.fields);

    let program = args.program.as_deref().unwrap_or(DEFAULT_GENERATOR);
    let invocations = plan(&args.out_dir, args.end, fields.as_slice(), program);

    if args.dry_run {
        for invocation in &invocations {
            println!("{}", invocation.command_line());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let launcher: Box<dyn Launcher> = match &args.program {
        Some(program) => {
            if args.generator.is_set() {
                tracing::warn!(
                    %program,
                    "--extension, --timestep-scale and --skip-missing only apply to the built-in generator; ignoring them"
                );
            }
            Box::new(ExternalLauncher)
        }
        None => Box::new(InProcessLauncher::new(args.generator.options(0))),
    };

    println!("Batch Configuration:");
    println!("  Output directory: {}", args.out_dir);
    println!("  End index: {}", args.end);
    println!("  Fields: {}", fields.join(", "));
    println!(
        "  Generator: {}",
        args.program.as_deref().unwrap_or("built-in")
    );

    let pb = ProgressBar::new(invocations.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} fields {msg}")?
            .progress_chars("#>-"),
    );

    let summary = run_batch(&invocations, launcher.as_ref(), &pb);

    if let Some(report) = &args.report {
        io::report::write_report(report, &summary)?;
        println!("Run report saved to {}", report.display());
    }

    let failures = summary.failures();
    if failures > 0 {
        tracing::warn!(failures, total = summary.outcomes.len(), "Some collections were not regenerated");
    }
    println!(
        "\nBatch complete: {}/{} fields succeeded",
        summary.outcomes.len() - failures,
        summary.outcomes.len()
    );

    Ok(ExitCode::from(exit_byte(summary.exit_code())))
}

fn batch_fields(requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect()
    } else {
        requested.to_vec()
    }
}

// Keep the low byte, which is all a parent shell sees of a status
fn exit_byte(status: i32) -> u8 {
    (status & 0xff) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressBar;

    #[test]
    fn default_fields_used_when_none_requested() {
        assert_eq!(batch_fields(&[]), DEFAULT_FIELDS);
        let requested = vec!["Salinity3d".to_string(), "Elevation2d".to_string()];
        assert_eq!(batch_fields(&requested), requested);
    }

    #[test]
    fn exit_byte_passes_shell_statuses_through() {
        assert_eq!(exit_byte(0), 0);
        assert_eq!(exit_byte(1), 1);
        assert_eq!(exit_byte(127), 127);
        assert_eq!(exit_byte(137), 137);
        assert_eq!(exit_byte(256), 0);
        assert_eq!(exit_byte(-1), 255);
    }

    #[cfg(unix)]
    #[test]
    fn batch_killed_by_signal_exits_like_a_shell() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("generate.sh");
        std::fs::write(&script, "#!/bin/sh\nkill -9 $$\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        let invocations = plan("out", 1416, &["Elevation2d"], script.to_str().unwrap());

        let summary = run_batch(&invocations, &ExternalLauncher, &ProgressBar::hidden());

        assert_eq!(summary.failures(), 1);
        assert_eq!(exit_byte(summary.exit_code()), 137);
    }
}
