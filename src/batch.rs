use crate::launcher::Launcher;
use chrono::{DateTime, Local};
use indicatif::ProgressBar;
use std::time::Instant;

// One planned generator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub field: String,
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// One executed generator call
#[derive(Debug, Clone)]
pub struct Outcome {
    pub field: String,
    pub command: String,
    pub status: i32,
    pub datasets: Option<usize>,
    pub started: DateTime<Local>,
    pub elapsed_ms: u64,
}

impl Outcome {
    pub fn succeeded(&self) -> bool {
        self.status == 0
    }
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<Outcome>,
}

impl BatchSummary {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }

    // A batch exits with its last call's status, like the shell loop it replaces
    pub fn exit_code(&self) -> i32 {
        self.outcomes.last().map_or(0, |o| o.status)
    }
}

// Build one invocation per field, keeping the field order and passing out_dir through untouched
pub fn plan<S: AsRef<str>>(out_dir: &str, end: usize, fields: &[S], program: &str) -> Vec<Invocation> {
    fields
        .iter()
        .map(|field| {
            let field = field.as_ref();
            Invocation {
                field: field.to_string(),
                program: program.to_string(),
                args: vec![
                    "-d".to_string(),
                    out_dir.to_string(),
                    "-e".to_string(),
                    end.to_string(),
                    "-n".to_string(),
                    field.to_string(),
                ],
            }
        })
        .collect()
}

// Run every invocation in order; a failure is recorded and the next field still runs
pub fn run_batch(
    invocations: &[Invocation],
    launcher: &dyn Launcher,
    pb: &ProgressBar,
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for invocation in invocations {
        pb.set_message(invocation.field.clone());
        let command = invocation.command_line();
        tracing::info!(field = %invocation.field, %command, "Generating collection");

        let started = Local::now();
        let timer = Instant::now();
        // Keep the bar from interleaving with the child's output
        let result = pb.suspend(|| launcher.launch(invocation));
        let elapsed_ms = timer.elapsed().as_millis() as u64;

        let (status, datasets) = match result {
            Ok(output) => {
                if output.exit_code != 0 {
                    tracing::warn!(
                        field = %invocation.field,
                        status = output.exit_code,
                        "Generator exited with non-zero status"
                    );
                }
                (output.exit_code, output.datasets)
            }
            Err(e) => {
                tracing::warn!(field = %invocation.field, error = %e, "Generator failed");
                (e.exit_code(), None)
            }
        };

        summary.outcomes.push(Outcome {
            field: invocation.field.clone(),
            command,
            status,
            datasets,
            started,
            elapsed_ms,
        });
        pb.inc(1);
    }

    pb.finish_and_clear();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_END_INDEX, DEFAULT_FIELDS, DEFAULT_GENERATOR};
    use crate::error::{LaunchError, PvdError};
    use crate::launcher::LaunchOutput;
    use std::cell::RefCell;

    // Records every call and fails the fields it is told to
    struct ScriptedLauncher {
        calls: RefCell<Vec<String>>,
        failing: Vec<&'static str>,
    }

    impl ScriptedLauncher {
        fn new(failing: Vec<&'static str>) -> Self {
            ScriptedLauncher {
                calls: RefCell::new(Vec::new()),
                failing,
            }
        }
    }

    impl Launcher for ScriptedLauncher {
        fn launch(&self, invocation: &Invocation) -> Result<LaunchOutput, LaunchError> {
            self.calls.borrow_mut().push(invocation.field.clone());
            if self.failing.contains(&invocation.field.as_str()) {
                return Err(PvdError::BadArgs("scripted failure".to_string()).into());
            }
            Ok(LaunchOutput {
                exit_code: 0,
                datasets: Some(1),
            })
        }
    }

    #[test]
    fn default_plan_matches_regeneration_script() {
        let invocations = plan("results/", DEFAULT_END_INDEX, &DEFAULT_FIELDS, DEFAULT_GENERATOR);
        let lines: Vec<_> = invocations.iter().map(Invocation::command_line).collect();
        assert_eq!(
            lines,
            [
                "generatePVD.py -d results/ -e 1416 -n Elevation2d",
                "generatePVD.py -d results/ -e 1416 -n Elevation3d",
                "generatePVD.py -d results/ -e 1416 -n Velocity2d",
                "generatePVD.py -d results/ -e 1416 -n Velocity3d",
                "generatePVD.py -d results/ -e 1416 -n VertVelo3d",
                "generatePVD.py -d results/ -e 1416 -n Salinity3d",
            ]
        );
    }

    #[test]
    fn each_field_planned_once_with_untouched_directory() {
        let out = "./some dir//nested/";
        let invocations = plan(out, DEFAULT_END_INDEX, &DEFAULT_FIELDS, DEFAULT_GENERATOR);
        assert_eq!(invocations.len(), DEFAULT_FIELDS.len());
        for (invocation, field) in invocations.iter().zip(DEFAULT_FIELDS) {
            assert_eq!(invocation.field, field);
            assert_eq!(invocation.args[0..2], ["-d", out]);
            assert_eq!(invocation.args[2..4], ["-e", "1416"]);
            assert_eq!(invocation.args[4..6], ["-n", field]);
        }
    }

    #[test]
    fn empty_field_list_plans_nothing() {
        let fields: [&str; 0] = [];
        assert!(plan("out", 3, &fields, DEFAULT_GENERATOR).is_empty());
        let summary = run_batch(&[], &ScriptedLauncher::new(vec![]), &ProgressBar::hidden());
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn failure_does_not_stop_the_batch() {
        let invocations = plan("out", 10, &DEFAULT_FIELDS, DEFAULT_GENERATOR);
        let launcher = ScriptedLauncher::new(vec!["Velocity2d"]);
        let summary = run_batch(&invocations, &launcher, &ProgressBar::hidden());

        assert_eq!(*launcher.calls.borrow(), DEFAULT_FIELDS);
        assert_eq!(summary.outcomes.len(), 6);
        assert_eq!(summary.failures(), 1);
        assert_eq!(summary.outcomes[2].status, 1);
        assert_eq!(summary.outcomes[2].datasets, None);
        // Last field succeeded, so the batch does too
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn exit_code_follows_last_invocation() {
        let invocations = plan("out", 10, &DEFAULT_FIELDS, DEFAULT_GENERATOR);
        let launcher = ScriptedLauncher::new(vec!["Salinity3d"]);
        let summary = run_batch(&invocations, &launcher, &ProgressBar::hidden());
        assert_eq!(summary.failures(), 1);
        assert_eq!(summary.exit_code(), 1);
    }
}
