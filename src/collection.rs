use crate::config::{CollectionConfig, INDEX_WIDTH, MAX_DATASETS};
use crate::error::PvdError;
use std::path::Path;

// One timestep entry of a PVD collection
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    pub timestep: f64,
    pub part: u32,
    pub file: String,
}

impl DataSet {
    pub fn new(timestep: f64, file: String) -> Self {
        DataSet {
            timestep,
            part: 0,
            file,
        }
    }
}

// Time series index for a single exported field
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub name: String,
    pub datasets: Vec<DataSet>,
}

impl Collection {
    pub fn build(cfg: &CollectionConfig) -> Result<Self, PvdError> {
        validate_name(&cfg.name)?;

        let start = cfg.options.start;
        if start > cfg.end {
            return Err(PvdError::EmptyRange {
                start,
                end: cfg.end,
            });
        }

        let count = (cfg.end - start)
            .checked_add(1)
            .filter(|&n| n <= MAX_DATASETS)
            .ok_or(PvdError::TooManyTimesteps {
                start,
                end: cfg.end,
                max: MAX_DATASETS,
            })?;

        if !cfg.options.timestep_scale.is_finite() {
            return Err(PvdError::InvalidScale(cfg.options.timestep_scale));
        }

        let mut datasets = Vec::with_capacity(count);
        let mut missing = 0usize;
        for index in start..=cfg.end {
            let file = dataset_file(&cfg.name, index, cfg.options.extension.as_str());
            if cfg.options.skip_missing && !cfg.out_dir.join(&file).is_file() {
                missing += 1;
                continue;
            }
            let timestep = index as f64 * cfg.options.timestep_scale;
            datasets.push(DataSet::new(timestep, file));
        }

        if missing > 0 {
            tracing::warn!(
                field = %cfg.name,
                missing,
                "Skipped timesteps without output files"
            );
        }

        if datasets.is_empty() {
            return Err(PvdError::NoDatasets {
                name: cfg.name.clone(),
                dir: cfg.out_dir.clone(),
            });
        }

        Ok(Collection {
            name: cfg.name.clone(),
            datasets,
        })
    }

    pub fn pvd_file_name(&self) -> String {
        format!("{}.pvd", self.name)
    }
}

// Path of a timestep file relative to the collection, e.g. Salinity3d/Salinity3d_00012.pvtu
pub fn dataset_file(name: &str, index: usize, extension: &str) -> String {
    format!(
        "{name}/{name}_{index:0width$}.{extension}",
        width = INDEX_WIDTH
    )
}

fn validate_name(name: &str) -> Result<(), PvdError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed != name
        || name.contains(['/', '\\'])
        || name == "."
        || name == ".."
        || Path::new(name).is_absolute()
    {
        return Err(PvdError::InvalidName(name.to_string()));
    }
    Ok(())
}
