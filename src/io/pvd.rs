use crate::collection::Collection;
use crate::error::PvdError;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

// Render a collection as a VTK "Collection" XML document
pub fn render(collection: &Collection) -> String {
    let mut xml = String::with_capacity(128 + collection.datasets.len() * 80);
    xml.push_str("<?xml version=\"1.0\"?>\n");
    xml.push_str("<VTKFile type=\"Collection\" version=\"0.1\" byte_order=\"LittleEndian\">\n");
    xml.push_str("  <Collection>\n");
    for dataset in &collection.datasets {
        // f64 Display drops the fraction for integral values
        let _ = writeln!(
            xml,
            "    <DataSet timestep=\"{}\" part=\"{}\" file=\"{}\"/>",
            dataset.timestep,
            dataset.part,
            escape_attr(&dataset.file)
        );
    }
    xml.push_str("  </Collection>\n");
    xml.push_str("</VTKFile>\n");
    xml
}

// Write <out_dir>/<name>.pvd, replacing any previous index in one step
pub fn write_pvd(out_dir: &Path, collection: &Collection) -> Result<PathBuf, PvdError> {
    fs::create_dir_all(out_dir).map_err(|e| PvdError::io(out_dir, e))?;

    let target = out_dir.join(collection.pvd_file_name());
    let staging = out_dir.join(format!(".{}.tmp", collection.pvd_file_name()));

    let staged = stage(&staging, collection).and_then(|_| {
        fs::rename(&staging, &target).map_err(|e| PvdError::io(&target, e))
    });
    if let Err(e) = staged {
        // Don't leave the staging file behind
        let _ = fs::remove_file(&staging);
        return Err(e);
    }
    Ok(target)
}

fn stage(staging: &Path, collection: &Collection) -> Result<(), PvdError> {
    let file = File::create(staging).map_err(|e| PvdError::io(staging, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(render(collection).as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| PvdError::io(staging, e))
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
