//! CSV and JSON writers

use super::rows::ReportRow;
use crate::simulation::SimulationResult;
use crate::types::OutputFormat;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Quote a CSV field when it holds a separator, a quote or a line break
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn create_parent(path: &Path) -> SimulationResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write `rows` as CSV with a header taken from the first row
///
/// An empty slice produces an empty file.
pub fn write_csv<R: ReportRow>(path: &Path, rows: &[R]) -> SimulationResult<()> {
    create_parent(path)?;
    let mut writer = BufWriter::new(File::create(path)?);

    if let Some(first) = rows.first() {
        let header: Vec<&str> = first.fields().into_iter().map(|(name, _)| name).collect();
        writeln!(writer, "{}", header.join(","))?;
    }
    for row in rows {
        let values: Vec<String> = row.fields().into_iter().map(|(_, value)| escape(&value)).collect();
        writeln!(writer, "{}", values.join(","))?;
    }

    writer.flush()?;
    debug!("Wrote {} CSV rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write `rows` as a pretty-printed JSON array
pub fn write_json<R: Serialize>(path: &Path, rows: &[R]) -> SimulationResult<()> {
    create_parent(path)?;
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, rows)?;
    debug!("Wrote {} JSON rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write `rows` to `<dir>/<stem>.<ext>` in `format`; returns the file path
pub fn write_rows<R: ReportRow + Serialize>(
    dir: &Path,
    stem: &str,
    rows: &[R],
    format: OutputFormat,
) -> SimulationResult<PathBuf> {
    let path = dir.join(format!("{}.{}", stem, format.extension()));
    match format {
        OutputFormat::Csv => write_csv(&path, rows)?,
        OutputFormat::Json => write_json(&path, rows)?,
    }
    info!("Report written: {} ({} rows)", path.display(), rows.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SampleRow;
    use tempfile::tempdir;

    #[test]
    fn test_escape() {
        assert_eq!(escape("XRay"), "XRay");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_write_rows_creates_nested_directories() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("runs-samples").join("run-0");
        let rows = vec![SampleRow {
            timestamp: 300.0,
            node: "EGates".to_string(),
            metric: "Total".to_string(),
            value: 4.0,
        }];

        let path = write_rows(&dir, "sample", &rows, OutputFormat::Csv).unwrap();
        assert!(path.ends_with("runs-samples/run-0/sample.csv"));
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content, "timestamp,node,metric,value\n300,EGates,Total,4\n");
    }
}
