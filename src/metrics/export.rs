//! Result files: CSV with an appended summary block, and JSON.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::{Terminator, WriterBuilder};

use crate::error::LLMError;

use super::trial_log::MetricsExport;

/// Column order is relied on by downstream tooling.
pub const CSV_HEADER: [&str; 5] = [
    "correct",
    "response_time",
    "response",
    "expected_output",
    "evaluation_log",
];

const SUMMARY_SEPARATOR: &str = "\n\n# Summary Metrics\n";

fn bool_cell(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Writes the records table followed by the summary block.
pub fn write_csv<W: Write>(export: &MetricsExport, mut writer: W) -> Result<(), LLMError> {
    {
        let mut table = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut writer);
        table.write_record(CSV_HEADER)?;
        for record in &export.records {
            let seconds = record.response_time.as_secs_f64().to_string();
            table.write_record([
                bool_cell(record.correct),
                seconds.as_str(),
                record.response_text.as_str(),
                record.expected_output.as_str(),
                record.evaluation_log.as_str(),
            ])?;
        }
        table.flush()?;
    }

    writer.write_all(SUMMARY_SEPARATOR.as_bytes())?;

    let summary = &export.summary;
    let mut block = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(&mut writer);
    block.write_record(["metric", "value"])?;
    let rows = [
        ("total_trials", summary.total.to_string()),
        ("correct_count", summary.correct_count.to_string()),
        (
            "correct_percentage",
            format!("{:.2}%", summary.correct_percentage()),
        ),
    ];
    for (metric, value) in &rows {
        block.write_record([*metric, value.as_str()])?;
    }
    block.flush()?;
    Ok(())
}

pub fn export_csv(export: &MetricsExport, path: &Path) -> Result<(), LLMError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_csv(export, &mut writer)?;
    writer.flush()?;
    log::info!("Wrote {} trial records to {}", export.records.len(), path.display());
    Ok(())
}

pub fn export_json(export: &MetricsExport, path: &Path) -> Result<(), LLMError> {
    let payload = serde_json::to_vec_pretty(export)?;
    std::fs::write(path, payload)?;
    log::info!("Wrote JSON results to {}", path.display());
    Ok(())
}
