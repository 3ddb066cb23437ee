// ABOUTME: Reading the input medical report and writing the final diagnosis file.
// ABOUTME: Rendering is pure so the output layout can be tested without touching the filesystem.

use std::io::Read;
use std::path::Path;

use medpanel_core::{FinalReport, ResultSet};
use thiserror::Error;

pub const SUCCESS_HEADER: &str = "### Final Diagnosis:\n\n";
pub const FAILURE_MESSAGE: &str =
    "The Multidisciplinary Team analysis failed and could not generate a final report.";

#[derive(Debug, Error)]
pub enum ReportIoError {
    #[error("failed to read report from {source_name}: {source}")]
    Read {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("report from {0} is empty")]
    Empty(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read the report from `path`, or from stdin when `path` is `None`.
/// Blank reports are rejected.
pub fn read_report(path: Option<&Path>) -> Result<String, ReportIoError> {
    let (source_name, result) = match path {
        Some(p) => (p.display().to_string(), std::fs::read_to_string(p)),
        None => {
            let mut buf = String::new();
            let result = std::io::stdin().read_to_string(&mut buf).map(|_| buf);
            ("stdin".to_string(), result)
        }
    };

    let text = result.map_err(|source| ReportIoError::Read {
        source_name: source_name.clone(),
        source,
    })?;

    if text.trim().is_empty() {
        return Err(ReportIoError::Empty(source_name));
    }
    Ok(text)
}

/// Render the file contents for a finished run. With `specialists`, each
/// specialist's outcome is appended below the final report.
pub fn render(report: &FinalReport, specialists: Option<&ResultSet>) -> String {
    let mut out = match report {
        FinalReport::Success(text) => format!("{SUCCESS_HEADER}{text}"),
        FinalReport::Failure(_) => FAILURE_MESSAGE.to_string(),
    };

    if let Some(results) = specialists {
        out.push_str("\n\n### Specialist Reports:\n");
        for (role, outcome) in results.iter() {
            match outcome.text() {
                Some(text) => out.push_str(&format!("\n#### {role}\n\n{text}\n")),
                None => out.push_str(&format!(
                    "\n#### {role}\n\nFailed: {}\n",
                    outcome.reason().unwrap_or_default()
                )),
            }
        }
    }

    out
}

/// Write `contents` to `path`, creating missing parent directories.
pub fn write_output(path: &Path, contents: &str) -> Result<(), ReportIoError> {
    let to_err = |source| ReportIoError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(to_err)?;
    }
    std::fs::write(path, contents).map_err(to_err)
}
