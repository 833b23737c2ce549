// File: ./src/storage.rs
// Writes the rendered calendar to disk.
use crate::context::AppContext;
use crate::model::adapter::read_summaries;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes to a sibling temp file and renames it over `path`, so readers never
/// see a half-written file.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to move {} into place", tmp_path.display()))?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Stdout,
}

pub struct CalendarStorage;

impl CalendarStorage {
    /// Checks the document parses as iCalendar and returns its event count.
    pub fn validate(ics: &str) -> Result<usize> {
        let summaries = read_summaries(ics)
            .map_err(|e| anyhow::anyhow!("Generated calendar is not valid iCalendar: {}", e))?;
        Ok(summaries.len())
    }

    /// Validates and writes the document. Returns where it went and how many
    /// events it holds.
    pub fn write(ctx: &dyn AppContext, target: &OutputTarget, ics: &str) -> Result<(String, usize)> {
        let count = Self::validate(ics)?;
        match target {
            OutputTarget::File(path) => {
                let path = ctx.resolve_path(path)?;
                atomic_write(&path, ics)?;
                log::info!("Wrote {} event(s) to {}", count, path.display());
                Ok((path.display().to_string(), count))
            }
            OutputTarget::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(ics.as_bytes())
                    .context("Failed to write calendar to stdout")?;
                stdout.flush()?;
                Ok(("stdout".to_string(), count))
            }
        }
    }
}
