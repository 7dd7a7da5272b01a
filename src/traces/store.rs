use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::{Trace, TRACE_COLUMNS};
use crate::error::{DataError, DataResult};

/// Read every trace from a headered CSV file.
///
/// Columns are matched by header name; columns that are not part of [`Trace`] are ignored.
pub fn load_traces(path: &Path) -> DataResult<Vec<Trace>> {
    if !path.exists() {
        return Err(DataError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let csv_err = |source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let traces = reader
        .deserialize::<Trace>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)?;

    info!(path = %path.display(), rows = traces.len(), "Loaded traces");
    Ok(traces)
}

/// Write traces as headered CSV, creating the parent directory when needed.
pub fn write_traces(path: &Path, traces: &[Trace]) -> DataResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let csv_err = |source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    if traces.is_empty() {
        // serialize() emits the header lazily, so an empty sample needs it written here
        writer.write_record(TRACE_COLUMNS).map_err(csv_err)?;
    }
    for trace in traces {
        writer.serialize(trace).map_err(csv_err)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = traces.len(), "Wrote traces");
    Ok(())
}
