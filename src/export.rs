//! Persisting the measurement table.
//!
//! The table always exports in full shape: zero-filled rows for nodes that
//! were never reached are written out like any other row, so an aborted
//! session still produces a file with one row per grid node.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use clap::ValueEnum;
use thiserror::Error;

use crate::table::{AxisCount, ResultTable};

/// Magic and version prefix of the binary table format.
const BINARY_MAGIC: [u8; 4] = *b"PCTB";
const BINARY_VERSION: u32 = 1;

/// Measurement-table export format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DataFormat {
    #[default]
    Csv,
    /// Binary table with exact float round-tripping.
    Pkl,
    #[cfg(feature = "parquet")]
    Parquet,
    /// Skip the data export entirely.
    None,
}

impl DataFormat {
    /// File extension for this format, `None` when the export is disabled.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            DataFormat::Csv => Some("csv"),
            DataFormat::Pkl => Some("pkl"),
            #[cfg(feature = "parquet")]
            DataFormat::Parquet => Some("parquet"),
            DataFormat::None => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed table file: {0}")]
    Malformed(String),
    #[cfg(feature = "parquet")]
    #[error(transparent)]
    Arrow(#[from] arrow_schema::ArrowError),
    #[cfg(feature = "parquet")]
    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// Column headers in export order for the given axis count.
pub fn csv_header(n_axes: AxisCount) -> &'static [&'static str] {
    match n_axes {
        AxisCount::One => &["Xlocation_pixels", "Ylocation_pixels", "Ax1_pixels"],
        AxisCount::Two => &[
            "Xlocation_pixels",
            "Ylocation_pixels",
            "Ax1_pixels",
            "Ax2_pixels",
        ],
    }
}

/// Write the table as CSV. Floats use their shortest round-trip form.
pub fn write_csv<W: Write>(mut w: W, table: &ResultTable) -> Result<(), ExportError> {
    writeln!(w, "{}", csv_header(table.n_axes()).join(","))?;
    for row in table.iter_rows() {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(w, "{}", cells.join(","))?;
    }
    Ok(())
}

pub fn write_csv_file(path: &Path, table: &ResultTable) -> Result<(), ExportError> {
    write_csv(BufWriter::new(File::create(path)?), table)
}

/// Re-read a CSV export into a table.
pub fn read_csv<R: BufRead>(r: R) -> Result<ResultTable, ExportError> {
    let mut lines = r.lines();
    let header = lines
        .next()
        .ok_or_else(|| ExportError::Malformed("empty file".into()))??;
    let cols = header.split(',').count();
    if !(3..=4).contains(&cols) {
        return Err(ExportError::Malformed(format!(
            "expected 3 or 4 columns, header has {cols}"
        )));
    }
    let mut cells = Vec::new();
    let mut rows = 0usize;
    for line in lines {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != cols {
            return Err(ExportError::Malformed(format!(
                "row {rows} has {} fields, expected {cols}",
                fields.len()
            )));
        }
        for field in fields {
            let value = field
                .trim()
                .parse::<f64>()
                .map_err(|e| ExportError::Malformed(format!("row {rows}: {e}")))?;
            cells.push(value);
        }
        rows += 1;
    }
    ResultTable::from_cells(cells, rows, cols)
        .ok_or_else(|| ExportError::Malformed("inconsistent table shape".into()))
}

pub fn read_csv_file(path: &Path) -> Result<ResultTable, ExportError> {
    read_csv(BufReader::new(File::open(path)?))
}

/// Write the binary table: magic, version, row/column counts and the cells as
/// little-endian `f64`. Round-trips floats exactly.
pub fn write_binary<W: Write>(mut w: W, table: &ResultTable) -> Result<(), ExportError> {
    w.write_all(&BINARY_MAGIC)?;
    w.write_all(&BINARY_VERSION.to_le_bytes())?;
    w.write_all(&(table.rows() as u64).to_le_bytes())?;
    w.write_all(&(table.cols() as u64).to_le_bytes())?;
    for row in table.iter_rows() {
        for value in row {
            w.write_all(&value.to_le_bytes())?;
        }
    }
    Ok(())
}

pub fn write_binary_file(path: &Path, table: &ResultTable) -> Result<(), ExportError> {
    write_binary(BufWriter::new(File::create(path)?), table)
}

/// Re-read a binary table export.
pub fn read_binary<R: Read>(mut r: R) -> Result<ResultTable, ExportError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != BINARY_MAGIC {
        return Err(ExportError::Malformed("bad magic".into()));
    }
    let mut word = [0u8; 4];
    r.read_exact(&mut word)?;
    let version = u32::from_le_bytes(word);
    if version != BINARY_VERSION {
        return Err(ExportError::Malformed(format!("unknown version {version}")));
    }
    let mut long = [0u8; 8];
    r.read_exact(&mut long)?;
    let rows = u64::from_le_bytes(long);
    r.read_exact(&mut long)?;
    let cols = u64::from_le_bytes(long);
    if !(3..=4).contains(&cols) {
        return Err(ExportError::Malformed(format!(
            "expected 3 or 4 columns, header claims {cols}"
        )));
    }
    let total = rows
        .checked_mul(cols)
        .and_then(|t| usize::try_from(t).ok())
        .ok_or_else(|| ExportError::Malformed(format!("implausible row count {rows}")))?;
    // Grow with the bytes actually read; a header claiming more cells than
    // the file holds fails on the first missing read, not on allocation.
    let mut cells = Vec::new();
    for _ in 0..total {
        r.read_exact(&mut long)?;
        cells.push(f64::from_le_bytes(long));
    }
    ResultTable::from_cells(cells, rows as usize, cols as usize)
        .ok_or_else(|| ExportError::Malformed("inconsistent table shape".into()))
}

pub fn read_binary_file(path: &Path) -> Result<ResultTable, ExportError> {
    read_binary(BufReader::new(File::open(path)?))
}

/// Write the table as Parquet via Apache Arrow.
#[cfg(feature = "parquet")]
pub fn write_parquet_file(path: &Path, table: &ResultTable) -> Result<(), ExportError> {
    use arrow_array::{ArrayRef, Float64Array, RecordBatch};
    use arrow_schema::{DataType, Field, Schema};
    use parquet::arrow::arrow_writer::ArrowWriter;
    use parquet::file::properties::WriterProperties;
    use std::sync::Arc;

    let header = csv_header(table.n_axes());
    let schema = Schema::new(
        header
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, false))
            .collect::<Vec<_>>(),
    );
    let columns: Vec<ArrayRef> = (0..table.cols())
        .map(|c| {
            let values: Vec<f64> = table.iter_rows().map(|row| row[c]).collect();
            Arc::new(Float64Array::from(values)) as ArrayRef
        })
        .collect();
    let batch = RecordBatch::try_new(Arc::new(schema.clone()), columns)?;
    let file = File::create(path)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Write the table to `path` in the requested format.
///
/// `DataFormat::None` is rejected by callers before a path exists, so it is
/// a no-op here.
pub fn write_table_file(
    path: &Path,
    table: &ResultTable,
    format: DataFormat,
) -> Result<(), ExportError> {
    match format {
        DataFormat::Csv => write_csv_file(path, table),
        DataFormat::Pkl => write_binary_file(path, table),
        #[cfg(feature = "parquet")]
        DataFormat::Parquet => write_parquet_file(path, table),
        DataFormat::None => Ok(()),
    }
}
