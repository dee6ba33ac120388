use anyhow::{Context, Result};
use mframe::io::{read_table_with_config, TableReaderConfig};
use std::path::Path;

/// Render a data file as a table preview, followed by a note on any rows
/// the reader had to skip.
pub fn render_table(path: &Path, separator: &str, header: bool) -> Result<String> {
    let config = TableReaderConfig::new(separator, header);
    let table = read_table_with_config(path, &config)
        .with_context(|| format!("Failed to read {:?}", path))?;

    let mut out = table.frame.to_string();
    if table.rows_skipped > 0 {
        out.push_str(&format!(
            "\nskipped: {} malformed rows",
            table.rows_skipped
        ));
    }
    Ok(out)
}
