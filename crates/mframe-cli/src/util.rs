use anyhow::Result;
use std::path::Path;

/// Extensions accepted for delimited data files.
pub const DATA_FILE_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

pub fn validate_data_file(path: &str) -> Result<()> {
    let pb = Path::new(path);

    let ext = pb
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some(ext) if DATA_FILE_EXTENSIONS.contains(&ext) => {}
        _ => anyhow::bail!(
            "Data file must have one of the extensions {:?}: {}",
            DATA_FILE_EXTENSIONS,
            path
        ),
    }

    if !pb.is_file() {
        anyhow::bail!("File does not exist: {}", path);
    }

    Ok(())
}
