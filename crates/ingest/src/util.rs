use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Directory the scraper writes its per-subject JSON files into
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Lists the `.json` files directly inside a directory
///
/// # Arguments
/// * `dir` - Directory to scan
///
/// # Returns
/// The matching paths, sorted by file name so loads are reproducible
pub fn json_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect::<Vec<_>>();

    files.sort();
    Ok(files)
}

/// Short display name for a path, for progress output
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
