use std::path::{Path, PathBuf};

pub trait PathExt {
    /// Output path for a converted record: same stem, `extension` appended,
    /// placed in `dir` when given, otherwise next to `self`.
    fn with_output_extension(&self, extension: &str, dir: Option<&Path>) -> PathBuf;
}

impl PathExt for Path {
    fn with_output_extension(&self, extension: &str, dir: Option<&Path>) -> PathBuf {
        let extension = extension.trim_start_matches('.');
        let renamed = self.with_extension(extension);
        match (dir, renamed.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => renamed,
        }
    }
}
