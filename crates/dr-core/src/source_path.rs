//! Changed model source file paths.

use std::path::Path;

use crate::model_name::ModelName;
use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// A project-relative path to a changed model source file, as reported by
    /// the version-control diff (forward slashes, no leading `./`).
    pub struct SourcePath;
}

impl SourcePath {
    /// Derive the model name from the file's base name without extension.
    ///
    /// Returns `None` for paths without a usable file stem (e.g. `models/.sql`).
    pub fn model_name(&self) -> Option<ModelName> {
        Path::new(self.as_str())
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty() && !stem.starts_with('.'))
            .and_then(ModelName::try_new)
    }

    /// File extension without the leading dot, if any.
    pub fn extension(&self) -> Option<&str> {
        Path::new(self.as_str())
            .extension()
            .and_then(|ext| ext.to_str())
    }
}

#[cfg(test)]
#[path = "source_path_test.rs"]
mod tests;
