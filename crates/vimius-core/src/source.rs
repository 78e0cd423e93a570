use std::path::{Path, PathBuf};
use vimius_schema::{
    parse_manifest_file, parse_manifest_str, ManifestError, ManifestFormat, SubmoduleRecord,
};

/// Where the manifest comes from.
///
/// A source is consulted at most once per successful load; the cache in
/// front of it owns the result afterwards.
pub trait ManifestSource: Send + Sync {
    /// Human-readable origin, used in log output.
    fn describe(&self) -> String;

    fn load(&self) -> Result<Vec<SubmoduleRecord>, ManifestError>;
}

/// Manifest stored on disk. The format follows the file extension.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ManifestSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<SubmoduleRecord>, ManifestError> {
        parse_manifest_file(&self.path)
    }
}

/// Manifest document held in memory, e.g. one embedded in the binary.
#[derive(Debug, Clone)]
pub struct StaticSource {
    document: String,
    format: ManifestFormat,
}

impl StaticSource {
    pub fn new(document: impl Into<String>, format: ManifestFormat) -> Self {
        Self {
            document: document.into(),
            format,
        }
    }

    pub fn yaml(document: impl Into<String>) -> Self {
        Self::new(document, ManifestFormat::Yaml)
    }
}

impl ManifestSource for StaticSource {
    fn describe(&self) -> String {
        format!("<in-memory {:?} manifest>", self.format)
    }

    fn load(&self) -> Result<Vec<SubmoduleRecord>, ManifestError> {
        parse_manifest_str(&self.document, self.format)
    }
}
