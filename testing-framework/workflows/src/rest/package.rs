use std::{
    fs,
    io::{self, Cursor, Write as _},
    path::{Path, PathBuf},
    sync::Arc,
};

use pat_config::RestConfig;
use pat_core::transport::{FilePart, MultipartBody};
use thiserror::Error;
use zip::{CompressionMethod, ZipWriter, result::ZipError, write::SimpleFileOptions};

const DEFAULT_FILE_NAME: &str = "application.zip";
const ZIP_CONTENT_TYPE: &str = "application/zip";

const INDEX_HTML: &[u8] = b"<!doctype html>\n<html><body><h1>pat</h1></body></html>\n";

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("failed to read app package {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("app package {} is empty", path.display())]
    Empty { path: PathBuf },
    #[error("failed to build app package: {0}")]
    Archive(#[from] ZipError),
    #[error("failed to build app package: {0}")]
    Io(#[from] io::Error),
}

/// Zipped application bits uploaded by every push.
///
/// The bytes are shared, so cloning a package for each run is cheap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppPackage {
    file_name: String,
    bytes: Arc<[u8]>,
}

impl AppPackage {
    #[must_use]
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads an existing zip from disk.
    pub fn load(path: &Path) -> Result<Self, PackageError> {
        let bytes = fs::read(path).map_err(|source| PackageError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(PackageError::Empty {
                path: path.to_path_buf(),
            });
        }
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(DEFAULT_FILE_NAME);
        Ok(Self::from_bytes(file_name, bytes))
    }

    /// A minimal static site that the staticfile buildpack can stage.
    pub fn default_static() -> Result<Self, PackageError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("index.html", file_options())?;
        writer.write_all(INDEX_HTML)?;
        writer.start_file("Staticfile", file_options())?;
        let bytes = writer.finish()?.into_inner();
        Ok(Self::from_bytes(DEFAULT_FILE_NAME, bytes))
    }

    /// The configured package, or the built-in one when none is set.
    pub fn from_config(config: &RestConfig) -> Result<Self, PackageError> {
        match &config.package_path {
            Some(path) => Self::load(path),
            None => Self::default_static(),
        }
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Upload body for `PUT /v2/apps/:guid/bits`: no cached resources plus
    /// the zip itself.
    #[must_use]
    pub fn multipart(&self) -> MultipartBody {
        MultipartBody {
            fields: vec![("resources".to_owned(), "[]".to_owned())],
            file: FilePart {
                field: "application".to_owned(),
                file_name: self.file_name.clone(),
                content_type: ZIP_CONTENT_TYPE.to_owned(),
                bytes: Arc::clone(&self.bytes),
            },
        }
    }
}

fn file_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}
