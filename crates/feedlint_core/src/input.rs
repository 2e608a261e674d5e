//! Feed input sources: a directory of text files or a zip archive. Zip
//! entries are read into memory up front so table loads can run from any
//! worker thread.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum GtfsInputError {
    #[error("input path does not exist: {0}")]
    MissingPath(PathBuf),
    #[error("input path is neither a directory nor a zip archive: {0}")]
    UnsupportedPath(PathBuf),
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read zip archive {path}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

#[derive(Debug)]
pub enum GtfsInput {
    Directory(PathBuf),
    Zip {
        path: PathBuf,
        entries: HashMap<String, Vec<u8>>,
    },
}

impl GtfsInput {
    /// Opens a feed from a directory or a `.zip` archive path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GtfsInputError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GtfsInputError::MissingPath(path.to_path_buf()));
        }
        if path.is_dir() {
            return Ok(GtfsInput::Directory(path.to_path_buf()));
        }
        if path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("zip"))
        {
            return Self::from_zip(path);
        }
        Err(GtfsInputError::UnsupportedPath(path.to_path_buf()))
    }

    fn from_zip(path: &Path) -> Result<Self, GtfsInputError> {
        let file = File::open(path).map_err(|source| GtfsInputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive = zip::ZipArchive::new(file).map_err(|source| GtfsInputError::Zip {
            path: path.to_path_buf(),
            source,
        })?;

        let mut entries = HashMap::new();
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|source| GtfsInputError::Zip {
                path: path.to_path_buf(),
                source,
            })?;
            if entry.is_dir() {
                continue;
            }
            // Feeds are often zipped inside a single folder; key entries
            // by their base name. The first occurrence wins.
            let name = Path::new(entry.name())
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
            let Some(name) = name else {
                continue;
            };
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut data)
                .map_err(|source| GtfsInputError::Io {
                    path: path.join(&name),
                    source,
                })?;
            entries.entry(name).or_insert(data);
        }

        Ok(GtfsInput::Zip {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        match self {
            GtfsInput::Directory(path) => path,
            GtfsInput::Zip { path, .. } => path,
        }
    }

    /// Base names of every file present in the input.
    pub fn file_names(&self) -> Result<Vec<String>, GtfsInputError> {
        match self {
            GtfsInput::Directory(path) => {
                let mut names = Vec::new();
                let entries = std::fs::read_dir(path).map_err(|source| GtfsInputError::Io {
                    path: path.clone(),
                    source,
                })?;
                for entry in entries {
                    let entry = entry.map_err(|source| GtfsInputError::Io {
                        path: path.clone(),
                        source,
                    })?;
                    if entry.path().is_file() {
                        names.push(entry.file_name().to_string_lossy().into_owned());
                    }
                }
                names.sort();
                Ok(names)
            }
            GtfsInput::Zip { entries, .. } => {
                let mut names: Vec<String> = entries.keys().cloned().collect();
                names.sort();
                Ok(names)
            }
        }
    }

    pub fn contains(&self, file_name: &str) -> bool {
        match self {
            GtfsInput::Directory(path) => path.join(file_name).is_file(),
            GtfsInput::Zip { entries, .. } => entries.contains_key(file_name),
        }
    }

    /// Bytes of one file, `None` when the file is absent.
    pub fn read(&self, file_name: &str) -> Result<Option<Vec<u8>>, GtfsInputError> {
        match self {
            GtfsInput::Directory(path) => {
                let file_path = path.join(file_name);
                if !file_path.is_file() {
                    return Ok(None);
                }
                std::fs::read(&file_path)
                    .map(Some)
                    .map_err(|source| GtfsInputError::Io {
                        path: file_path,
                        source,
                    })
            }
            GtfsInput::Zip { entries, .. } => Ok(entries.get(file_name).cloned()),
        }
    }
}
