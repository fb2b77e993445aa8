//! Flat buffer files consumed by the kernel harnesses.
//!
//! A buffer is a sequence of 32 bit words, stored either as raw
//! little-endian bytes or as whitespace separated decimal text. A JSON
//! manifest next to the buffers records what was written.

use itertools::Itertools;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "manifest.json";

const WORDS_PER_LINE: usize = 16;

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Binary,
    Text,
}

impl Format {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Binary => "bin",
            Self::Text => "txt",
        }
    }

    /// File name of buffer `name` in this format.
    #[must_use]
    pub fn file_name(self, name: &str) -> String {
        format!("{name}.{}", self.extension())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] utils::fs::Error),
    #[error("failed to {op} {path:?}")]
    Io {
        op: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid word {value:?} on line {line} of {path:?}")]
    Parse {
        path: PathBuf,
        line: usize,
        value: String,
        source: std::num::ParseIntError,
    },
    #[error("binary buffer {path:?} has {len} bytes, which is not a multiple of 4")]
    Unaligned { path: PathBuf, len: usize },
    #[error("invalid manifest {path:?}")]
    Manifest {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("buffer {name:?} has {have} words but {want} were expected")]
    Length {
        name: String,
        have: usize,
        want: usize,
    },
    #[error("manifest does not list buffer {0:?}")]
    MissingBuffer(String),
}

pub fn write_words(mut writer: impl Write, words: &[u32], format: Format) -> std::io::Result<()> {
    match format {
        Format::Binary => {
            for word in words {
                writer.write_all(&word.to_le_bytes())?;
            }
        }
        Format::Text => {
            for line in &words.iter().chunks(WORDS_PER_LINE) {
                writeln!(writer, "{}", line.format(" "))?;
            }
        }
    }
    writer.flush()
}

fn read_binary(mut reader: impl Read, path: &Path) -> Result<Vec<u32>, Error> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| Error::Io {
            op: "read",
            path: path.to_path_buf(),
            source,
        })?;
    if bytes.len() % 4 != 0 {
        return Err(Error::Unaligned {
            path: path.to_path_buf(),
            len: bytes.len(),
        });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

fn read_text(reader: impl BufRead, path: &Path) -> Result<Vec<u32>, Error> {
    let mut words = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| Error::Io {
            op: "read",
            path: path.to_path_buf(),
            source,
        })?;
        for value in line.split_ascii_whitespace() {
            let word = value.parse().map_err(|source| Error::Parse {
                path: path.to_path_buf(),
                line: line_idx + 1,
                value: value.to_string(),
                source,
            })?;
            words.push(word);
        }
    }
    Ok(words)
}

/// Reads words from `reader`; `path` is only used for error reporting.
pub fn read_words(
    reader: impl BufRead,
    format: Format,
    path: impl AsRef<Path>,
) -> Result<Vec<u32>, Error> {
    match format {
        Format::Binary => read_binary(reader, path.as_ref()),
        Format::Text => read_text(reader, path.as_ref()),
    }
}

pub fn write_file(path: impl AsRef<Path>, words: &[u32], format: Format) -> Result<(), Error> {
    let path = path.as_ref();
    let writer = utils::fs::open_writable(path)?;
    write_words(writer, words, format).map_err(|source| Error::Io {
        op: "write",
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "written {} ({} words, {})",
        path.display(),
        words.len(),
        human_bytes::human_bytes((words.len() * std::mem::size_of::<u32>()) as f64)
    );
    Ok(())
}

pub fn read_file(path: impl AsRef<Path>, format: Format) -> Result<Vec<u32>, Error> {
    let path = path.as_ref();
    let reader = utils::fs::open_readable(path)?;
    read_words(reader, format, path)
}

/// A named buffer listed in a [`Manifest`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Buffer {
    pub name: String,
    /// Path relative to the manifest directory.
    pub file: PathBuf,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest<P> {
    pub benchmark: String,
    pub format: Format,
    pub parameters: P,
    pub buffers: Vec<Buffer>,
}

impl<P> Manifest<P> {
    #[must_use]
    pub fn new(benchmark: impl Into<String>, format: Format, parameters: P) -> Self {
        Self {
            benchmark: benchmark.into(),
            format,
            parameters,
            buffers: Vec::new(),
        }
    }

    #[must_use]
    pub fn buffer(&self, name: &str) -> Option<&Buffer> {
        self.buffers.iter().find(|buffer| buffer.name == name)
    }

    /// Writes `words` as buffer `name` into `dir` and records it.
    pub fn write_buffer(
        &mut self,
        dir: impl AsRef<Path>,
        name: &str,
        words: &[u32],
    ) -> Result<(), Error> {
        let file = PathBuf::from(self.format.file_name(name));
        write_file(dir.as_ref().join(&file), words, self.format)?;
        self.buffers.retain(|buffer| buffer.name != name);
        self.buffers.push(Buffer {
            name: name.to_string(),
            file,
            len: words.len(),
        });
        Ok(())
    }

    /// Reads buffer `name` from `dir`, checking its recorded length.
    pub fn read_buffer(&self, dir: impl AsRef<Path>, name: &str) -> Result<Vec<u32>, Error> {
        let buffer = self
            .buffer(name)
            .ok_or_else(|| Error::MissingBuffer(name.to_string()))?;
        let words = read_file(dir.as_ref().join(&buffer.file), self.format)?;
        if words.len() != buffer.len {
            return Err(Error::Length {
                name: name.to_string(),
                have: words.len(),
                want: buffer.len,
            });
        }
        Ok(words)
    }
}

impl<P> Manifest<P>
where
    P: Serialize,
{
    pub fn write(&self, dir: impl AsRef<Path>) -> Result<(), Error> {
        let path = dir.as_ref().join(MANIFEST_FILE);
        let mut json_serializer = serde_json::Serializer::with_formatter(
            utils::fs::open_writable(&path)?,
            serde_json::ser::PrettyFormatter::with_indent(b"    "),
        );
        self.serialize(&mut json_serializer)
            .map_err(|source| Error::Manifest {
                path: path.clone(),
                source,
            })?;
        json_serializer
            .into_inner()
            .flush()
            .map_err(|source| Error::Io {
                op: "write",
                path: path.clone(),
                source,
            })?;
        log::info!("written {}", path.display());
        Ok(())
    }
}

impl<P> Manifest<P>
where
    P: DeserializeOwned,
{
    pub fn read(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let path = dir.as_ref().join(MANIFEST_FILE);
        let reader = utils::fs::open_readable(&path)?;
        serde_json::from_reader(reader).map_err(|source| Error::Manifest { path, source })
    }
}
