//! Media inputs and their resolution into upload-ready fields.

use std::fmt;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use tokio::io::AsyncRead;
use tracing::debug;

use super::TelegramError;

/// Content type used when the extension is not in the table.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Extension to MIME type table, lowercase extensions.
const CONTENT_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("svg", "image/svg+xml"),
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("ogg", "audio/ogg"),
    ("oga", "audio/ogg"),
    ("opus", "audio/opus"),
    ("wav", "audio/wav"),
    ("flac", "audio/flac"),
    ("mp4", "video/mp4"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("tgs", "application/x-tgsticker"),
    ("txt", "text/plain"),
    ("csv", "text/csv"),
    ("html", "text/html"),
    ("htm", "text/html"),
];

/// Looks up the content type for a file name by its extension.
#[must_use]
pub fn content_type_for(file_name: &str) -> &'static str {
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return OCTET_STREAM;
    };
    let ext = ext.to_ascii_lowercase();

    CONTENT_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map_or(OCTET_STREAM, |&(_, content_type)| content_type)
}

/// Last component of a path-like name.
///
/// Splits on `/` and the platform separator only, so a backslash is part of
/// the name on Unix.
fn base_name(name: &str) -> &str {
    name.rsplit(['/', MAIN_SEPARATOR]).next().unwrap_or(name)
}

/// Byte source for a streamed upload.
pub type MediaReader = Box<dyn AsyncRead + Send + Sync + Unpin>;

/// Media passed to a `send*` call.
pub enum InputFile {
    /// Bytes already in memory, uploaded under `file_name`.
    Memory { data: Vec<u8>, file_name: String },

    /// Byte stream read lazily while the request body is sent.
    Reader { reader: MediaReader, file_name: String },

    /// Local file that must exist.
    Path(PathBuf),

    /// Identifier of media already stored on the remote side.
    FileId(String),

    /// Uploaded from disk when it names an existing file, otherwise sent
    /// verbatim as a file id or URL.
    Auto(String),
}

impl InputFile {
    /// In-memory upload. Only the base name of `file_name` is sent.
    pub fn memory(data: impl Into<Vec<u8>>, file_name: impl Into<String>) -> Self {
        Self::Memory {
            data: data.into(),
            file_name: file_name.into(),
        }
    }

    /// Streamed upload. Only the base name of `file_name` is sent.
    pub fn reader<R>(reader: R, file_name: impl Into<String>) -> Self
    where
        R: AsyncRead + Send + Sync + Unpin + 'static,
    {
        Self::Reader {
            reader: Box::new(reader),
            file_name: file_name.into(),
        }
    }

    /// Local file upload. Resolution fails if the file does not exist.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Remote file id or URL, sent as-is without touching the filesystem.
    pub fn file_id(id: impl Into<String>) -> Self {
        Self::FileId(id.into())
    }

    /// Turns the input into what goes on the wire.
    ///
    /// Only [`InputFile::Path`] touches the filesystem unconditionally;
    /// [`InputFile::Auto`] checks for an existing file first and falls back
    /// to passing the string through.
    pub async fn resolve(self) -> Result<ResolvedField, TelegramError> {
        match self {
            Self::Memory { data, file_name } => {
                FilePart::new(FileBody::Bytes(data), &file_name).map(ResolvedField::File)
            }
            Self::Reader { reader, file_name } => {
                FilePart::new(FileBody::Reader(reader), &file_name).map(ResolvedField::File)
            }
            Self::Path(path) => {
                if !is_file(&path).await {
                    return Err(TelegramError::UnsupportedMediaInput(format!(
                        "{} is not an existing file",
                        path.display()
                    )));
                }
                open_file(&path).await.map(ResolvedField::File)
            }
            Self::FileId(id) => Ok(ResolvedField::Text(id)),
            Self::Auto(value) => {
                let path = Path::new(&value);
                if is_file(path).await {
                    open_file(path).await.map(ResolvedField::File)
                } else {
                    debug!("Passing media value through as a file id");
                    Ok(ResolvedField::Text(value))
                }
            }
        }
    }
}

impl From<&str> for InputFile {
    fn from(value: &str) -> Self {
        Self::Auto(value.to_owned())
    }
}

impl From<String> for InputFile {
    fn from(value: String) -> Self {
        Self::Auto(value)
    }
}

impl From<PathBuf> for InputFile {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&Path> for InputFile {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl fmt::Debug for InputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory { data, file_name } => f
                .debug_struct("Memory")
                .field("len", &data.len())
                .field("file_name", file_name)
                .finish(),
            Self::Reader { file_name, .. } => f
                .debug_struct("Reader")
                .field("file_name", file_name)
                .finish_non_exhaustive(),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::FileId(id) => f.debug_tuple("FileId").field(id).finish(),
            Self::Auto(value) => f.debug_tuple("Auto").field(value).finish(),
        }
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}

async fn open_file(path: &Path) -> Result<FilePart, TelegramError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            TelegramError::UnsupportedMediaInput(format!("{} has no file name", path.display()))
        })?;

    let file = tokio::fs::File::open(path).await?;
    debug!("Opened {} for upload", path.display());

    FilePart::new(FileBody::Reader(Box::new(file)), &file_name)
}

/// Payload of a file field.
pub enum FileBody {
    Bytes(Vec<u8>),
    Reader(MediaReader),
}

impl fmt::Debug for FileBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(data) => f.debug_tuple("Bytes").field(&data.len()).finish(),
            Self::Reader(_) => f.write_str("Reader"),
        }
    }
}

/// A file field with its upload metadata.
#[derive(Debug)]
pub struct FilePart {
    pub body: FileBody,
    pub file_name: String,
    pub content_type: &'static str,
}

impl FilePart {
    fn new(body: FileBody, name: &str) -> Result<Self, TelegramError> {
        let file_name = base_name(name);
        if file_name.is_empty() {
            return Err(TelegramError::UnsupportedMediaInput(format!(
                "file name {name:?} has no base name"
            )));
        }

        Ok(Self {
            body,
            file_name: file_name.to_owned(),
            content_type: content_type_for(file_name),
        })
    }
}

/// A request field ready for encoding.
#[derive(Debug)]
pub enum ResolvedField {
    Text(String),
    File(FilePart),
}
