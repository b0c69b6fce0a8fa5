use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use encoding_rs::UTF_8;
use thiserror::Error;

use crate::document::Document;

/// 匯入本機檔案時的錯誤。 / Errors raised while importing a local file.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0} does not name a file")]
    MissingFileName(PathBuf),
}

/// 匯出文件時的錯誤。 / Errors raised while writing an export artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 已讀入但尚未加入清單的文字檔。 / A text file read from disk, ready to become a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedText {
    pub name: String,
    pub content: String,
}

/// 讀取本機檔案並以預設文字解碼。 / Reads a local file using default text decoding.
pub fn read_text_file(path: impl AsRef<Path>) -> Result<ImportedText, ImportError> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ImportError::MissingFileName(path.to_path_buf()))?;
    let bytes = fs::read(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ImportedText {
        name,
        content: decode_text(&bytes),
    })
}

/// BOM 偵測後以 UTF-8 解碼，無效序列以替代字元取代。 / Sniffs a BOM, otherwise decodes UTF-8, replacing malformed sequences.
pub fn decode_text(bytes: &[u8]) -> String {
    let (text, encoding, had_errors) = UTF_8.decode(bytes);
    if had_errors {
        tracing::debug!(encoding = encoding.name(), "replaced malformed input while decoding");
    }
    text.into_owned()
}

/// 可供下載的文件內容。 / A downloadable copy of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub contents: String,
}

impl ExportArtifact {
    pub fn from_document(document: &Document) -> Self {
        Self {
            file_name: sanitize_file_name(document.name()),
            contents: document.content().to_string(),
        }
    }

    /// 將內容寫入資料夾並回傳完整路徑。 / Writes the artifact into `dir` and returns the full path.
    pub fn write_into(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let dir = dir.as_ref();
        let target = dir.join(&self.file_name);
        let tmp_path = target.with_extension("crtpad-tmp");
        let result = fs::create_dir_all(dir)
            .and_then(|_| fs::write(&tmp_path, self.contents.as_bytes()))
            .and_then(|_| fs::rename(&tmp_path, &target));
        result.map_err(|source| ExportError::Write {
            path: target.clone(),
            source,
        })?;
        Ok(target)
    }
}

fn sanitize_file_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "untitled.txt".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentId;
    use tempfile::tempdir;

    #[test]
    fn decode_strips_bom_and_replaces_invalid_bytes() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFhello"), "hello");
        assert_eq!(decode_text(b"a\xFFb"), "a\u{FFFD}b");
        assert_eq!(decode_text(b"\xFF\xFEh\x00i\x00"), "hi");
    }

    #[test]
    fn read_text_file_uses_file_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("script.py");
        fs::write(&path, "print('hi')\n").unwrap();

        let imported = read_text_file(&path).unwrap();
        assert_eq!(imported.name, "script.py");
        assert_eq!(imported.content, "print('hi')\n");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = read_text_file(dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, ImportError::Read { .. }));
    }

    #[test]
    fn export_writes_named_file() {
        let dir = tempdir().unwrap();
        let doc = Document::new(DocumentId::new("1"), "../escape/notes.md", "# hi");
        let artifact = ExportArtifact::from_document(&doc);
        assert_eq!(artifact.file_name, "notes.md");

        let path = artifact.write_into(dir.path().join("downloads")).unwrap();
        assert_eq!(path, dir.path().join("downloads").join("notes.md"));
        assert_eq!(fs::read_to_string(path).unwrap(), "# hi");
    }
}
