use std::fmt;

use serde::{Deserialize, Serialize};

use crate::language::derive_language;

/// 文件的不透明識別子。 / Opaque identifier of an open document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// 一個開啟中的可編輯文字單位（分頁）。 / One open, editable text unit (a tab).
///
/// The serialized shape is `{ id, name, content, language, modified }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    name: String,
    content: String,
    language: String,
    #[serde(default)]
    modified: bool,
}

impl Document {
    /// 以檔名推導語言建立文件。 / Creates a document, deriving its language from `name`.
    pub fn new(id: DocumentId, name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        let language = derive_language(&name).to_string();
        Self::with_language(id, name, content, language)
    }

    /// 以指定語言建立文件。 / Creates a document with an explicit language tag.
    pub fn with_language(
        id: DocumentId,
        name: impl Into<String>,
        content: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            content: content.into(),
            language: language.into(),
            modified: false,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub(crate) fn replace_content(&mut self, content: String) {
        self.content = content;
        self.modified = true;
    }

    pub(crate) fn mark_saved(&mut self) {
        self.modified = false;
    }
}
