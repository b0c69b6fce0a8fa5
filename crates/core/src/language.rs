use std::collections::HashMap;

use once_cell::sync::Lazy;

/// 無法辨識副檔名時使用的語言標籤。 / Tag used when a name has no known suffix.
pub const PLAINTEXT: &str = "plaintext";

static LANGUAGE_BY_EXTENSION: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("js", "javascript"),
        ("jsx", "javascript"),
        ("ts", "typescript"),
        ("tsx", "typescript"),
        ("py", "python"),
        ("java", "java"),
        ("cpp", "cpp"),
        ("c", "c"),
        ("cs", "csharp"),
        ("php", "php"),
        ("rb", "ruby"),
        ("go", "go"),
        ("rs", "rust"),
        ("html", "html"),
        ("css", "css"),
        ("scss", "scss"),
        ("json", "json"),
        ("xml", "xml"),
        ("md", "markdown"),
        ("sql", "sql"),
        ("sh", "shell"),
        ("yml", "yaml"),
        ("yaml", "yaml"),
    ]
    .into_iter()
    .collect()
});

/// 依副檔名推斷語言標籤。 / Maps a file name's lowercase suffix to a language tag.
///
/// Names without a `.` have no suffix and map to [`PLAINTEXT`], as do
/// suffixes missing from the table.
pub fn derive_language(name: &str) -> &'static str {
    let Some((_, extension)) = name.rsplit_once('.') else {
        return PLAINTEXT;
    };
    LANGUAGE_BY_EXTENSION
        .get(extension.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or(PLAINTEXT)
}

/// 已知副檔名清單（已排序）。 / Extensions with a dedicated language tag, sorted.
pub fn known_extensions() -> Vec<&'static str> {
    let mut extensions: Vec<_> = LANGUAGE_BY_EXTENSION.keys().copied().collect();
    extensions.sort_unstable();
    extensions
}
