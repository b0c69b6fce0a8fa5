/// Counters shown in the status bar for the active document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    /// Unicode scalar values.
    pub chars: usize,
    pub words: usize,
    pub lines: usize,
}

impl TextStats {
    pub fn of(content: &str) -> Self {
        let trimmed = content.trim();
        let words = if trimmed.is_empty() {
            0
        } else {
            trimmed.split_whitespace().count()
        };
        let lines = if content.is_empty() {
            0
        } else {
            content.split('\n').count()
        };
        Self {
            chars: content.chars().count(),
            words,
            lines,
        }
    }
}
