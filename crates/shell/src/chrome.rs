use crtpad_core::{Document, DocumentId};

pub const APP_TITLE: &str = "CRTPAD CODE EDITOR";
pub const APP_VERSION: &str = "v3.0.1";

pub fn title_bar() -> String {
    format!("{APP_TITLE} {APP_VERSION}")
}

/// One entry of the tab strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: DocumentId,
    pub name: String,
    pub active: bool,
    pub modified: bool,
    /// Closing is offered only while more than one tab is open.
    pub closable: bool,
}

impl Tab {
    pub fn label(&self) -> String {
        let mut label = String::new();
        label.push(if self.active { '>' } else { ' ' });
        label.push_str(&self.name);
        if self.modified {
            label.push('*');
        }
        if self.closable {
            label.push_str(" [x]");
        }
        label
    }
}

pub fn tabs(documents: &[Document], active: &DocumentId) -> Vec<Tab> {
    let closable = documents.len() > 1;
    documents
        .iter()
        .map(|document| Tab {
            id: document.id().clone(),
            name: document.name().to_string(),
            active: document.id() == active,
            modified: document.is_modified(),
            closable,
        })
        .collect()
}

pub fn tab_strip(documents: &[Document], active: &DocumentId) -> String {
    tabs(documents, active)
        .iter()
        .map(Tab::label)
        .collect::<Vec<_>>()
        .join(" | ")
}
