use tracing::{debug, info};

/// What a saved file contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentMode {
    /// The rendered markdown text, written with a `.md` extension.
    Markdown,
    /// The full file object as JSON, written with a `.json` extension.
    #[default]
    Metadata,
}

impl ContentMode {
    pub fn from_markdown(markdown: bool) -> Self {
        if markdown {
            ContentMode::Markdown
        } else {
            ContentMode::Metadata
        }
    }
}

/// Options for one materialization. Built once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeOptions {
    pub content: ContentMode,
    pub overwrite: bool,
    /// Write a `<folder>.folder_metadata.json` sidecar next to every non-root folder.
    pub folder_metadata: bool,
    pub add_extension: bool,
    /// Upper bound on concurrent file fetch+write operations. `None` is unbounded.
    pub max_concurrency: Option<usize>,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self {
            content: ContentMode::default(),
            overwrite: false,
            folder_metadata: false,
            add_extension: true,
            max_concurrency: None,
        }
    }
}

impl MaterializeOptions {
    pub fn trace_loaded(&self) {
        info!(
            content = ?self.content,
            overwrite = self.overwrite,
            folder_metadata = self.folder_metadata,
            max_concurrency = ?self.max_concurrency,
            "Loaded materialize options"
        );
        debug!(?self, "Materialize options (full debug)");
    }
}
