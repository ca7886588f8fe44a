use serde::Serialize;

/// One fenced block pulled out of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// Tag before the colon on the opening line (`html` for `html:sidebar.html`).
    /// Never used for writing.
    pub language: Option<String>,
    pub rel_path: String,
    pub content: String,
}
