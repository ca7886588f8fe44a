use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::types::CodeBlock;

/// Opening line is the delimiter, an optional `lang:` tag, then the path up to the newline.
/// Content is matched lazily, so the first closing delimiter ends the block.
static BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)````(?:(\w+):)?([^\n]+)?\n(.*?)````").unwrap());

/// Pull every `(path, content)` block out of `message`, in order of appearance.
/// Blocks with no path or an empty body are skipped.
pub fn extract_code_blocks(message: &str) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();

    for caps in BLOCK_RE.captures_iter(message) {
        let language = caps.get(1).map(|m| m.as_str().to_string());
        let rel_path = caps.get(2).map_or("", |m| m.as_str());
        let content = caps.get(3).map_or("", |m| m.as_str());

        if rel_path.is_empty() || content.is_empty() {
            let at = caps.get(0).map_or(0, |m| m.start());
            debug!(
                "Skipping block at byte {} (path: {:?}, {} content bytes)",
                at,
                rel_path,
                content.len()
            );
            continue;
        }

        blocks.push(CodeBlock {
            language,
            rel_path: rel_path.to_string(),
            content: content.to_string(),
        });
    }

    blocks
}
