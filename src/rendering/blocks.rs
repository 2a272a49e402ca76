use serde::{Deserialize, Serialize};

/// Separator between two chunks of an article body.
const CHUNK_SEPARATOR: &str = "\n\n";
const HEADING_MARKER: &str = "## ";
const BULLET_MARKER: &str = "- ";

/// One structurally classified unit of article content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph { text: String },
    /// Level-2 heading.
    Heading { text: String },
    BulletList { items: Vec<String> },
    NumberedList { items: Vec<String> },
}

/// Parse an article body into its content blocks.
///
/// The body is split on blank lines and every chunk becomes exactly one
/// block, so the output always has as many entries as there are chunks.
/// Empty input yields no blocks.
pub fn parse(content: &str) -> Vec<Block> {
    blocks(content).collect()
}

/// Lazy variant of [`parse`]. The iterator is `Clone`, so a clone taken
/// before iteration replays the same sequence.
pub fn blocks(content: &str) -> Blocks<'_> {
    Blocks {
        chunks: (!content.is_empty()).then(|| content.split(CHUNK_SEPARATOR)),
    }
}

/// Iterator over the blocks of an article body. See [`blocks`].
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    chunks: Option<std::str::Split<'a, &'static str>>,
}

impl Iterator for Blocks<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        self.chunks.as_mut()?.next().map(classify)
    }
}

/// Classify a single chunk. The chunk-level prefix decides the kind; lines
/// are only inspected individually once a list kind has been chosen.
fn classify(chunk: &str) -> Block {
    if let Some(text) = chunk.strip_prefix(HEADING_MARKER) {
        return Block::Heading {
            text: text.to_string(),
        };
    }

    if chunk.starts_with(BULLET_MARKER) {
        let items = chunk
            .split('\n')
            .map(|line| line.strip_prefix(BULLET_MARKER).unwrap_or(line).to_string())
            .collect();
        return Block::BulletList { items };
    }

    if strip_number_marker(chunk).is_some() {
        let items = chunk
            .split('\n')
            .map(|line| strip_number_marker(line).unwrap_or(line).to_string())
            .collect();
        return Block::NumberedList { items };
    }

    Block::Paragraph {
        text: chunk.to_string(),
    }
}

/// Strip a leading `<digits>. ` marker, returning the remainder.
fn strip_number_marker(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}
