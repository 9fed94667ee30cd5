use crate::config::{ChunkerConfig, SplitMode};

/// Paragraph boundary: a space immediately followed by a newline
pub const PARAGRAPH_DELIMITER: &str = " \n";

/// Characters appended after every packed paragraph
const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Execute a split strategy on raw text
pub struct StrategyExecutor {
    config: ChunkerConfig,
}

impl StrategyExecutor {
    /// Config must already be validated (`chunk_size > chunk_overlap`)
    pub const fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Execute the configured strategy
    pub fn execute(&self, text: &str) -> Vec<String> {
        match self.config.split_mode {
            SplitMode::Character => self.split_by_character(text),
            SplitMode::Paragraph => self.split_by_paragraph(text),
        }
    }

    /// Sliding window of `chunk_size` characters advancing by `chunk_size - chunk_overlap`
    fn split_by_character(&self, text: &str) -> Vec<String> {
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_len = bounds.len() - 1;
        let step = self.config.step().max(1);

        (0..char_len)
            .step_by(step)
            .map(|start| {
                let end = (start + self.config.chunk_size).min(char_len);
                text[bounds[start]..bounds[end]].to_string()
            })
            .collect()
    }

    /// Greedy paragraph packing, seeding each new chunk with the tail of the previous one
    fn split_by_paragraph(&self, text: &str) -> Vec<String> {
        let chunk_size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;
        let separator_len = PARAGRAPH_SEPARATOR.len();

        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for raw in text.split(PARAGRAPH_DELIMITER) {
            let escaped = raw.replace('\n', "\\n");
            let para = escaped.trim();
            if para.is_empty() {
                continue;
            }
            let para_len = para.chars().count();

            if current_len + para_len + separator_len > chunk_size && !current.is_empty() {
                chunks.push(current.trim().to_string());
                current = tail_chars(&current, overlap).to_string();
                current_len = current.chars().count();
            }

            current.push_str(para);
            current.push_str(PARAGRAPH_SEPARATOR);
            current_len += para_len + separator_len;
        }

        let last = current.trim();
        if !last.is_empty() {
            chunks.push(last.to_string());
        }

        chunks
    }
}

/// Last `n` characters of `text` (all of it when shorter, nothing when `n == 0`)
fn tail_chars(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}
