//! Recursive character text splitting.
//!
//! Text is split on the coarsest separator present (paragraphs, then lines,
//! then words, then single characters) and the pieces are merged back into
//! chunks of at most `chunk_size` characters, with neighbouring chunks
//! sharing up to `chunk_overlap` characters.

use std::collections::VecDeque;

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Chunking parameters, measured in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 300,
            chunk_overlap: 50,
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split text into overlapping chunks
pub fn split_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    split_recursive(text, &SEPARATORS, config)
}

fn split_recursive(text: &str, separators: &[&str], config: &ChunkConfig) -> Vec<String> {
    // Use the first separator that occurs in the text; "" always matches
    let position = separators
        .iter()
        .position(|sep| sep.is_empty() || text.contains(sep))
        .unwrap_or(separators.len().saturating_sub(1));
    let separator = separators.get(position).copied().unwrap_or("");
    let finer = separators.get(position + 1..).unwrap_or(&[]);

    let splits: Vec<&str> = if separator.is_empty() {
        text.char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect()
    } else {
        text.split(separator).filter(|s| !s.is_empty()).collect()
    };

    let mut chunks = Vec::new();
    let mut small = Vec::new();

    for split in splits {
        if char_len(split) < config.chunk_size {
            small.push(split);
            continue;
        }

        if !small.is_empty() {
            chunks.extend(merge_splits(&small, separator, config));
            small.clear();
        }

        if finer.is_empty() {
            chunks.push(split.to_string());
        } else {
            chunks.extend(split_recursive(split, finer, config));
        }
    }

    if !small.is_empty() {
        chunks.extend(merge_splits(&small, separator, config));
    }

    chunks
}

/// Greedily join small pieces into chunks, carrying the tail as overlap
fn merge_splits(splits: &[&str], separator: &str, config: &ChunkConfig) -> Vec<String> {
    let separator_len = char_len(separator);
    let mut chunks = Vec::new();
    let mut current: VecDeque<&str> = VecDeque::new();
    let mut total = 0;

    for &split in splits {
        let len = char_len(split);

        if !current.is_empty()
            && total + len + joiner_len(&current, separator_len) > config.chunk_size
        {
            push_joined(&mut chunks, &current, separator);

            // Drop from the front until the remainder fits as overlap
            while total > config.chunk_overlap
                || (total > 0
                    && total + len + joiner_len(&current, separator_len) > config.chunk_size)
            {
                let Some(front) = current.pop_front() else {
                    break;
                };
                total -= char_len(front) + joiner_len(&current, separator_len);
            }
        }

        total += len + joiner_len(&current, separator_len);
        current.push_back(split);
    }

    push_joined(&mut chunks, &current, separator);
    chunks
}

/// Separator characters added when another piece joins `current`
fn joiner_len(current: &VecDeque<&str>, separator_len: usize) -> usize {
    if current.is_empty() {
        0
    } else {
        separator_len
    }
}

fn push_joined(chunks: &mut Vec<String>, pieces: &VecDeque<&str>, separator: &str) {
    let joined = pieces.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}
