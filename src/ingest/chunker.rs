//! Recursive character text splitting.
//!
//! Splits on the coarsest separator that appears ("\n\n", "\n", " ", then
//! hard character cuts), merging pieces into chunks of at most `chunk_size`
//! characters with `overlap` characters carried between adjacent chunks.
//! Lengths are measured in chars, not bytes.

const DEFAULT_CHUNK_SIZE: usize = 1500;
const DEFAULT_OVERLAP: usize = 300;
const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

#[derive(Debug, Clone)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
    separators: Vec<String>,
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP)
    }
}

impl Chunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be positive");
        assert!(overlap < chunk_size, "overlap must be smaller than chunk_size");
        Self {
            chunk_size,
            overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Splits `text` into chunks. Whitespace-only pieces are dropped.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return vec![];
        }
        self.split_recursive(text, 0)
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .collect()
    }

    fn split_recursive(&self, text: &str, sep_index: usize) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        let Some(separator) = self.separators.get(sep_index) else {
            return hard_split(text, self.chunk_size, self.overlap);
        };

        if separator.is_empty() {
            return hard_split(text, self.chunk_size, self.overlap);
        }

        let pieces: Vec<&str> = text.split(separator.as_str()).collect();
        if pieces.len() == 1 {
            // Separator absent; try the next finer one.
            return self.split_recursive(text, sep_index + 1);
        }

        // Pieces still over the chunk size recurse with finer separators;
        // the rest are merged back up to the chunk size with overlap.
        let mut atomic: Vec<String> = Vec::new();
        for piece in pieces {
            if char_len(piece) > self.chunk_size {
                atomic.extend(self.split_recursive(piece, sep_index + 1));
            } else {
                atomic.push(piece.to_string());
            }
        }

        self.merge(atomic, separator)
    }

    fn merge(&self, pieces: Vec<String>, separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks: Vec<String> = Vec::new();
        let mut window: Vec<String> = Vec::new();
        let mut window_len = 0usize;

        for piece in pieces {
            let piece_len = char_len(&piece);
            let joined_len = window_len + piece_len + if window.is_empty() { 0 } else { sep_len };

            if joined_len > self.chunk_size && !window.is_empty() {
                chunks.push(window.join(separator));

                // Carry the tail of the window forward as overlap.
                while window_len > self.overlap
                    || (!window.is_empty() && window_len + piece_len + sep_len > self.chunk_size)
                {
                    let dropped = window.remove(0);
                    window_len -= char_len(&dropped);
                    if !window.is_empty() {
                        window_len -= sep_len;
                    }
                    if window.is_empty() {
                        window_len = 0;
                        break;
                    }
                }
            }

            if !window.is_empty() {
                window_len += sep_len;
            }
            window_len += piece_len;
            window.push(piece);
        }

        if !window.is_empty() {
            chunks.push(window.join(separator));
        }

        chunks
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn hard_split(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let step = chunk_size - overlap;
    let mut chunks = Vec::new();

    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}
