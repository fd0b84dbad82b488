/// Words per chunk when no size is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 300;

/// Split `text` into windows of `chunk_size` whitespace-delimited words.
///
/// Windows are contiguous and non-overlapping, re-joined with single spaces; the
/// last one holds the remainder. Whitespace-only input yields no chunks. A
/// `chunk_size` of zero is treated as one.
#[must_use]
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(chunk_size.max(1))
        .map(|window| window.join(" "))
        .collect()
}
