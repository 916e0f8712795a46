use std::collections::BTreeMap;

/// Sentry truncates strings in `extra` at roughly this many characters.
pub const DEFAULT_MAX_CHARS: usize = 400;

pub struct Chunker;

impl Chunker {
    /// Splits `text` into line-preserving pieces of at most `max_chars` characters each.
    ///
    /// Every line costs its length plus one separator, including the last line of
    /// a chunk. A single line longer than `max_chars` still gets a chunk of its own.
    pub fn split(text: &str, max_chars: usize) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut items: Vec<&str> = Vec::new();
        let mut chars = 0;

        for line in split_lines(text) {
            let cost = line.chars().count() + 1;
            if chars + cost <= max_chars {
                items.push(line);
                chars += cost;
            } else {
                if !items.is_empty() {
                    chunks.push(items.join("\n"));
                }
                items = vec![line];
                chars = cost;
            }
        }

        if !items.is_empty() {
            chunks.push(items.join("\n"));
        }
        chunks
    }

    /// Chunks `text` and names each piece after `name`.
    ///
    /// A single chunk is keyed by `name` itself; several chunks get a zero-padded
    /// index wide enough for the last one (`stdout00` .. `stdout10`).
    pub fn chunk(name: &str, text: Option<&str>, max_chars: usize) -> BTreeMap<String, String> {
        let chunks = match text {
            Some(text) if !text.is_empty() => Self::split(text, max_chars),
            _ => return BTreeMap::new(),
        };

        if chunks.len() == 1 {
            let mut single = BTreeMap::new();
            if let Some(only) = chunks.into_iter().next() {
                single.insert(name.to_string(), only);
            }
            return single;
        }

        let width = (chunks.len() - 1).to_string().len();
        chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| (format!("{name}{i:0width$}"), chunk))
            .collect()
    }
}

/// Breaks on `\n`, `\r\n` and a lone `\r`, so progress-bar output is not one giant line.
/// A trailing break does not start an empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.find(['\n', '\r']) {
            Some(i) => {
                lines.push(&rest[..i]);
                let width = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + width..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}
