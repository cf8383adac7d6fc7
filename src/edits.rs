//! Span-based source rewriting.

/// Replace `start..end` of the source with `text`. Insertions have
/// `start == end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: u32,
    pub end: u32,
    pub text: String,
}

impl Edit {
    pub fn insert(at: u32, text: impl Into<String>) -> Self {
        Edit {
            start: at,
            end: at,
            text: text.into(),
        }
    }

    pub fn replace(start: u32, end: u32, text: impl Into<String>) -> Self {
        Edit {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn remove(start: u32, end: u32) -> Self {
        Edit {
            start,
            end,
            text: String::new(),
        }
    }
}

/// Applies edits in source order. Edits at the same offset keep the order
/// they were recorded in; an edit overlapping an earlier removal is dropped.
pub fn apply_edits(source: &str, edits: &[Edit]) -> String {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by_key(|e| e.start);

    let mut out = String::with_capacity(source.len() + edits.iter().map(|e| e.text.len()).sum::<usize>());
    let mut cursor = 0usize;
    for edit in ordered {
        let start = edit.start as usize;
        let end = edit.end as usize;
        if start < cursor || end > source.len() {
            tracing::debug!(start, end, "skipping overlapping edit");
            continue;
        }
        out.push_str(&source[cursor..start]);
        out.push_str(&edit.text);
        cursor = end;
    }
    out.push_str(&source[cursor..]);
    out
}

/// Leading whitespace of the line containing `offset`.
pub fn line_indent(source: &str, offset: u32) -> String {
    let offset = (offset as usize).min(source.len());
    let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    source[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

/// Extends a removal over trailing spaces and one line break so deleting a
/// whole statement does not leave a blank line.
pub fn removal_end(source: &str, end: u32) -> u32 {
    let bytes = source.as_bytes();
    let mut i = end as usize;
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'\r' {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'\n' {
        return (i + 1) as u32;
    }
    end
}

/// Pulls a removal back to the start of its line when only indentation
/// precedes it.
pub fn removal_start(source: &str, start: u32) -> u32 {
    let start_usize = (start as usize).min(source.len());
    let line_start = source[..start_usize].rfind('\n').map(|i| i + 1).unwrap_or(0);
    if source[line_start..start_usize]
        .chars()
        .all(|c| c == ' ' || c == '\t')
    {
        line_start as u32
    } else {
        start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_in_order() {
        let src = "abc";
        let edits = vec![
            Edit::insert(3, "!"),
            Edit::insert(0, ">"),
            Edit::insert(3, "?"),
            Edit::remove(1, 2),
        ];
        assert_eq!(apply_edits(src, &edits), ">ac!?");
    }

    #[test]
    fn test_overlapping_edit_dropped() {
        let edits = vec![Edit::remove(0, 4), Edit::insert(2, "x")];
        assert_eq!(apply_edits("abcdef", &edits), "ef");
    }

    #[test]
    fn test_line_indent_and_removal_end() {
        let src = "a\n    b = 1;\nc";
        assert_eq!(line_indent(src, 6), "    ");
        assert_eq!(removal_end(src, 12), 13);
        assert_eq!(removal_end("x;  y", 2), 2);
        assert_eq!(removal_start(src, 6), 2);
        assert_eq!(removal_start("x; y", 3), 3);
    }
}
