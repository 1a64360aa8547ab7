//! Line and column helpers shared by the commands and the editor.

/// Split `text` into buffer lines: N newlines give N+1 lines, `""` gives `[""]`.
pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

/// Like [`split_lines`], but for file content: CRLF line endings lose their `\r`.
pub(crate) fn split_content(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Number of characters (Unicode scalar values) in `line`.
pub(crate) fn char_len(line: &str) -> usize {
    line.chars().count()
}

/// Byte offset of the character at `column` (0-based). Columns past the end map to `line.len()`.
pub(crate) fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(offset, _)| offset)
        .unwrap_or(line.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(""), vec![""]);
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b", ""]);
        assert_eq!(split_lines("x\r"), vec!["x\r"]);
    }

    #[test]
    fn test_split_content_drops_carriage_returns() {
        assert_eq!(split_content("a\r\nb\r\n"), vec!["a", "b", ""]);
        assert_eq!(split_content(""), vec![""]);
    }

    #[test]
    fn test_byte_offset_multibyte() {
        let line = "héllo";
        assert_eq!(byte_offset(line, 0), 0);
        assert_eq!(byte_offset(line, 2), 3);
        assert_eq!(byte_offset(line, 5), line.len());
        assert_eq!(char_len(line), 5);
    }
}
