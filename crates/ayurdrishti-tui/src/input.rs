//! Cursor-based editing of single- and multi-line text fields.
//!
//! Cursors count characters, not bytes, so editing is UTF-8 safe.

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn insert_char(text: &mut String, cursor: &mut usize, c: char) {
    let byte_pos = char_to_byte_index(text, *cursor);
    text.insert(byte_pos, c);
    *cursor += 1;
}

pub fn insert_str(text: &mut String, cursor: &mut usize, s: &str) {
    let byte_pos = char_to_byte_index(text, *cursor);
    text.insert_str(byte_pos, s);
    *cursor += s.chars().count();
}

/// Path from a paste or a file dropped onto the terminal: surrounding
/// whitespace, quotes and a `file://` scheme are removed, `\ ` is unescaped.
pub fn dropped_path(pasted: &str) -> String {
    let trimmed = pasted.trim();
    let unquoted = ['\'', '"']
        .iter()
        .find_map(|q| trimmed.strip_prefix(*q).and_then(|t| t.strip_suffix(*q)))
        .unwrap_or(trimmed);
    let path = unquoted.strip_prefix("file://").unwrap_or(unquoted);
    path.replace("\\ ", " ")
}

pub fn backspace(text: &mut String, cursor: &mut usize) {
    if *cursor > 0 {
        *cursor -= 1;
        let byte_pos = char_to_byte_index(text, *cursor);
        text.remove(byte_pos);
    }
}

pub fn delete(text: &mut String, cursor: &mut usize) {
    if *cursor < text.chars().count() {
        let byte_pos = char_to_byte_index(text, *cursor);
        text.remove(byte_pos);
    }
}

pub fn move_left(cursor: &mut usize) {
    *cursor = cursor.saturating_sub(1);
}

pub fn move_right(text: &str, cursor: &mut usize) {
    *cursor = (*cursor + 1).min(text.chars().count());
}

pub fn move_end(text: &str, cursor: &mut usize) {
    *cursor = text.chars().count();
}

/// (column, row) of the cursor, counting `\n` as a row break.
pub fn cursor_position(text: &str, cursor: usize) -> (u16, u16) {
    let mut col = 0u16;
    let mut row = 0u16;
    for c in text.chars().take(cursor) {
        if c == '\n' {
            row += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (col, row)
}

/// Break text into display rows of at most `width` characters. Every `\n`
/// starts a new row.
pub fn wrap_rows(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    let mut rows = Vec::new();
    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            rows.push(String::new());
        }
        rows.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
    }
    rows
}

/// (column, row) of the cursor within the rows produced by [`wrap_rows`].
/// A cursor after a full row sits at the start of the next one.
pub fn wrapped_cursor_position(text: &str, cursor: usize, width: u16) -> (u16, u16) {
    let width = width.max(1);
    let mut col = 0u16;
    let mut row = 0u16;
    for c in text.chars().take(cursor) {
        if c == '\n' {
            row += 1;
            col = 0;
        } else {
            if col == width {
                row += 1;
                col = 0;
            }
            col += 1;
        }
    }
    if col == width {
        row += 1;
        col = 0;
    }
    (col, row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_multibyte_text() {
        let mut text = String::from("सर्दी");
        let mut cursor = text.chars().count();
        insert_char(&mut text, &mut cursor, '!');
        assert_eq!(text, "सर्दी!");

        move_left(&mut cursor);
        backspace(&mut text, &mut cursor);
        assert_eq!(text, "सर्द!");

        cursor = 0;
        delete(&mut text, &mut cursor);
        assert_eq!(text, "र्द!");
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let text = "ab";
        let mut cursor = 0;
        move_left(&mut cursor);
        assert_eq!(cursor, 0);
        move_right(text, &mut cursor);
        move_right(text, &mut cursor);
        move_right(text, &mut cursor);
        assert_eq!(cursor, 2);

        let mut owned = String::from(text);
        delete(&mut owned, &mut cursor);
        assert_eq!(owned, "ab");
    }

    #[test]
    fn cursor_position_tracks_newlines() {
        assert_eq!(cursor_position("cold\nand cough", 0), (0, 0));
        assert_eq!(cursor_position("cold\nand cough", 4), (4, 0));
        assert_eq!(cursor_position("cold\nand cough", 8), (3, 1));
    }

    #[test]
    fn pasted_text_lands_at_cursor() {
        let mut text = String::from("dry cough");
        let mut cursor = 4;
        insert_str(&mut text, &mut cursor, "नींद\nand ");
        assert_eq!(text, "dry नींद\nand cough");
        assert_eq!(cursor, 13);
    }

    #[test]
    fn dropped_paths_are_cleaned() {
        assert_eq!(dropped_path("'/home/a/My Plants/neem.jpg' "), "/home/a/My Plants/neem.jpg");
        assert_eq!(dropped_path("\"/tmp/tulsi.png\"\n"), "/tmp/tulsi.png");
        assert_eq!(dropped_path("/home/a/My\\ Plants/neem.jpg"), "/home/a/My Plants/neem.jpg");
        assert_eq!(dropped_path("file:///tmp/aloe.webp"), "/tmp/aloe.webp");
        assert_eq!(dropped_path("~/leaf.jpg"), "~/leaf.jpg");
    }

    #[test]
    fn long_lines_wrap_at_width() {
        let text = "tulsi tea\nginger";
        assert_eq!(wrap_rows(text, 4), vec!["tuls", "i te", "a", "ging", "er"]);
        assert_eq!(wrap_rows("", 4), vec![""]);
        assert_eq!(wrap_rows("a\n\nb", 4), vec!["a", "", "b"]);
    }

    #[test]
    fn wrapped_cursor_follows_rows() {
        let text = "tulsi tea\nginger";
        assert_eq!(wrapped_cursor_position(text, 0, 4), (0, 0));
        assert_eq!(wrapped_cursor_position(text, 3, 4), (3, 0));
        assert_eq!(wrapped_cursor_position(text, 6, 4), (2, 1));
        assert_eq!(wrapped_cursor_position(text, 4, 4), (0, 1));
        assert_eq!(wrapped_cursor_position(text, 12, 4), (2, 3));
        assert_eq!(wrapped_cursor_position(text, 16, 4), (2, 4));
    }
}
