use std::io;

use tracing::debug;

use crate::file_io::{LineReader, LineWriter};

/// 表示可能な ASCII 文字 (32..=126) か
pub fn is_printable(byte: u8) -> bool {
    (32..=126).contains(&byte)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    chars: String,
}

impl Line {
    /// 表示できない文字は取り除く
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.bytes().filter(|&b| is_printable(b)).map(char::from).collect(),
        }
    }

    pub fn chars(&self) -> &str {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// 最後の文字の列。空行は 0
    pub fn last_column(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// `first_column` から最大 `width` 文字
    pub fn visible(&self, first_column: usize, width: usize) -> &str {
        match self.chars.get(first_column..) {
            Some(rest) => &rest[..rest.len().min(width)],
            None => "",
        }
    }

    fn push(&mut self, ch: char) -> bool {
        if ch.is_ascii() && is_printable(ch as u8) {
            self.chars.push(ch);
            true
        } else {
            false
        }
    }
}

pub struct Document {
    lines: Vec<Line>,
    /// 最終行の後ろに改行があるか
    ends_with_newline: bool,
    /// 未保存の変更があるか
    modified: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            ends_with_newline: false,
            modified: false,
        }
    }

    pub fn from_lines<'a, I: IntoIterator<Item = &'a str>>(lines: I) -> Self {
        Self {
            lines: lines.into_iter().map(Line::new).collect(),
            ends_with_newline: false,
            modified: false,
        }
    }

    pub fn load<R: LineReader>(reader: &mut R) -> io::Result<Self> {
        Self::load_with_progress(reader, |_| Ok(()))
    }

    /// 1 行読むごとに `progress` に行数を渡す
    ///
    /// CR, LF, CRLF のいずれも 1 つの終端として扱う
    pub fn load_with_progress<R, F>(reader: &mut R, mut progress: F) -> io::Result<Self>
    where
        R: LineReader,
        F: FnMut(usize) -> io::Result<()>,
    {
        reader.open()?;

        let mut document = Self::new();
        while !reader.eof()? {
            let mut line = Line::default();
            let mut terminated = false;
            while !reader.eof()? {
                match reader.get_char()? {
                    b'\r' => {
                        // CR の直後の LF は同じ終端
                        if reader.peek()? == Some(b'\n') {
                            reader.get_char()?;
                        }
                        terminated = true;
                        break;
                    }
                    b'\n' => {
                        terminated = true;
                        break;
                    }
                    byte if is_printable(byte) => line.chars.push(char::from(byte)),
                    _ => {}
                }
            }
            document.lines.push(line);
            document.ends_with_newline = terminated;
            progress(document.lines.len())?;
        }

        reader.close()?;
        debug!(lines = document.lines.len(), "document loaded");
        Ok(document)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_at(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    /// 指定行の長さ。範囲外は 0
    pub fn line_len(&self, index: usize) -> usize {
        self.line_at(index).map_or(0, Line::len)
    }

    /// 指定行の最後の列。空行と範囲外は 0
    pub fn last_column(&self, index: usize) -> usize {
        self.line_at(index).map_or(0, Line::last_column)
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn ends_with_newline(&self) -> bool {
        self.ends_with_newline
    }

    /// 空のドキュメントに空行を 1 つ用意する (変更扱いにはしない)
    pub fn ensure_line(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(Line::default());
        }
    }

    /// 最終行に文字を追加する
    ///
    /// 改行 (CR / LF) は新しい最終行を開始する。表示できない文字は無視して `false`
    pub fn append_char_to_current(&mut self, ch: char) -> bool {
        match ch {
            '\r' | '\n' => {
                self.ensure_line();
                self.lines.push(Line::default());
            }
            _ => {
                self.ensure_line();
                let Some(line) = self.lines.last_mut() else {
                    return false;
                };
                if !line.push(ch) {
                    return false;
                }
            }
        }
        self.modified = true;
        true
    }

    /// 変更があれば保存先の内容を置き換える
    ///
    /// 変更がなければ保存先には触れずに `false` を返す
    pub fn save<W: LineWriter>(&mut self, writer: &mut W) -> io::Result<bool> {
        if !self.modified {
            debug!("no modification, skip saving");
            return Ok(false);
        }

        writer.open(0)?;
        writer.truncate()?;
        if let Some((last, rest)) = self.lines.split_last() {
            for line in rest {
                writer.append_line(line.chars())?;
            }
            if self.ends_with_newline {
                writer.append_line(last.chars())?;
            } else if !last.is_empty() {
                writer.write_str(last.chars())?;
            }
        }
        writer.close()?;

        self.modified = false;
        debug!(lines = self.lines.len(), "document saved");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    use crate::file_io::{FileReader, FileWriter};

    fn load_str(content: &str) -> Document {
        Document::load(&mut Cursor::new(content.as_bytes().to_vec())).unwrap()
    }

    fn line(document: &Document, index: usize) -> &str {
        document.line_at(index).unwrap().chars()
    }

    #[test]
    fn test_load_lf_records() {
        let document = load_str("line1\nline2\n");

        assert_eq!(document.line_count(), 2);
        assert_eq!(line(&document, 0), "line1");
        assert_eq!(line(&document, 1), "line2");
        assert!(document.ends_with_newline());
        assert!(!document.is_modified());
    }

    #[test]
    fn test_load_trailing_partial_record() {
        let document = load_str("line1\nline2");

        assert_eq!(document.line_count(), 2);
        assert_eq!(line(&document, 1), "line2");
        assert!(!document.ends_with_newline());
    }

    #[test]
    fn test_load_crlf_is_one_terminator() {
        let document = load_str("a\r\nb\rc\n");

        assert_eq!(document.line_count(), 3);
        assert_eq!(line(&document, 0), "a");
        assert_eq!(line(&document, 1), "b");
        assert_eq!(line(&document, 2), "c");
    }

    #[test]
    fn test_load_lf_cr_is_two_terminators() {
        let document = load_str("a\n\rb\n");

        assert_eq!(document.line_count(), 3);
        assert_eq!(line(&document, 1), "");
    }

    #[test]
    fn test_load_discards_non_printable() {
        let document = load_str("a\tb\x07c\x7fd\n");

        assert_eq!(line(&document, 0), "abcd");
    }

    #[test]
    fn test_load_empty_source() {
        let document = load_str("");

        assert!(document.is_empty());
        assert_eq!(document.line_count(), 0);
    }

    #[test]
    fn test_load_reports_progress() {
        let mut seen = Vec::new();
        let mut source = Cursor::new(b"x\ny\nz".to_vec());
        Document::load_with_progress(&mut source, |count| {
            seen.push(count);
            Ok(())
        })
        .unwrap();

        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn test_line_visible_window() {
        let line = Line::new("abcdefgh");

        assert_eq!(line.visible(0, 3), "abc");
        assert_eq!(line.visible(6, 5), "gh");
        assert_eq!(line.visible(8, 5), "");
        assert_eq!(line.visible(20, 5), "");
    }

    #[test]
    fn test_last_column() {
        let document = Document::from_lines(["abc", ""]);

        assert_eq!(document.last_column(0), 2);
        assert_eq!(document.last_column(1), 0);
        assert_eq!(document.last_column(5), 0);
        let texts: Vec<&str> = document.lines().map(Line::chars).collect();
        assert_eq!(texts, ["abc", ""]);
    }

    #[test]
    fn test_append_marks_modified() {
        let mut document = Document::from_lines(["ab"]);

        assert!(document.append_char_to_current('c'));
        assert!(document.is_modified());
        assert_eq!(line(&document, 0), "abc");
    }

    #[test]
    fn test_append_rejects_non_printable() {
        let mut document = Document::from_lines(["ab"]);

        assert!(!document.append_char_to_current('\t'));
        assert!(!document.append_char_to_current('é'));
        assert!(!document.is_modified());
    }

    #[test]
    fn test_append_newline_opens_line() {
        let mut document = Document::new();
        document.append_char_to_current('a');
        document.append_char_to_current('\n');
        document.append_char_to_current('b');

        assert_eq!(document.line_count(), 2);
        assert_eq!(line(&document, 0), "a");
        assert_eq!(line(&document, 1), "b");
    }

    #[test]
    fn test_save_without_modification_does_nothing() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "original").unwrap();
        file.flush().unwrap();

        let mut document = Document::from_lines(["replaced"]);
        let saved = document.save(&mut FileWriter::new(file.path())).unwrap();

        assert!(!saved);
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "original");
    }

    #[test]
    fn test_round_trip_appended_text() {
        let file = NamedTempFile::new().unwrap();

        let mut document = Document::load(&mut FileReader::new(file.path())).unwrap();
        document.ensure_line();
        for ch in "ab\n".chars() {
            document.append_char_to_current(ch);
        }
        assert!(document.save(&mut FileWriter::new(file.path())).unwrap());
        assert!(!document.is_modified());

        assert_eq!(std::fs::read(file.path()).unwrap(), b"ab\n");

        let reopened = Document::load(&mut FileReader::new(file.path())).unwrap();
        assert_eq!(reopened.line_count(), 1);
        assert_eq!(line(&reopened, 0), "ab");
    }

    #[test]
    fn test_save_preserves_missing_trailing_newline() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "one\ntwo").unwrap();
        file.flush().unwrap();

        let mut document = Document::load(&mut FileReader::new(file.path())).unwrap();
        document.append_char_to_current('!');
        document.save(&mut FileWriter::new(file.path())).unwrap();

        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "one\ntwo!");
    }

    #[test]
    fn test_save_shrinks_destination() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "first\nsecond\nthird\n").unwrap();
        file.flush().unwrap();

        let mut document = Document::from_lines(["x"]);
        document.append_char_to_current('y');
        document.save(&mut FileWriter::new(file.path())).unwrap();

        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "xy");
    }
}
