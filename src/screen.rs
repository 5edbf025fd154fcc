use std::io::{self, Write};

use crate::document::{Document, Line};
use crate::viewport::Viewport;

pub const BELL: char = '\x07';
pub const BACKSPACE: char = '\x08';

/// 画面座標を termion の座標に変換する
fn coordinate(value: usize) -> u16 {
    u16::try_from(value.max(1)).unwrap_or(u16::MAX)
}

pub struct Screen;

impl Screen {
    /// ウィンドウ全体を描き直してカーソルを戻す
    pub fn redraw(
        stdout: &mut impl Write,
        viewport: &Viewport,
        document: &Document,
    ) -> io::Result<()> {
        // カーソルを隠す
        Self::hide_cursor(stdout)?;

        let mut lines = document.lines().skip(viewport.first_line());
        for row in 1..=viewport.rows() {
            Self::print_line_at_row(
                stdout,
                lines.next(),
                viewport.first_column(),
                viewport.columns(),
                row,
            )?;
        }

        Self::position_cursor(stdout, viewport.term_row(), viewport.term_column())?;
        Self::show_cursor(stdout)
    }

    /// 1 行分を描画する。行が短い / 存在しない場合は空白で埋める
    pub fn print_line_at_row(
        stdout: &mut impl Write,
        line: Option<&Line>,
        first_column: usize,
        columns: usize,
        row: usize,
    ) -> io::Result<()> {
        Self::position_cursor(stdout, row, 1)?;
        let text = line.map_or("", |line| line.visible(first_column, columns));
        write!(stdout, "{:<width$}", text, width = columns)
    }

    /// `write_spaces` が false ならカーソルを左上に移動するだけ
    pub fn clear(
        stdout: &mut impl Write,
        rows: usize,
        columns: usize,
        write_spaces: bool,
    ) -> io::Result<()> {
        if write_spaces {
            for row in 1..=rows {
                Self::clear_row(stdout, row, columns)?;
            }
        }
        Self::position_cursor(stdout, 1, 1)
    }

    pub fn clear_row(stdout: &mut impl Write, row: usize, columns: usize) -> io::Result<()> {
        Self::position_cursor(stdout, row, 1)?;
        write!(stdout, "{:width$}", "", width = columns)
    }

    /// `ESC [ row ; col H` (1-indexed)
    pub fn position_cursor(stdout: &mut impl Write, row: usize, column: usize) -> io::Result<()> {
        write!(
            stdout,
            "{}",
            termion::cursor::Goto(coordinate(column), coordinate(row))
        )
    }

    pub fn bell(stdout: &mut impl Write) -> io::Result<()> {
        write!(stdout, "{}", BELL)
    }

    /// カーソルを消さずに 1 つ左へ
    pub fn backspace(stdout: &mut impl Write) -> io::Result<()> {
        write!(stdout, "{}", BACKSPACE)
    }

    pub fn hide_cursor(stdout: &mut impl Write) -> io::Result<()> {
        write!(stdout, "{}", termion::cursor::Hide)
    }

    pub fn show_cursor(stdout: &mut impl Write) -> io::Result<()> {
        write!(stdout, "{}", termion::cursor::Show)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Direction;

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(draw: F) -> String {
        let mut out = Vec::new();
        draw(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_position_cursor_sequence() {
        assert_eq!(
            render(|out| Screen::position_cursor(out, 3, 12)),
            "\x1b[3;12H"
        );
    }

    #[test]
    fn test_cursor_visibility_sequences() {
        assert_eq!(render(|out| Screen::hide_cursor(out)), "\x1b[?25l");
        assert_eq!(render(|out| Screen::show_cursor(out)), "\x1b[?25h");
        assert_eq!(render(|out| Screen::bell(out)), "\x07");
        assert_eq!(render(|out| Screen::backspace(out)), "\x08");
    }

    #[test]
    fn test_print_line_pads_to_width() {
        let line = Line::new("abc");
        assert_eq!(
            render(|out| Screen::print_line_at_row(out, Some(&line), 0, 5, 2)),
            "\x1b[2;1Habc  "
        );
        assert_eq!(
            render(|out| Screen::print_line_at_row(out, None, 0, 3, 1)),
            "\x1b[1;1H   "
        );
    }

    #[test]
    fn test_print_line_from_first_column() {
        let line = Line::new("0123456789");
        assert_eq!(
            render(|out| Screen::print_line_at_row(out, Some(&line), 4, 3, 1)),
            "\x1b[1;1H456"
        );
    }

    #[test]
    fn test_clear_row() {
        assert_eq!(
            render(|out| Screen::clear_row(out, 4, 3)),
            "\x1b[4;1H   "
        );
    }

    #[test]
    fn test_clear_without_spaces_only_homes() {
        assert_eq!(render(|out| Screen::clear(out, 5, 5, false)), "\x1b[1;1H");
        assert_eq!(
            render(|out| Screen::clear(out, 2, 2, true)),
            "\x1b[1;1H  \x1b[2;1H  \x1b[1;1H"
        );
    }

    #[test]
    fn test_redraw_window() {
        let document = Document::from_lines(["first line", "second", "third"]);
        let mut viewport = Viewport::new(2, 4, 1);
        viewport.move_cursor(&document, Direction::Down);
        viewport.move_cursor(&document, Direction::Down);

        let output = render(|out| Screen::redraw(out, &viewport, &document));
        assert_eq!(
            output,
            "\x1b[?25l\x1b[1;1Hseco\x1b[2;1Hthir\x1b[2;1H\x1b[?25h"
        );
    }

    #[test]
    fn test_redraw_blank_rows_past_end() {
        let document = Document::from_lines(["ab"]);
        let viewport = Viewport::new(3, 2, 1);

        let output = render(|out| Screen::redraw(out, &viewport, &document));
        assert_eq!(
            output,
            "\x1b[?25l\x1b[1;1Hab\x1b[2;1H  \x1b[3;1H  \x1b[1;1H\x1b[?25h"
        );
    }
}
