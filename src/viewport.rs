//! ドキュメント座標・表示ウィンドウ・画面座標の対応を管理する
//!
//! 各操作は描画側にやるべきことを [`Update`] で返す。
//! ウィンドウの原点 (`first_line`, `first_column`) が動いたときだけ全体を再描画し、
//! それ以外はカーソル位置の移動だけで済ませる。

use tracing::trace;

use crate::cursor::Cursor;
use crate::document::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// 操作の結果、画面に必要な更新
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// 何もしない
    None,
    /// 動けない。ベルを鳴らす
    Bell,
    /// カーソル位置だけ移動する
    Reposition,
    /// ウィンドウ全体を描き直す
    Redraw,
}

impl Update {
    fn redraw_if(redraw: bool) -> Self {
        if redraw { Self::Redraw } else { Self::Reposition }
    }
}

#[derive(Debug, Clone)]
pub struct Viewport {
    rows: usize,
    columns: usize,
    padding: usize,
    /// 画面の一番上に表示している行 (0-indexed)
    first_line: usize,
    /// 画面の一番左に表示している列 (0-indexed)
    first_column: usize,
    /// 画面上のカーソル行 (1-indexed)
    term_row: usize,
    /// 画面上のカーソル列 (1-indexed)
    term_column: usize,
    cursor: Cursor,
}

impl Viewport {
    /// `padding` が 0 の場合は 1 として扱う
    pub fn new(rows: usize, columns: usize, padding: usize) -> Self {
        Self {
            rows: rows.max(1),
            columns: columns.max(1),
            padding: padding.max(1),
            first_line: 0,
            first_column: 0,
            term_row: 1,
            term_column: 1,
            cursor: Cursor::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    pub fn first_line(&self) -> usize {
        self.first_line
    }

    pub fn first_column(&self) -> usize {
        self.first_column
    }

    pub fn term_row(&self) -> usize {
        self.term_row
    }

    pub fn term_column(&self) -> usize {
        self.term_column
    }

    pub fn line(&self) -> usize {
        self.cursor.line()
    }

    pub fn column(&self) -> usize {
        self.cursor.column()
    }

    pub fn desired_column(&self) -> usize {
        self.cursor.desired()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// 最下行に表示されるドキュメントの行
    pub fn last_row_line(&self) -> usize {
        self.first_line + self.rows - 1
    }

    pub fn jump_to_document_start(&mut self) -> Update {
        let moved = self.first_line != 0 || self.first_column != 0;
        self.first_line = 0;
        self.first_column = 0;
        self.cursor = Cursor::new();
        self.seat();
        Update::redraw_if(moved)
    }

    pub fn jump_to_document_end(&mut self, document: &Document) -> Update {
        let last_line = document.line_count().saturating_sub(1);
        let column = document.last_column(last_line);

        let first_line = document.line_count().saturating_sub(self.rows);
        let first_column = (column + 1).saturating_sub(self.columns);
        let moved = first_line != self.first_line || first_column != self.first_column;

        self.first_line = first_line;
        self.first_column = first_column;
        self.cursor = Cursor::at(last_line, column);
        self.seat();
        Update::redraw_if(moved)
    }

    pub fn jump_to_line_start(&mut self) -> Update {
        if self.cursor.column() == 0 {
            self.cursor.select_column(0);
            return Update::None;
        }

        let moved = self.first_column != 0;
        self.first_column = 0;
        self.cursor.select_column(0);
        self.seat();
        Update::redraw_if(moved)
    }

    pub fn jump_to_line_end(&mut self, document: &Document) -> Update {
        if self.at_line_end(document) {
            self.cursor.select_column(self.cursor.column());
            return Update::None;
        }

        let last_column = document.last_column(self.cursor.line());
        self.cursor.select_column(last_column);
        let moved = self.scroll_column_into_view();
        self.seat();
        Update::redraw_if(moved)
    }

    pub fn move_cursor(&mut self, document: &Document, direction: Direction) -> Update {
        let update = match direction {
            Direction::Up => self.move_up(document),
            Direction::Down => self.move_down(document),
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(document),
        };
        trace!(
            ?direction,
            ?update,
            line = self.cursor.line(),
            column = self.cursor.column(),
            "cursor moved"
        );
        update
    }

    fn move_up(&mut self, document: &Document) -> Update {
        if self.cursor.line() == 0 {
            return if self.cursor.column() > 0 {
                self.jump_to_document_start()
            } else {
                Update::Bell
            };
        }

        let target = self.cursor.line() - 1;
        let shifted = self.fit_column(document, target);

        // 上端に近づいたら 1 行スクロール
        let scroll = self.term_row <= self.padding && self.first_line > 0;
        if scroll {
            self.first_line -= 1;
        }
        self.cursor.move_up();
        self.seat();
        Update::redraw_if(scroll || shifted)
    }

    fn move_down(&mut self, document: &Document) -> Update {
        let last_line = document.line_count().saturating_sub(1);
        if self.cursor.line() >= last_line {
            return if self.at_line_end(document) {
                Update::Bell
            } else {
                self.jump_to_document_end(document)
            };
        }

        let target = self.cursor.line() + 1;
        let shifted = self.fit_column(document, target);

        // 下端に近づいて、まだ下に行があれば 1 行スクロール
        let scroll = self.rows - self.term_row < self.padding
            && document.line_count() > self.first_line + self.rows;
        if scroll {
            self.first_line += 1;
        }
        self.cursor.move_down();
        self.seat();
        Update::redraw_if(scroll || shifted)
    }

    fn move_left(&mut self) -> Update {
        let column = self.cursor.column();
        if column == 0 {
            return Update::Bell;
        }

        let scroll = self.term_column <= self.padding && self.first_column > 0;
        if scroll {
            self.first_column -= 1;
        }
        self.cursor.select_column(column - 1);
        self.seat();
        Update::redraw_if(scroll)
    }

    fn move_right(&mut self, document: &Document) -> Update {
        if self.at_line_end(document) {
            return Update::Bell;
        }

        let line_len = document.line_len(self.cursor.line());
        let scroll = self.columns - self.term_column < self.padding
            && line_len > self.first_column + self.columns;
        if scroll {
            self.first_column += 1;
        }
        self.cursor.select_column(self.cursor.column() + 1);
        self.seat();
        Update::redraw_if(scroll)
    }

    fn at_line_end(&self, document: &Document) -> bool {
        let last_column = document.last_column(self.cursor.line());
        self.cursor.column() >= last_column
    }

    /// 移動先の行に合わせて列を調整する。列ウィンドウが動いたら `true`
    fn fit_column(&mut self, document: &Document, target: usize) -> bool {
        let last_column = document.last_column(target);
        self.cursor.fit_column(last_column);
        self.scroll_column_into_view()
    }

    /// 選択列が表示範囲外なら列ウィンドウを動かす
    fn scroll_column_into_view(&mut self) -> bool {
        let column = self.cursor.column();
        if column < self.first_column {
            self.first_column = column;
            true
        } else if column >= self.first_column + self.columns {
            self.first_column = column + 1 - self.columns;
            true
        } else {
            false
        }
    }

    /// ドキュメント座標から画面座標を決める
    fn seat(&mut self) {
        self.term_row = self.cursor.line() - self.first_line + 1;
        self.term_column = self.cursor.column() - self.first_column + 1;
    }
}
