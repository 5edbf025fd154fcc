use std::io;

use crate::viewport::Direction;

pub const COMMAND_START: char = ':';
pub const TO_LINE_START: char = '0';
pub const TO_LINE_END: char = '$';
pub const TO_FILE_START: char = 'g';
pub const TO_FILE_END: char = 'G';
pub const ESCAPE: char = '\x1b';
pub const DELETE: char = '\x7f';

/// 1 文字ずつブロッキングで読む入力元。エコーはしない
pub trait CharSource {
    fn read_char(&mut self) -> io::Result<char>;
}

impl<T: CharSource + ?Sized> CharSource for &mut T {
    fn read_char(&mut self) -> io::Result<char> {
        (**self).read_char()
    }
}

/// 文字列をそのまま入力として流す (終端で `UnexpectedEof`)
impl CharSource for std::str::Chars<'_> {
    fn read_char(&mut self) -> io::Result<char> {
        self.next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input exhausted"))
    }
}

/// 行 / コマンドの終端
pub fn is_terminator(ch: char) -> bool {
    matches!(ch, '\r' | '\n' | '\0')
}

/// vim 風 (hjkl) と WASD の両方を受け付ける
pub fn direction_for(key: char) -> Option<Direction> {
    match key {
        'h' | 'a' => Some(Direction::Left),
        'j' | 's' => Some(Direction::Down),
        'k' | 'w' => Some(Direction::Up),
        'l' | 'd' => Some(Direction::Right),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    DocumentStart,
    DocumentEnd,
    LineStart,
    LineEnd,
    Command,
}

impl Action {
    pub fn from_key(key: char) -> Option<Self> {
        if let Some(direction) = direction_for(key) {
            return Some(Self::Move(direction));
        }
        match key {
            TO_FILE_START => Some(Self::DocumentStart),
            TO_FILE_END => Some(Self::DocumentEnd),
            TO_LINE_START => Some(Self::LineStart),
            TO_LINE_END => Some(Self::LineEnd),
            COMMAND_START => Some(Self::Command),
            _ => None,
        }
    }
}
