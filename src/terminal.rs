use std::io::{self, Stdin, Stdout, Write};

use termion::event::Key;
use termion::input::{Keys, TermRead};
use termion::raw::{IntoRawMode, RawTerminal};

use crate::input::{CharSource, DELETE, ESCAPE};
use crate::screen::BACKSPACE;

/// raw mode の標準出力
pub struct Terminal {
    stdout: RawTerminal<Stdout>,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let stdout = io::stdout().into_raw_mode()?;
        Ok(Self { stdout })
    }

    pub fn clear_screen(&mut self) -> io::Result<()> {
        write!(
            self.stdout,
            "{}{}{}",
            termion::clear::All,
            termion::cursor::Goto(1, 1),
            termion::cursor::Show
        )?;
        self.stdout.flush()
    }
}

impl Write for Terminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // 終了時の画面クリア
        let _ = self.clear_screen();
    }
}

/// 標準入力からキーを 1 つずつ読む
pub struct Keyboard {
    keys: Keys<Stdin>,
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            keys: io::stdin().keys(),
        }
    }
}

impl CharSource for Keyboard {
    fn read_char(&mut self) -> io::Result<char> {
        for key in self.keys.by_ref() {
            match key? {
                Key::Char(ch) => return Ok(ch),
                Key::Backspace => return Ok(DELETE),
                Key::Ctrl('h') => return Ok(BACKSPACE),
                Key::Esc => return Ok(ESCAPE),
                Key::Null => return Ok('\0'),
                // 矢印キーなどは編集コマンドに割り当てていない
                _ => continue,
            }
        }
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "standard input closed",
        ))
    }
}
