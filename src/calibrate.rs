//! 起動時のウィンドウサイズ合わせ
//!
//! `Calibration...#` を表示し、移動キーで `#` を画面の右下まで動かしてもらう。
//! Enter を押した時点のマーカー位置がそのまま行数 / 列数になる。

use std::io::{self, Write};

use tracing::debug;

use crate::input::{CharSource, direction_for, is_terminator};
use crate::screen::Screen;
use crate::viewport::Direction;

pub const CALIBRATION_TEXT: &str = "Calibration...";
pub const MARKER: char = '#';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    rows: usize,
    columns: usize,
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new()
    }
}

impl Calibration {
    pub fn new() -> Self {
        Self {
            rows: 1,
            columns: CALIBRATION_TEXT.len() + 1,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// マーカーの画面座標 (row, column)
    pub fn marker(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// マーカーを動かせたら `true`
    pub fn apply(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Left if self.columns > 1 => self.columns -= 1,
            Direction::Up if self.rows > 1 => self.rows -= 1,
            Direction::Right => self.columns += 1,
            Direction::Down => self.rows += 1,
            _ => return false,
        }
        true
    }

    /// マーカーが去った後に表示する文字
    fn backdrop(row: usize, column: usize) -> char {
        if row == 1 && column <= CALIBRATION_TEXT.len() {
            char::from(CALIBRATION_TEXT.as_bytes()[column - 1])
        } else {
            ' '
        }
    }
}

/// 終端キーが押されるまでマーカーを動かし、(rows, columns) を返す
pub fn calibrate<I, W>(input: &mut I, stdout: &mut W) -> io::Result<(usize, usize)>
where
    I: CharSource,
    W: Write,
{
    let mut calibration = Calibration::new();

    Screen::hide_cursor(stdout)?;
    Screen::clear(stdout, 0, 0, false)?;
    write!(stdout, "{}{}", CALIBRATION_TEXT, MARKER)?;
    stdout.flush()?;

    loop {
        let key = input.read_char()?;
        if is_terminator(key) {
            break;
        }
        let Some(direction) = direction_for(key) else {
            continue;
        };

        let (row, column) = calibration.marker();
        if calibration.apply(direction) {
            Screen::position_cursor(stdout, row, column)?;
            write!(stdout, "{}", Calibration::backdrop(row, column))?;

            let (row, column) = calibration.marker();
            Screen::position_cursor(stdout, row, column)?;
            write!(stdout, "{}", MARKER)?;
            stdout.flush()?;
        }
    }

    Screen::show_cursor(stdout)?;
    debug!(
        rows = calibration.rows(),
        columns = calibration.columns(),
        "calibrated"
    );
    Ok((calibration.rows(), calibration.columns()))
}
