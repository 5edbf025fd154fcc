use std::io;

use crate::{DEFAULT_COLUMNS, DEFAULT_COMMAND_CAPACITY, DEFAULT_PADDING, DEFAULT_ROWS};

/// ビューポートのサイズをどう決めるか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSource {
    /// 起動時のターミナルサイズ
    Terminal,
    /// 固定サイズ
    Fixed { rows: usize, columns: usize },
    /// 起動時に `#` マーカーを動かして決める
    Calibrate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub padding: usize,
    pub command_capacity: usize,
    pub size: SizeSource,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            command_capacity: DEFAULT_COMMAND_CAPACITY,
            size: SizeSource::Terminal,
        }
    }
}

/// `termion::terminal_size()` の結果 (cols, rows) を (rows, columns) にする
///
/// 取得できない / 0 の場合は `DEFAULT_ROWS` x `DEFAULT_COLUMNS`
pub fn size_or_default(size: io::Result<(u16, u16)>) -> (usize, usize) {
    match size {
        Ok((columns, rows)) if columns > 0 && rows > 0 => (usize::from(rows), usize::from(columns)),
        Ok(_) => (DEFAULT_ROWS, DEFAULT_COLUMNS),
        Err(err) => {
            tracing::warn!(%err, "terminal size unavailable, using default");
            (DEFAULT_ROWS, DEFAULT_COLUMNS)
        }
    }
}

impl Config {
    pub fn with_size(mut self, rows: usize, columns: usize) -> Self {
        self.size = SizeSource::Fixed { rows, columns };
        self
    }

    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity;
        self
    }

    pub fn calibrated(mut self) -> Self {
        self.size = SizeSource::Calibrate;
        self
    }
}
