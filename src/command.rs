use thiserror::Error;

pub const SAVE_CHAR: char = 'w';
pub const EXIT_CHAR: char = 'q';
pub const FORCE_CHAR: char = '!';

pub const UNSAVED_CHANGES: &str = "UNSAVED CHANGES";
pub const SAVING: &str = "Saving...";

/// 容量を超えた文字は受け付けない
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("command line is full ({capacity} characters)")]
pub struct Overflow {
    pub capacity: usize,
}

/// 容量固定のコマンド入力バッファ
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    text: String,
    capacity: usize,
}

impl CommandBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, ch: char) -> Result<(), Overflow> {
        if self.is_full() {
            return Err(Overflow {
                capacity: self.capacity,
            });
        }
        self.text.push(ch);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quit {
    /// 未保存の変更があれば止める
    Normal,
    /// 変更を破棄して終了
    Force,
}

/// `[w][q[!]]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandLine {
    pub save: bool,
    pub quit: Option<Quit>,
}

impl CommandLine {
    /// 認識できた先頭部分だけを解釈し、残りは無視する
    pub fn parse(input: &str) -> Self {
        let mut command = Self::default();
        let mut rest = input;

        if let Some(after) = rest.strip_prefix(SAVE_CHAR) {
            command.save = true;
            rest = after;
        }

        if let Some(after) = rest.strip_prefix(EXIT_CHAR) {
            command.quit = Some(if after.starts_with(FORCE_CHAR) {
                Quit::Force
            } else {
                Quit::Normal
            });
        }

        command
    }

    pub fn is_empty(&self) -> bool {
        !self.save && self.quit.is_none()
    }
}
