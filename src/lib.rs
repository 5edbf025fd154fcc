pub mod calibrate;
pub mod command;
pub mod config;
pub mod cursor;
pub mod document;
pub mod editor;
pub mod error;
pub mod file_io;
pub mod input;
pub mod logger;
pub mod screen;
pub mod terminal;
pub mod viewport;

pub use error::{Error, Result};

// スクロール開始までにカーソルと画面端の間に残す行数 / 列数
pub const DEFAULT_PADDING: usize = 3;
// コマンドラインに入力できる最大文字数
pub const DEFAULT_COMMAND_CAPACITY: usize = 64;
// ターミナルサイズが取れない場合のフォールバック
pub const DEFAULT_ROWS: usize = 24;
pub const DEFAULT_COLUMNS: usize = 80;
