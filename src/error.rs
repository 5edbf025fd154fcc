use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// 読み込み元からの I/O エラー
    #[error("failed to load document")]
    Load(#[source] io::Error),

    /// 保存先への I/O エラー
    #[error("failed to save document")]
    Save(#[source] io::Error),

    /// キー入力 / 画面出力の I/O エラー (入力終端を含む)
    #[error("terminal I/O failed")]
    Terminal(#[from] io::Error),

    #[error("viewport must be at least 1x1, got {columns}x{rows}")]
    InvalidSize { rows: usize, columns: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
