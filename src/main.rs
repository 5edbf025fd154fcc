use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pwedit::config::{Config, SizeSource, size_or_default};
use pwedit::editor::Editor;
use pwedit::file_io::{FileReader, FileWriter};
use pwedit::logger;
use pwedit::terminal::{Keyboard, Terminal};

/// 端末向けの小さな行エディタ
#[derive(Debug, Parser)]
#[command(name = "pwedit", version, about = "Terminal line editor")]
struct Cli {
    /// 編集するファイル (存在しなければ保存時に作成)
    path: PathBuf,

    /// スクロールを始めるまでに画面端と空ける行数 / 列数
    #[arg(long, default_value_t = pwedit::DEFAULT_PADDING)]
    padding: usize,

    /// 画面の行数 (省略時はターミナルの高さ)
    #[arg(long)]
    rows: Option<usize>,

    /// 画面の列数 (省略時はターミナルの幅)
    #[arg(long)]
    columns: Option<usize>,

    /// 起動時にマーカーを動かして画面サイズを決める
    #[arg(long, conflicts_with_all = ["rows", "columns"])]
    calibrate: bool,

    /// ログの出力先
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log {
        logger::init(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
    }

    let terminal = Terminal::new().context("failed to switch terminal to raw mode")?;
    let size = match (cli.calibrate, cli.rows, cli.columns) {
        (true, _, _) => SizeSource::Calibrate,
        (false, None, None) => SizeSource::Terminal,
        (false, rows, columns) => {
            // 指定のない方はターミナルに合わせる
            let (term_rows, term_columns) = size_or_default(termion::terminal_size());
            SizeSource::Fixed {
                rows: rows.unwrap_or(term_rows),
                columns: columns.unwrap_or(term_columns),
            }
        }
    };
    let config = Config {
        padding: cli.padding,
        size,
        ..Config::default()
    };
    tracing::info!(path = %cli.path.display(), ?config, "starting pwedit");

    let mut reader = FileReader::new(&cli.path);
    let mut writer = FileWriter::new(&cli.path);
    let mut editor = Editor::new(config, Keyboard::new(), terminal);
    editor
        .run(&mut reader, &mut writer)
        .with_context(|| format!("editing {} failed", cli.path.display()))?;

    Ok(())
}
