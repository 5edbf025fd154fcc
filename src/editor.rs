use std::io::Write;

use tracing::{debug, info, trace, warn};

use crate::calibrate::calibrate;
use crate::command::{CommandBuffer, CommandLine, Quit, SAVING, UNSAVED_CHANGES};
use crate::config::{Config, SizeSource, size_or_default};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::file_io::{LineReader, LineWriter};
use crate::input::{Action, COMMAND_START, CharSource, DELETE, ESCAPE, is_terminator};
use crate::screen::{BACKSPACE, Screen};
use crate::viewport::{Update, Viewport};

/// 1 ファイル分の編集セッション
///
/// 入力元と出力先は構築時に受け取り、読み込み元 / 保存先は操作ごとに渡す
pub struct Editor<I, W> {
    config: Config,
    input: I,
    stdout: W,
    document: Document,
    viewport: Viewport,
    /// `:q` などで終了が決まったか
    exit: bool,
}

impl<I: CharSource, W: Write> Editor<I, W> {
    pub fn new(config: Config, input: I, stdout: W) -> Self {
        let viewport = match config.size {
            SizeSource::Fixed { rows, columns } => Viewport::new(rows, columns, config.padding),
            SizeSource::Terminal | SizeSource::Calibrate => Viewport::new(1, 1, config.padding),
        };
        Self {
            config,
            input,
            stdout,
            document: Document::new(),
            viewport,
            exit: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn stdout(&self) -> &W {
        &self.stdout
    }

    pub fn should_exit(&self) -> bool {
        self.exit
    }

    pub fn into_parts(self) -> (Document, I, W) {
        (self.document, self.input, self.stdout)
    }

    /// 読み込みから終了までのメインループ
    pub fn run<R, S>(&mut self, reader: &mut R, writer: &mut S) -> Result<()>
    where
        R: LineReader,
        S: LineWriter,
    {
        self.start(reader)?;
        while !self.exit {
            let key = self.input.read_char()?;
            self.handle_key(key, writer)?;
        }
        self.finish()
    }

    /// サイズを決め、ファイルを読み込んで先頭を表示する
    pub fn start<R: LineReader>(&mut self, reader: &mut R) -> Result<()> {
        let (rows, columns) = match self.config.size {
            SizeSource::Terminal => size_or_default(termion::terminal_size()),
            SizeSource::Fixed { rows, columns } => (rows, columns),
            SizeSource::Calibrate => calibrate(&mut self.input, &mut self.stdout)?,
        };
        if rows == 0 || columns == 0 {
            return Err(Error::InvalidSize { rows, columns });
        }
        self.viewport = Viewport::new(rows, columns, self.config.padding);
        info!(rows, columns, padding = self.viewport.padding(), "viewport ready");

        Screen::clear(&mut self.stdout, rows, columns, true)?;
        write!(self.stdout, "{}x{} ", columns, rows)?;
        self.stdout.flush()?;

        self.load(reader)?;

        self.viewport.jump_to_document_start();
        Screen::redraw(&mut self.stdout, &self.viewport, &self.document)?;
        self.stdout.flush()?;
        Ok(())
    }

    /// 読み込み中は `Line: N` を表示する
    fn load<R: LineReader>(&mut self, reader: &mut R) -> Result<()> {
        let stdout = &mut self.stdout;
        let progress_row = self.viewport.rows().min(2);
        // 表示の失敗は読み込みの失敗と区別する
        let mut display = Ok(());
        let document = Document::load_with_progress(reader, |count| {
            if display.is_ok() {
                display = Screen::position_cursor(stdout, progress_row, 1)
                    .and_then(|()| write!(stdout, "Line: {}", count));
            }
            Ok(())
        })
        .map_err(Error::Load)?;
        display?;

        self.document = document;
        // 空ファイルでも選択できる行を 1 つ用意する
        self.document.ensure_line();
        Ok(())
    }

    /// 終了時に画面を消してカーソルを戻す
    pub fn finish(&mut self) -> Result<()> {
        Screen::clear(
            &mut self.stdout,
            self.viewport.rows(),
            self.viewport.columns(),
            true,
        )?;
        Screen::show_cursor(&mut self.stdout)?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn handle_key<S: LineWriter>(&mut self, key: char, writer: &mut S) -> Result<()> {
        let Some(action) = Action::from_key(key) else {
            trace!(?key, "ignored key");
            return Ok(());
        };

        let update = match action {
            Action::Move(direction) => self.viewport.move_cursor(&self.document, direction),
            Action::DocumentStart => self.viewport.jump_to_document_start(),
            Action::DocumentEnd => self.viewport.jump_to_document_end(&self.document),
            Action::LineStart => self.viewport.jump_to_line_start(),
            Action::LineEnd => self.viewport.jump_to_line_end(&self.document),
            Action::Command => {
                self.command(writer)?;
                Update::None
            }
        };
        self.render(update)?;
        self.stdout.flush()?;
        Ok(())
    }

    fn render(&mut self, update: Update) -> Result<()> {
        match update {
            Update::None => {}
            Update::Bell => Screen::bell(&mut self.stdout)?,
            Update::Reposition => Screen::position_cursor(
                &mut self.stdout,
                self.viewport.term_row(),
                self.viewport.term_column(),
            )?,
            Update::Redraw => Screen::redraw(&mut self.stdout, &self.viewport, &self.document)?,
        }
        Ok(())
    }

    /// 最終行に文字を追加する (挿入モードは持たないため、デモ / テスト用)
    pub fn append_char(&mut self, ch: char) -> Result<bool> {
        if !self.document.append_char_to_current(ch) {
            return Ok(false);
        }
        Screen::redraw(&mut self.stdout, &self.viewport, &self.document)?;
        self.stdout.flush()?;
        Ok(true)
    }

    /// `:` で始まるコマンド行を読んで実行する
    pub fn command<S: LineWriter>(&mut self, writer: &mut S) -> Result<()> {
        let rows = self.viewport.rows();
        Screen::clear_row(&mut self.stdout, rows, self.viewport.columns())?;
        Screen::position_cursor(&mut self.stdout, rows, 1)?;
        write!(self.stdout, "{}", COMMAND_START)?;
        self.stdout.flush()?;

        let Some(input) = self.read_command_input()? else {
            debug!("command cancelled");
            return self.restore_status_row();
        };
        debug!(command = %input, "command entered");

        let command = CommandLine::parse(&input);
        if command.is_empty() && !input.is_empty() {
            debug!(command = %input, "unknown command");
        }

        // 終了できるかはコマンド入力時点の状態で判断する
        let had_changes = self.document.is_modified();

        if command.save {
            self.save(writer)?;
        }

        match command.quit {
            Some(Quit::Force) => {
                debug!("exit (discard)");
                self.exit = true;
            }
            Some(Quit::Normal) if had_changes => {
                warn!("exit refused: unsaved changes");
                self.show_unsaved_warning()?;
            }
            Some(Quit::Normal) => {
                debug!("exit (no modification)");
                self.exit = true;
            }
            None => {}
        }

        self.restore_status_row()
    }

    /// 終端までの入力を返す。ESC で取り消した場合は `None`
    ///
    /// 容量を超えた文字はエコーせずベルを鳴らす
    fn read_command_input(&mut self) -> Result<Option<String>> {
        let mut buffer = CommandBuffer::new(self.config.command_capacity);
        loop {
            let key = self.input.read_char()?;
            match key {
                key if is_terminator(key) => return Ok(Some(buffer.as_str().to_string())),
                ESCAPE => return Ok(None),
                BACKSPACE | DELETE => {
                    if buffer.pop().is_some() {
                        Screen::backspace(&mut self.stdout)?;
                        write!(self.stdout, " ")?;
                        Screen::backspace(&mut self.stdout)?;
                    } else {
                        Screen::bell(&mut self.stdout)?;
                    }
                }
                key if key.is_ascii_graphic() || key == ' ' => match buffer.push(key) {
                    Ok(()) => write!(self.stdout, "{}", key)?,
                    Err(overflow) => {
                        debug!(%overflow, "command character rejected");
                        Screen::bell(&mut self.stdout)?;
                    }
                },
                _ => {}
            }
            self.stdout.flush()?;
        }
    }

    fn save<S: LineWriter>(&mut self, writer: &mut S) -> Result<()> {
        if self.document.is_modified() {
            let rows = self.viewport.rows();
            Screen::clear_row(&mut self.stdout, rows, self.viewport.columns())?;
            Screen::position_cursor(&mut self.stdout, rows, 1)?;
            write!(self.stdout, "{}", SAVING)?;
            self.stdout.flush()?;
        }

        if self.document.save(writer).map_err(Error::Save)? {
            info!(lines = self.document.line_count(), "saved");
        }
        Ok(())
    }

    /// 警告を表示して終端キーを待つ
    fn show_unsaved_warning(&mut self) -> Result<()> {
        let rows = self.viewport.rows();
        Screen::clear_row(&mut self.stdout, rows, self.viewport.columns())?;
        Screen::position_cursor(&mut self.stdout, rows, 1)?;
        write!(self.stdout, "{}", UNSAVED_CHANGES)?;
        self.stdout.flush()?;

        while !is_terminator(self.input.read_char()?) {}
        Ok(())
    }

    /// 最下行をドキュメントの内容に戻し、カーソルを元の位置へ
    fn restore_status_row(&mut self) -> Result<()> {
        let viewport = &self.viewport;
        Screen::print_line_at_row(
            &mut self.stdout,
            self.document.line_at(viewport.last_row_line()),
            viewport.first_column(),
            viewport.columns(),
            viewport.rows(),
        )?;
        Screen::position_cursor(&mut self.stdout, viewport.term_row(), viewport.term_column())?;
        self.stdout.flush()?;
        Ok(())
    }
}
