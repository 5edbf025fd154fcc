use std::{
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, BufWriter, Cursor, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

/// 1 文字ずつ読み出す読み込み元
pub trait LineReader {
    fn open(&mut self) -> io::Result<()>;
    fn close(&mut self) -> io::Result<()>;

    /// 次の文字を消費せずに返す。終端なら `None`
    fn peek(&mut self) -> io::Result<Option<u8>>;

    /// 次の文字を消費して返す。終端では `UnexpectedEof`
    fn get_char(&mut self) -> io::Result<u8>;

    fn eof(&mut self) -> io::Result<bool> {
        Ok(self.peek()?.is_none())
    }
}

/// 行単位で書き込む保存先
pub trait LineWriter {
    /// 先頭から `offset` バイトの位置で開く
    fn open(&mut self, offset: u64) -> io::Result<()>;

    /// 現在位置より後ろを切り捨てる
    fn truncate(&mut self) -> io::Result<()>;

    fn write_str(&mut self, text: &str) -> io::Result<()>;

    fn close(&mut self) -> io::Result<()>;

    /// 行を改行付きで書き込む
    fn append_line(&mut self, line: &str) -> io::Result<()> {
        self.write_str(line)?;
        self.write_str("\n")
    }
}

fn not_open() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "file is not open")
}

enum ReadState {
    Closed,
    // 存在しないファイルは空として扱う
    Missing,
    Open(BufReader<File>),
}

pub struct FileReader {
    path: PathBuf,
    state: ReadState,
}

impl FileReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: ReadState::Closed,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, ReadState::Closed)
    }
}

impl LineReader for FileReader {
    fn open(&mut self) -> io::Result<()> {
        self.state = match File::open(&self.path) {
            Ok(file) => ReadState::Open(BufReader::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => ReadState::Missing,
            Err(e) => return Err(e),
        };
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.state = ReadState::Closed;
        Ok(())
    }

    fn peek(&mut self) -> io::Result<Option<u8>> {
        match &mut self.state {
            ReadState::Closed => Err(not_open()),
            ReadState::Missing => Ok(None),
            ReadState::Open(reader) => Ok(reader.fill_buf()?.first().copied()),
        }
    }

    fn get_char(&mut self) -> io::Result<u8> {
        match &mut self.state {
            ReadState::Closed => Err(not_open()),
            ReadState::Missing => Err(io::ErrorKind::UnexpectedEof.into()),
            ReadState::Open(reader) => next_byte(reader),
        }
    }
}

fn next_byte<R: BufRead>(reader: &mut R) -> io::Result<u8> {
    let byte = reader.fill_buf()?.first().copied();
    match byte {
        Some(byte) => {
            reader.consume(1);
            Ok(byte)
        }
        None => Err(io::ErrorKind::UnexpectedEof.into()),
    }
}

pub struct FileWriter {
    path: PathBuf,
    file: Option<BufWriter<File>>,
}

impl FileWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    fn file(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.file.as_mut().ok_or_else(not_open)
    }
}

impl LineWriter for FileWriter {
    fn open(&mut self, offset: u64) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        file.seek(SeekFrom::Start(offset))?;
        self.file = Some(BufWriter::new(file));
        Ok(())
    }

    fn truncate(&mut self) -> io::Result<()> {
        let file = self.file()?;
        // seek でバッファが書き出されてから長さを決める
        let position = file.stream_position()?;
        file.get_ref().set_len(position)
    }

    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.file()?.write_all(text.as_bytes())
    }

    fn close(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }
}

/// メモリ上の読み込み元
impl<T: AsRef<[u8]>> LineReader for Cursor<T> {
    fn open(&mut self) -> io::Result<()> {
        self.set_position(0);
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn peek(&mut self) -> io::Result<Option<u8>> {
        Ok(self.fill_buf()?.first().copied())
    }

    fn get_char(&mut self) -> io::Result<u8> {
        next_byte(self)
    }
}

/// メモリ上の保存先
impl LineWriter for Cursor<Vec<u8>> {
    fn open(&mut self, offset: u64) -> io::Result<()> {
        self.set_position(offset);
        Ok(())
    }

    fn truncate(&mut self) -> io::Result<()> {
        let position = self.position() as usize;
        self.get_mut().truncate(position);
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.write_all(text.as_bytes())
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reader_peek_does_not_consume() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "ab").unwrap();
        file.flush().unwrap();

        let mut reader = FileReader::new(file.path());
        reader.open().unwrap();

        assert_eq!(reader.peek().unwrap(), Some(b'a'));
        assert_eq!(reader.peek().unwrap(), Some(b'a'));
        assert_eq!(reader.get_char().unwrap(), b'a');
        assert_eq!(reader.get_char().unwrap(), b'b');
        assert!(reader.eof().unwrap());
        assert_eq!(
            reader.get_char().unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn test_reader_requires_open() {
        let file = NamedTempFile::new().unwrap();
        let mut reader = FileReader::new(file.path());

        assert!(!reader.is_open());
        assert_eq!(
            reader.peek().unwrap_err().kind(),
            io::ErrorKind::NotConnected
        );

        reader.open().unwrap();
        assert!(reader.is_open());
        reader.close().unwrap();
        assert!(!reader.is_open());
    }

    #[test]
    fn test_reader_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut reader = FileReader::new(dir.path().join("new.txt"));

        reader.open().unwrap();
        assert!(reader.eof().unwrap());
    }

    #[test]
    fn test_writer_truncates_previous_content() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a much longer previous content\n").unwrap();
        file.flush().unwrap();

        let mut writer = FileWriter::new(file.path());
        writer.open(0).unwrap();
        writer.truncate().unwrap();
        writer.append_line("short").unwrap();
        writer.close().unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "short\n");
    }

    #[test]
    fn test_writer_open_at_offset() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "keep|drop").unwrap();
        file.flush().unwrap();

        let mut writer = FileWriter::new(file.path());
        writer.open(5).unwrap();
        writer.truncate().unwrap();
        writer.write_str("new").unwrap();
        writer.close().unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "keep|new");
    }

    #[test]
    fn test_writer_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("created.txt");

        let mut writer = FileWriter::new(&path);
        writer.open(0).unwrap();
        writer.append_line("hello").unwrap();
        writer.close().unwrap();

        assert!(!writer.is_open());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_writer_requires_open() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = FileWriter::new(file.path());

        assert_eq!(
            writer.append_line("x").unwrap_err().kind(),
            io::ErrorKind::NotConnected
        );
    }

    #[test]
    fn test_memory_writer_truncate() {
        let mut sink = Cursor::new(b"old content".to_vec());
        LineWriter::open(&mut sink, 0).unwrap();
        LineWriter::truncate(&mut sink).unwrap();
        sink.append_line("new").unwrap();

        assert_eq!(sink.into_inner(), b"new\n");
    }
}
