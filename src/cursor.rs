/// ドキュメント上の選択位置 (0-indexed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    line: usize,
    column: usize,
    /// ユーザーが最後に選んだ列
    ///
    /// 短い行を通過するときは `column` より大きいままになり、
    /// 次に長い行を選んだときに `column` を戻すのに使う
    desired: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            desired: column,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn desired(&self) -> usize {
        self.desired
    }

    /// 水平移動やジャンプ。希望列も合わせる
    pub fn select_column(&mut self, column: usize) {
        self.column = column;
        self.desired = column;
    }

    /// 垂直移動で行の長さに合わせる。希望列は残す
    pub fn fit_column(&mut self, last_column: usize) {
        self.column = self.desired.min(last_column);
    }

    pub fn move_up(&mut self) {
        self.line = self.line.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        self.line += 1;
    }
}
