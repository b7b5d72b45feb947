//! 棋盘定义与操作

use crate::game::error::BoardError;
use crate::game::piece::{Piece, PieceKind, Side};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// 行数（交叉点）
pub const BOARD_ROWS: u8 = 10;
/// 列数（交叉点）
pub const BOARD_COLS: u8 = 9;
/// 一局棋的棋子上限
pub const MAX_PIECES: usize = 32;

/// 棋盘坐标
///
/// 第 0 行是红方底线，第 9 行是黑方底线。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

#[derive(Deserialize)]
struct RawPosition {
    row: i32,
    col: i32,
}

impl TryFrom<RawPosition> for Position {
    type Error = String;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::checked(raw.row, raw.col)
            .ok_or_else(|| format!("坐标越界: ({}, {})", raw.row, raw.col))
    }
}

impl Position {
    /// 创建坐标，越界时 panic（用于字面量）
    pub const fn new(row: u8, col: u8) -> Self {
        assert!(row < BOARD_ROWS && col < BOARD_COLS, "坐标越界");
        Self { row, col }
    }

    /// 创建坐标，越界返回 None（用于外部数据）
    pub fn checked(row: i32, col: i32) -> Option<Self> {
        if Self::is_valid(row, col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// 检查坐标是否在棋盘内
    pub fn is_valid(row: i32, col: i32) -> bool {
        (0..BOARD_ROWS as i32).contains(&row) && (0..BOARD_COLS as i32).contains(&col)
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    /// 偏移后的坐标（越界为 None）
    pub fn offset(&self, d_row: i32, d_col: i32) -> Option<Self> {
        Self::checked(self.row as i32 + d_row, self.col as i32 + d_col)
    }

    /// 旋转 180°
    pub fn mirrored(&self) -> Self {
        Self {
            row: BOARD_ROWS - 1 - self.row,
            col: BOARD_COLS - 1 - self.col,
        }
    }

    /// 外部存储键 "row_col"
    pub fn key(&self) -> String {
        format!("{}_{}", self.row, self.col)
    }

    /// 解析 "row_col" 键
    pub fn from_key(key: &str) -> Option<Self> {
        let (row, col) = key.split_once('_')?;
        Self::checked(row.trim().parse().ok()?, col.trim().parse().ok()?)
    }

    /// 遍历所有交叉点（按行优先）
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_ROWS).flat_map(|row| (0..BOARD_COLS).map(move |col| Position { row, col }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// 布局：坐标到棋子的映射，用于重置棋盘
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pieces: BTreeMap<Position, Piece>,
}

impl Layout {
    /// 空布局
    pub fn empty() -> Self {
        Self::default()
    }

    /// 标准开局（32 子）
    pub fn standard() -> Self {
        use PieceKind::*;

        let back_rank = [Rook, Horse, Elephant, Advisor, King, Advisor, Elephant, Horse, Rook];
        let mut layout = Self::empty();

        for (side, back, cannons, pawns) in [(Side::Red, 0, 2, 3), (Side::Black, 9, 7, 6)] {
            for (col, kind) in back_rank.iter().enumerate() {
                layout.insert(Position::new(back, col as u8), Piece::new(side, *kind));
            }
            for col in [1, 7] {
                layout.insert(Position::new(cannons, col), Piece::new(side, Cannon));
            }
            for col in [0, 2, 4, 6, 8] {
                layout.insert(Position::new(pawns, col), Piece::new(side, Pawn));
            }
        }

        layout
    }

    /// 放置（覆盖）一枚棋子
    pub fn insert(&mut self, pos: Position, piece: Piece) -> Option<Piece> {
        self.pieces.insert(pos, piece)
    }

    /// 移除一枚棋子
    pub fn remove(&mut self, pos: Position) -> Option<Piece> {
        self.pieces.remove(&pos)
    }

    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.pieces.get(&pos).copied()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces.iter().map(|(pos, piece)| (*pos, *piece))
    }

    /// 从自定义摆棋映射构造（"row_col" -> "red_King"）
    ///
    /// 无法解析的条目记录警告后跳过。
    pub fn from_setup_map<K, V>(setup: &HashMap<K, V>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut layout = Self::empty();
        for (key, value) in setup {
            let (key, value) = (key.as_ref(), value.as_ref());
            let Some(pos) = Position::from_key(key) else {
                tracing::warn!(key, value, "跳过无法解析的摆棋坐标");
                continue;
            };
            match value.parse::<Piece>() {
                Ok(piece) => {
                    layout.insert(pos, piece);
                }
                Err(err) => tracing::warn!(key, %err, "跳过无法解析的摆棋棋子"),
            }
        }
        layout
    }

    /// 转换为自定义摆棋映射
    pub fn to_setup_map(&self) -> BTreeMap<String, String> {
        self.iter().map(|(pos, piece)| (pos.key(), piece.code())).collect()
    }

    /// 检查布局是否满足棋盘不变量
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.len() > MAX_PIECES {
            return Err(BoardError::TooManyPieces(self.len()));
        }
        for side in Side::ALL {
            let kings = self
                .pieces
                .values()
                .filter(|p| p.side == side && p.kind == PieceKind::King)
                .count();
            if kings > 1 {
                return Err(BoardError::DuplicateKing(side));
            }
        }
        Ok(())
    }
}

impl FromIterator<(Position, Piece)> for Layout {
    fn from_iter<I: IntoIterator<Item = (Position, Piece)>>(iter: I) -> Self {
        Self {
            pieces: iter.into_iter().collect(),
        }
    }
}

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Piece>; BOARD_COLS as usize]; BOARD_ROWS as usize],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            cells: [[None; BOARD_COLS as usize]; BOARD_ROWS as usize],
        }
    }

    /// 创建标准开局棋盘
    pub fn initial() -> Self {
        let mut board = Self::empty();
        board.fill(&Layout::standard());
        board
    }

    /// 由布局创建棋盘
    pub fn from_layout(layout: &Layout) -> Result<Self, BoardError> {
        let mut board = Self::empty();
        board.reset(layout)?;
        Ok(board)
    }

    /// 获取指定位置的棋子（如果有）
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.cells[pos.row as usize][pos.col as usize]
    }

    /// 检查位置是否为空
    pub fn is_empty(&self, pos: Position) -> bool {
        self.piece_at(pos).is_none()
    }

    fn cell_mut(&mut self, pos: Position) -> &mut Option<Piece> {
        &mut self.cells[pos.row as usize][pos.col as usize]
    }

    /// 放置棋子，目标格必须为空
    pub fn place(&mut self, pos: Position, piece: Piece) -> Result<(), BoardError> {
        if !self.is_empty(pos) {
            return Err(BoardError::OccupiedCell(pos));
        }
        if piece.kind == PieceKind::King && self.king_of(piece.side).is_some() {
            return Err(BoardError::DuplicateKing(piece.side));
        }
        let total = self.total();
        if total >= MAX_PIECES {
            return Err(BoardError::TooManyPieces(total + 1));
        }
        *self.cell_mut(pos) = Some(piece);
        Ok(())
    }

    /// 移除棋子
    pub fn remove(&mut self, pos: Position) -> Option<Piece> {
        self.cell_mut(pos).take()
    }

    /// 执行移动，返回被吃掉的棋子
    ///
    /// 只检查棋盘契约（起点有子、不吃己方），不检查走法规则。
    pub fn move_to(&mut self, from: Position, to: Position) -> Result<Option<Piece>, BoardError> {
        if from == to {
            return Err(BoardError::SameCell(from));
        }
        let piece = self.piece_at(from).ok_or(BoardError::EmptyCell(from))?;
        if let Some(target) = self.piece_at(to) {
            if target.is_friend_of(&piece) {
                return Err(BoardError::IllegalCapture { from, to });
            }
        }

        let captured = self.cell_mut(to).replace(piece);
        *self.cell_mut(from) = None;
        Ok(captured)
    }

    /// 用给定布局替换整个棋盘
    ///
    /// 布局先校验，失败时棋盘保持不变。
    pub fn reset(&mut self, layout: &Layout) -> Result<(), BoardError> {
        layout.validate()?;
        self.clear();
        self.fill(layout);
        Ok(())
    }

    fn fill(&mut self, layout: &Layout) {
        for (pos, piece) in layout.iter() {
            *self.cell_mut(pos) = Some(piece);
        }
    }

    /// 清空棋盘
    pub fn clear(&mut self) {
        self.cells = [[None; BOARD_COLS as usize]; BOARD_ROWS as usize];
    }

    /// 遍历棋盘上所有棋子
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(|pos| self.piece_at(pos).map(|piece| (pos, piece)))
    }

    /// 某方棋子数量
    pub fn count(&self, side: Side) -> usize {
        self.pieces().filter(|(_, p)| p.side == side).count()
    }

    /// 棋子总数
    pub fn total(&self) -> usize {
        self.pieces().count()
    }

    /// 某方将帅所在位置
    pub fn king_of(&self, side: Side) -> Option<Position> {
        self.pieces()
            .find(|(_, p)| p.side == side && p.kind == PieceKind::King)
            .map(|(pos, _)| pos)
    }

    /// 导出当前布局快照
    pub fn layout(&self) -> Layout {
        self.pieces().collect()
    }
}
