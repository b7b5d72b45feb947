//! 行棋记录
//!
//! `MoveLog` 只追加；复盘时作为固定输入，不再修改。

use crate::game::board::{Board, Position};
use crate::game::error::BoardError;
use crate::game::piece::{Piece, PieceKind, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 一步棋
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// 起始位置
    pub from: Position,
    /// 目标位置
    pub to: Position,
    /// 移动的棋子
    pub piece: Piece,
    /// 被吃掉的棋子
    #[serde(default)]
    pub captured: Option<Piece>,
}

impl Move {
    /// 在棋盘上执行一步并生成记录
    ///
    /// 棋盘是唯一可信来源：移动的棋子和被吃的棋子都从棋盘读取。
    pub fn perform(board: &mut Board, from: Position, to: Position) -> Result<Self, BoardError> {
        let piece = board.piece_at(from).ok_or(BoardError::EmptyCell(from))?;
        let captured = board.move_to(from, to)?;
        Ok(Self {
            from,
            to,
            piece,
            captured,
        })
    }

    /// 行棋方
    pub fn side(&self) -> Side {
        self.piece.side
    }

    /// 是否吃子
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// 生成发送给后端的走子通知
    pub fn notice(&self) -> MoveNotice {
        MoveNotice {
            from: self.from,
            to: self.to,
            piece: self.piece.kind,
            captured: self.captured.map(|p| p.kind),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}→{}", self.piece.kind, self.from, self.to)?;
        if let Some(captured) = self.captured {
            write!(f, " x {}", captured.kind)?;
        }
        Ok(())
    }
}

/// 走子通知（与后端交换的格式）
///
/// 序列化为 `{"from":{"row":..,"col":..},"to":{..},"piece":"Horse","captured":""}`，
/// 未吃子时 `captured` 为空字符串。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveNotice {
    pub from: Position,
    pub to: Position,
    pub piece: PieceKind,
    #[serde(with = "captured_kind", default)]
    pub captured: Option<PieceKind>,
}

mod captured_kind {
    use crate::game::piece::PieceKind;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(kind: &Option<PieceKind>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(kind.map(|k| k.as_str()).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<PieceKind>, D::Error> {
        let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}

/// 行棋历史，附带回合跟踪
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLog {
    /// 先行方（标准开局为红方，恢复的残局可能是黑方）
    first_turn: Side,
    moves: Vec<Move>,
}

impl Default for MoveLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveLog {
    /// 红方先行的空记录
    pub fn new() -> Self {
        Self::with_first_turn(Side::first())
    }

    /// 指定先行方的空记录
    pub fn with_first_turn(first_turn: Side) -> Self {
        Self {
            first_turn,
            moves: Vec::new(),
        }
    }

    /// 由已有走法构造（复盘输入）
    pub fn from_moves(first_turn: Side, moves: Vec<Move>) -> Self {
        Self { first_turn, moves }
    }

    /// 追加一步，回合随之切换
    pub fn append(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    /// 当前轮到哪方行棋
    pub fn side_to_move(&self) -> Side {
        if self.moves.len() % 2 == 0 {
            self.first_turn
        } else {
            self.first_turn.opposite()
        }
    }

    pub fn first_turn(&self) -> Side {
        self.first_turn
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// 第 `ply` 步（从 0 开始）
    pub fn get(&self, ply: usize) -> Option<&Move> {
        self.moves.get(ply)
    }

    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    /// 距离最近一次吃子经过的步数
    pub fn plies_since_capture(&self) -> usize {
        self.moves.iter().rev().take_while(|m| !m.is_capture()).count()
    }
}

impl<'a> IntoIterator for &'a MoveLog {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}
