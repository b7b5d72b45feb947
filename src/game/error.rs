//! 错误类型
//!
//! 棋盘契约错误（`BoardError`）说明调用方与行棋记录不同步，不应被静默吞掉；
//! 走子策略错误（`GameError::OutOfTurn` 等）可恢复，拒绝该步即可。

use crate::game::board::Position;
use crate::game::piece::{Piece, PieceKind, Side};

/// 棋盘状态操作错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// 目标格已有棋子
    #[error("位置 {0} 已有棋子")]
    OccupiedCell(Position),

    /// 起始格没有棋子
    #[error("位置 {0} 没有棋子")]
    EmptyCell(Position),

    /// 试图吃掉己方棋子
    #[error("不能吃己方棋子: {from} -> {to}")]
    IllegalCapture { from: Position, to: Position },

    /// 起点与终点相同
    #[error("起点与终点相同: {0}")]
    SameCell(Position),

    /// 同一方出现第二个将帅
    #[error("{0} 方已有将帅")]
    DuplicateKing(Side),

    /// 棋子总数超过 32
    #[error("棋子数量 {0} 超过上限")]
    TooManyPieces(usize),
}

/// 对局（实战）错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// 不是该方行棋
    #[error("现在轮到 {turn} 行棋，不能移动 {piece}")]
    OutOfTurn { piece: Piece, turn: Side },

    /// 走法不符合规则
    #[error("非法走法: {from} -> {to}")]
    IllegalMove { from: Position, to: Position },

    /// 远端走法描述的棋子与棋盘不符
    #[error("位置 {at} 上应为 {expected}，实际为 {found}")]
    PieceMismatch {
        at: Position,
        expected: PieceKind,
        found: Piece,
    },

    /// 远端走法记录的吃子与棋盘不符
    #[error("位置 {at} 上记录的吃子为 {expected:?}，实际为 {found:?}")]
    CaptureMismatch {
        at: Position,
        expected: Option<PieceKind>,
        found: Option<Piece>,
    },

    /// 对局已结束
    #[error("对局已结束")]
    GameOver,

    /// 棋盘契约错误
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// 复盘错误：第 `ply` 步无法在棋盘上执行
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("第 {ply} 步与棋盘不同步: {source}")]
    Desync {
        ply: usize,
        #[source]
        source: BoardError,
    },

    #[error("第 {ply} 步记录的棋子与棋盘不符: 记录为 {recorded}，棋盘上为 {actual}")]
    WrongPiece {
        ply: usize,
        recorded: Piece,
        actual: Piece,
    },

    #[error("第 {ply} 步记录的吃子与棋盘不符: 记录为 {recorded:?}，棋盘上为 {actual:?}")]
    WrongCapture {
        ply: usize,
        recorded: Option<Piece>,
        actual: Option<Piece>,
    },

    #[error("初始布局无效: {0}")]
    Layout(#[from] BoardError),
}
