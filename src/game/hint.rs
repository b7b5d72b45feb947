//! 提示走法

use crate::game::board::{Board, Position};
use crate::game::piece::{PieceKind, Side};
use crate::game::rules::{legal_moves, MoveValidator};
use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// 提示强度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintLevel {
    /// 任选一步合法走法
    Random,
    /// 优先吃价值最高的棋子
    #[default]
    Greedy,
}

/// 子力价值
pub fn piece_value(kind: PieceKind) -> f32 {
    match kind {
        PieceKind::King => 1000.0,
        PieceKind::Rook => 9.0,
        PieceKind::Cannon => 4.5,
        PieceKind::Horse => 4.0,
        PieceKind::Elephant => 2.0,
        PieceKind::Advisor => 2.0,
        PieceKind::Pawn => 1.0,
    }
}

/// 提示器
#[derive(Debug, Clone, Copy, Default)]
pub struct Hinter {
    level: HintLevel,
}

impl Hinter {
    pub fn new(level: HintLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> HintLevel {
        self.level
    }

    /// 为某方选一步
    pub fn select_move<V>(&self, validator: &V, board: &Board, side: Side) -> Result<(Position, Position)>
    where
        V: MoveValidator + ?Sized,
    {
        self.select_move_with(validator, board, side, &mut rand::thread_rng())
    }

    /// 使用给定随机源选一步
    pub fn select_move_with<V, R>(
        &self,
        validator: &V,
        board: &Board,
        side: Side,
        rng: &mut R,
    ) -> Result<(Position, Position)>
    where
        V: MoveValidator + ?Sized,
        R: Rng,
    {
        let moves = legal_moves(validator, board, side);
        if moves.is_empty() {
            anyhow::bail!("{} 无合法走法", side);
        }

        let candidates = match self.level {
            HintLevel::Random => moves,
            HintLevel::Greedy => Self::best_captures(board, moves),
        };
        let idx = rng.gen_range(0..candidates.len());
        candidates
            .get(idx)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("无可用走法"))
    }

    /// 保留吃子价值最高的走法；都不吃子时全部保留
    fn best_captures(board: &Board, moves: Vec<(Position, Position)>) -> Vec<(Position, Position)> {
        let gain = |to: Position| board.piece_at(to).map(|p| piece_value(p.kind)).unwrap_or(0.0);
        let best = moves.iter().map(|&(_, to)| gain(to)).fold(0.0f32, f32::max);
        moves.into_iter().filter(|&(_, to)| gain(to) == best).collect()
    }
}
