//! 吃子统计

use crate::game::history::Move;
use crate::game::piece::{PieceKind, Side};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 双方各自吃掉的棋子数量（按兵种）
///
/// 计在吃子方名下：红方吃掉黑卒，记入 `red` 的 `Pawn`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureTally {
    red: BTreeMap<PieceKind, u32>,
    black: BTreeMap<PieceKind, u32>,
}

impl CaptureTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由一串走法重新统计
    pub fn from_moves<'a, I>(moves: I) -> Self
    where
        I: IntoIterator<Item = &'a Move>,
    {
        let mut tally = Self::new();
        for mv in moves {
            tally.record(mv);
        }
        tally
    }

    /// 记入一步棋的吃子（未吃子则不变）
    pub fn record(&mut self, mv: &Move) {
        if let Some(captured) = mv.captured {
            *self.side_mut(mv.side()).entry(captured.kind).or_insert(0) += 1;
        }
    }

    /// 清空
    pub fn clear(&mut self) {
        self.red.clear();
        self.black.clear();
    }

    fn side_mut(&mut self, side: Side) -> &mut BTreeMap<PieceKind, u32> {
        match side {
            Side::Red => &mut self.red,
            Side::Black => &mut self.black,
        }
    }

    /// 某方吃掉的棋子
    pub fn captured_by(&self, side: Side) -> &BTreeMap<PieceKind, u32> {
        match side {
            Side::Red => &self.red,
            Side::Black => &self.black,
        }
    }

    /// 某方吃掉某兵种的数量
    pub fn count(&self, side: Side, kind: PieceKind) -> u32 {
        self.captured_by(side).get(&kind).copied().unwrap_or(0)
    }

    /// 某方吃子总数
    pub fn total(&self, side: Side) -> u32 {
        self.captured_by(side).values().sum()
    }

    /// 用于显示：只给出数量大于 0 的兵种
    pub fn visible(&self, side: Side) -> impl Iterator<Item = (PieceKind, u32)> + '_ {
        self.captured_by(side)
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(kind, n)| (*kind, *n))
    }

    pub fn is_empty(&self) -> bool {
        self.total(Side::Red) == 0 && self.total(Side::Black) == 0
    }
}
