//! 复盘引擎
//!
//! 游标取值 `-1..=N-1`，这里用 `Option<usize>` 表示，`None` 为开局局面。
//! 前进时在当前局面上增量执行下一步；后退和跳转一律从初始布局重新推演，
//! 被吃棋子的复原不依赖撤销栈。

use crate::game::board::{Board, Layout};
use crate::game::error::{BoardError, ReplayError};
use crate::game::history::{Move, MoveLog};
use crate::game::piece::Side;
use crate::game::tally::CaptureTally;

/// 复盘会话
#[derive(Debug, Clone)]
pub struct Replay {
    initial: Layout,
    log: MoveLog,
    /// 已执行的步数（游标 + 1）
    applied: usize,
    board: Board,
    tally: CaptureTally,
    /// 本方是否执红（决定棋盘朝向）
    pub player_is_red: bool,
    /// 对局编号
    pub game_id: Option<String>,
}

impl Replay {
    /// 载入复盘：游标回到开局，棋盘为初始布局，吃子统计清空
    pub fn load(log: MoveLog, initial: Layout) -> Result<Self, ReplayError> {
        let board = Board::from_layout(&initial)?;
        tracing::info!(plies = log.len(), pieces = initial.len(), "载入复盘");
        Ok(Self {
            initial,
            log,
            applied: 0,
            board,
            tally: CaptureTally::new(),
            player_is_red: true,
            game_id: None,
        })
    }

    /// 设置本方执子
    pub fn with_player_side(mut self, side: Side) -> Self {
        self.player_is_red = side == Side::Red;
        self
    }

    /// 设置对局编号
    pub fn with_game_id(mut self, game_id: impl Into<String>) -> Self {
        self.game_id = Some(game_id.into());
        self
    }

    /// 当前游标，`None` 表示开局局面
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    /// 总步数
    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tally(&self) -> &CaptureTally {
        &self.tally
    }

    pub fn log(&self) -> &MoveLog {
        &self.log
    }

    pub fn initial(&self) -> &Layout {
        &self.initial
    }

    /// 本方执子
    pub fn player_side(&self) -> Side {
        if self.player_is_red { Side::Red } else { Side::Black }
    }

    /// 游标所在的一步（用于"上一步"高亮）
    pub fn last_move(&self) -> Option<&Move> {
        self.cursor().and_then(|ply| self.log.get(ply))
    }

    /// 当前局面轮到哪方
    pub fn side_to_move(&self) -> Side {
        if self.applied % 2 == 0 {
            self.log.first_turn()
        } else {
            self.log.first_turn().opposite()
        }
    }

    pub fn can_step_forward(&self) -> bool {
        self.applied < self.log.len()
    }

    pub fn can_step_backward(&self) -> bool {
        self.applied > 0
    }

    /// 前进一步；已在末尾时不做任何事，返回 `Ok(false)`
    pub fn step_forward(&mut self) -> Result<bool, ReplayError> {
        let Some(mv) = self.log.get(self.applied).copied() else {
            return Ok(false);
        };
        apply(&mut self.board, self.applied, &mv)?;
        self.tally.record(&mv);
        self.applied += 1;
        tracing::debug!(cursor = self.applied - 1, %mv, "复盘前进");
        Ok(true)
    }

    /// 后退一步；已在开局时不做任何事，返回 `Ok(false)`
    pub fn step_backward(&mut self) -> Result<bool, ReplayError> {
        if self.applied == 0 {
            return Ok(false);
        }
        self.recompute(self.applied - 1)?;
        tracing::debug!(cursor = ?self.cursor(), "复盘后退");
        Ok(true)
    }

    /// 跳到第 `index` 步（-1 为开局），越界时夹到两端
    pub fn jump_to(&mut self, index: isize) -> Result<(), ReplayError> {
        let last = self.log.len() as isize - 1;
        let index = index.clamp(-1, last.max(-1));
        self.recompute((index + 1) as usize)
    }

    /// 回到开局
    pub fn rewind(&mut self) -> Result<(), ReplayError> {
        self.jump_to(-1)
    }

    /// 跳到最后一步
    pub fn fast_forward(&mut self) -> Result<(), ReplayError> {
        self.jump_to(self.log.len() as isize - 1)
    }

    /// 从初始布局重新推演前 `plies` 步
    ///
    /// 中途失败时停在最后一致的局面，并返回错误。
    fn recompute(&mut self, plies: usize) -> Result<(), ReplayError> {
        self.board.reset(&self.initial)?;
        self.tally.clear();
        self.applied = 0;

        for (ply, mv) in self.log.iter().take(plies).enumerate() {
            if let Err(err) = apply(&mut self.board, ply, mv) {
                tracing::warn!(ply, %err, "复盘推演中断");
                return Err(err);
            }
            self.tally.record(mv);
            self.applied = ply + 1;
        }
        Ok(())
    }
}

/// 在棋盘上执行记录中的一步，并核对记录与棋盘一致
///
/// 核对全部在改动棋盘之前完成，失败时棋盘保持不变。
fn apply(board: &mut Board, ply: usize, mv: &Move) -> Result<(), ReplayError> {
    let actual = board.piece_at(mv.from).ok_or(ReplayError::Desync {
        ply,
        source: BoardError::EmptyCell(mv.from),
    })?;
    if actual != mv.piece {
        return Err(ReplayError::WrongPiece {
            ply,
            recorded: mv.piece,
            actual,
        });
    }
    // 己方棋子留给 move_to 报告
    let target = board.piece_at(mv.to).filter(|t| !t.is_friend_of(&actual));
    if target != mv.captured {
        return Err(ReplayError::WrongCapture {
            ply,
            recorded: mv.captured,
            actual: target,
        });
    }
    board
        .move_to(mv.from, mv.to)
        .map(|_| ())
        .map_err(|source| ReplayError::Desync { ply, source })
}
