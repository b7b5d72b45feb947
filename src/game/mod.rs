//! 游戏核心逻辑模块

pub mod board;
pub mod coords;
pub mod error;
pub mod feed;
pub mod hint;
pub mod history;
pub mod piece;
pub mod replay;
pub mod rules;
pub mod save;
pub mod tally;
pub mod xfen;

use crate::game::board::{Board, Layout, Position};
use crate::game::error::{BoardError, GameError, ReplayError};
use crate::game::hint::{HintLevel, Hinter};
use crate::game::history::{Move, MoveLog, MoveNotice};
use crate::game::piece::Side;
use crate::game::replay::Replay;
use crate::game::rules::{legal_targets, EndChecker, GameOutcome, MoveValidator, XiangqiRules};
use crate::game::tally::CaptureTally;
use serde::Serialize;
use std::collections::VecDeque;

pub use board::{BOARD_COLS, BOARD_ROWS};
pub use piece::{Piece, PieceKind};

/// 棋盘上的高亮
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Highlight {
    #[default]
    None,
    /// 选中的棋子
    Selected(Position),
    /// 上一步
    LastMove { from: Position, to: Position },
    /// 提示走法
    Suggested { from: Position, to: Position },
}

/// 可落点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub pos: Position,
    /// 是否吃子（界面上画圈而不是画点）
    pub capture: bool,
}

/// 当前选中的棋子及其可落点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub from: Position,
    pub piece: Piece,
    pub targets: Vec<Target>,
}

/// 实战对局
pub struct Game {
    /// 当前棋盘状态
    board: Board,
    /// 开局布局
    initial: Layout,
    /// 行棋历史
    log: MoveLog,
    /// 玩家执子方
    pub player_side: Side,
    validator: Box<dyn MoveValidator + Send>,
    hinter: Hinter,
    end_checker: EndChecker,
    selection: Option<Selection>,
    highlight: Highlight,
    /// 待发送给后端的走子通知
    outbox: VecDeque<MoveNotice>,
    /// 游戏结果（如果已结束）
    outcome: Option<GameOutcome>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Side::Red)
    }
}

impl Game {
    /// 标准开局，红方先行
    pub fn new(player_side: Side) -> Self {
        let initial = Layout::standard();
        let board = Board::initial();
        let end_checker = EndChecker::new(&board, Side::first());
        Self {
            board,
            initial,
            log: MoveLog::new(),
            player_side,
            validator: Box::new(XiangqiRules),
            hinter: Hinter::default(),
            end_checker,
            selection: None,
            highlight: Highlight::None,
            outbox: VecDeque::new(),
            outcome: None,
        }
    }

    /// 从残局开始
    pub fn from_layout(layout: Layout, first_turn: Side, player_side: Side) -> Result<Self, GameError> {
        let board = Board::from_layout(&layout)?;
        let end_checker = EndChecker::new(&board, first_turn);
        Ok(Self {
            board,
            initial: layout,
            log: MoveLog::with_first_turn(first_turn),
            end_checker,
            ..Self::new(player_side)
        })
    }

    /// 替换走法校验器（如由后端判定）
    pub fn with_validator(mut self, validator: impl MoveValidator + Send + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// 设置提示强度
    pub fn with_hint_level(mut self, level: HintLevel) -> Self {
        self.hinter = Hinter::new(level);
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn log(&self) -> &MoveLog {
        &self.log
    }

    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// 当前轮到哪方行棋
    pub fn side_to_move(&self) -> Side {
        self.log.side_to_move()
    }

    /// 是否轮到玩家
    pub fn is_player_turn(&self) -> bool {
        self.side_to_move() == self.player_side
    }

    /// 吃子统计（由行棋记录重新计算）
    pub fn tally(&self) -> CaptureTally {
        CaptureTally::from_moves(&self.log)
    }

    /// 选中棋子，返回其可落点
    ///
    /// 只能选中轮走方的棋子；空格或对方棋子会取消选中。
    pub fn select(&mut self, pos: Position) -> Option<&Selection> {
        self.selection = None;
        match self.board.piece_at(pos) {
            Some(piece) if piece.side == self.side_to_move() && !self.is_over() => {
                let targets = legal_targets(self.validator.as_ref(), &self.board, pos)
                    .into_iter()
                    .map(|to| Target {
                        pos: to,
                        capture: !self.board.is_empty(to),
                    })
                    .collect();
                self.highlight = Highlight::Selected(pos);
                self.selection = Some(Selection {
                    from: pos,
                    piece,
                    targets,
                });
            }
            _ => self.clear_selection(),
        }
        self.selection.as_ref()
    }

    /// 取消选中
    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.highlight = match self.log.last() {
            Some(mv) => Highlight::LastMove {
                from: mv.from,
                to: mv.to,
            },
            None => Highlight::None,
        };
    }

    /// 本地走一步
    ///
    /// 成功后走子通知进入发件箱，由调用方取出发送。
    pub fn play(&mut self, from: Position, to: Position) -> Result<MoveNotice, GameError> {
        let mv = self.apply(from, to)?;
        let notice = mv.notice();
        self.outbox.push_back(notice);
        Ok(notice)
    }

    /// 执行后端传来的对方走法
    pub fn apply_remote(&mut self, notice: &MoveNotice) -> Result<Move, GameError> {
        let found = self
            .board
            .piece_at(notice.from)
            .ok_or(BoardError::EmptyCell(notice.from))?;
        if found.kind != notice.piece {
            return Err(GameError::PieceMismatch {
                at: notice.from,
                expected: notice.piece,
                found,
            });
        }
        let target = self.board.piece_at(notice.to);
        if target.map(|p| p.kind) != notice.captured {
            return Err(GameError::CaptureMismatch {
                at: notice.to,
                expected: notice.captured,
                found: target,
            });
        }
        self.apply(notice.from, notice.to)
    }

    fn apply(&mut self, from: Position, to: Position) -> Result<Move, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let piece = self
            .board
            .piece_at(from)
            .ok_or(BoardError::EmptyCell(from))?;
        let turn = self.side_to_move();
        if piece.side != turn {
            return Err(GameError::OutOfTurn { piece, turn });
        }
        if !legal_targets(self.validator.as_ref(), &self.board, from).contains(&to) {
            return Err(GameError::IllegalMove { from, to });
        }

        let mv = Move::perform(&mut self.board, from, to)?;
        self.log.append(mv);
        self.selection = None;
        self.highlight = Highlight::LastMove { from, to };
        tracing::debug!(ply = self.log.len() - 1, %mv, "走子");

        self.outcome = self
            .end_checker
            .after_move(self.validator.as_ref(), &self.board, &self.log);
        if let Some(outcome) = self.outcome {
            tracing::info!(%outcome, plies = self.log.len(), "对局结束");
        }
        Ok(mv)
    }

    /// 取出全部待发送的走子通知
    pub fn drain_outbox(&mut self) -> Vec<MoveNotice> {
        self.outbox.drain(..).collect()
    }

    /// 为轮走方给出提示走法并高亮
    pub fn suggest(&mut self) -> Option<Highlight> {
        if self.is_over() {
            return None;
        }
        match self
            .hinter
            .select_move(self.validator.as_ref(), &self.board, self.side_to_move())
        {
            Ok((from, to)) => {
                self.highlight = Highlight::Suggested { from, to };
                Some(self.highlight)
            }
            Err(err) => {
                tracing::debug!(%err, "没有可提示的走法");
                None
            }
        }
    }

    /// 转换为复盘会话
    pub fn to_replay(&self) -> Result<Replay, ReplayError> {
        Ok(Replay::load(self.log.clone(), self.initial.clone())?.with_player_side(self.player_side))
    }
}
