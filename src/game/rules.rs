//! 走法规则与终局判定
//!
//! 棋盘模型本身不关心走法；合法走法查询通过 `MoveValidator` 注入，
//! 默认实现 `XiangqiRules` 按中国象棋规则判定。

use crate::game::board::{Board, Position};
use crate::game::history::MoveLog;
use crate::game::piece::{Piece, PieceKind, Side};
use std::collections::HashMap;
use std::fmt;

/// 连续未吃子达到该步数判和
pub const NO_CAPTURE_LIMIT: usize = 120;

/// 同一局面重复该次数判和
pub const REPETITION_LIMIT: u32 = 3;

/// 走法校验器
pub trait MoveValidator {
    /// 检查 `from` 上的棋子能否走到 `to`（不考虑是否送将）
    fn is_valid_move(&self, board: &Board, from: Position, to: Position) -> bool;

    /// `from` 上棋子的全部可达位置
    fn valid_moves(&self, board: &Board, from: Position) -> Vec<Position> {
        Position::all()
            .filter(|&to| self.is_valid_move(board, from, to))
            .collect()
    }
}

/// 中国象棋标准走法
#[derive(Debug, Clone, Copy, Default)]
pub struct XiangqiRules;

impl MoveValidator for XiangqiRules {
    fn is_valid_move(&self, board: &Board, from: Position, to: Position) -> bool {
        if from == to {
            return false;
        }
        let Some(piece) = board.piece_at(from) else {
            return false;
        };
        // 不能吃己方棋子
        if board.piece_at(to).is_some_and(|target| target.is_friend_of(&piece)) {
            return false;
        }
        if !can_reach(board, from, to, piece) {
            return false;
        }

        // 走后不能将帅照面
        let mut after = board.clone();
        after.move_to(from, to).is_ok() && !kings_facing(&after)
    }
}

/// 是否在某方九宫内
fn in_palace(side: Side, pos: Position) -> bool {
    let rows = match side {
        Side::Red => 0..=2,
        Side::Black => 7..=9,
    };
    rows.contains(&pos.row()) && (3..=5).contains(&pos.col())
}

/// 是否在己方半场（未过河）
fn on_own_half(side: Side, pos: Position) -> bool {
    match side {
        Side::Red => pos.row() <= 4,
        Side::Black => pos.row() >= 5,
    }
}

/// 兵卒前进方向
fn forward(side: Side) -> i32 {
    match side {
        Side::Red => 1,
        Side::Black => -1,
    }
}

/// 同一直线上两点之间的棋子数（不在同一直线上返回 None）
fn count_between(board: &Board, from: Position, to: Position) -> Option<usize> {
    let (fr, fc) = (from.row() as i32, from.col() as i32);
    let (tr, tc) = (to.row() as i32, to.col() as i32);
    if fr != tr && fc != tc {
        return None;
    }
    let (dr, dc) = ((tr - fr).signum(), (tc - fc).signum());
    let mut count = 0;
    let mut cur = from.offset(dr, dc);
    while let Some(pos) = cur {
        if pos == to {
            break;
        }
        if !board.is_empty(pos) {
            count += 1;
        }
        cur = pos.offset(dr, dc);
    }
    Some(count)
}

/// 棋子按自身走法能否到达目标（不检查目标格归属）
fn can_reach(board: &Board, from: Position, to: Position, piece: Piece) -> bool {
    let dr = to.row() as i32 - from.row() as i32;
    let dc = to.col() as i32 - from.col() as i32;
    let side = piece.side;

    match piece.kind {
        PieceKind::King => dr.abs() + dc.abs() == 1 && in_palace(side, to),
        PieceKind::Advisor => dr.abs() == 1 && dc.abs() == 1 && in_palace(side, to),
        PieceKind::Elephant => {
            dr.abs() == 2
                && dc.abs() == 2
                && on_own_half(side, to)
                && from.offset(dr / 2, dc / 2).is_some_and(|eye| board.is_empty(eye))
        }
        PieceKind::Horse => {
            let leg = match (dr.abs(), dc.abs()) {
                (2, 1) => from.offset(dr / 2, 0),
                (1, 2) => from.offset(0, dc / 2),
                _ => return false,
            };
            leg.is_some_and(|leg| board.is_empty(leg))
        }
        PieceKind::Rook => count_between(board, from, to) == Some(0),
        PieceKind::Cannon => {
            let screens = if board.is_empty(to) { 0 } else { 1 };
            count_between(board, from, to) == Some(screens)
        }
        PieceKind::Pawn => {
            let step = forward(side);
            (dr == step && dc == 0) || (!on_own_half(side, from) && dr == 0 && dc.abs() == 1)
        }
    }
}

/// 将帅是否在同一列上照面
pub fn kings_facing(board: &Board) -> bool {
    match (board.king_of(Side::Red), board.king_of(Side::Black)) {
        (Some(red), Some(black)) => {
            red.col() == black.col() && count_between(board, red, black) == Some(0)
        }
        _ => false,
    }
}

/// 某方是否被将军
pub fn is_in_check(board: &Board, side: Side) -> bool {
    let Some(king) = board.king_of(side) else {
        return false;
    };
    kings_facing(board)
        || board
            .pieces()
            .filter(|(_, p)| p.side != side)
            .any(|(pos, p)| can_reach(board, pos, king, p))
}

/// 某枚棋子不送将的全部走法
pub fn legal_targets<V>(validator: &V, board: &Board, from: Position) -> Vec<Position>
where
    V: MoveValidator + ?Sized,
{
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };
    validator
        .valid_moves(board, from)
        .into_iter()
        .filter(|&to| {
            let mut after = board.clone();
            after.move_to(from, to).is_ok() && !is_in_check(&after, piece.side)
        })
        .collect()
}

/// 某方全部合法走法
pub fn legal_moves<V>(validator: &V, board: &Board, side: Side) -> Vec<(Position, Position)>
where
    V: MoveValidator + ?Sized,
{
    board
        .pieces()
        .filter(|(_, p)| p.side == side)
        .flat_map(|(from, _)| {
            legal_targets(validator, board, from)
                .into_iter()
                .map(move |to| (from, to))
        })
        .collect()
}

/// 胜负原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinReason {
    /// 吃掉对方将帅
    KingCaptured,
    /// 将死
    Checkmate,
}

/// 和棋原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// 困毙（无子可动且未被将军）
    Stalemate,
    /// 连续多步未吃子
    NoCaptureLimit,
    /// 同一局面重复出现
    Repetition,
    /// 双方子力不足以将死
    InsufficientMaterial,
}

/// 对局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Win { winner: Side, reason: WinReason },
    Draw(DrawReason),
}

impl GameOutcome {
    /// 胜方（和棋为 None）
    pub fn winner(&self) -> Option<Side> {
        match self {
            GameOutcome::Win { winner, .. } => Some(*winner),
            GameOutcome::Draw(_) => None,
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Win { winner, reason } => {
                let reason = match reason {
                    WinReason::KingCaptured => "吃将",
                    WinReason::Checkmate => "将死",
                };
                write!(f, "{} 胜（{}）", winner.display_name(), reason)
            }
            GameOutcome::Draw(reason) => {
                let reason = match reason {
                    DrawReason::Stalemate => "困毙",
                    DrawReason::NoCaptureLimit => "连续未吃子",
                    DrawReason::Repetition => "重复局面",
                    DrawReason::InsufficientMaterial => "子力不足",
                };
                write!(f, "和棋（{}）", reason)
            }
        }
    }
}

/// 终局判定，记录出现过的局面以判断重复
#[derive(Debug, Clone, Default)]
pub struct EndChecker {
    seen: HashMap<(Board, Side), u32>,
}

impl EndChecker {
    /// 以开局局面初始化
    pub fn new(board: &Board, side_to_move: Side) -> Self {
        let mut checker = Self::default();
        checker.remember(board, side_to_move);
        checker
    }

    fn remember(&mut self, board: &Board, side_to_move: Side) -> u32 {
        let count = self.seen.entry((board.clone(), side_to_move)).or_insert(0);
        *count += 1;
        *count
    }

    /// 每走一步后调用，返回对局结果（未结束为 None）
    pub fn after_move<V>(&mut self, validator: &V, board: &Board, log: &MoveLog) -> Option<GameOutcome>
    where
        V: MoveValidator + ?Sized,
    {
        let side_to_move = log.side_to_move();
        let repeats = self.remember(board, side_to_move);

        for side in Side::ALL {
            if board.king_of(side).is_none() {
                return Some(GameOutcome::Win {
                    winner: side.opposite(),
                    reason: WinReason::KingCaptured,
                });
            }
        }

        if legal_moves(validator, board, side_to_move).is_empty() {
            return Some(if is_in_check(board, side_to_move) {
                GameOutcome::Win {
                    winner: side_to_move.opposite(),
                    reason: WinReason::Checkmate,
                }
            } else {
                GameOutcome::Draw(DrawReason::Stalemate)
            });
        }

        if insufficient_material(board) {
            return Some(GameOutcome::Draw(DrawReason::InsufficientMaterial));
        }
        if log.plies_since_capture() >= NO_CAPTURE_LIMIT {
            return Some(GameOutcome::Draw(DrawReason::NoCaptureLimit));
        }
        if repeats >= REPETITION_LIMIT {
            return Some(GameOutcome::Draw(DrawReason::Repetition));
        }
        None
    }
}

/// 只剩双将，或一方仅多一个士
fn insufficient_material(board: &Board) -> bool {
    let extras: Vec<Piece> = board
        .pieces()
        .map(|(_, p)| p)
        .filter(|p| p.kind != PieceKind::King)
        .collect();
    match extras.as_slice() {
        [] => true,
        [only] => only.kind == PieceKind::Advisor,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Layout;
    use crate::game::history::Move;
    use crate::game::xfen::parse_layout;

    fn board(xfen: &str) -> Board {
        Board::from_layout(&parse_layout(xfen)).unwrap()
    }

    fn targets(board: &Board, row: u8, col: u8) -> Vec<Position> {
        let mut moves = XiangqiRules.valid_moves(board, Position::new(row, col));
        moves.sort();
        moves
    }

    #[test]
    fn opening_move_counts() {
        let board = Board::initial();
        // 马 2 步，炮 12 步（含炮打马），车 2 步，兵 1 步
        assert_eq!(targets(&board, 0, 1).len(), 2);
        assert_eq!(targets(&board, 2, 1).len(), 12);
        assert_eq!(targets(&board, 0, 0).len(), 2);
        assert_eq!(targets(&board, 3, 0), vec![Position::new(4, 0)]);
        assert_eq!(legal_moves(&XiangqiRules, &board, Side::Red).len(), 44);
    }

    #[test]
    fn horse_leg_and_elephant_eye_block() {
        let board = board("3k5/9/9/9/9/9/9/9/3P5/1NB1K4");
        // 马 (0,1)：向右横跳被象 (0,2) 绊住
        let horse = targets(&board, 0, 1);
        assert_eq!(horse, vec![Position::new(2, 0), Position::new(2, 2)]);
        // 象 (0,2)：象眼 (1,3) 被兵塞住
        let elephant = targets(&board, 0, 2);
        assert_eq!(elephant, vec![Position::new(2, 0)]);
    }

    #[test]
    fn elephant_cannot_cross_river() {
        let mut board = board("3k5/9/9/9/9/9/9/9/9/4K4");
        board.place(Position::new(4, 2), Piece::red(PieceKind::Elephant)).unwrap();
        assert_eq!(
            targets(&board, 4, 2),
            vec![Position::new(2, 0), Position::new(2, 4)]
        );
    }

    #[test]
    fn cannon_needs_exactly_one_screen_to_capture() {
        let board = board("3k5/9/9/9/p8/P8/9/9/9/C3K4");
        // 炮 (0,0) 以兵 (4,0) 为炮架打卒 (5,0)
        let moves = targets(&board, 0, 0);
        assert!(moves.contains(&Position::new(5, 0)));
        assert!(moves.contains(&Position::new(3, 0)));
        assert!(!moves.contains(&Position::new(4, 0)));
        assert!(!moves.contains(&Position::new(6, 0)));
    }

    #[test]
    fn pawn_moves_sideways_only_after_river() {
        let b = board("3k5/9/9/9/9/9/9/9/9/4K4");
        let mut home = b.clone();
        home.place(Position::new(3, 2), Piece::red(PieceKind::Pawn)).unwrap();
        assert_eq!(targets(&home, 3, 2), vec![Position::new(4, 2)]);

        let mut crossed = b.clone();
        crossed.place(Position::new(5, 2), Piece::red(PieceKind::Pawn)).unwrap();
        assert_eq!(
            targets(&crossed, 5, 2),
            vec![Position::new(5, 1), Position::new(5, 3), Position::new(6, 2)]
        );
    }

    #[test]
    fn king_stays_in_palace_and_kings_may_not_face() {
        let board = board("3k5/9/9/9/9/9/9/9/9/4K4");
        // (0,4) -> (0,3) 与黑将同列照面
        let moves = targets(&board, 0, 4);
        assert!(!moves.contains(&Position::new(0, 3)));
        assert!(moves.contains(&Position::new(0, 5)));
        assert!(moves.contains(&Position::new(1, 4)));

        let mut edge = Board::empty();
        edge.place(Position::new(0, 3), Piece::red(PieceKind::King)).unwrap();
        assert!(!XiangqiRules.is_valid_move(&edge, Position::new(0, 3), Position::new(0, 2)));
    }

    #[test]
    fn never_captures_own_piece() {
        let board = Board::initial();
        for (from, piece) in board.pieces() {
            for to in XiangqiRules.valid_moves(&board, from) {
                assert!(board.piece_at(to).is_none_or(|t| t.side != piece.side));
            }
        }
    }

    // 车 (8,8) 控制第 8 行，另一车沉底将军
    const MATE_IN_ONE: &str = "3k5/8R/R8/9/9/9/9/9/9/4K4";

    #[test]
    fn rook_gives_check_along_back_rank() {
        let mut board = board(MATE_IN_ONE);
        assert!(!is_in_check(&board, Side::Black));
        board.move_to(Position::new(7, 0), Position::new(9, 0)).unwrap();
        assert!(is_in_check(&board, Side::Black));
        assert!(!is_in_check(&board, Side::Red));
    }

    #[test]
    fn end_checker_detects_checkmate() {
        let mut board = board(MATE_IN_ONE);
        let mut checker = EndChecker::new(&board, Side::Red);
        let mut log = MoveLog::new();
        log.append(Move::perform(&mut board, Position::new(7, 0), Position::new(9, 0)).unwrap());
        assert_eq!(
            checker.after_move(&XiangqiRules, &board, &log),
            Some(GameOutcome::Win {
                winner: Side::Red,
                reason: WinReason::Checkmate
            })
        );
    }

    #[test]
    fn end_checker_stalemate_is_a_draw() {
        // 黑将 (9,3)：(9,4) 照面，(8,3) 被车控制
        let mut board = board("3k5/9/1R7/9/9/9/9/9/9/4K4");
        let mut checker = EndChecker::new(&board, Side::Red);
        let mut log = MoveLog::new();
        log.append(Move::perform(&mut board, Position::new(7, 1), Position::new(8, 1)).unwrap());
        assert_eq!(
            checker.after_move(&XiangqiRules, &board, &log),
            Some(GameOutcome::Draw(DrawReason::Stalemate))
        );
    }

    #[test]
    fn end_checker_king_captured_and_bare_kings() {
        let mut layout = Layout::empty();
        layout.insert(Position::new(0, 4), Piece::red(PieceKind::King));
        layout.insert(Position::new(9, 3), Piece::black(PieceKind::King));
        let board = Board::from_layout(&layout).unwrap();
        let mut checker = EndChecker::new(&board, Side::Red);
        assert_eq!(
            checker.after_move(&XiangqiRules, &board, &MoveLog::new()),
            Some(GameOutcome::Draw(DrawReason::InsufficientMaterial))
        );

        let mut headless = board.clone();
        headless.remove(Position::new(9, 3));
        assert_eq!(
            checker.after_move(&XiangqiRules, &headless, &MoveLog::new()),
            Some(GameOutcome::Win {
                winner: Side::Red,
                reason: WinReason::KingCaptured
            })
        );
    }
}
