use std::collections::HashMap;

use xiangqi_replay::game::board::{Board, Layout, Position};
use xiangqi_replay::game::error::BoardError;
use xiangqi_replay::game::history::{Move, MoveLog};
use xiangqi_replay::game::piece::{Piece, PieceKind, Side};
use xiangqi_replay::game::replay::Replay;
use xiangqi_replay::game::rules::{MoveValidator, XiangqiRules};
use xiangqi_replay::game::tally::CaptureTally;
use xiangqi_replay::game::xfen;
use xiangqi_replay::game::Game;

fn pos(row: u8, col: u8) -> Position {
    Position::new(row, col)
}

/// 十步开局，含三次吃子
fn ten_move_log() -> MoveLog {
    let mut game = Game::new(Side::Red);
    for (from, to) in [
        (pos(2, 1), pos(9, 1)), // 炮二进七打马
        (pos(9, 0), pos(9, 1)), // 车吃炮
        (pos(0, 1), pos(2, 2)),
        (pos(6, 2), pos(5, 2)),
        (pos(3, 2), pos(4, 2)),
        (pos(5, 2), pos(4, 2)), // 卒吃兵
        (pos(2, 2), pos(4, 1)),
        (pos(4, 2), pos(3, 2)),
        (pos(4, 1), pos(6, 0)), // 马吃卒
        (pos(7, 7), pos(7, 4)),
    ] {
        game.play(from, to).unwrap();
    }
    game.log().clone()
}

#[test]
fn standard_opening_scenario() {
    let board = Board::from_layout(&Layout::standard()).unwrap();
    assert_eq!(board.total(), 32);
    assert_eq!(board.piece_at(pos(0, 4)), Some(Piece::red(PieceKind::King)));
    assert_eq!(board.piece_at(pos(9, 4)), Some(Piece::black(PieceKind::King)));
    assert_eq!(MoveLog::new().side_to_move(), Side::Red);
}

#[test]
fn single_capture_scenario() {
    // 兵一步吃到对方卒位：规则不允许，但复盘只核对棋盘契约
    let mut board = Board::initial();
    assert!(!XiangqiRules.is_valid_move(&board, pos(3, 0), pos(6, 0)));
    let mv = Move::perform(&mut board, pos(3, 0), pos(6, 0)).unwrap();
    assert_eq!(mv.captured, Some(Piece::black(PieceKind::Pawn)));
    let log = MoveLog::from_moves(Side::Red, vec![mv]);

    let mut replay = Replay::load(log, Layout::standard()).unwrap();
    replay.jump_to(0).unwrap();
    assert_eq!(replay.cursor(), Some(0));
    let red: Vec<_> = replay.tally().visible(Side::Red).collect();
    assert_eq!(red, vec![(PieceKind::Pawn, 1)]);
    assert!(replay.tally().visible(Side::Black).next().is_none());
    assert_eq!(replay.board().piece_at(pos(6, 0)), Some(Piece::red(PieceKind::Pawn)));
    assert_eq!(replay.board().piece_at(pos(3, 0)), None);
    assert_eq!(replay.board().count(Side::Black), 15);

    replay.step_backward().unwrap();
    assert_eq!(replay.cursor(), None);
    assert!(replay.tally().is_empty());
    assert_eq!(replay.board(), &Board::initial());
}

#[test]
fn backward_then_forward_matches_direct_jump() {
    let log = ten_move_log();
    assert_eq!(log.len(), 10);

    let mut direct = Replay::load(log.clone(), Layout::standard()).unwrap();
    direct.jump_to(9).unwrap();
    assert_eq!(direct.cursor(), Some(9));
    assert_eq!(direct.tally(), &CaptureTally::from_moves(&log));
    assert_eq!(direct.tally().count(Side::Red, PieceKind::Horse), 1);
    assert_eq!(direct.tally().count(Side::Red, PieceKind::Pawn), 1);
    assert_eq!(direct.tally().count(Side::Black, PieceKind::Cannon), 1);
    assert_eq!(direct.tally().count(Side::Black, PieceKind::Pawn), 1);

    let mut replay = Replay::load(log.clone(), Layout::standard()).unwrap();
    replay.jump_to(9).unwrap();
    for _ in 0..3 {
        assert!(replay.step_backward().unwrap());
    }
    assert_eq!(replay.cursor(), Some(6));
    let mut at_six = Replay::load(log.clone(), Layout::standard()).unwrap();
    at_six.jump_to(6).unwrap();
    assert_eq!(replay.board(), at_six.board());
    assert_eq!(replay.tally(), at_six.tally());

    for _ in 0..3 {
        assert!(replay.step_forward().unwrap());
    }
    assert_eq!(replay.cursor(), Some(9));
    assert_eq!(replay.board(), direct.board());
    assert_eq!(replay.tally(), direct.tally());
}

#[test]
fn navigation_is_idempotent_at_both_ends() {
    let mut replay = Replay::load(ten_move_log(), Layout::standard()).unwrap();
    replay.rewind().unwrap();
    let start = replay.board().clone();
    assert!(!replay.step_backward().unwrap());
    assert_eq!(replay.board(), &start);

    replay.jump_to(9).unwrap();
    let end = replay.board().clone();
    assert!(!replay.step_forward().unwrap());
    assert_eq!(replay.board(), &end);
    assert_eq!(replay.cursor(), Some(9));
}

#[test]
fn no_friendly_fire_for_any_kind() {
    for kind in PieceKind::ALL {
        for side in Side::ALL {
            let mut board = Board::empty();
            board.place(pos(4, 4), Piece::new(side, kind)).unwrap();
            board.place(pos(4, 5), Piece::new(side, PieceKind::Pawn)).unwrap();
            assert_eq!(
                board.move_to(pos(4, 4), pos(4, 5)),
                Err(BoardError::IllegalCapture {
                    from: pos(4, 4),
                    to: pos(4, 5)
                }),
                "{side} {kind}"
            );
            assert_eq!(board.total(), 2);
        }
    }
}

#[test]
fn custom_layout_replay() {
    let mut setup = HashMap::new();
    setup.insert("0_4".to_string(), "red_King".to_string());
    setup.insert("9_3".to_string(), "black_King".to_string());
    setup.insert("5_0".to_string(), "red_Rook".to_string());
    setup.insert("bogus".to_string(), "red_Rook".to_string());
    let layout = Layout::from_setup_map(&setup);
    assert_eq!(layout.len(), 3);

    let mut board = Board::from_layout(&layout).unwrap();
    let mut log = MoveLog::new();
    log.append(Move::perform(&mut board, pos(5, 0), pos(8, 0)).unwrap());

    let mut replay = Replay::load(log, layout.clone()).unwrap();
    replay.fast_forward().unwrap();
    assert_eq!(replay.board().piece_at(pos(8, 0)), Some(Piece::red(PieceKind::Rook)));
    assert_eq!(
        xfen::parse_layout(&xfen::to_xfen(replay.initial(), Side::Red)),
        layout
    );
}
