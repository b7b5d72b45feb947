use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use xiangqi_replay::game::board::{Board, Layout, Position};
use xiangqi_replay::game::coords::{BoardGeometry, CoordinateMapper};
use xiangqi_replay::game::hint::{HintLevel, Hinter};
use xiangqi_replay::game::history::MoveLog;
use xiangqi_replay::game::piece::Side;
use xiangqi_replay::game::replay::Replay;
use xiangqi_replay::game::rules::XiangqiRules;
use xiangqi_replay::game::tally::CaptureTally;
use xiangqi_replay::game::Game;

/// 用固定种子随机下一盘棋，返回行棋记录和每步之后的棋盘
fn random_game(seed: u64, plies: usize) -> (MoveLog, Vec<Board>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let hinter = Hinter::new(HintLevel::Random);
    let mut game = Game::new(Side::Red);
    let mut boards = Vec::new();

    while game.log().len() < plies && !game.is_over() {
        let Ok((from, to)) =
            hinter.select_move_with(&XiangqiRules, game.board(), game.side_to_move(), &mut rng)
        else {
            break;
        };
        game.play(from, to).unwrap();
        boards.push(game.board().clone());
    }
    (game.log().clone(), boards)
}

#[derive(Debug, Clone)]
enum Nav {
    Forward,
    Backward,
    Jump(isize),
}

fn nav() -> impl Strategy<Value = Nav> {
    prop_oneof![
        Just(Nav::Forward),
        Just(Nav::Backward),
        (-3isize..50).prop_map(Nav::Jump),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pixel_round_trip(
        row in 0u8..10,
        col in 0u8..9,
        red in any::<bool>(),
        flipped in any::<bool>(),
        size in 400.0f32..1600.0,
    ) {
        let geometry = BoardGeometry { size, ..BoardGeometry::default() };
        prop_assume!(geometry.validate().is_ok());
        let mapper = CoordinateMapper::new(geometry, flipped);
        let side = if red { Side::Red } else { Side::Black };
        let p = Position::new(row, col);
        prop_assert_eq!(mapper.to_grid(mapper.to_pixel(p, side)), p);
    }

    #[test]
    fn any_pixel_maps_inside_the_board(x in -2000.0f32..4000.0, y in -2000.0f32..4000.0) {
        let p = CoordinateMapper::default().to_grid((x, y));
        prop_assert!(p.row() < 10 && p.col() < 9);
    }

    #[test]
    fn replay_reaches_every_recorded_position(seed in any::<u64>(), plies in 1usize..40) {
        let (log, boards) = random_game(seed, plies);
        let mut replay = Replay::load(log.clone(), Layout::standard()).unwrap();

        for (ply, board) in boards.iter().enumerate() {
            prop_assert!(replay.step_forward().unwrap());
            prop_assert_eq!(replay.board(), board);
            prop_assert_eq!(
                replay.tally(),
                &CaptureTally::from_moves(log.iter().take(ply + 1))
            );
        }

        replay.rewind().unwrap();
        prop_assert_eq!(replay.board(), &Board::initial());
    }

    #[test]
    fn tally_is_independent_of_navigation_path(
        seed in any::<u64>(),
        plies in 1usize..30,
        path in prop::collection::vec(nav(), 0..25),
    ) {
        let (log, boards) = random_game(seed, plies);
        let mut replay = Replay::load(log.clone(), Layout::standard()).unwrap();

        for step in path {
            match step {
                Nav::Forward => { replay.step_forward().unwrap(); }
                Nav::Backward => { replay.step_backward().unwrap(); }
                Nav::Jump(i) => replay.jump_to(i).unwrap(),
            }
            let applied = replay.cursor().map_or(0, |c| c + 1);
            prop_assert_eq!(
                replay.tally(),
                &CaptureTally::from_moves(log.iter().take(applied))
            );
            let expected = match replay.cursor() {
                Some(c) => boards[c].clone(),
                None => Board::initial(),
            };
            prop_assert_eq!(replay.board(), &expected);
        }
    }
}
