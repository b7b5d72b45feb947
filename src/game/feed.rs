//! 后端复盘数据解析
//!
//! 后端坐标：`x` 为列，`y` 为行且第 0 行在黑方一侧；本地行号为 `9 - y`。

use crate::game::board::{Board, Layout, Position, BOARD_ROWS};
use crate::game::error::ReplayError;
use crate::game::history::{Move, MoveLog};
use crate::game::piece::{PieceKind, Side};
use crate::game::replay::Replay;
use serde::Deserialize;

/// 复盘数据解析错误
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("后端返回错误: {0}")]
    Backend(String),

    #[error("复盘数据缺少 game 字段")]
    MissingGame,

    #[error("复盘数据格式错误: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    game: Option<RawGame>,
}

#[derive(Debug, Deserialize)]
struct RawGame {
    #[serde(default)]
    game_id: String,
    #[serde(default)]
    red_player: String,
    #[serde(default)]
    black_player: String,
    #[serde(default)]
    moves: Vec<RawMove>,
}

#[derive(Debug, Deserialize)]
struct RawMove {
    from_x: Option<i32>,
    from_y: Option<i32>,
    to_x: Option<i32>,
    to_y: Option<i32>,
    #[serde(default)]
    player: Option<String>,
    #[serde(default)]
    piece: Option<String>,
    #[serde(default)]
    captured: Option<String>,
}

/// 存档对局中的一步（棋子以记录为准，尚未与棋盘核对）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedMove {
    pub from: Position,
    pub to: Position,
    pub side: Side,
    pub piece: Option<PieceKind>,
    pub captured: Option<PieceKind>,
}

/// 后端存档的一局棋
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedGame {
    pub game_id: String,
    pub red_player: String,
    pub black_player: String,
    pub moves: Vec<ArchivedMove>,
}

/// 后端行号转换为本地坐标
fn local_position(x: Option<i32>, y: Option<i32>) -> Option<Position> {
    let (col, row) = (x?, y?);
    if row < 0 {
        return None;
    }
    Position::checked(BOARD_ROWS as i32 - 1 - row, col)
}

fn parse_kind(raw: Option<&str>) -> Option<PieceKind> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}

/// 解析后端复盘响应
pub fn decode(json: &str) -> Result<ArchivedGame, FeedError> {
    let envelope: Envelope = serde_json::from_str(json)?;
    if envelope.status.as_deref() == Some("error") {
        return Err(FeedError::Backend(
            envelope.message.unwrap_or_else(|| "未知错误".to_string()),
        ));
    }
    let game = envelope.game.ok_or(FeedError::MissingGame)?;

    let mut moves = Vec::with_capacity(game.moves.len());
    for (idx, raw) in game.moves.iter().enumerate() {
        let (Some(from), Some(to)) = (
            local_position(raw.from_x, raw.from_y),
            local_position(raw.to_x, raw.to_y),
        ) else {
            tracing::warn!(idx, ?raw, "跳过坐标无效的走法");
            continue;
        };

        let side = match raw.player.as_deref() {
            Some(p) if p == game.red_player => Side::Red,
            Some(p) if p == game.black_player => Side::Black,
            _ if idx % 2 == 0 => Side::Red,
            _ => Side::Black,
        };

        moves.push(ArchivedMove {
            from,
            to,
            side,
            piece: parse_kind(raw.piece.as_deref()),
            captured: parse_kind(raw.captured.as_deref()),
        });
    }

    tracing::info!(game_id = %game.game_id, plies = moves.len(), "解析复盘数据");
    Ok(ArchivedGame {
        game_id: game.game_id,
        red_player: game.red_player,
        black_player: game.black_player,
        moves,
    })
}

impl ArchivedGame {
    /// 某用户在这局中是否执红
    pub fn player_is_red(&self, username: &str) -> bool {
        username == self.red_player
    }

    /// 在给定初始布局上推演，生成行棋记录
    ///
    /// 移动的棋子和被吃的棋子以棋盘为准；与记录不符时记录警告。
    pub fn to_move_log(&self, initial: &Layout) -> Result<MoveLog, ReplayError> {
        let mut board = Board::from_layout(initial)?;
        let first_turn = self.moves.first().map(|m| m.side).unwrap_or(Side::first());
        let mut log = MoveLog::with_first_turn(first_turn);

        for (ply, archived) in self.moves.iter().enumerate() {
            let mv = Move::perform(&mut board, archived.from, archived.to)
                .map_err(|source| ReplayError::Desync { ply, source })?;
            if mv.side() != archived.side || archived.piece.is_some_and(|k| k != mv.piece.kind) {
                tracing::warn!(ply, recorded = ?archived.piece, actual = %mv.piece, "记录的棋子与棋盘不符");
            }
            if archived.captured != mv.captured.map(|p| p.kind) {
                tracing::warn!(ply, recorded = ?archived.captured, "记录的吃子与棋盘不符");
            }
            log.append(mv);
        }
        Ok(log)
    }

    /// 转换为复盘会话
    pub fn to_replay(&self, initial: Layout, viewer: Option<&str>) -> Result<Replay, ReplayError> {
        let log = self.to_move_log(&initial)?;
        let side = match viewer {
            Some(name) if !self.player_is_red(name) => Side::Black,
            _ => Side::Red,
        };
        Ok(Replay::load(log, initial)?
            .with_player_side(side)
            .with_game_id(self.game_id.clone()))
    }
}
