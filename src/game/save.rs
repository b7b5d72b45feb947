//! 复盘存档功能

use crate::game::history::{Move, MoveLog};
use crate::game::piece::Side;
use crate::game::replay::Replay;
use crate::game::xfen;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 存档文件版本
const SAVE_VERSION: u8 = 1;

/// 存档数据结构
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedReplay {
    /// 版本号
    version: u8,
    /// 保存时间
    pub saved_at: DateTime<Local>,
    /// 对局编号
    #[serde(default)]
    pub game_id: Option<String>,
    /// 本方是否执红
    pub player_is_red: bool,
    /// 初始局面（X-FEN）
    pub initial: String,
    /// 先行方
    pub first_turn: Side,
    /// 全部走法
    pub moves: Vec<Move>,
}

impl SavedReplay {
    /// 从复盘会话生成存档
    pub fn from_replay(replay: &Replay) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at: Local::now(),
            game_id: replay.game_id.clone(),
            player_is_red: replay.player_is_red,
            initial: xfen::to_xfen(replay.initial(), replay.log().first_turn()),
            first_turn: replay.log().first_turn(),
            moves: replay.log().moves().to_vec(),
        }
    }

    /// 恢复为复盘会话（游标在开局）
    pub fn into_replay(self) -> Result<Replay> {
        let layout = xfen::parse_layout(&self.initial);
        let log = MoveLog::from_moves(self.first_turn, self.moves);
        let mut replay = Replay::load(log, layout)
            .context("存档中的初始局面无效")?
            .with_player_side(if self.player_is_red { Side::Red } else { Side::Black });
        replay.game_id = self.game_id;
        Ok(replay)
    }
}

/// 保存复盘到文件
pub fn save_replay(replay: &Replay, path: &Path) -> Result<()> {
    let save_data = SavedReplay::from_replay(replay);
    let json = serde_json::to_string_pretty(&save_data).context("序列化存档数据失败")?;
    fs::write(path, json).context("写入存档文件失败")?;
    tracing::info!(path = %path.display(), plies = replay.len(), "复盘已保存");
    Ok(())
}

/// 读取存档文件（不做推演）
pub fn read_saved(path: &Path) -> Result<SavedReplay> {
    let json = fs::read_to_string(path).context("读取存档文件失败")?;
    let save_data: SavedReplay = serde_json::from_str(&json).context("解析存档数据失败")?;

    if save_data.version != SAVE_VERSION {
        anyhow::bail!("不支持的存档版本: {}", save_data.version);
    }
    Ok(save_data)
}

/// 从文件加载复盘
pub fn load_replay(path: &Path) -> Result<Replay> {
    let replay = read_saved(path)?.into_replay()?;
    tracing::info!(path = %path.display(), plies = replay.len(), "复盘已载入");
    Ok(replay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::{Board, Layout, Position};

    fn sample_replay() -> Replay {
        let mut board = Board::initial();
        let mut log = MoveLog::new();
        log.append(Move::perform(&mut board, Position::new(2, 1), Position::new(9, 1)).unwrap());
        log.append(Move::perform(&mut board, Position::new(9, 0), Position::new(9, 1)).unwrap());
        Replay::load(log, Layout::standard())
            .unwrap()
            .with_player_side(Side::Black)
            .with_game_id("g-1")
    }

    #[test]
    fn save_and_load_preserve_the_game() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replay.json");
        let original = sample_replay();
        save_replay(&original, &path).unwrap();

        let mut loaded = load_replay(&path).unwrap();
        assert_eq!(loaded.log(), original.log());
        assert_eq!(loaded.initial(), original.initial());
        assert!(!loaded.player_is_red);
        assert_eq!(loaded.game_id.as_deref(), Some("g-1"));

        loaded.fast_forward().unwrap();
        assert_eq!(loaded.board().total(), 30);
    }

    #[test]
    fn rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replay.json");
        save_replay(&sample_replay(), &path).unwrap();

        let json = fs::read_to_string(&path).unwrap();
        let json = json.replacen("\"version\": 1", "\"version\": 9", 1);
        fs::write(&path, json).unwrap();

        let err = load_replay(&path).unwrap_err();
        assert!(err.to_string().contains("不支持的存档版本"));
    }

    #[test]
    fn missing_file_has_context() {
        let err = load_replay(Path::new("/nonexistent/replay.json")).unwrap_err();
        assert_eq!(err.to_string(), "读取存档文件失败");
    }
}
