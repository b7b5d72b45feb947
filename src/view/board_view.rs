//! 棋盘视图数据
//!
//! 渲染帧完全由棋盘状态推导，界面层只读不写。

use crate::game::board::{Board, Position, BOARD_COLS, BOARD_ROWS};
use crate::game::coords::{BoardGeometry, CoordinateMapper};
use crate::game::piece::{Piece, PieceKind, Side};
use crate::game::replay::Replay;
use crate::game::tally::CaptureTally;
use crate::game::{Game, Highlight, Selection};
use serde::Serialize;

/// 一枚要绘制的棋子
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieceSprite {
    pub pos: Position,
    pub piece: Piece,
    /// 绘制中心（含偏移）
    pub x: f32,
    pub y: f32,
    /// 本地化名称
    pub label: String,
}

/// 落点提示样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// 空位（画点）
    Dot,
    /// 可吃子（画圈）
    Ring,
}

/// 落点提示
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub pos: Position,
    pub x: f32,
    pub y: f32,
    pub kind: MarkerKind,
}

/// 一帧渲染数据
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub flipped: bool,
    pub pieces: Vec<PieceSprite>,
    pub markers: Vec<Marker>,
    pub highlight: Highlight,
    /// 红方吃掉的黑子
    pub captured_by_red: Vec<(PieceKind, u32)>,
    /// 黑方吃掉的红子
    pub captured_by_black: Vec<(PieceKind, u32)>,
}

/// 棋盘视图
#[derive(Debug, Clone, Copy, Default)]
pub struct BoardView {
    pub mapper: CoordinateMapper,
}

impl BoardView {
    /// 以某方视角创建（执黑时棋盘旋转 180°）
    pub fn new(geometry: BoardGeometry, viewer: Side) -> Self {
        Self {
            mapper: CoordinateMapper::for_viewer(geometry, viewer),
        }
    }

    /// 生成一帧
    pub fn snapshot(
        &self,
        board: &Board,
        tally: &CaptureTally,
        highlight: Highlight,
        selection: Option<&Selection>,
    ) -> RenderFrame {
        let pieces = board
            .pieces()
            .map(|(pos, piece)| {
                let (x, y) = self.mapper.to_pixel(pos, piece.side);
                PieceSprite {
                    pos,
                    piece,
                    x,
                    y,
                    label: piece.name(),
                }
            })
            .collect();

        let markers = selection
            .map(|sel| {
                sel.targets
                    .iter()
                    .map(|t| {
                        let (x, y) = self.mapper.intersection(t.pos);
                        Marker {
                            pos: t.pos,
                            x,
                            y,
                            kind: if t.capture { MarkerKind::Ring } else { MarkerKind::Dot },
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        RenderFrame {
            flipped: self.mapper.flipped,
            pieces,
            markers,
            highlight,
            captured_by_red: tally.visible(Side::Red).collect(),
            captured_by_black: tally.visible(Side::Black).collect(),
        }
    }

    /// 复盘当前游标的画面，高亮上一步
    pub fn replay_frame(&self, replay: &Replay) -> RenderFrame {
        let highlight = replay
            .last_move()
            .map(|mv| Highlight::LastMove {
                from: mv.from,
                to: mv.to,
            })
            .unwrap_or_default();
        self.snapshot(replay.board(), replay.tally(), highlight, None)
    }

    /// 实战画面
    pub fn game_frame(&self, game: &Game) -> RenderFrame {
        self.snapshot(game.board(), &game.tally(), game.highlight(), game.selection())
    }

    /// 点击位置对应的棋盘坐标
    pub fn hit_test(&self, pixel: (f32, f32)) -> Position {
        self.mapper.to_grid(pixel)
    }
}

/// 以字符画输出棋盘，上方为显示坐标第 0 行
///
/// 红方大写、黑方小写，空位为 `.`，河界用一行 `~` 标出。
pub fn render_text(board: &Board, flipped: bool) -> String {
    let mut out = String::new();
    let cols: Vec<u8> = if flipped {
        (0..BOARD_COLS).rev().collect()
    } else {
        (0..BOARD_COLS).collect()
    };
    let rows: Vec<u8> = if flipped {
        (0..BOARD_ROWS).rev().collect()
    } else {
        (0..BOARD_ROWS).collect()
    };

    out.push_str("   ");
    for col in &cols {
        out.push_str(&format!(" {col}"));
    }
    out.push('\n');

    for (i, row) in rows.iter().enumerate() {
        if i == (BOARD_ROWS / 2) as usize {
            out.push_str("   ");
            out.push_str(&" ~".repeat(BOARD_COLS as usize));
            out.push('\n');
        }
        out.push_str(&format!("{row:>2} "));
        for col in &cols {
            let c = board
                .piece_at(Position::new(*row, *col))
                .map(|p| p.to_char())
                .unwrap_or('.');
            out.push(' ');
            out.push(c);
        }
        out.push('\n');
    }
    out
}
