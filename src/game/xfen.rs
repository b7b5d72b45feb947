//! 局面字符串（X-FEN）解析与生成
//!
//! 第一段为各行棋子，自黑方底线（第 9 行）起以 `/` 分隔；
//! 数字表示连续空位，大写为红方、小写为黑方。
//! 第二段（可选）为轮走方：`w`/`r` 红方，`b` 黑方。
//! 无法识别的字符和越界格子记录警告后跳过，不视为错误。

use crate::game::board::{Layout, Position, BOARD_COLS, BOARD_ROWS};
use crate::game::piece::{Piece, Side};
use std::collections::BTreeMap;

/// 标准开局
pub const STANDARD_XFEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w";

/// 局面快照：布局与轮走方
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub layout: Layout,
    pub side_to_move: Side,
}

/// 解析为自定义摆棋映射（"row_col" -> "side_Kind"）
pub fn parse_setup(xfen: &str) -> BTreeMap<String, String> {
    parse_layout(xfen).to_setup_map()
}

/// 解析棋子布局（忽略轮走方）
pub fn parse_layout(xfen: &str) -> Layout {
    let placement = xfen.split_whitespace().next().unwrap_or("");
    let mut layout = Layout::empty();

    for (rank, line) in placement.split('/').enumerate() {
        let row = BOARD_ROWS as i32 - 1 - rank as i32;
        let mut col: i32 = 0;
        for c in line.chars() {
            if let Some(run) = c.to_digit(10) {
                col += run as i32;
                continue;
            }
            match (Piece::from_char(c), Position::checked(row, col)) {
                (Some(piece), Some(pos)) => {
                    layout.insert(pos, piece);
                }
                (None, _) => tracing::warn!(%c, row, col, "跳过无法识别的棋子字符"),
                (Some(_), None) => tracing::warn!(%c, row, col, "跳过棋盘外的棋子"),
            }
            col += 1;
        }
    }

    layout
}

/// 解析完整快照，缺省轮走方为红方
pub fn parse_snapshot(xfen: &str) -> Snapshot {
    let side_to_move = match xfen.split_whitespace().nth(1) {
        Some("b") | Some("B") => Side::Black,
        Some("w") | Some("W") | Some("r") | Some("R") | None => Side::Red,
        Some(other) => {
            tracing::warn!(field = other, "无法识别的轮走方，按红方处理");
            Side::Red
        }
    };
    Snapshot {
        layout: parse_layout(xfen),
        side_to_move,
    }
}

/// 生成局面字符串
pub fn to_xfen(layout: &Layout, side_to_move: Side) -> String {
    let mut ranks = Vec::with_capacity(BOARD_ROWS as usize);
    for row in (0..BOARD_ROWS).rev() {
        let mut rank = String::new();
        let mut empty = 0;
        for col in 0..BOARD_COLS {
            match layout.get(Position::new(row, col)) {
                Some(piece) => {
                    if empty > 0 {
                        rank.push_str(&empty.to_string());
                        empty = 0;
                    }
                    rank.push(piece.to_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            rank.push_str(&empty.to_string());
        }
        ranks.push(rank);
    }
    let turn = match side_to_move {
        Side::Red => 'w',
        Side::Black => 'b',
    };
    format!("{} {}", ranks.join("/"), turn)
}
