//! 棋子定义

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 棋子颜色（方）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// 红方
    Red,
    /// 黑方
    Black,
}

impl Side {
    /// 双方，红方在前
    pub const ALL: [Side; 2] = [Side::Red, Side::Black];

    /// 获取对方
    pub fn opposite(&self) -> Self {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// 红方先行
    pub fn first() -> Self {
        Side::Red
    }

    /// 外部序列化使用的名称（"red" / "black"）
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Red => "red",
            Side::Black => "black",
        }
    }

    /// 本地化名称
    pub fn display_name(&self) -> String {
        match self {
            Side::Red => crate::t!("side.red").into_owned(),
            Side::Black => crate::t!("side.black").into_owned(),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(Side::Red),
            "black" => Ok(Side::Black),
            _ => Err(ParsePieceError(s.to_string())),
        }
    }
}

/// 兵种
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// 帅 / 将
    King,
    /// 仕 / 士
    Advisor,
    /// 相 / 象
    Elephant,
    /// 马
    Horse,
    /// 车
    Rook,
    /// 炮
    Cannon,
    /// 兵 / 卒
    Pawn,
}

impl PieceKind {
    /// 全部兵种
    pub const ALL: [PieceKind; 7] = [
        PieceKind::King,
        PieceKind::Advisor,
        PieceKind::Elephant,
        PieceKind::Horse,
        PieceKind::Rook,
        PieceKind::Cannon,
        PieceKind::Pawn,
    ];

    /// 后端使用的名称（"King"、"Horse" ...）
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::King => "King",
            PieceKind::Advisor => "Advisor",
            PieceKind::Elephant => "Elephant",
            PieceKind::Horse => "Horse",
            PieceKind::Rook => "Rook",
            PieceKind::Cannon => "Cannon",
            PieceKind::Pawn => "Pawn",
        }
    }

    /// 大写字母代号，红方用大写、黑方用小写
    pub fn letter(&self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Advisor => 'A',
            PieceKind::Elephant => 'B',
            PieceKind::Horse => 'N',
            PieceKind::Rook => 'R',
            PieceKind::Cannon => 'C',
            PieceKind::Pawn => 'P',
        }
    }

    /// 从字母代号解析兵种（忽略大小写），兼容 E/H 写法
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'K' => Some(PieceKind::King),
            'A' => Some(PieceKind::Advisor),
            'B' | 'E' => Some(PieceKind::Elephant),
            'N' | 'H' => Some(PieceKind::Horse),
            'R' => Some(PieceKind::Rook),
            'C' => Some(PieceKind::Cannon),
            'P' => Some(PieceKind::Pawn),
            _ => None,
        }
    }

    /// 本地化名称
    pub fn display_name(&self, side: Side) -> String {
        let key = format!("piece.{}.{}", side.as_str(), self.as_str().to_ascii_lowercase());
        crate::t!(&key).into_owned()
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PieceKind {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PieceKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParsePieceError(s.to_string()))
    }
}

/// 无法识别的棋子描述
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("无法识别的棋子: {0:?}")]
pub struct ParsePieceError(pub String);

/// 棋子（不可变值）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// 所属方
    pub side: Side,
    /// 兵种
    pub kind: PieceKind,
}

impl Piece {
    /// 创建棋子
    pub const fn new(side: Side, kind: PieceKind) -> Self {
        Self { side, kind }
    }

    /// 红方棋子
    pub const fn red(kind: PieceKind) -> Self {
        Self::new(Side::Red, kind)
    }

    /// 黑方棋子
    pub const fn black(kind: PieceKind) -> Self {
        Self::new(Side::Black, kind)
    }

    /// 单字母表示：红方大写，黑方小写
    pub fn to_char(&self) -> char {
        let c = self.kind.letter();
        match self.side {
            Side::Red => c,
            Side::Black => c.to_ascii_lowercase(),
        }
    }

    /// 从单字母解析，大小写决定所属方
    pub fn from_char(c: char) -> Option<Self> {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let kind = PieceKind::from_letter(c)?;
        let side = if c.is_ascii_uppercase() { Side::Red } else { Side::Black };
        Some(Self::new(side, kind))
    }

    /// 外部存储格式 "red_King"
    pub fn code(&self) -> String {
        format!("{}_{}", self.side.as_str(), self.kind.as_str())
    }

    /// 是否与另一枚棋子同方
    pub fn is_friend_of(&self, other: &Piece) -> bool {
        self.side == other.side
    }

    /// 获取显示名称
    pub fn name(&self) -> String {
        self.kind.display_name(self.side)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    /// 解析 "red_King" 格式
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (side, kind) = s
            .split_once('_')
            .ok_or_else(|| ParsePieceError(s.to_string()))?;
        let side = side.parse::<Side>().map_err(|_| ParsePieceError(s.to_string()))?;
        let kind = kind.parse::<PieceKind>().map_err(|_| ParsePieceError(s.to_string()))?;
        Ok(Self::new(side, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_codes_follow_case_convention() {
        assert_eq!(Piece::red(PieceKind::Elephant).to_char(), 'B');
        assert_eq!(Piece::black(PieceKind::Horse).to_char(), 'n');
        assert_eq!(Piece::from_char('k'), Some(Piece::black(PieceKind::King)));
        assert_eq!(Piece::from_char('H'), Some(Piece::red(PieceKind::Horse)));
        assert_eq!(Piece::from_char('x'), None);
        assert_eq!(Piece::from_char('3'), None);
    }

    #[test]
    fn external_code_parses_back() {
        let piece: Piece = "red_King".parse().unwrap();
        assert_eq!(piece, Piece::red(PieceKind::King));
        assert_eq!(Piece::black(PieceKind::Cannon).code(), "black_Cannon");
        assert!("green_King".parse::<Piece>().is_err());
        assert!("redKing".parse::<Piece>().is_err());
    }

    #[test]
    fn serde_uses_backend_names() {
        let json = serde_json::to_string(&Piece::black(PieceKind::Rook)).unwrap();
        assert_eq!(json, r#"{"side":"black","kind":"Rook"}"#);
    }

    #[test]
    fn opposite_side() {
        assert_eq!(Side::Red.opposite(), Side::Black);
        assert_eq!(Side::first(), Side::Red);
    }
}
