//! 棋盘坐标与屏幕坐标换算
//!
//! 棋子放在交叉点上（线的交点），而不是格子中间。
//! 红黑两套棋子图片的重心不同，落位时各加一个固定的像素偏移，
//! 偏移只影响绘制位置，不参与屏幕坐标到棋盘坐标的换算。

use crate::game::board::{Position, BOARD_COLS, BOARD_ROWS};
use crate::game::piece::Side;
use serde::{Deserialize, Serialize};

/// 从该列起使用右半区偏移
const RIGHT_HALF_FIRST_COL: u8 = 5;

/// 单方的绘制偏移（像素），按列分左右两半
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideOffset {
    /// 第 0-4 列
    pub left: (f32, f32),
    /// 第 5-8 列
    pub right: (f32, f32),
}

/// 红黑双方的绘制偏移
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceOffsets {
    pub red: SideOffset,
    pub black: SideOffset,
}

impl Default for PieceOffsets {
    fn default() -> Self {
        Self {
            // 红子图片偏下，整体上移 10px，右半区再右移 5px
            red: SideOffset {
                left: (0.0, -10.0),
                right: (5.0, -10.0),
            },
            // 黑子图片偏左，右移 4px，右半区再右移 5px
            black: SideOffset {
                left: (4.0, 0.0),
                right: (9.0, 0.0),
            },
        }
    }
}

impl PieceOffsets {
    /// 查表：某方棋子在某（显示）列上的偏移
    pub fn lookup(&self, side: Side, display_col: u8) -> (f32, f32) {
        let offsets = match side {
            Side::Red => &self.red,
            Side::Black => &self.black,
        };
        if display_col >= RIGHT_HALF_FIRST_COL {
            offsets.right
        } else {
            offsets.left
        }
    }

    fn max_abs(&self) -> (f32, f32) {
        [self.red.left, self.red.right, self.black.left, self.black.right]
            .iter()
            .fold((0.0f32, 0.0f32), |(mx, my), (x, y)| (mx.max(x.abs()), my.max(y.abs())))
    }
}

/// 棋盘几何配置无效
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("棋盘尺寸 {size} 必须大于两倍边距 {margin}")]
    TooSmall { size: f32, margin: f32 },

    #[error("绘制偏移 ({dx}, {dy}) 达到半个格距 ({half_x}, {half_y})，会把棋子吸附到相邻交叉点")]
    OffsetTooLarge {
        dx: f32,
        dy: f32,
        half_x: f32,
        half_y: f32,
    },
}

/// 棋盘几何（正方形区域，9 列 10 行交叉点）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardGeometry {
    /// 棋盘边长（像素）
    pub size: f32,
    /// 首末交叉点到边缘的距离
    pub margin: f32,
    /// 棋子绘制偏移
    pub offsets: PieceOffsets,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            size: 923.0,
            margin: 45.0,
            offsets: PieceOffsets::default(),
        }
    }
}

impl BoardGeometry {
    /// 相邻交叉点的横向距离
    pub fn spacing_x(&self) -> f32 {
        (self.size - 2.0 * self.margin) / (BOARD_COLS - 1) as f32
    }

    /// 相邻交叉点的纵向距离
    pub fn spacing_y(&self) -> f32 {
        (self.size - 2.0 * self.margin) / (BOARD_ROWS - 1) as f32
    }

    /// 检查几何配置能保证坐标往返换算一致
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !(self.size > 2.0 * self.margin) {
            return Err(GeometryError::TooSmall {
                size: self.size,
                margin: self.margin,
            });
        }
        let (dx, dy) = self.offsets.max_abs();
        let (half_x, half_y) = (self.spacing_x() / 2.0, self.spacing_y() / 2.0);
        if dx >= half_x || dy >= half_y {
            return Err(GeometryError::OffsetTooLarge {
                dx,
                dy,
                half_x,
                half_y,
            });
        }
        Ok(())
    }

    /// 显示坐标对应的交叉点中心
    fn intersection(&self, display: Position) -> (f32, f32) {
        (
            self.margin + display.col() as f32 * self.spacing_x(),
            self.margin + display.row() as f32 * self.spacing_y(),
        )
    }

    /// 屏幕坐标吸附到最近的显示交叉点，超出范围时夹到边界
    fn nearest(&self, pixel: (f32, f32)) -> Position {
        let col = ((pixel.0 - self.margin) / self.spacing_x()).round();
        let row = ((pixel.1 - self.margin) / self.spacing_y()).round();
        // NaN 经 as 转换为 0
        let col = (col as i32).clamp(0, BOARD_COLS as i32 - 1);
        let row = (row as i32).clamp(0, BOARD_ROWS as i32 - 1);
        Position::new(row as u8, col as u8)
    }
}

/// 坐标换算器
///
/// `flipped` 为 true 时棋盘旋转 180°（玩家执黑，使己方棋子在下方）。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordinateMapper {
    pub geometry: BoardGeometry,
    pub flipped: bool,
}

impl CoordinateMapper {
    /// 创建换算器
    pub fn new(geometry: BoardGeometry, flipped: bool) -> Self {
        Self { geometry, flipped }
    }

    /// 以某方视角创建（执黑时翻转）
    pub fn for_viewer(geometry: BoardGeometry, viewer: Side) -> Self {
        Self::new(geometry, viewer == Side::Black)
    }

    fn to_display(&self, pos: Position) -> Position {
        if self.flipped { pos.mirrored() } else { pos }
    }

    /// 交叉点中心（不含棋子偏移），用于绘制落点提示
    pub fn intersection(&self, pos: Position) -> (f32, f32) {
        self.geometry.intersection(self.to_display(pos))
    }

    /// 棋盘坐标转换为棋子绘制中心
    pub fn to_pixel(&self, pos: Position, side: Side) -> (f32, f32) {
        let display = self.to_display(pos);
        let (x, y) = self.geometry.intersection(display);
        let (dx, dy) = self.geometry.offsets.lookup(side, display.col());
        (x + dx, y + dy)
    }

    /// 屏幕坐标转换为棋盘坐标（四舍五入到最近交叉点，夹在棋盘范围内）
    pub fn to_grid(&self, pixel: (f32, f32)) -> Position {
        // 镜像是自反的
        self.to_display(self.geometry.nearest(pixel))
    }
}
