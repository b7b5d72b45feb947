//! 视图层：由棋盘状态生成渲染数据

pub mod board_view;

pub use board_view::{render_text, BoardView, Marker, MarkerKind, PieceSprite, RenderFrame};
