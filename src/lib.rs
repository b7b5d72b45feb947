//! 象棋棋盘模型与复盘引擎
//!
//! 棋盘、行棋记录、复盘游标与吃子统计，不依赖任何界面。

use rust_i18n::i18n;

i18n!("locales", fallback = "zh-CN");

// 导出 t! 宏供外部使用
pub use rust_i18n::t;

pub mod config;
pub mod game;
pub mod view;

pub use game::*;
pub use view::*;

/// 设置当前语言区域
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}
