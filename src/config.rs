//! 程序配置

use crate::game::coords::BoardGeometry;
use crate::game::hint::HintLevel;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 程序配置（JSON），缺省字段取默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 界面语言
    pub locale: String,
    /// 日志过滤（`RUST_LOG` 优先）
    pub log_filter: String,
    /// 棋盘几何
    pub geometry: BoardGeometry,
    /// 提示强度
    pub hint_level: HintLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locale: "zh-CN".to_string(),
            log_filter: "warn".to_string(),
            geometry: BoardGeometry::default(),
            hint_level: HintLevel::default(),
        }
    }
}

impl AppConfig {
    /// 从文件加载并校验
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let config: Self = serde_json::from_str(&json).context("解析配置文件失败")?;
        config.geometry.validate().context("棋盘几何配置无效")?;
        Ok(config)
    }

    /// 有路径则加载，否则使用默认配置
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// 应用界面语言
    pub fn apply_locale(&self) {
        crate::set_locale(&self.locale);
    }
}
