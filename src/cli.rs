//! 命令行参数

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 象棋复盘工具
#[derive(Parser, Debug)]
#[command(name = "xiangqi-replay")]
#[command(about = "Xiangqi board model and replay viewer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// 配置文件（JSON）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 界面语言，覆盖配置文件
    #[arg(long, global = true)]
    pub locale: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// 子命令
#[derive(Subcommand, Debug)]
pub enum Command {
    /// 打印一个局面
    Show {
        /// X-FEN 局面字符串
        #[arg(long, default_value = xiangqi_replay::game::xfen::STANDARD_XFEN)]
        fen: String,

        /// 以黑方视角显示
        #[arg(long)]
        black: bool,
    },

    /// 打开复盘并跳到指定步
    Replay {
        /// 复盘存档，或加 --feed 时为后端复盘数据
        file: PathBuf,

        /// 跳到第几步（0 为开局，缺省为最后一步）
        #[arg(long)]
        ply: Option<usize>,

        /// 输入为后端复盘数据
        #[arg(long)]
        feed: bool,

        /// 观看者用户名（决定棋盘朝向）
        #[arg(long)]
        viewer: Option<String>,

        /// 另存为复盘存档
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// 列出全部走法
    Moves {
        file: PathBuf,

        #[arg(long)]
        feed: bool,
    },
}
