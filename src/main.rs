//! 象棋复盘命令行入口

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use xiangqi_replay::config::AppConfig;
use xiangqi_replay::game::board::Layout;
use xiangqi_replay::game::feed;
use xiangqi_replay::game::piece::Side;
use xiangqi_replay::game::replay::Replay;
use xiangqi_replay::game::save;
use xiangqi_replay::game::tally::CaptureTally;
use xiangqi_replay::game::xfen;
use xiangqi_replay::view::render_text;

use crate::cli::{Cli, Command};

// 在二进制 crate 中也初始化 i18n，并导出 t! 宏
rust_i18n::i18n!("locales", fallback = "zh-CN");
pub use rust_i18n::t;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &cli.locale {
        Some(locale) => xiangqi_replay::set_locale(locale),
        None => config.apply_locale(),
    }

    match cli.command {
        Command::Show { fen, black } => {
            let snapshot = xfen::parse_snapshot(&fen);
            let board = xiangqi_replay::game::board::Board::from_layout(&snapshot.layout)
                .context("局面无效")?;
            print!("{}", render_text(&board, black));
            println!("{}: {}", t!("cli.to_move"), snapshot.side_to_move.display_name());
        }
        Command::Replay {
            file,
            ply,
            feed,
            viewer,
            save: save_to,
        } => {
            let mut replay = open_replay(&file, feed, viewer.as_deref())?;
            match ply {
                Some(ply) => replay.jump_to(ply_index(ply))?,
                None => replay.fast_forward()?,
            }
            print_replay(&replay);
            if let Some(path) = save_to {
                save::save_replay(&replay, &path)?;
            }
        }
        Command::Moves { file, feed } => {
            let replay = open_replay(&file, feed, None)?;
            for (ply, mv) in replay.log().iter().enumerate() {
                println!("{:>3}. {} {}", ply + 1, mv.side().display_name(), mv);
            }
        }
    }

    Ok(())
}

/// 读取复盘存档或后端复盘数据
fn open_replay(path: &Path, is_feed: bool, viewer: Option<&str>) -> Result<Replay> {
    if !is_feed {
        return save::load_replay(path);
    }
    let json = fs::read_to_string(path)
        .with_context(|| format!("读取复盘数据失败: {}", path.display()))?;
    let game = feed::decode(&json).context("解析复盘数据失败")?;
    let replay = game
        .to_replay(Layout::standard(), viewer)
        .context("复盘数据与棋盘不一致")?;
    Ok(replay)
}

/// 命令行的第 `ply` 步（从 1 起）换算为游标，0 为开局
fn ply_index(ply: usize) -> isize {
    isize::try_from(ply).unwrap_or(isize::MAX) - 1
}

fn print_replay(replay: &Replay) {
    let ply = replay.cursor().map(|c| c + 1).unwrap_or(0);
    println!(
        "{}",
        t!("cli.cursor", ply = &ply.to_string(), total = &replay.len().to_string())
    );
    print!("{}", render_text(replay.board(), !replay.player_is_red));

    match replay.last_move() {
        Some(mv) => println!("{}: {} {}", t!("cli.last_move"), mv.side().display_name(), mv),
        None => println!("{}", t!("cli.opening")),
    }
    println!("{}: {}", t!("cli.to_move"), replay.side_to_move().display_name());

    for side in Side::ALL {
        println!("{} {}: {}", side.display_name(), t!("cli.captured"), tally_line(replay.tally(), side));
    }
}

fn tally_line(tally: &CaptureTally, side: Side) -> String {
    let parts: Vec<String> = tally
        .visible(side)
        .map(|(kind, n)| format!("{}×{}", kind.display_name(side.opposite()), n))
        .collect();
    if parts.is_empty() {
        t!("cli.none").into_owned()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ply_index_never_wraps() {
        assert_eq!(ply_index(0), -1);
        assert_eq!(ply_index(3), 2);
        assert_eq!(ply_index(usize::MAX), isize::MAX - 1);
    }
}
