mod app;
mod config;
mod input;
mod lyrics;
mod player;
mod playlist;
mod scroll;
mod tui;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lyrics::{LyricTimeline, LyricsClient, LyricsSource};
use playlist::{MediaItem, Playlist};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lyricview", version, about = "Terminal media player with synchronized lyrics")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play media with the interactive lyric view.
    Play {
        /// Treat media as file names on the media backend instead of local paths.
        #[arg(long)]
        remote: bool,
        #[arg(required = true)]
        media: Vec<String>,
    },
    /// Parse an LRC file and print its timeline (headless).
    Parse { file: PathBuf },
    /// Print the lyric line active at a playback time (headless).
    At { file: PathBuf, seconds: f64 },
    /// Fetch lyrics for a media file from the backend and print them (headless).
    Fetch { media: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;

    match cli.command {
        Command::Play { remote, media } => {
            init_logging(Some(&cfg.paths.data_dir))?;

            let source = if remote {
                LyricsSource::Remote(LyricsClient::new(&cfg.server.base_url)?)
            } else {
                LyricsSource::Local
            };
            let items = media
                .into_iter()
                .map(|m| MediaItem::new(m, &cfg.lyrics.audio_extensions))
                .collect();

            let mut terminal = tui::TerminalGuard::enter().context("init terminal")?;
            let mut app = app::App::new(cfg, source, Playlist::new(items));
            app.run(terminal.terminal_mut()).await?;
        }
        Command::Parse { file } => {
            init_logging(None)?;
            let timeline = read_timeline(&file)?;
            print_timeline(&timeline);
        }
        Command::At { file, seconds } => {
            init_logging(None)?;
            let timeline = read_timeline(&file)?;
            match (timeline.active_index(seconds), timeline.active_line(seconds)) {
                (Some(i), Some(line)) => {
                    println!("{i}\t{}\t{}", format_cue(line.time), line.text);
                }
                _ => println!("-1"),
            }
        }
        Command::Fetch { media } => {
            init_logging(None)?;
            let client = LyricsClient::new(&cfg.server.base_url)?;
            let item = MediaItem::new(media, &cfg.lyrics.audio_extensions);
            let raw = lyrics::fetch_raw(&LyricsSource::Remote(client), &item)
                .await
                .with_context(|| format!("fetch lyrics for {}", item.location))?;
            let timeline = LyricTimeline::parse(&raw);
            if timeline.is_empty() {
                println!("No lyrics available");
            } else {
                print_timeline(&timeline);
            }
        }
    }

    Ok(())
}

/// Log to stderr, or to a file in `log_dir` while the TUI owns the terminal.
fn init_logging(log_dir: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;
            let path = dir.join("lyricview.log");
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn read_timeline(path: &Path) -> anyhow::Result<LyricTimeline> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(LyricTimeline::parse(&raw))
}

fn print_timeline(timeline: &LyricTimeline) {
    for line in timeline.lines() {
        println!("[{}] {}", format_cue(line.time), line.text);
    }
}

/// `m:ss.fff`
fn format_cue(seconds: f64) -> String {
    let millis = (seconds * 1000.0).round() as u64;
    format!("{}:{:02}.{:03}", millis / 60_000, millis / 1000 % 60, millis % 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cue() {
        assert_eq!(format_cue(62.5), "1:02.500");
        assert_eq!(format_cue(0.0), "0:00.000");
        assert_eq!(format_cue(3599.999), "59:59.999");
    }

    #[test]
    fn test_cli_parses_play() {
        let cli = Cli::try_parse_from(["lyricview", "play", "--remote", "a.mp3", "b.mp3"]).unwrap();
        match cli.command {
            Command::Play { remote, media } => {
                assert!(remote);
                assert_eq!(media, vec!["a.mp3", "b.mp3"]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(Cli::try_parse_from(["lyricview", "play"]).is_err());
    }

    #[test]
    fn test_cli_parses_at() {
        let cli = Cli::try_parse_from(["lyricview", "at", "song.lrc", "12.5"]).unwrap();
        assert!(matches!(cli.command, Command::At { seconds, .. } if seconds == 12.5));
    }
}
