//! Terminal rendering of view states.

use console::style;
use std::fmt::Write;

use crate::graphql::{Account, SavedVideo, VideoDetail, VideoSummary};
use crate::playback::Playback;
use crate::views::catalog::CatalogCard;
use crate::views::{Route, ViewState};

pub const LOADING: &str = "Loading…";

/// `h:mm:ss` for an hour or more, `m:ss` otherwise.
pub fn format_duration(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub fn error_line(message: &str) -> String {
    style(message).red().to_string()
}

pub fn catalog(
    state: &ViewState<Vec<VideoSummary>>,
    cards: &[CatalogCard<'_>],
    genres: &[String],
) -> String {
    let mut out = String::new();
    match state {
        ViewState::Loading => out.push_str(LOADING),
        ViewState::Failed(message) => out.push_str(&error_line(message)),
        ViewState::NotFound => out.push_str("Not found"),
        ViewState::Ready(_) => {
            if !genres.is_empty() {
                let _ = writeln!(out, "{} {}", style("Genres:").dim(), genres.join(", "));
            }
            if cards.is_empty() {
                out.push_str(&style("No videos").dim().to_string());
            }
            for card in cards {
                let video = card.video;
                let _ = writeln!(
                    out,
                    "{}  {}  {}",
                    style(&card.route).cyan(),
                    style(&video.title).bold(),
                    style(format_duration(video.duration_seconds)).dim()
                );
                if let Some(genre) = video.genre.as_deref().filter(|g| !g.is_empty()) {
                    let _ = writeln!(out, "    [{genre}]");
                }
                if let Some(description) = video.description.as_deref().filter(|d| !d.is_empty()) {
                    let _ = writeln!(out, "    {}", truncate(description, 96));
                }
            }
        }
    }
    out.trim_end().to_string()
}

pub fn detail(state: &ViewState<VideoDetail>) -> String {
    match state {
        ViewState::Loading => LOADING.to_string(),
        ViewState::NotFound => "Not found".to_string(),
        ViewState::Failed(message) => error_line(message),
        ViewState::Ready(video) => {
            let v = &video.summary;
            let mut out = String::new();
            let _ = writeln!(out, "{}", style(&v.title).bold());
            let _ = writeln!(
                out,
                "{}{}",
                format_duration(v.duration_seconds),
                v.genre
                    .as_deref()
                    .map(|g| format!(" · {g}"))
                    .unwrap_or_default()
            );
            if let Some(description) = v.description.as_deref().filter(|d| !d.is_empty()) {
                let _ = writeln!(out, "\n{description}");
            }
            match &video.playback_url {
                Some(url) => {
                    let _ = writeln!(out, "\n{} {url}", style("Stream:").dim());
                }
                None => {
                    let _ = writeln!(out, "\n{}", style("Not yet available for playback").yellow());
                }
            }
            out.trim_end().to_string()
        }
    }
}

pub fn playback(playback: &Playback) -> &'static str {
    match playback {
        Playback::Session(_) => "Playing (adaptive stream)",
        Playback::Native => "Playing",
        Playback::Unavailable => "Playback unavailable",
    }
}

pub fn saved(state: &ViewState<Vec<SavedVideo>>, links: &[(&SavedVideo, Route)]) -> String {
    match state {
        ViewState::Loading => LOADING.to_string(),
        ViewState::NotFound => "Not found".to_string(),
        ViewState::Failed(message) => error_line(message),
        ViewState::Ready(_) => {
            let mut out = format!("{}\n", style("Saved").bold());
            for (video, route) in links {
                let _ = writeln!(out, "{}  {}", style(route).cyan(), video.title);
            }
            out.trim_end().to_string()
        }
    }
}

pub fn account(account: &Account) -> String {
    match account.email.as_deref().filter(|e| !e.is_empty()) {
        Some(email) => format!("{} <{email}> (id {})", account.username, account.id),
        None => format!("{} (id {})", account.username, account.id),
    }
}
