use neuroflow::{Palette, Phase};
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
};

use crate::state::{AppState, Tab};

use super::theme::Theme;

pub fn header(state: &AppState) -> Tabs<'static> {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();
    let title = if state.is_paused() {
        Span::styled(" neuroflow · paused ", Theme::warn())
    } else {
        Span::styled(" neuroflow ", Theme::title())
    };

    Tabs::new(titles)
        .select(state.tab().index())
        .style(Theme::dim())
        .highlight_style(Theme::highlight())
        .divider(Span::styled("|", Theme::muted()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(title),
        )
}

pub fn diagram_block(state: &AppState) -> Block<'static> {
    let title = match state.tab() {
        Tab::LocalLoop => format!(" {} ", state.caption()),
        _ => format!(" {} · {} ", state.caption(), state.network().inputs().topology),
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(Span::styled(title, Theme::title()))
}

pub fn status(state: &AppState) -> Paragraph<'static> {
    let phase = match (state.tab(), state.phase()) {
        (Tab::LocalLoop, _) => "LOOP",
        (_, Phase::Idle) => "IDLE",
        (_, Phase::Phase1) => "PHASE 1",
        (_, Phase::Phase2) => "PHASE 2",
    };

    let lines = vec![
        Line::from(Span::styled(phase, Theme::title())),
        Line::from(Span::styled(state.status(), Theme::text())),
    ];

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title("Status"),
        )
        .wrap(Wrap { trim: true })
}

pub fn legend(palette: &Palette) -> Paragraph<'static> {
    let entry = |label: &'static str, color| {
        Line::from(vec![
            Span::styled("● ", Theme::signal(color)),
            Span::raw(label),
        ])
    };

    Paragraph::new(vec![
        entry("activation", palette.activation),
        entry("error", palette.error),
        entry("prediction", palette.prediction),
    ])
    .style(Theme::dim())
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border())
            .title("Legend"),
    )
}

pub fn hints(state: &AppState) -> Paragraph<'static> {
    let mut spans = vec![
        Span::styled(" space ", Theme::title()),
        Span::styled(if state.is_paused() { "resume" } else { "pause" }, Theme::muted()),
        Span::styled("  tab/←/→ ", Theme::title()),
        Span::styled("switch", Theme::muted()),
        Span::styled("  1-3 ", Theme::title()),
        Span::styled("jump", Theme::muted()),
    ];
    if state.tab() == Tab::Backprop {
        spans.push(Span::styled("  p ", Theme::title()));
        spans.push(Span::styled("see predictive coding", Theme::muted()));
    }
    spans.push(Span::styled("  q ", Theme::title()));
    spans.push(Span::styled("quit", Theme::muted()));

    Paragraph::new(Line::from(spans))
}

/// Shown while the local loop waits for its mount delay.
pub fn placeholder() -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled("…", Theme::muted())))
}
