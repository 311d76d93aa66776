//! Report rendering: plain text for the terminal, JSON for scripts.
//!
//! No business logic lives here: everything shown is already computed in
//! [`WeeklyAnalysis`].

use chrono::NaiveTime;

use crate::analysis::WeeklyAnalysis;
use crate::domain::Bar;

/// `HH:MM`; seconds are dropped, not rounded.
pub fn clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

fn price(value: f64) -> String {
    format!("${value:.2}")
}

fn ranked_line(bar: &Bar, value: f64) -> String {
    format!(
        "  {} on {} at {}",
        price(value),
        bar.day_name(),
        clock(bar.time_of_day())
    )
}

/// Report as individual lines, no trailing newline on any of them.
pub fn render_lines(analysis: &WeeklyAnalysis) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!(
        "Weekly highs/lows for {}, {}",
        analysis.symbol, analysis.week
    ));
    lines.push(String::new());

    lines.push(format!("Top {} lows:", analysis.extremes.lows.len()));
    for bar in &analysis.extremes.lows {
        lines.push(ranked_line(bar, bar.low));
    }
    lines.push(String::new());

    lines.push(format!("Top {} highs:", analysis.extremes.highs.len()));
    for bar in &analysis.extremes.highs {
        lines.push(ranked_line(bar, bar.high));
    }
    lines.push(String::new());

    if analysis.is_partial_window() {
        lines.push(format!(
            "{}-week window ({} weeks with data, most recent first):",
            analysis.requested_window,
            analysis.window.len()
        ));
    } else {
        lines.push(format!(
            "{}-week window (most recent first):",
            analysis.requested_window
        ));
    }
    for week in &analysis.window {
        lines.push(format!(
            "  Week {}: low {} at {}, high {} at {}",
            week.week,
            price(week.low.low),
            clock(week.low.time_of_day()),
            price(week.high.high),
            clock(week.high.time_of_day()),
        ));
    }
    lines.push(String::new());

    lines.push(format!(
        "Average time of weekly lows: {}",
        clock(analysis.averages.low)
    ));
    lines.push(format!(
        "Average time of weekly highs: {}",
        clock(analysis.averages.high)
    ));

    lines
}

/// Report as one newline-terminated string.
pub fn render_text(analysis: &WeeklyAnalysis) -> String {
    let mut out = render_lines(analysis).join("\n");
    out.push('\n');
    out
}

/// Serialize the analysis to pretty JSON.
pub fn to_json(analysis: &WeeklyAnalysis) -> serde_json::Result<String> {
    serde_json::to_string_pretty(analysis)
}
