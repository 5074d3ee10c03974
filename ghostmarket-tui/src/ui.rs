//! Ratatui rendering for the dashboard: top bar, vibe feed card, price card
//! and alert banner.

use chrono::{DateTime, Local};
use ghostmarket::{
    AlertKind, ChangeTone, ChartScale, PricePoint, SentimentTone, SignalTone, TICKERS,
    TickerDescriptor, VibeEvent, ViewModel, chart::span_labels, classify::alert_pill_text,
    fmt_count, fmt_metric, fmt_money, fmt_pct,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Paragraph, Row, Table, Wrap,
        canvas::{Canvas, Line as CanvasLine, Points},
    },
};
use std::time::Duration;

const C_UP: Color = Color::Rgb(100, 220, 100);
const C_LIME: Color = Color::Rgb(170, 220, 90);
const C_DOWN: Color = Color::Rgb(220, 100, 100);
const C_WARN: Color = Color::Rgb(230, 180, 80);
const C_NEUTRAL: Color = Color::Rgb(180, 180, 180);
const C_DIM: Color = Color::Rgb(120, 120, 120);
const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
const C_ACCENT: Color = Color::Rgb(100, 180, 220);

// Logical chart canvas, same geometry as the SVG paths
const CHART_WIDTH: f64 = 520.0;
const CHART_HEIGHT: f64 = 150.0;
const CHART_PAD: f64 = 12.0;

/// What the top bar shows besides the view model.
#[derive(Debug, Clone, PartialEq)]
pub struct TopBarState {
    /// Ticker of the data on screen
    pub shown: TickerDescriptor,
    /// Ticker most recently requested, ahead of `shown` while its fetch is pending or failed
    pub selected: TickerDescriptor,
    pub last_updated: Option<DateTime<Local>>,
    pub poll_interval: Option<Duration>,
}

struct StatCard {
    title: &'static str,
    value: String,
    sub: Option<String>,
}

impl StatCard {
    fn new(title: &'static str, value: String) -> Self {
        Self {
            title,
            value,
            sub: None,
        }
    }

    fn with_sub(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }
}

pub fn render_ui(f: &mut Frame, view: &ViewModel, top_bar: &TopBarState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(9),
        ])
        .split(f.area());

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    render_top_bar(f, top_bar, rows[0]);
    render_vibe_card(f, view, cards[0]);
    render_price_card(f, view, cards[1]);
    render_alert_banner(f, view, rows[2]);
}

fn sentiment_color(tone: SentimentTone) -> Color {
    match tone {
        SentimentTone::Bullish => C_UP,
        SentimentTone::SlightPositive => C_LIME,
        SentimentTone::Neutral => C_NEUTRAL,
        SentimentTone::Bearish => C_DOWN,
    }
}

fn change_color(tone: ChangeTone) -> Color {
    match tone {
        ChangeTone::Up => C_UP,
        ChangeTone::Flat => C_NEUTRAL,
        ChangeTone::Down => C_DOWN,
    }
}

fn alert_color(kind: AlertKind) -> Color {
    match kind {
        AlertKind::Imminent => C_WARN,
        AlertKind::Confirmed => C_UP,
        AlertKind::Neutral => C_NEUTRAL,
    }
}

fn pill(text: &str, color: Color) -> Span<'static> {
    Span::styled(
        format!(" {} ", text),
        Style::default()
            .fg(Color::Black)
            .bg(color)
            .add_modifier(Modifier::BOLD),
    )
}

fn render_top_bar(f: &mut Frame, state: &TopBarState, area: Rect) {
    let block = Block::default()
        .title(" GHOSTMARKET ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_ACCENT));

    let mut tickers = vec![Span::styled("Ticker: ", Style::default().fg(C_DIM))];
    for (index, ticker) in TICKERS.iter().enumerate() {
        let style = if *ticker == state.shown {
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
        } else if *ticker == state.selected {
            Style::default().fg(C_WARN)
        } else {
            Style::default().fg(C_DIM)
        };
        tickers.push(Span::styled(format!("[{}] {}", index + 1, ticker), style));
        if *ticker == state.selected && state.selected != state.shown {
            tickers.push(Span::styled(" (pending)", Style::default().fg(C_WARN)));
        }
        tickers.push(Span::raw("  "));
    }

    let updated = match state.last_updated {
        Some(at) => format!("updated {}", at.format("%H:%M:%S")),
        None => "waiting for data".to_string(),
    };
    let refresh_mode = match state.poll_interval {
        Some(interval) => format!("auto-refresh {}s", interval.as_secs()),
        None => "manual refresh".to_string(),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "GhostMarket",
                Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  Real-time vibe & price decoupling",
                Style::default().fg(C_DIM),
            ),
            Span::raw("  |  "),
            Span::styled(updated, Style::default().fg(C_BRIGHT)),
            Span::styled(format!(" ({})", refresh_mode), Style::default().fg(C_DIM)),
        ]),
        Line::from(
            tickers
                .into_iter()
                .chain([Span::styled(
                    "| r refresh  Tab next  q quit",
                    Style::default().fg(C_DIM),
                )])
                .collect::<Vec<_>>(),
        ),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_stat_cards(f: &mut Frame, cards: &[StatCard], area: Rect) {
    if cards.is_empty() {
        return;
    }

    let constraints = vec![Constraint::Ratio(1, cards.len() as u32); cards.len()];
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (card, column) in cards.iter().zip(columns.iter()) {
        let block = Block::default()
            .title(format!(" {} ", card.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(C_DIM));

        let mut lines = vec![Line::from(Span::styled(
            card.value.clone(),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
        ))];
        if let Some(sub) = &card.sub {
            lines.push(Line::from(Span::styled(
                sub.clone(),
                Style::default().fg(C_DIM),
            )));
        }

        f.render_widget(Paragraph::new(lines).block(block), *column);
    }
}

fn render_vibe_card(f: &mut Frame, view: &ViewModel, area: Rect) {
    let block = Block::default()
        .title(" VIBE FEED ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .split(inner);

    let stats = &view.stats;
    let signal = SignalTone::from_signal_up(stats.signal_up);
    let signal_color = match signal {
        SignalTone::Up => C_UP,
        SignalTone::Quiet => C_NEUTRAL,
    };

    let header = Line::from(vec![
        Span::styled("Latest sentiment events for ", Style::default().fg(C_DIM)),
        Span::styled(view.ticker.label, Style::default().fg(C_BRIGHT)),
        Span::raw("  "),
        pill(signal.label(), signal_color),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    render_stat_cards(
        f,
        &[
            StatCard::new("Avg Sentiment", fmt_metric(Some(stats.avg_sentiment)))
                .with_sub("Rolling window"),
            StatCard::new("Sources", stats.sources.to_string()).with_sub("Platforms scanned"),
            StatCard::new("Events", stats.events_count.to_string())
                .with_sub(format!("Signal: {}", stats.events_label)),
        ],
        chunks[1],
    );

    render_vibe_table(f, &view.vibe_feed, chunks[2]);
}

fn render_vibe_table(f: &mut Frame, events: &[VibeEvent], area: Rect) {
    if events.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "No vibe events yet",
            Style::default().fg(C_DIM),
        )))
        .alignment(Alignment::Center);
        f.render_widget(placeholder, area);
        return;
    }

    let header = Row::new(vec!["MESSAGE", "SENTIMENT", "TIME", "SOURCE"]).style(
        Style::default()
            .fg(C_DIM)
            .add_modifier(Modifier::BOLD),
    );

    let rows = events.iter().map(|event| {
        let tone = SentimentTone::classify(event.sentiment_value);
        Row::new(vec![
            Cell::from(event.message.clone()).style(Style::default().fg(C_BRIGHT)),
            Cell::from(event.sentiment_label.clone()).style(
                Style::default()
                    .fg(sentiment_color(tone))
                    .add_modifier(Modifier::BOLD),
            ),
            Cell::from(event.time_label.clone()).style(Style::default().fg(C_DIM)),
            Cell::from(event.source.clone()).style(Style::default().fg(C_DIM)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .column_spacing(1);

    f.render_widget(table, area);
}

fn render_price_card(f: &mut Frame, view: &ViewModel, area: Rect) {
    let block = Block::default()
        .title(" LIVE PRICE ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(4),
        ])
        .split(inner);

    let price = &view.price;
    let tone = price
        .change_pct
        .map(ChangeTone::classify)
        .unwrap_or(ChangeTone::Flat);
    let change = fmt_pct(price.change_pct);

    let header = Line::from(vec![
        Span::styled("Latest snapshot for ", Style::default().fg(C_DIM)),
        Span::styled(view.ticker.label, Style::default().fg(C_BRIGHT)),
        Span::raw("  "),
        pill(&format!("{} {}", tone.arrow(), change), change_color(tone)),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    render_stat_cards(
        f,
        &[
            StatCard::new("Last Price", fmt_money(price.last)).with_sub("Most recent tick"),
            StatCard::new("24h Change", change).with_sub("Percent"),
            StatCard::new("Series Pts", price.series.len().to_string()).with_sub("Mini trend"),
        ],
        chunks[1],
    );

    render_price_chart(f, &price.series, change_color(tone), chunks[2]);
}

fn render_price_chart(f: &mut Frame, series: &[PricePoint], color: Color, area: Rect) {
    let block = Block::default()
        .title(" TREND ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));

    let Some(scale) = ChartScale::fit(series, CHART_WIDTH, CHART_HEIGHT, CHART_PAD) else {
        let inner = block.inner(area);
        f.render_widget(block, area);
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "Not enough data",
            Style::default().fg(C_DIM),
        )))
        .alignment(Alignment::Center);
        f.render_widget(placeholder, inner);
        return;
    };

    let (low, high) = scale.bounds();
    let mut block = block.title(format!(
        " lo {} hi {} ",
        fmt_money(Some(low)),
        fmt_money(Some(high))
    ));
    if let Some((first, last)) = span_labels(series) {
        block = block.title_bottom(format!(" {} .. {} ", first, last));
    }

    // Canvas y grows upwards, the chart scale grows downwards
    let points: Vec<(f64, f64)> = scale
        .points()
        .into_iter()
        .map(|(x, y)| (x, CHART_HEIGHT - y))
        .collect();
    let last = points.last().copied();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, CHART_WIDTH])
        .y_bounds([0.0, CHART_HEIGHT])
        .paint(move |ctx| {
            for pair in points.windows(2) {
                let (x1, y1) = pair[0];
                let (x2, y2) = pair[1];
                ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
            }
            if let Some(point) = last {
                ctx.draw(&Points {
                    coords: &[point],
                    color: C_BRIGHT,
                });
            }
        });

    f.render_widget(canvas, area);
}

fn render_alert_banner(f: &mut Frame, view: &ViewModel, area: Rect) {
    let signal = &view.signal;
    let kind = AlertKind::from_alert(signal.alert);
    let color = alert_color(kind);

    let block = Block::default()
        .title(" SIGNAL ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    if kind.shows_pill() {
        let pill_line = Line::from(pill(alert_pill_text(signal.alert), color));
        f.render_widget(
            Paragraph::new(pill_line).alignment(Alignment::Center),
            chunks[0],
        );
    }

    let mut title = Vec::new();
    if let Some(icon) = kind.icon() {
        title.push(Span::raw(format!("{} ", icon)));
    }
    title.push(Span::styled(
        kind.title(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ));
    f.render_widget(
        Paragraph::new(Line::from(title)).alignment(Alignment::Center),
        chunks[1],
    );

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            kind.subtitle(),
            Style::default().fg(C_DIM),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true }),
        chunks[2],
    );

    render_stat_cards(
        f,
        &[
            StatCard::new("Δ Price", fmt_metric(signal.delta_price)),
            StatCard::new("Δ Vibe", fmt_metric(signal.delta_vibe)),
            StatCard::new("Hype Momentum", fmt_metric(signal.hype_momentum)),
            StatCard::new("Events (N)", fmt_count(signal.n)),
        ],
        chunks[3],
    );
}
