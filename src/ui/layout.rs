use crate::app::App;
use crate::ui::chart::to_color;
use crate::ui::{ChartView, StatusBar};
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area().intersection(app.area());
    if area.is_empty() {
        return;
    }
    let palette = app.theme().palette();
    let text_color = to_color(palette.text);

    frame.render_widget(
        Block::default().style(Style::default().bg(to_color(palette.background))),
        area,
    );

    let chart_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: app.buttons().top().saturating_sub(area.y),
    }
    .intersection(area);

    if let Some(bitmap) = app.chart() {
        ChartView::new(bitmap, app.active_series(), palette).render(frame, area, chart_area);
    }

    let status = StatusBar::new(
        format!("{}/{}", app.coin.to_uppercase(), app.vs_currency.to_uppercase()),
        app.active().label(),
        app.status(),
        text_color,
    );
    status.render(frame, Rect { height: 1, ..area });

    app.buttons().render(frame, app.active(), app.theme());

    if let Some(tip) = app.tooltip() {
        let width = (tip.text.chars().count() as u16).min(area.width.saturating_sub(tip.x));
        let rect = Rect::new(tip.x, tip.y, width, 1).intersection(area);
        if !rect.is_empty() {
            frame.render_widget(
                Paragraph::new(tip.text).style(Style::default().fg(text_color)),
                rect,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::data::series::tests::{point, series};
    use crate::data::TimeSeries;
    use crate::data::FetchReport;
    use crate::ui::Timeframe;
    use crossterm::event::{Event, KeyModifiers, MouseEvent, MouseEventKind};
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc::unbounded_channel;

    const COLUMNS: u16 = 120;
    const ROWS: u16 = 40;

    fn render(app: &App) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(COLUMNS, ROWS)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
    }

    fn row_text_from(terminal: &Terminal<TestBackend>, x: u16, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (x..COLUMNS).map(|x| buffer[(x, y)].symbol()).collect()
    }

    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        row_text_from(terminal, 0, y)
    }

    fn app_with_data(n: usize) -> App {
        let (tx, _rx) = unbounded_channel();
        let mut app = App::new(&AppConfig::default(), COLUMNS, ROWS, tx).unwrap();
        app.on_fetch(FetchReport {
            timeframe: Timeframe::OneMonth,
            result: Ok(series(n)),
        })
        .unwrap();
        app
    }

    #[test]
    fn loading_screen_shows_status_and_buttons() {
        let (tx, _rx) = unbounded_channel();
        let app = App::new(&AppConfig::default(), COLUMNS, ROWS, tx).unwrap();
        let terminal = render(&app);

        let status = row_text(&terminal, 0);
        assert!(status.contains("BITCOIN/USD 1 Month"));
        assert!(status.contains("Loading"));

        let buttons = row_text(&terminal, app.buttons().top());
        for label in ["1 Day", "1 Week", "1 Month", "1 Year", "All Time", "Dark Mode"] {
            assert!(buttons.contains(label), "missing {label}");
        }
        assert_eq!(terminal.backend().buffer()[(60, 20)].symbol(), " ");
    }

    #[test]
    fn chart_is_blitted_around_the_center() {
        let app = app_with_data(40);
        let terminal = render(&app);
        assert_eq!(terminal.backend().buffer()[(60, 20)].symbol(), "▀");
        assert_eq!(terminal.backend().buffer()[(60, 1)].symbol(), " ");
        assert!(row_text(&terminal, 0).contains("40 rows"));
    }

    #[test]
    fn tooltip_is_drawn_at_mouse_position() {
        let mut app = app_with_data(100);
        app.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 30,
            row: 10,
            modifiers: KeyModifiers::NONE,
        }))
        .unwrap();
        let expected = app.tooltip().unwrap().text;
        let terminal = render(&app);
        assert!(row_text_from(&terminal, 30, 10).starts_with(&expected));
    }

    #[test]
    fn six_digit_price_labels_are_never_cut() {
        let (tx, _rx) = unbounded_channel();
        let mut app = App::new(&AppConfig::default(), COLUMNS, ROWS, tx).unwrap();
        let points = (0..20)
            .map(|i| {
                let close = if i % 2 == 0 { 105_121.45 } else { 99_002.0 };
                point(1_700_000_000_000 + i * 60_000, close)
            })
            .collect();
        app.on_fetch(FetchReport {
            timeframe: Timeframe::OneMonth,
            result: Ok(TimeSeries::new(points)),
        })
        .unwrap();

        let terminal = render(&app);
        let rows: Vec<String> = (0..ROWS).map(|y| row_text(&terminal, y)).collect();
        assert!(rows.iter().any(|row| row.contains("105123.45")));
        assert!(rows.iter().any(|row| row.contains("99000.00")));
    }
}
