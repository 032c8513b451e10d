use crate::app::FetchStatus;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

pub struct StatusBar {
    pub symbol: String,
    pub timeframe: &'static str,
    pub status: FetchStatus,
    pub text_color: Color,
}

impl StatusBar {
    pub fn new(
        symbol: String,
        timeframe: &'static str,
        status: FetchStatus,
        text_color: Color,
    ) -> Self {
        Self {
            symbol,
            timeframe,
            status,
            text_color,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let (marker, marker_color, text) = match &self.status {
            FetchStatus::Loading => ("◌", Color::Yellow, "Loading".to_string()),
            FetchStatus::Failed(error) => ("✖", Color::Red, format!("Fetch failed: {}", error)),
            FetchStatus::NoData => ("○", Color::Gray, "No data in range".to_string()),
            FetchStatus::Ready { rows, last_close } => (
                "●",
                Color::Green,
                format!("{} rows, last close ${:.2}", rows, last_close),
            ),
        };
        let plain = Style::default().fg(self.text_color);

        let text = Line::from(vec![
            Span::styled(format!("{} ", marker), Style::default().fg(marker_color)),
            Span::styled(format!("{} {}", self.symbol, self.timeframe), plain),
            Span::styled(" | ", plain),
            Span::styled(text, plain),
            Span::styled(" | ", plain),
            Span::styled("Q/Esc", Style::default().fg(Color::Yellow)),
            Span::styled(":Quit ", plain),
            Span::styled("Click", Style::default().fg(Color::Yellow)),
            Span::styled(":Timeframe", plain),
        ]);

        let para = Paragraph::new(text).block(Block::default());
        frame.render_widget(para, area);
    }
}
