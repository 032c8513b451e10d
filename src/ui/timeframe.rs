use crate::data::Lookback;
use crate::render::{PlotStyle, Theme};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};
use serde::{Deserialize, Serialize};

pub const BUTTON_WIDTH: u16 = 11;
pub const BUTTON_HEIGHT: u16 = 1;
pub const BUTTON_GAP: u16 = 2;
pub const BUTTON_MARGIN_ROWS: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    OneDay,
    OneWeek,
    OneMonth,
    OneYear,
    AllTime,
}

impl Timeframe {
    pub fn all() -> Vec<Timeframe> {
        vec![
            Timeframe::OneDay,
            Timeframe::OneWeek,
            Timeframe::OneMonth,
            Timeframe::OneYear,
            Timeframe::AllTime,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::OneDay => "1 Day",
            Timeframe::OneWeek => "1 Week",
            Timeframe::OneMonth => "1 Month",
            Timeframe::OneYear => "1 Year",
            Timeframe::AllTime => "All Time",
        }
    }

    pub fn lookback(&self) -> Lookback {
        match self {
            Timeframe::OneDay => Lookback::Days(1),
            Timeframe::OneWeek => Lookback::Days(7),
            Timeframe::OneMonth => Lookback::Days(30),
            Timeframe::OneYear => Lookback::Days(365),
            Timeframe::AllTime => Lookback::Max,
        }
    }

    pub fn plot_style(&self) -> PlotStyle {
        match self {
            Timeframe::AllTime => PlotStyle::Line,
            _ => PlotStyle::Candlestick,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Timeframe(Timeframe),
    DarkMode,
}

impl Button {
    pub fn all() -> Vec<Button> {
        let mut buttons: Vec<Button> = Timeframe::all().into_iter().map(Button::Timeframe).collect();
        buttons.push(Button::DarkMode);
        buttons
    }

    pub fn label(&self) -> &'static str {
        match self {
            Button::Timeframe(tf) => tf.label(),
            Button::DarkMode => "Dark Mode",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ButtonBar {
    buttons: Vec<(Button, Rect)>,
    top: u16,
}

impl ButtonBar {
    pub fn new(area: Rect) -> Self {
        let top = area
            .y
            .saturating_add(area.height.saturating_sub(BUTTON_HEIGHT + BUTTON_MARGIN_ROWS));
        let buttons = Button::all()
            .into_iter()
            .enumerate()
            .map(|(idx, button)| {
                let idx = idx as u16;
                let x = area.x.saturating_add(BUTTON_GAP * (idx + 1) + BUTTON_WIDTH * idx);
                let rect = Rect::new(x, top, BUTTON_WIDTH, BUTTON_HEIGHT).intersection(area);
                (button, rect)
            })
            .collect();
        Self { buttons, top }
    }

    pub fn top(&self) -> u16 {
        self.top
    }

    #[cfg(test)]
    pub fn rect(&self, button: Button) -> Option<Rect> {
        self.buttons
            .iter()
            .find(|(b, _)| *b == button)
            .map(|(_, rect)| *rect)
            .filter(|rect| !rect.is_empty())
    }

    pub fn hit(&self, x: u16, y: u16) -> Option<Button> {
        self.buttons
            .iter()
            .find(|(_, rect)| {
                x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
            })
            .map(|(button, _)| *button)
    }

    pub fn render(&self, frame: &mut Frame, active: Timeframe, theme: Theme) {
        for (button, rect) in &self.buttons {
            if rect.is_empty() {
                continue;
            }
            let selected = match button {
                Button::Timeframe(tf) => *tf == active,
                Button::DarkMode => theme == Theme::Dark,
            };
            let style = if selected {
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().bg(Color::Blue).fg(Color::White)
            };
            let para = Paragraph::new(button.label())
                .style(style)
                .alignment(Alignment::Center);
            frame.render_widget(para, *rect);
        }
    }
}
