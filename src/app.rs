use crate::cache::ChartCache;
use crate::config::AppConfig;
use crate::data::{FetchReport, TimeSeries};
use crate::render::{Bitmap, PixelSize, RenderError, Theme};
use crate::ui::{Button, ButtonBar, Timeframe};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("fetch worker stopped")]
    WorkerStopped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchStatus {
    Loading,
    Failed(String),
    NoData,
    Ready { rows: usize, last_close: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub x: u16,
    pub y: u16,
    pub text: String,
}

/// Maps a column to a series index: `clamp(x * n / width, 0, n - 1)`.
pub fn tooltip_index(x: u16, width: u16, len: usize) -> Option<usize> {
    if len == 0 || width == 0 {
        return None;
    }
    let idx = x as usize * len / width as usize;
    Some(idx.min(len - 1))
}

pub struct App {
    pub coin: String,
    pub vs_currency: String,
    cache: ChartCache,
    theme: Theme,
    active: Timeframe,
    pending: HashSet<Timeframe>,
    failures: HashMap<Timeframe, String>,
    area: Rect,
    buttons: ButtonBar,
    mouse: Option<(u16, u16)>,
    requests: UnboundedSender<Timeframe>,
    running: bool,
}

impl App {
    pub fn new(
        config: &AppConfig,
        columns: u16,
        rows: u16,
        requests: UnboundedSender<Timeframe>,
    ) -> Result<Self, AppError> {
        let area = Rect::new(0, 0, columns, rows);
        let mut app = Self {
            coin: config.coin.clone(),
            vs_currency: config.vs_currency.clone(),
            cache: ChartCache::new(),
            theme: Theme::from_dark_mode(config.dark_mode),
            active: config.timeframe,
            pending: HashSet::new(),
            failures: HashMap::new(),
            area,
            buttons: ButtonBar::new(area),
            mouse: None,
            requests,
            running: true,
        };
        app.refresh_active()?;
        Ok(app)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn active(&self) -> Timeframe {
        self.active
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buttons(&self) -> &ButtonBar {
        &self.buttons
    }

    #[cfg(test)]
    pub fn cache(&self) -> &ChartCache {
        &self.cache
    }

    pub fn display(&self) -> PixelSize {
        PixelSize::from_cells(self.area.width, self.area.height)
    }

    pub fn active_series(&self) -> Option<&TimeSeries> {
        self.cache.series(self.active)
    }

    pub fn chart(&self) -> Option<&Bitmap> {
        self.cache.chart(self.active).map(|chart| &chart.bitmap)
    }

    pub fn handle_event(&mut self, event: Event) -> Result<(), AppError> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse)?,
            Event::Resize(columns, rows) => self.resize(columns, rows)?,
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.quit(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<(), AppError> {
        self.mouse = Some((mouse.column, mouse.row));
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            if let Some(button) = self.buttons.hit(mouse.column, mouse.row) {
                self.press(button)?;
            }
        }
        Ok(())
    }

    pub fn press(&mut self, button: Button) -> Result<(), AppError> {
        match button {
            Button::DarkMode => self.toggle_theme(),
            Button::Timeframe(timeframe) => {
                info!(button = timeframe.label(), "button clicked");
                self.select(timeframe)
            }
        }
    }

    pub fn select(&mut self, timeframe: Timeframe) -> Result<(), AppError> {
        self.active = timeframe;
        self.refresh_active()
    }

    pub fn toggle_theme(&mut self) -> Result<(), AppError> {
        self.theme = self.theme.toggled();
        info!(theme = self.theme.name(), "theme toggled");
        self.refresh_active()
    }

    pub fn resize(&mut self, columns: u16, rows: u16) -> Result<(), AppError> {
        debug!(columns, rows, "display resized");
        self.area = Rect::new(0, 0, columns, rows);
        self.buttons = ButtonBar::new(self.area);
        self.refresh_active()
    }

    /// Renders the active timeframe if its series is cached, otherwise asks the
    /// worker for it unless a request is already out.
    fn refresh_active(&mut self) -> Result<(), AppError> {
        let display = self.display();
        if self.cache.has_series(self.active) {
            self.cache.graph_for_timeframe(self.active, self.theme, display)?;
            return Ok(());
        }

        if self.pending.insert(self.active) {
            debug!(timeframe = self.active.label(), "requesting series");
            self.requests
                .send(self.active)
                .map_err(|_| AppError::WorkerStopped)?;
        }
        Ok(())
    }

    /// A failed fetch is stored as an empty series so the timeframe shows a blank
    /// chart and is not requested again.
    pub fn on_fetch(&mut self, report: FetchReport) -> Result<(), AppError> {
        let FetchReport { timeframe, result } = report;
        self.pending.remove(&timeframe);

        let series = match result {
            Ok(series) => {
                self.failures.remove(&timeframe);
                series
            }
            Err(e) => {
                warn!(timeframe = timeframe.label(), error = %e, "showing empty chart");
                self.failures.insert(timeframe, e.to_string());
                TimeSeries::empty()
            }
        };
        self.cache.insert_series(timeframe, series);

        if timeframe == self.active {
            self.refresh_active()?;
        }
        Ok(())
    }

    pub fn status(&self) -> FetchStatus {
        if let Some(error) = self.failures.get(&self.active) {
            return FetchStatus::Failed(error.clone());
        }
        match self.active_series() {
            None => FetchStatus::Loading,
            Some(series) => match series.last() {
                None => FetchStatus::NoData,
                Some(last) => FetchStatus::Ready {
                    rows: series.len(),
                    last_close: last.close,
                },
            },
        }
    }

    /// Date and close nearest the mouse column, while the mouse is over the chart area.
    pub fn tooltip(&self) -> Option<Tooltip> {
        let (x, y) = self.mouse?;
        if x == 0 || x >= self.area.width || y == 0 || y >= self.buttons.top() {
            return None;
        }
        let series = self.active_series()?;
        let idx = tooltip_index(x, self.area.width, series.len())?;
        let point = series.get(idx)?;
        Some(Tooltip {
            x,
            y,
            text: format!(
                "{}: ${:.2}",
                point.timestamp.format("%Y-%m-%d %H:%M"),
                point.close
            ),
        })
    }
}
