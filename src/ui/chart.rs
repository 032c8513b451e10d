use crate::data::TimeSeries;
use crate::render::{Bitmap, Palette};
use plotters::style::RGBColor;
use ratatui::{layout::Rect, style::Color, Frame};

pub const CHART_LIFT_PX: i64 = 2;

pub fn to_color(color: RGBColor) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}

/// Half-block blit, two pixels per cell.
pub struct ChartView<'a> {
    pub bitmap: &'a Bitmap,
    pub series: Option<&'a TimeSeries>,
    pub palette: Palette,
}

impl<'a> ChartView<'a> {
    pub fn new(bitmap: &'a Bitmap, series: Option<&'a TimeSeries>, palette: Palette) -> Self {
        Self {
            bitmap,
            series,
            palette,
        }
    }

    /// Top-left of the bitmap in display pixels; negative when it fills the display.
    pub fn origin(&self, display: Rect) -> (i64, i64) {
        let width_px = display.width as i64;
        let height_px = display.height as i64 * 2;
        let left = width_px / 2 - self.bitmap.width() as i64 / 2;
        let top = height_px / 2 - CHART_LIFT_PX - self.bitmap.height() as i64 / 2;
        (left, top)
    }

    pub fn render(&self, frame: &mut Frame, display: Rect, clip: Rect) {
        let (left, top) = self.origin(display);
        let background = to_color(self.palette.background);

        for y in clip.y..clip.y + clip.height {
            let upper_y = (y - display.y) as i64 * 2 - top;
            for x in clip.x..clip.x + clip.width {
                let px_x = (x - display.x) as i64 - left;
                let upper = self.sample(px_x, upper_y);
                let lower = self.sample(px_x, upper_y + 1);
                if upper.is_none() && lower.is_none() {
                    continue;
                }
                let cell = &mut frame.buffer_mut()[(x, y)];
                cell.set_char('▀')
                    .set_fg(upper.unwrap_or(background))
                    .set_bg(lower.unwrap_or(background));
            }
        }

        self.render_price_labels(frame, display, clip, left, top);
    }

    fn sample(&self, x: i64, y: i64) -> Option<Color> {
        if x < 0 || y < 0 {
            return None;
        }
        let [r, g, b, a] = self.bitmap.pixel(x as u32, y as u32)?;
        if a == 0 {
            return None;
        }
        Some(Color::Rgb(r, g, b))
    }

    /// High and low beside the chart, shifted left when they would run past `clip`.
    fn render_price_labels(
        &self,
        frame: &mut Frame,
        display: Rect,
        clip: Rect,
        left: i64,
        top: i64,
    ) {
        let Some((low, high)) = self.series.and_then(|s| s.price_range()) else {
            return;
        };
        let beside = display.x as i64 + left + self.bitmap.width() as i64 + 1;
        let top_row = display.y as i64 + top.max(0) / 2;
        let bottom_row = display.y as i64 + (top + self.bitmap.height() as i64 - 1) / 2;
        let clip_left = clip.x as i64;
        let clip_right = (clip.x + clip.width) as i64;

        for (row, price) in [(top_row, high), (bottom_row, low)] {
            if row < clip.y as i64 || row >= (clip.y + clip.height) as i64 {
                continue;
            }
            let label = format!("{:.2}", price);
            let width = label.chars().count() as i64;
            let x = beside.min(clip_right - width);
            if x < clip_left {
                continue;
            }
            for (j, ch) in label.chars().enumerate() {
                let cell = &mut frame.buffer_mut()[((x + j as i64) as u16, row as u16)];
                cell.set_char(ch)
                    .set_fg(to_color(self.palette.text))
                    .set_bg(to_color(self.palette.background));
            }
        }
    }
}
