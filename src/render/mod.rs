pub mod bitmap;
pub mod palette;

pub use bitmap::{Bitmap, PixelSize};
pub use palette::{Palette, Theme};

use crate::data::TimeSeries;
use plotters::prelude::*;
use tracing::debug;

/// Figure aspect in arbitrary units, scaled to fit the display.
pub const FIGURE_UNITS: (f64, f64) = (6.0, 4.0);
pub const FIGURE_FILL: f64 = 0.85;

const MIN_FIGURE_SIDE: u32 = 8;
const MARGIN: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotStyle {
    Candlestick,
    Line,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to draw chart: {0}")]
    Draw(String),
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

pub fn figure_size(display: PixelSize) -> PixelSize {
    let (units_w, units_h) = FIGURE_UNITS;
    let scale = (display.width as f64 * FIGURE_FILL / units_w)
        .min(display.height as f64 * FIGURE_FILL / units_h);
    PixelSize::new(
        ((units_w * scale) as u32).max(1),
        ((units_h * scale) as u32).max(1),
    )
}

/// Rasterizes `series` for display. An empty series, or a display too small to
/// hold a figure, yields a blank bitmap the size of the whole display.
pub fn render_chart(
    series: &TimeSeries,
    style: PlotStyle,
    theme: Theme,
    display: PixelSize,
) -> Result<Bitmap, RenderError> {
    if series.is_empty() {
        debug!("series is empty, returning blank bitmap");
        return Ok(Bitmap::blank(display));
    }

    let figure = figure_size(display);
    if figure.width < MIN_FIGURE_SIDE || figure.height < MIN_FIGURE_SIDE {
        debug!(size = ?figure, "display too small for a figure");
        return Ok(Bitmap::blank(display));
    }

    debug!(rows = series.len(), theme = theme.name(), ?style, ?figure, "drawing chart");
    let palette = theme.palette();
    let mut rgb = vec![0u8; figure.width as usize * figure.height as usize * 3];

    {
        let root = BitMapBackend::with_buffer(&mut rgb, (figure.width, figure.height))
            .into_drawing_area();
        root.fill(&palette.background).map_err(draw_err)?;

        let (low, high) = value_range(series, style);
        let n = series.len() as f64;

        let mut chart = ChartBuilder::on(&root)
            .margin(MARGIN)
            .build_cartesian_2d(-0.5..n - 0.5, low..high)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_labels(5)
            .bold_line_style(&palette.grid)
            .light_line_style(&TRANSPARENT)
            .axis_style(&palette.grid)
            .draw()
            .map_err(draw_err)?;

        match style {
            PlotStyle::Candlestick => {
                let plot_width = figure.width.saturating_sub(2 * MARGIN) as f64;
                let candle_width = ((plot_width / n) * 0.7).max(1.0) as u32;
                chart
                    .draw_series(series.points().iter().enumerate().map(|(idx, p)| {
                        CandleStick::new(
                            idx as f64,
                            p.open,
                            p.high,
                            p.low,
                            p.close,
                            palette.up.filled(),
                            palette.down.filled(),
                            candle_width,
                        )
                    }))
                    .map_err(draw_err)?;
            }
            PlotStyle::Line => {
                chart
                    .draw_series(LineSeries::new(
                        series
                            .points()
                            .iter()
                            .enumerate()
                            .map(|(idx, p)| (idx as f64, p.close)),
                        &palette.line,
                    ))
                    .map_err(draw_err)?;
            }
        }

        root.present().map_err(draw_err)?;
    }

    Ok(Bitmap::from_rgb(figure, &rgb))
}

/// Y range with 5% padding; candles span lows to highs, the line spans closes.
fn value_range(series: &TimeSeries, style: PlotStyle) -> (f64, f64) {
    let (min, max) = match style {
        PlotStyle::Candlestick => series.price_range().unwrap_or((0.0, 1.0)),
        PlotStyle::Line => series
            .points()
            .iter()
            .fold((f64::MAX, f64::MIN), |(min, max), p| (min.min(p.close), max.max(p.close))),
    };
    let padding = (max - min).max(1e-8) * 0.05;
    (min - padding, max + padding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::series::tests::series;

    fn rgba(color: RGBColor) -> [u8; 4] {
        [color.0, color.1, color.2, 255]
    }

    fn contains(bitmap: &Bitmap, color: RGBColor) -> bool {
        bitmap.as_bytes().chunks_exact(4).any(|px| px == rgba(color))
    }

    #[test]
    fn figure_keeps_six_by_four_aspect() {
        let figure = figure_size(PixelSize::new(120, 80));
        assert_eq!(figure, PixelSize::new(102, 68));

        let wide = figure_size(PixelSize::new(400, 80));
        assert_eq!(wide, PixelSize::new(102, 68));
    }

    #[test]
    fn empty_series_gives_blank_display_sized_bitmap() {
        let display = PixelSize::new(160, 90);
        let bitmap = render_chart(&TimeSeries::empty(), PlotStyle::Candlestick, Theme::Light, display)
            .unwrap();
        assert_eq!(bitmap.size(), display);
        assert!(bitmap.is_blank());
    }

    #[test]
    fn tiny_display_gives_blank_bitmap() {
        let display = PixelSize::new(6, 4);
        let bitmap = render_chart(&series(5), PlotStyle::Line, Theme::Dark, display).unwrap();
        assert_eq!(bitmap.size(), display);
        assert!(bitmap.is_blank());
    }

    #[test]
    fn candles_use_theme_palette() {
        let display = PixelSize::new(120, 80);
        let light = render_chart(&series(10), PlotStyle::Candlestick, Theme::Light, display).unwrap();
        assert_eq!(light.size(), figure_size(display));
        assert_eq!(light.pixel(0, 0), Some(rgba(Theme::Light.palette().background)));
        assert!(contains(&light, Theme::Light.palette().up));

        let dark = render_chart(&series(10), PlotStyle::Candlestick, Theme::Dark, display).unwrap();
        assert_eq!(dark.pixel(0, 0), Some(rgba(Theme::Dark.palette().background)));
        assert_ne!(light, dark);
    }

    #[test]
    fn line_style_draws_closes() {
        let display = PixelSize::new(120, 80);
        let bitmap = render_chart(&series(10), PlotStyle::Line, Theme::Light, display).unwrap();
        assert!(contains(&bitmap, Theme::Light.palette().line));
        assert!(!contains(&bitmap, Theme::Light.palette().up));
    }
}
