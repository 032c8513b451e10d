use crate::data::TimeSeries;
use crate::render::{render_chart, Bitmap, PixelSize, RenderError, Theme};
use crate::ui::Timeframe;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CachedChart {
    pub bitmap: Bitmap,
    pub theme: Theme,
    pub display: PixelSize,
}

impl CachedChart {
    fn is_current(&self, theme: Theme, display: PixelSize) -> bool {
        self.theme == theme && self.display == display
    }
}

/// Series and charts per timeframe. Nothing is evicted; a series is never
/// refreshed once stored.
#[derive(Debug, Default)]
pub struct ChartCache {
    series: HashMap<Timeframe, TimeSeries>,
    charts: HashMap<Timeframe, CachedChart>,
    renders: usize,
}

impl ChartCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_series(&self, timeframe: Timeframe) -> bool {
        self.series.contains_key(&timeframe)
    }

    pub fn series(&self, timeframe: Timeframe) -> Option<&TimeSeries> {
        self.series.get(&timeframe)
    }

    /// Stores a freshly fetched series; the timeframe's old chart no longer matches it.
    pub fn insert_series(&mut self, timeframe: Timeframe, series: TimeSeries) {
        self.charts.remove(&timeframe);
        self.series.insert(timeframe, series);
    }

    pub fn chart(&self, timeframe: Timeframe) -> Option<&CachedChart> {
        self.charts.get(&timeframe)
    }

    /// Returns the timeframe's chart, re-rendering it when missing or tagged with
    /// another theme or display size. `None` until the series has been stored.
    pub fn graph_for_timeframe(
        &mut self,
        timeframe: Timeframe,
        theme: Theme,
        display: PixelSize,
    ) -> Result<Option<&Bitmap>, RenderError> {
        let Some(series) = self.series.get(&timeframe) else {
            return Ok(None);
        };

        let current = self
            .charts
            .get(&timeframe)
            .is_some_and(|chart| chart.is_current(theme, display));

        if !current {
            debug!(timeframe = timeframe.label(), theme = theme.name(), "rendering chart");
            let bitmap = render_chart(series, timeframe.plot_style(), theme, display)?;
            self.renders += 1;
            debug!(renders = self.renders, "chart rendered");
            self.charts.insert(
                timeframe,
                CachedChart {
                    bitmap,
                    theme,
                    display,
                },
            );
        }

        Ok(self.charts.get(&timeframe).map(|chart| &chart.bitmap))
    }

    #[cfg(test)]
    pub fn renders(&self) -> usize {
        self.renders
    }

    #[cfg(test)]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    #[cfg(test)]
    pub fn chart_count(&self) -> usize {
        self.charts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::series::tests::series;

    const DISPLAY: PixelSize = PixelSize {
        width: 120,
        height: 80,
    };

    #[test]
    fn nothing_to_draw_before_series_arrives() {
        let mut cache = ChartCache::new();
        assert!(cache
            .graph_for_timeframe(Timeframe::OneDay, Theme::Light, DISPLAY)
            .unwrap()
            .is_none());
        assert_eq!(cache.renders(), 0);
    }

    #[test]
    fn populates_exactly_the_requested_timeframe() {
        for tf in Timeframe::all() {
            let mut cache = ChartCache::new();
            cache.insert_series(tf, series(20));
            assert!(cache.graph_for_timeframe(tf, Theme::Light, DISPLAY).unwrap().is_some());

            assert_eq!(cache.series_count(), 1);
            assert_eq!(cache.chart_count(), 1);
            for other in Timeframe::all().into_iter().filter(|o| *o != tf) {
                assert!(!cache.has_series(other));
                assert!(cache.chart(other).is_none());
            }
        }
    }

    #[test]
    fn reuses_chart_while_theme_and_size_hold() {
        let mut cache = ChartCache::new();
        cache.insert_series(Timeframe::OneWeek, series(20));
        cache.graph_for_timeframe(Timeframe::OneWeek, Theme::Light, DISPLAY).unwrap();
        cache.graph_for_timeframe(Timeframe::OneWeek, Theme::Light, DISPLAY).unwrap();
        assert_eq!(cache.renders(), 1);

        cache
            .graph_for_timeframe(Timeframe::OneWeek, Theme::Light, PixelSize::new(200, 100))
            .unwrap();
        assert_eq!(cache.renders(), 2);
    }

    #[test]
    fn theme_change_only_touches_the_requested_timeframe() {
        let mut cache = ChartCache::new();
        cache.insert_series(Timeframe::OneDay, series(20));
        cache.insert_series(Timeframe::OneYear, series(30));
        cache.graph_for_timeframe(Timeframe::OneDay, Theme::Light, DISPLAY).unwrap();
        cache.graph_for_timeframe(Timeframe::OneYear, Theme::Light, DISPLAY).unwrap();
        let year_before = cache.chart(Timeframe::OneYear).unwrap().bitmap.clone();

        cache.graph_for_timeframe(Timeframe::OneDay, Theme::Dark, DISPLAY).unwrap();
        assert_eq!(cache.chart(Timeframe::OneDay).unwrap().theme, Theme::Dark);
        let year = cache.chart(Timeframe::OneYear).unwrap();
        assert_eq!(year.theme, Theme::Light);
        assert_eq!(year.bitmap, year_before);

        // Revisiting the stale entry re-renders it under the current theme.
        cache.graph_for_timeframe(Timeframe::OneYear, Theme::Dark, DISPLAY).unwrap();
        assert_eq!(cache.chart(Timeframe::OneYear).unwrap().theme, Theme::Dark);
        assert_eq!(cache.renders(), 4);
    }

    #[test]
    fn empty_series_renders_blank_display_sized_chart() {
        let mut cache = ChartCache::new();
        cache.insert_series(Timeframe::OneMonth, TimeSeries::empty());
        let bitmap = cache
            .graph_for_timeframe(Timeframe::OneMonth, Theme::Light, DISPLAY)
            .unwrap()
            .unwrap();
        assert_eq!(bitmap.size(), DISPLAY);
        assert!(bitmap.is_blank());
    }

    #[test]
    fn fresh_series_drops_old_chart() {
        let mut cache = ChartCache::new();
        cache.insert_series(Timeframe::OneDay, series(5));
        cache.graph_for_timeframe(Timeframe::OneDay, Theme::Light, DISPLAY).unwrap();
        cache.insert_series(Timeframe::OneDay, series(6));
        assert!(cache.chart(Timeframe::OneDay).is_none());
    }
}
