pub mod chart;
pub mod layout;
pub mod statusbar;
pub mod timeframe;

pub use chart::ChartView;
pub use layout::draw;
pub use statusbar::StatusBar;
pub use timeframe::{Button, ButtonBar, Timeframe};
