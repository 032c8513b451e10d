use plotters::style::RGBColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_mode(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Light => Palette {
                background: RGBColor(255, 255, 255),
                grid: RGBColor(225, 225, 225),
                up: RGBColor(0, 99, 64),
                down: RGBColor(160, 33, 40),
                line: RGBColor(31, 119, 180),
                text: RGBColor(0, 0, 0),
            },
            Theme::Dark => Palette {
                background: RGBColor(0, 0, 0),
                grid: RGBColor(60, 60, 60),
                up: RGBColor(255, 255, 255),
                down: RGBColor(0, 149, 255),
                line: RGBColor(235, 235, 235),
                text: RGBColor(255, 255, 255),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: RGBColor,
    pub grid: RGBColor,
    pub up: RGBColor,
    pub down: RGBColor,
    pub line: RGBColor,
    pub text: RGBColor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_returns_to_start() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn palettes_differ_in_background() {
        assert_ne!(Theme::Light.palette().background, Theme::Dark.palette().background);
        assert_eq!(Theme::from_dark_mode(true).name(), "dark");
    }
}
