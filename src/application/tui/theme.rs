use crate::entities::DayCategory;
use crossterm::style::{Color as CrosstermColor, StyledContent, Stylize};
use ratatui::style::{Color as RatatuiColor, Modifier, Style as RatatuiStyle};

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Day categories
    pub today: ColorPair,
    pub saturday: ColorPair,
    pub sunday: ColorPair,
    pub holiday: ColorPair,
    pub weekday: ColorPair,

    // State colors
    pub cursor: ColorPair,
    pub dimmed: ColorPair,

    // UI elements
    pub header: ColorPair,
    pub title: ColorPair,
    pub border: ColorPair,

    // Text
    pub normal_text: ColorPair,
    pub help_text: ColorPair,
    pub status_text: ColorPair,
    pub error_text: ColorPair,
}

#[derive(Debug, Clone)]
pub struct ColorPair {
    pub fg: CrosstermColor,
    pub bg: Option<CrosstermColor>,
}

impl ColorPair {
    pub fn new(fg: CrosstermColor) -> Self {
        Self { fg, bg: None }
    }

    pub fn with_bg(fg: CrosstermColor, bg: CrosstermColor) -> Self {
        Self { fg, bg: Some(bg) }
    }

    pub fn to_ratatui(&self) -> RatatuiStyle {
        let style = RatatuiStyle::default().fg(RatatuiColor::from(self.fg));
        match self.bg {
            Some(bg) => style.bg(RatatuiColor::from(bg)),
            None => style,
        }
    }

    pub fn to_ratatui_with_modifier(&self, modifier: Modifier) -> RatatuiStyle {
        self.to_ratatui().add_modifier(modifier)
    }

    /// ANSI-coloured text for stdout.
    pub fn colorize(&self, text: &str) -> String {
        self.styled(text).to_string()
    }

    pub fn colorize_bold(&self, text: &str) -> String {
        self.styled(text).bold().to_string()
    }

    fn styled<'t>(&self, text: &'t str) -> StyledContent<&'t str> {
        let styled = text.with(self.fg);
        match self.bg {
            Some(bg) => styled.on(bg),
            None => styled,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            colors: ThemeColors {
                today: ColorPair::with_bg(CrosstermColor::Black, CrosstermColor::Yellow),
                saturday: ColorPair::new(CrosstermColor::Rgb { r: 150, g: 150, b: 255 }),
                sunday: ColorPair::new(CrosstermColor::Rgb { r: 255, g: 120, b: 120 }),
                holiday: ColorPair::new(CrosstermColor::Rgb { r: 255, g: 190, b: 190 }),
                weekday: ColorPair::new(CrosstermColor::White),

                cursor: ColorPair::with_bg(CrosstermColor::White, CrosstermColor::Rgb { r: 50, g: 50, b: 50 }),
                dimmed: ColorPair::new(CrosstermColor::DarkGrey),

                header: ColorPair::new(CrosstermColor::DarkCyan),
                title: ColorPair::new(CrosstermColor::White),
                border: ColorPair::new(CrosstermColor::DarkCyan),

                normal_text: ColorPair::new(CrosstermColor::White),
                help_text: ColorPair::new(CrosstermColor::DarkGrey),
                status_text: ColorPair::new(CrosstermColor::Green),
                error_text: ColorPair::new(CrosstermColor::Red),
            },
        }
    }

    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            colors: ThemeColors {
                today: ColorPair::with_bg(CrosstermColor::White, CrosstermColor::Black),
                saturday: ColorPair::new(CrosstermColor::DarkBlue),
                sunday: ColorPair::new(CrosstermColor::DarkRed),
                holiday: ColorPair::new(CrosstermColor::Magenta),
                weekday: ColorPair::new(CrosstermColor::Black),

                cursor: ColorPair::with_bg(CrosstermColor::Black, CrosstermColor::Rgb { r: 220, g: 220, b: 220 }),
                dimmed: ColorPair::new(CrosstermColor::Grey),

                header: ColorPair::new(CrosstermColor::DarkBlue),
                title: ColorPair::new(CrosstermColor::Black),
                border: ColorPair::new(CrosstermColor::DarkBlue),

                normal_text: ColorPair::new(CrosstermColor::Black),
                help_text: ColorPair::new(CrosstermColor::DarkGrey),
                status_text: ColorPair::new(CrosstermColor::DarkGreen),
                error_text: ColorPair::new(CrosstermColor::DarkRed),
            },
        }
    }

    pub fn minimal() -> Self {
        Self {
            name: "Minimal".to_string(),
            colors: ThemeColors {
                today: ColorPair::with_bg(CrosstermColor::Black, CrosstermColor::White),
                saturday: ColorPair::new(CrosstermColor::Grey),
                sunday: ColorPair::new(CrosstermColor::Grey),
                holiday: ColorPair::new(CrosstermColor::Grey),
                weekday: ColorPair::new(CrosstermColor::White),

                cursor: ColorPair::with_bg(CrosstermColor::White, CrosstermColor::Rgb { r: 28, g: 28, b: 28 }),
                dimmed: ColorPair::new(CrosstermColor::DarkGrey),

                header: ColorPair::new(CrosstermColor::White),
                title: ColorPair::new(CrosstermColor::White),
                border: ColorPair::new(CrosstermColor::White),

                normal_text: ColorPair::new(CrosstermColor::White),
                help_text: ColorPair::new(CrosstermColor::Grey),
                status_text: ColorPair::new(CrosstermColor::White),
                error_text: ColorPair::new(CrosstermColor::White),
            },
        }
    }

    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            "minimal" => Self::minimal(),
            _ => Self::dark(), // default
        }
    }

    pub fn available_themes() -> Vec<String> {
        vec!["dark".to_string(), "light".to_string(), "minimal".to_string()]
    }

    pub fn for_category(&self, category: DayCategory) -> &ColorPair {
        match category {
            DayCategory::Today => &self.colors.today,
            DayCategory::Saturday => &self.colors.saturday,
            DayCategory::Sunday => &self.colors.sunday,
            DayCategory::Holiday => &self.colors.holiday,
            DayCategory::Weekday => &self.colors.weekday,
        }
    }

    /// Header colour for a Sunday-indexed weekday column.
    pub fn for_header_column(&self, column: usize) -> &ColorPair {
        match column {
            0 => &self.colors.sunday,
            6 => &self.colors.saturday,
            _ => &self.colors.header,
        }
    }
}
