use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameTheme {
    Monokai,
    Solarized,
    Dracula,
    GruvboxDark,
    Nord,
    OneDark,
    HighContrast,
}

pub struct ThemeColors {
    pub background: Color,
    pub border: Color,
    pub text: Color,
    pub accent: Color,
    pub paddle: Color,
    pub ball: Color,
    pub brick_clay: Color,
    pub brick_cement: Color,
    pub brick_steel: Color,
    pub brick_damaged: Color,
}

impl GameTheme {
    pub const ALL: [GameTheme; 7] = [
        GameTheme::Monokai,
        GameTheme::Solarized,
        GameTheme::Dracula,
        GameTheme::GruvboxDark,
        GameTheme::Nord,
        GameTheme::OneDark,
        GameTheme::HighContrast,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GameTheme::Monokai => "Monokai",
            GameTheme::Solarized => "Solarized",
            GameTheme::Dracula => "Dracula",
            GameTheme::GruvboxDark => "Gruvbox Dark",
            GameTheme::Nord => "Nord",
            GameTheme::OneDark => "One Dark",
            GameTheme::HighContrast => "High Contrast",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn colors(&self) -> ThemeColors {
        match self {
            GameTheme::Monokai => ThemeColors {
                background: Color::Reset,
                border: Color::Rgb(249, 38, 114), // Monokai pink
                text: Color::Rgb(248, 248, 242),  // Monokai foreground
                accent: Color::Rgb(166, 226, 46), // Monokai green
                paddle: Color::Rgb(102, 217, 239), // Monokai cyan
                ball: Color::Rgb(255, 95, 135),   // Monokai light pink
                brick_clay: Color::Rgb(253, 151, 31), // Monokai orange
                brick_cement: Color::Rgb(174, 129, 255), // Monokai purple
                brick_steel: Color::Rgb(117, 113, 94), // Monokai comment grey
                brick_damaged: Color::Rgb(230, 219, 116), // Monokai yellow
            },
            GameTheme::Solarized => ThemeColors {
                background: Color::Reset,
                border: Color::Rgb(38, 139, 210), // Solarized blue
                text: Color::Rgb(147, 161, 161),  // Solarized base1
                accent: Color::Rgb(42, 161, 152), // Solarized cyan
                paddle: Color::Rgb(133, 153, 0),  // Solarized green
                ball: Color::Rgb(220, 50, 47),    // Solarized red
                brick_clay: Color::Rgb(203, 75, 22), // Solarized orange
                brick_cement: Color::Rgb(108, 113, 196), // Solarized violet
                brick_steel: Color::Rgb(88, 110, 117), // Solarized base01
                brick_damaged: Color::Rgb(181, 137, 0), // Solarized yellow
            },
            GameTheme::Dracula => ThemeColors {
                background: Color::Reset,
                border: Color::Rgb(255, 121, 198), // Dracula pink
                text: Color::Rgb(248, 248, 242),   // Dracula foreground
                accent: Color::Rgb(189, 147, 249), // Dracula purple
                paddle: Color::Rgb(80, 250, 123),  // Dracula green
                ball: Color::Rgb(255, 85, 85),     // Dracula red
                brick_clay: Color::Rgb(255, 184, 108), // Dracula orange
                brick_cement: Color::Rgb(139, 233, 253), // Dracula cyan
                brick_steel: Color::Rgb(98, 114, 164), // Dracula comment
                brick_damaged: Color::Rgb(241, 250, 140), // Dracula yellow
            },
            GameTheme::GruvboxDark => ThemeColors {
                background: Color::Reset,
                border: Color::Rgb(250, 189, 47), // Gruvbox yellow
                text: Color::Rgb(235, 219, 178),  // Gruvbox fg
                accent: Color::Rgb(184, 187, 38), // Gruvbox green
                paddle: Color::Rgb(131, 165, 152), // Gruvbox blue
                ball: Color::Rgb(251, 73, 52),    // Gruvbox red
                brick_clay: Color::Rgb(254, 128, 25), // Gruvbox orange
                brick_cement: Color::Rgb(211, 134, 155), // Gruvbox purple
                brick_steel: Color::Rgb(146, 131, 116), // Gruvbox grey
                brick_damaged: Color::Rgb(215, 153, 33), // Gruvbox dark yellow
            },
            GameTheme::Nord => ThemeColors {
                background: Color::Reset,
                border: Color::Rgb(136, 192, 208),    // Nord border
                text: Color::Rgb(216, 222, 233),      // Nord fg
                accent: Color::Rgb(143, 188, 187),    // Nord cyan
                paddle: Color::Rgb(94, 129, 172),     // Nord blue
                ball: Color::Rgb(191, 97, 106),       // Nord red
                brick_clay: Color::Rgb(208, 135, 112), // Nord orange
                brick_cement: Color::Rgb(180, 142, 173), // Nord purple
                brick_steel: Color::Rgb(76, 86, 106), // Nord polar night
                brick_damaged: Color::Rgb(235, 203, 139), // Nord yellow
            },
            GameTheme::OneDark => ThemeColors {
                background: Color::Reset,
                border: Color::Rgb(198, 120, 221), // One Dark purple
                text: Color::Rgb(171, 178, 191),   // One Dark fg
                accent: Color::Rgb(97, 175, 239),  // One Dark blue
                paddle: Color::Rgb(152, 195, 121), // One Dark green
                ball: Color::Rgb(224, 108, 117),   // One Dark red
                brick_clay: Color::Rgb(209, 154, 102), // One Dark orange
                brick_cement: Color::Rgb(86, 182, 194), // One Dark cyan
                brick_steel: Color::Rgb(92, 99, 112), // One Dark comment
                brick_damaged: Color::Rgb(229, 192, 123), // One Dark yellow
            },
            GameTheme::HighContrast => ThemeColors {
                background: Color::Black, // true black for max contrast
                border: Color::White,
                text: Color::White,
                accent: Color::Yellow,
                paddle: Color::Rgb(0, 255, 255),  // bright cyan
                ball: Color::Rgb(255, 0, 0),      // bright red
                brick_clay: Color::Rgb(255, 128, 0), // bright orange
                brick_cement: Color::Rgb(0, 128, 255), // bright blue
                brick_steel: Color::Rgb(160, 160, 160), // light grey
                brick_damaged: Color::Rgb(255, 255, 0), // bright yellow
            },
        }
    }
}
