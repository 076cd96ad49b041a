use crossterm::style::Color;
use cyberlaw_core::Theme;

/// Terminal colours for one theme.
#[derive(Clone, Debug)]
pub struct Palette {
    pub name: &'static str,
    pub fg: Color,
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
    pub user_color: Color,
    pub assistant_color: Color,
    pub heading: Color,
    pub code_fg: Color,
    pub bookmark: Color,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            name: "light",
            fg: Color::Rgb { r: 31, g: 41, b: 55 },
            accent: Color::Rgb { r: 37, g: 99, b: 235 },
            muted: Color::Rgb { r: 107, g: 114, b: 128 },
            error: Color::Rgb { r: 185, g: 28, b: 28 },
            user_color: Color::Rgb { r: 37, g: 99, b: 235 },
            assistant_color: Color::Rgb { r: 31, g: 41, b: 55 },
            heading: Color::Rgb { r: 30, g: 64, b: 175 },
            code_fg: Color::Rgb { r: 157, g: 23, b: 77 },
            bookmark: Color::Rgb { r: 202, g: 138, b: 4 },
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            fg: Color::Rgb { r: 229, g: 231, b: 235 },
            accent: Color::Rgb { r: 96, g: 165, b: 250 },
            muted: Color::Rgb { r: 156, g: 163, b: 175 },
            error: Color::Rgb { r: 248, g: 113, b: 113 },
            user_color: Color::Rgb { r: 96, g: 165, b: 250 },
            assistant_color: Color::Rgb { r: 229, g: 231, b: 235 },
            heading: Color::Rgb { r: 147, g: 197, b: 253 },
            code_fg: Color::Rgb { r: 244, g: 114, b: 182 },
            bookmark: Color::Rgb { r: 234, g: 179, b: 8 },
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
        }
    }
}
