//! Color palettes and glyphs for the Latchkey TUI.
//!
//! One palette per [`Theme`] value, plus a high-contrast override that keeps
//! the light/dark polarity but only uses the 16 base terminal colors.

use ratatui::style::{Color, Modifier, Style};

use latchkey_types::{Theme, UiOptions};

mod colors {
    use super::Color;

    // === Light ===
    pub const LIGHT_BG: Color = Color::Rgb(250, 250, 247);
    pub const LIGHT_PANEL: Color = Color::Rgb(238, 238, 232);
    pub const LIGHT_BORDER: Color = Color::Rgb(190, 190, 180);
    pub const LIGHT_TEXT: Color = Color::Rgb(28, 28, 30);
    pub const LIGHT_MUTED: Color = Color::Rgb(110, 110, 104);
    pub const LIGHT_PRIMARY: Color = Color::Rgb(70, 80, 190);

    // === Dark ===
    pub const DARK_BG: Color = Color::Rgb(22, 22, 29);
    pub const DARK_PANEL: Color = Color::Rgb(31, 31, 40);
    pub const DARK_BORDER: Color = Color::Rgb(84, 84, 109);
    pub const DARK_TEXT: Color = Color::Rgb(220, 215, 186);
    pub const DARK_MUTED: Color = Color::Rgb(114, 113, 105);
    pub const DARK_PRIMARY: Color = Color::Rgb(149, 127, 184);

    // === Button: black on #fff (light), white on #333 (dark) ===
    pub const BUTTON_LIGHT_BG: Color = Color::Rgb(255, 255, 255);
    pub const BUTTON_LIGHT_FG: Color = Color::Rgb(0, 0, 0);
    pub const BUTTON_DARK_BG: Color = Color::Rgb(51, 51, 51);
    pub const BUTTON_DARK_FG: Color = Color::Rgb(255, 255, 255);

    // === Semantic ===
    pub const GREEN: Color = Color::Rgb(152, 187, 108);
    pub const GREEN_DEEP: Color = Color::Rgb(60, 130, 60);
    pub const YELLOW: Color = Color::Rgb(230, 195, 132);
    pub const AMBER: Color = Color::Rgb(170, 110, 0);
    pub const RED: Color = Color::Rgb(255, 93, 98);
    pub const RED_DEEP: Color = Color::Rgb(190, 30, 45);
}

/// Resolved palette used by every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub bg_panel: Color,
    pub border: Color,
    pub text: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub button_bg: Color,
    pub button_fg: Color,
}

impl Palette {
    #[must_use]
    pub fn light() -> Self {
        Self {
            bg: colors::LIGHT_BG,
            bg_panel: colors::LIGHT_PANEL,
            border: colors::LIGHT_BORDER,
            text: colors::LIGHT_TEXT,
            text_muted: colors::LIGHT_MUTED,
            primary: colors::LIGHT_PRIMARY,
            success: colors::GREEN_DEEP,
            warning: colors::AMBER,
            error: colors::RED_DEEP,
            button_bg: colors::BUTTON_LIGHT_BG,
            button_fg: colors::BUTTON_LIGHT_FG,
        }
    }

    #[must_use]
    pub fn dark() -> Self {
        Self {
            bg: colors::DARK_BG,
            bg_panel: colors::DARK_PANEL,
            border: colors::DARK_BORDER,
            text: colors::DARK_TEXT,
            text_muted: colors::DARK_MUTED,
            primary: colors::DARK_PRIMARY,
            success: colors::GREEN,
            warning: colors::YELLOW,
            error: colors::RED,
            button_bg: colors::BUTTON_DARK_BG,
            button_fg: colors::BUTTON_DARK_FG,
        }
    }

    #[must_use]
    pub fn high_contrast(theme: Theme) -> Self {
        let (bg, fg) = match theme {
            Theme::Light => (Color::White, Color::Black),
            Theme::Dark => (Color::Black, Color::White),
        };
        Self {
            bg,
            bg_panel: bg,
            border: fg,
            text: fg,
            text_muted: Color::DarkGray,
            primary: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            button_bg: fg,
            button_fg: bg,
        }
    }
}

#[must_use]
pub fn palette(theme: Theme, options: UiOptions) -> Palette {
    if options.high_contrast {
        return Palette::high_contrast(theme);
    }
    match theme {
        Theme::Light => Palette::light(),
        Theme::Dark => Palette::dark(),
    }
}

/// ASCII/Unicode glyphs.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub bullet: &'static str,
    pub mask: char,
    pub locked: &'static str,
    pub unlocked: &'static str,
    pub pending: &'static str,
    pub selected: &'static str,
    pub warning: &'static str,
}

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            bullet: "*",
            mask: '*',
            locked: "[x]",
            unlocked: "[ ]",
            pending: "...",
            selected: ">",
            warning: "!",
        }
    } else {
        Glyphs {
            bullet: "•",
            mask: '•',
            locked: "●",
            unlocked: "○",
            pending: "…",
            selected: "▸",
            warning: "⚠",
        }
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn base(palette: &Palette) -> Style {
        Style::default().fg(palette.text).bg(palette.bg)
    }

    #[must_use]
    pub fn border(palette: &Palette) -> Style {
        Style::default().fg(palette.border)
    }

    #[must_use]
    pub fn focused_field(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn button(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.button_fg)
            .bg(palette.button_bg)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn error(palette: &Palette) -> Style {
        Style::default().fg(palette.error)
    }

    #[must_use]
    pub fn banner(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.warning)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }
}
