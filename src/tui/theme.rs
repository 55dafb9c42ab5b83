//! Catppuccin Theme - Style Provider
//!
//! Maps semantic style names to ratatui styles. Pure and stateless: content
//! and chrome ask for `StyleName::SectionTitle`, never for a colour.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

/// Catppuccin Mocha palette
pub mod mocha {
    use ratatui::style::Color;

    // Base colors
    pub const BASE: Color = Color::Rgb(30, 30, 46); // #1e1e2e
    pub const MANTLE: Color = Color::Rgb(24, 24, 37); // #181825

    // Surface colors
    pub const SURFACE0: Color = Color::Rgb(49, 50, 68); // #313244
    pub const SURFACE1: Color = Color::Rgb(69, 71, 90); // #45475a

    // Text colors
    pub const TEXT: Color = Color::Rgb(205, 214, 244); // #cdd6f4
    pub const SUBTEXT1: Color = Color::Rgb(186, 194, 222); // #bac2de
    pub const SUBTEXT0: Color = Color::Rgb(166, 173, 200); // #a6adc8
    pub const OVERLAY2: Color = Color::Rgb(147, 153, 178); // #9399b2
    pub const OVERLAY1: Color = Color::Rgb(127, 132, 156); // #7f849c

    // Accent colors
    pub const ROSEWATER: Color = Color::Rgb(245, 224, 220); // #f5e0dc
    pub const FLAMINGO: Color = Color::Rgb(242, 205, 205); // #f2cdcd
    pub const PINK: Color = Color::Rgb(245, 194, 231); // #f5c2e7
    pub const MAUVE: Color = Color::Rgb(203, 166, 247); // #cba6f7
    pub const RED: Color = Color::Rgb(243, 139, 168); // #f38ba8
    pub const MAROON: Color = Color::Rgb(235, 160, 172); // #eba0ac
    pub const PEACH: Color = Color::Rgb(250, 179, 135); // #fab387
    pub const YELLOW: Color = Color::Rgb(249, 226, 175); // #f9e2af
    pub const GREEN: Color = Color::Rgb(166, 227, 161); // #a6e3a1
    pub const TEAL: Color = Color::Rgb(148, 226, 213); // #94e2d5
    pub const SKY: Color = Color::Rgb(137, 220, 235); // #89dceb
    pub const SAPPHIRE: Color = Color::Rgb(116, 199, 236); // #74c7ec
    pub const BLUE: Color = Color::Rgb(137, 180, 250); // #89b4fa
    pub const LAVENDER: Color = Color::Rgb(180, 190, 254); // #b4befe

    /// Accent colors used for explosion particles
    pub const EXPLOSION: [Color; 14] = [
        PINK, MAUVE, LAVENDER, BLUE, SAPPHIRE, SKY, TEAL, GREEN, YELLOW, PEACH, MAROON, RED,
        FLAMINGO, ROSEWATER,
    ];
}

/// Semantic style names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleName {
    Header,
    Subtitle,
    ActiveTab,
    InactiveTab,
    ContentBox,
    FooterLeft,
    FooterRight,
    SectionTitle,
    ContentText,
    Muted,
    ExperienceTitle,
    ExperienceMeta,
    ExperienceDetail,
    SkillCategory,
    SkillBar,
    ProjectTitle,
    ProjectDescription,
    ProjectLabel,
    LiveTitle,
    LiveValue,
    LiveSubtitle,
    FactBox,
    AsciiArt,
}

/// Catppuccin Mocha theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Theme;

impl Theme {
    pub fn new() -> Self {
        Self
    }

    /// Style for a semantic name
    pub fn style(&self, name: StyleName) -> Style {
        use mocha::*;

        match name {
            StyleName::Header => Style::default()
                .fg(TEXT)
                .bg(BASE)
                .add_modifier(Modifier::BOLD),
            StyleName::Subtitle => Style::default()
                .fg(SUBTEXT1)
                .add_modifier(Modifier::ITALIC),
            StyleName::ActiveTab => Style::default()
                .fg(BASE)
                .bg(MAUVE)
                .add_modifier(Modifier::BOLD),
            StyleName::InactiveTab => Style::default().fg(OVERLAY1).bg(SURFACE0),
            StyleName::ContentBox => Style::default().fg(SURFACE1),
            StyleName::FooterLeft => Style::default().fg(OVERLAY2).bg(SURFACE0),
            StyleName::FooterRight => Style::default()
                .fg(SAPPHIRE)
                .bg(SURFACE0)
                .add_modifier(Modifier::BOLD),
            StyleName::SectionTitle => Style::default()
                .fg(MAUVE)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            StyleName::ContentText => Style::default().fg(TEXT),
            StyleName::Muted => Style::default().fg(OVERLAY1),
            StyleName::ExperienceTitle => Style::default()
                .fg(BLUE)
                .bg(SURFACE0)
                .add_modifier(Modifier::BOLD),
            StyleName::ExperienceMeta => Style::default()
                .fg(SUBTEXT0)
                .add_modifier(Modifier::ITALIC),
            StyleName::ExperienceDetail => Style::default().fg(TEXT),
            StyleName::SkillCategory => Style::default()
                .fg(TEAL)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            StyleName::SkillBar => Style::default().fg(GREEN),
            StyleName::ProjectTitle => Style::default()
                .fg(PEACH)
                .bg(SURFACE0)
                .add_modifier(Modifier::BOLD),
            StyleName::ProjectDescription => Style::default()
                .fg(SUBTEXT1)
                .add_modifier(Modifier::ITALIC),
            StyleName::ProjectLabel => Style::default().fg(SKY).add_modifier(Modifier::BOLD),
            StyleName::LiveTitle => Style::default()
                .fg(SAPPHIRE)
                .bg(SURFACE0)
                .add_modifier(Modifier::BOLD),
            StyleName::LiveValue => Style::default()
                .fg(YELLOW)
                .bg(MANTLE)
                .add_modifier(Modifier::BOLD),
            StyleName::LiveSubtitle => Style::default()
                .fg(SUBTEXT0)
                .add_modifier(Modifier::ITALIC),
            StyleName::FactBox => Style::default()
                .fg(TEXT)
                .bg(SURFACE0)
                .add_modifier(Modifier::ITALIC),
            StyleName::AsciiArt => Style::default().fg(FLAMINGO),
        }
    }

    /// Render text with a semantic style
    pub fn render(&self, name: StyleName, text: impl Into<String>) -> Span<'static> {
        Span::styled(text.into(), self.style(name))
    }

    /// Border color of the header block
    pub fn header_border(&self) -> Color {
        mocha::LAVENDER
    }

    /// Style of a particle glyph, faint once it is nearly dead
    pub fn particle(&self, color: Color, faint: bool) -> Style {
        let style = Style::default().fg(color);
        if faint {
            style.add_modifier(Modifier::DIM)
        } else {
            style
        }
    }
}
