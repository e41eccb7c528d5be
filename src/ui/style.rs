//! Theming and color definitions.
//!
//! Every widget takes its colors from here so toggling the theme restyles
//! the whole screen. Uses ANSI colors that adapt to the terminal's palette,
//! with darker 256-color shades on the light theme.

use ratatui::style::{Color, Modifier, Style};

use crate::preview::{InlineStyle, LineType};
use crate::state::Theme;

/// Colors for the window chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Style,
    pub header: Style,
    pub gutter: Style,
    pub cursor: Style,
    pub selection_bg: Color,
    pub divider: Style,
    pub divider_active: Style,
    pub status: Style,
    pub prompt: Style,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                text: Style::default().bg(Color::Black).fg(Color::White),
                header: Style::default()
                    .bg(Color::Indexed(236))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
                gutter: Style::default().fg(Color::DarkGray),
                cursor: Style::default().bg(Color::White).fg(Color::Black),
                selection_bg: Color::DarkGray,
                divider: Style::default().fg(Color::DarkGray),
                divider_active: Style::default().fg(Color::Yellow),
                status: Style::default().bg(Color::DarkGray).fg(Color::White),
                prompt: Style::default().bg(Color::Blue).fg(Color::White),
            },
            Theme::Light => Self {
                text: Style::default().bg(Color::White).fg(Color::Black),
                header: Style::default()
                    .bg(Color::Indexed(252))
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
                gutter: Style::default().fg(Color::Indexed(245)),
                cursor: Style::default().bg(Color::Black).fg(Color::White),
                selection_bg: Color::Indexed(153),
                divider: Style::default().fg(Color::Indexed(245)),
                divider_active: Style::default().fg(Color::Indexed(130)),
                status: Style::default().bg(Color::Indexed(250)).fg(Color::Black),
                prompt: Style::default().bg(Color::Indexed(24)).fg(Color::White),
            },
        }
    }
}

/// Get the style for a given preview line type.
pub fn style_for_line_type(line_type: LineType, theme: Theme) -> Style {
    let light = theme == Theme::Light;
    let pick = |dark: Color, light_color: Color| if light { light_color } else { dark };
    match line_type {
        // Headings - bold with distinct colors per level
        LineType::Heading(1) => Style::default()
            .fg(pick(Color::Cyan, Color::Indexed(24)))
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineType::Heading(2) => Style::default()
            .fg(pick(Color::Green, Color::Indexed(22)))
            .add_modifier(Modifier::BOLD),
        LineType::Heading(3) => Style::default()
            .fg(pick(Color::Yellow, Color::Indexed(58)))
            .add_modifier(Modifier::BOLD),
        LineType::Heading(4) => Style::default()
            .fg(pick(Color::Blue, Color::Indexed(24)))
            .add_modifier(Modifier::BOLD),
        LineType::Heading(5) => Style::default()
            .fg(pick(Color::Magenta, Color::Indexed(54)))
            .add_modifier(Modifier::BOLD),
        LineType::Heading(_) => Style::default()
            .fg(pick(Color::Cyan, Color::Indexed(24)))
            .add_modifier(Modifier::BOLD),

        LineType::CodeBlock => Style::default()
            .fg(pick(Color::Indexed(245), Color::Indexed(238)))
            .add_modifier(Modifier::DIM),
        LineType::BlockQuote => Style::default()
            .fg(pick(Color::Blue, Color::Indexed(24)))
            .add_modifier(Modifier::ITALIC),
        LineType::HorizontalRule => Style::default()
            .fg(pick(Color::Indexed(240), Color::Indexed(241)))
            .add_modifier(Modifier::DIM),
        // Placeholder text, so make it stand out
        LineType::Image => Style::default()
            .fg(pick(Color::Magenta, Color::Indexed(90)))
            .add_modifier(Modifier::ITALIC),
        LineType::Html => Style::default().fg(pick(Color::Indexed(244), Color::Indexed(243))),
        LineType::Table => Style::default().fg(pick(Color::Indexed(250), Color::Indexed(236))),

        LineType::ListItem(_) | LineType::Paragraph | LineType::Empty => Style::default(),
    }
}

/// Get the style for an inline span, merged with a base line style.
pub fn style_for_inline(base: Style, inline: InlineStyle, theme: Theme) -> Style {
    let light = theme == Theme::Light;
    let mut style = base;

    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style
            .add_modifier(Modifier::UNDERLINED)
            .fg(if light { Color::Blue } else { Color::LightBlue });
    }
    if inline.code {
        style = style
            .fg(if light { Color::Indexed(88) } else { Color::Red })
            .add_modifier(Modifier::BOLD)
            .remove_modifier(Modifier::DIM);
    }

    style
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_styles_are_bold() {
        for theme in [Theme::Dark, Theme::Light] {
            for level in 1..=6 {
                let style = style_for_line_type(LineType::Heading(level), theme);
                assert!(style.add_modifier.contains(Modifier::BOLD));
            }
        }
    }

    #[test]
    fn test_themes_use_different_heading_colors() {
        let dark = style_for_line_type(LineType::Heading(1), Theme::Dark);
        let light = style_for_line_type(LineType::Heading(1), Theme::Light);
        assert_eq!(dark.fg, Some(Color::Cyan));
        assert_eq!(light.fg, Some(Color::Indexed(24)));
    }

    #[test]
    fn test_inline_code_overrides_dim_base() {
        let base = style_for_line_type(LineType::CodeBlock, Theme::Dark);
        let style = style_for_inline(
            base,
            InlineStyle {
                code: true,
                ..InlineStyle::default()
            },
            Theme::Dark,
        );
        assert_eq!(style.fg, Some(Color::Red));
        assert!(!style.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_palette_flips_with_theme() {
        let dark = Palette::for_theme(Theme::Dark);
        let light = Palette::for_theme(Theme::Light);
        assert_eq!(dark.text.bg, Some(Color::Black));
        assert_eq!(light.text.bg, Some(Color::White));
        assert_ne!(dark.cursor, light.cursor);
    }
}
