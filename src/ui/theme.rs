use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    // Transcript styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub thought_header_style: Style,
    pub thought_text_style: Style,
    pub app_info_style: Style,
    pub app_error_style: Style,
    pub greeting_style: Style,

    // Markdown
    pub md_heading_style: Style,
    pub md_code_style: Style,
    pub md_link_style: Style,
    pub md_blockquote_style: Style,
    pub md_list_marker_style: Style,

    // Chrome
    pub title_style: Style,
    pub streaming_indicator_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub dropdown_border_style: Style,
    pub dropdown_selected_style: Style,
    pub dropdown_checked_style: Style,

    // Input area
    pub input_text_style: Style,
    pub input_cursor_style: Style,
    pub placeholder_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            thought_header_style: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            thought_text_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            app_info_style: Style::default().fg(Color::DarkGray),
            app_error_style: Style::default().fg(Color::LightRed),
            greeting_style: Style::default().fg(Color::Gray),

            md_heading_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            md_code_style: Style::default().fg(Color::LightGreen),
            md_link_style: Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::UNDERLINED),
            md_blockquote_style: Style::default().fg(Color::Gray),
            md_list_marker_style: Style::default().fg(Color::Yellow),

            title_style: Style::default().fg(Color::Gray),
            streaming_indicator_style: Style::default().fg(Color::White),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            dropdown_border_style: Style::default().fg(Color::LightBlue),
            dropdown_selected_style: Style::default().add_modifier(Modifier::REVERSED),
            dropdown_checked_style: Style::default().fg(Color::LightGreen),

            input_text_style: Style::default().fg(Color::White),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            placeholder_style: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_text_style: Style::default().fg(Color::Black),
            thought_header_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            thought_text_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            app_info_style: Style::default().fg(Color::Gray),
            app_error_style: Style::default().fg(Color::Red),
            greeting_style: Style::default().fg(Color::DarkGray),

            md_heading_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            md_code_style: Style::default().fg(Color::Green),
            md_link_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            md_blockquote_style: Style::default().fg(Color::DarkGray),
            md_list_marker_style: Style::default().fg(Color::Magenta),

            title_style: Style::default().fg(Color::DarkGray),
            streaming_indicator_style: Style::default().fg(Color::Black),
            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),
            dropdown_border_style: Style::default().fg(Color::Blue),
            dropdown_selected_style: Style::default().add_modifier(Modifier::REVERSED),
            dropdown_checked_style: Style::default().fg(Color::Green),

            input_text_style: Style::default().fg(Color::Black),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            placeholder_style: Style::default().fg(Color::Gray),
        }
    }

    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_ascii_lowercase()).as_deref() {
            Some("light") => Self::light(),
            // Fallback
            _ => Self::dark_default(),
        }
    }

    /// Style for the body text of a transcript entry.
    pub fn text_style_for(&self, role: crate::core::message::TranscriptRole) -> Style {
        use crate::core::message::TranscriptRole;
        match role {
            TranscriptRole::User => self.user_text_style,
            TranscriptRole::Assistant => self.assistant_text_style,
            TranscriptRole::AppInfo => self.app_info_style,
            TranscriptRole::AppError => self.app_error_style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::TranscriptRole;

    #[test]
    fn unknown_names_fall_back_to_dark() {
        assert_eq!(Theme::from_name(None).background_color, Color::Black);
        assert_eq!(
            Theme::from_name(Some("solarized")).background_color,
            Color::Black
        );
        assert_eq!(
            Theme::from_name(Some(" Light ")).background_color,
            Color::White
        );
    }

    #[test]
    fn errors_use_error_style() {
        let theme = Theme::dark_default();
        assert_eq!(
            theme.text_style_for(TranscriptRole::AppError),
            theme.app_error_style
        );
    }
}
