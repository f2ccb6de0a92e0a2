//! One-row header for the narrow layout: menu button, brand and account.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use unicode_width::UnicodeWidthStr;

use crate::identity::UserProfile;
use crate::tui::component::Component;

pub struct Header<'a> {
    pub user: Option<&'a UserProfile>,
    pub drawer_open: bool,
}

impl Component for Header<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let account = match self.user {
            Some(user) if !user.display_name.is_empty() => user.display_name.clone(),
            Some(_) => "Akun".to_string(),
            None => "Masuk".to_string(),
        };
        let account_width = (account.width() as u16 + 1).min(area.width / 2);
        let [left, right] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(account_width)])
                .areas(area);

        let menu = if self.drawer_open { "✕ " } else { "☰ " };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(menu, Style::default().fg(Color::Cyan)),
                Span::styled(
                    "360 AI HIMASIF",
                    Style::default()
                        .fg(Color::LightBlue)
                        .add_modifier(Modifier::BOLD),
                ),
            ])),
            left,
        );
        frame.render_widget(
            Paragraph::new(account)
                .style(Style::default().fg(Color::Green))
                .right_aligned(),
            right,
        );
    }
}
