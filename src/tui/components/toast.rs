//! Notification toast, drawn over the top-right corner.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use unicode_width::UnicodeWidthStr;

use crate::core::state::{Notification, NotificationKind};
use crate::tui::component::Component;

const MAX_WIDTH: u16 = 48;
/// Borders plus horizontal padding.
const OVERHEAD: u16 = 4;

pub struct Toast<'a> {
    pub notification: &'a Notification,
}

impl Toast<'_> {
    fn color(kind: NotificationKind) -> Color {
        match kind {
            NotificationKind::Success => Color::Green,
            NotificationKind::Error => Color::Red,
            NotificationKind::Info => Color::Cyan,
        }
    }

    fn paragraph(&self) -> Paragraph<'_> {
        let color = Self::color(self.notification.kind);
        let title = match self.notification.kind {
            NotificationKind::Success => " ✓ ",
            NotificationKind::Error => " ✗ ",
            NotificationKind::Info => " i ",
        };
        Paragraph::new(self.notification.text.as_str())
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(color))
                    .title(title)
                    .padding(Padding::horizontal(1)),
            )
    }

    /// Where the toast goes inside `area`.
    pub fn placement(&self, area: Rect) -> Rect {
        let text_width = self.notification.text.width() as u16;
        let width = (text_width + OVERHEAD)
            .min(MAX_WIDTH)
            .min(area.width.saturating_sub(2));
        // line_count adds the borders but not the horizontal padding
        let inner = width.saturating_sub(OVERHEAD).max(1);
        let height = (self.paragraph().line_count(inner) as u16).min(area.height);
        Rect::new(
            area.x + area.width.saturating_sub(width + 1),
            area.y + 1.min(area.height.saturating_sub(height)),
            width,
            height,
        )
    }
}

impl Component for Toast<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rect = self.placement(area);
        if rect.width <= OVERHEAD || rect.height == 0 {
            return;
        }
        frame.render_widget(Clear, rect);
        frame.render_widget(self.paragraph(), rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn short_toast_fits_its_text() {
        let notification = Notification::new(NotificationKind::Success, "Berhasil keluar");
        let toast = Toast {
            notification: &notification,
        };
        let rect = toast.placement(Rect::new(0, 0, 80, 24));
        assert_eq!(rect.width, 15 + OVERHEAD);
        assert_eq!(rect.height, 3);
        assert_eq!(rect.x + rect.width, 79);
    }

    #[test]
    fn long_toast_wraps_within_max_width() {
        let notification = Notification::new(
            NotificationKind::Info,
            "Buka https://www.google.com/device dan masukkan kode ABCD-EFGH",
        );
        let toast = Toast {
            notification: &notification,
        };
        let rect = toast.placement(Rect::new(0, 0, 100, 24));
        assert_eq!(rect.width, MAX_WIDTH);
        assert!(rect.height > 3);
    }

    #[test]
    fn renders_text() {
        let mut terminal = Terminal::new(TestBackend::new(60, 6)).unwrap();
        let notification = Notification::new(NotificationKind::Error, "Gagal masuk, coba lagi");
        terminal
            .draw(|f| {
                Toast {
                    notification: &notification,
                }
                .render(f, f.area())
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Gagal masuk, coba lagi"));
    }
}
