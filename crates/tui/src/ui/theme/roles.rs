use std::fmt::Debug;

use flowdeck_types::{ExecutionStatus, Severity};
use ratatui::style::{Color, Modifier, Style};

/// Semantic color roles used throughout the UI.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    pub border: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub accent_primary: Color,

    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    pub selection_bg: Color,
    pub selection_fg: Color,
    pub focus: Color,

    /// Background color used when displaying modal overlays.
    pub modal_bg: Color,

    pub table_row_even: Color,
    pub table_row_odd: Color,
}

/// Theme trait exposes semantic roles and common style builders.
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    // Text styles
    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_secondary)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }

    // Borders and focus
    fn border_style(&self, focused: bool) -> Style {
        let color = if focused { self.roles().focus } else { self.roles().border };
        Style::default().fg(color)
    }

    // Selection
    fn selection_style(&self) -> Style {
        Style::default()
            .fg(self.roles().selection_fg)
            .bg(self.roles().selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    fn modal_background_style(&self) -> Style {
        Style::default().bg(self.roles().modal_bg)
    }

    fn table_row_style(&self, index: usize) -> Style {
        let bg = if index % 2 == 0 {
            self.roles().table_row_even
        } else {
            self.roles().table_row_odd
        };
        Style::default().fg(self.roles().text).bg(bg)
    }

    fn severity_style(&self, severity: Severity) -> Style {
        let color = match severity {
            Severity::Info => self.roles().info,
            Severity::Success => self.roles().success,
            Severity::Warning => self.roles().warning,
            Severity::Error => self.roles().error,
        };
        Style::default().fg(color)
    }

    /// Color coding for execution status cells.
    fn execution_status_style(&self, status: ExecutionStatus) -> Style {
        match status {
            ExecutionStatus::Pending => Style::default().fg(self.roles().text_muted),
            ExecutionStatus::Running => Style::default().fg(self.roles().info).add_modifier(Modifier::BOLD),
            ExecutionStatus::Completed => Style::default().fg(self.roles().success),
            ExecutionStatus::Failed => Style::default().fg(self.roles().error).add_modifier(Modifier::BOLD),
            ExecutionStatus::Cancelled => Style::default().fg(self.roles().warning),
        }
    }

    // Accents
    fn accent_primary_style(&self) -> Style {
        Style::default().fg(self.roles().accent_primary)
    }
    fn accent_emphasis_style(&self) -> Style {
        Style::default().fg(self.roles().accent_primary).add_modifier(Modifier::BOLD)
    }
}
