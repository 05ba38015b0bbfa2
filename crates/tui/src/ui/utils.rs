//! Layout and string helpers shared by UI components.

use ratatui::prelude::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Centers a rectangle of fixed size, clamped to the parent.
pub fn centered_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}

/// Truncates `text` to `max_width` display columns, appending an ellipsis.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate_to_width("nightly-backup", 20), "nightly-backup");
        assert_eq!(truncate_to_width("nightly-backup", 8), "nightly…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn fixed_rect_is_clamped() {
        let parent = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_fixed(20, 4, parent), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_fixed(80, 40, parent), parent);
    }
}
