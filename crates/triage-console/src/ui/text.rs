/// Wraps at whitespace, hard-splitting words longer than `width`.
pub(super) fn wrap_text_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0usize;
        for word in raw.split_whitespace() {
            let mut word = word.to_string();
            let mut word_width = display_width(&word);
            if current_width > 0 && current_width + 1 + word_width > width {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            while word_width > width {
                let head: String = word.chars().take(width).collect();
                let tail: String = word.chars().skip(width).collect();
                if current_width > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                lines.push(head);
                word = tail;
                word_width = display_width(&word);
            }
            if word.is_empty() {
                continue;
            }
            if current_width > 0 {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(&word);
            current_width += word_width;
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

pub(super) fn display_width(text: &str) -> usize {
    text.chars().count()
}

pub(super) fn pad_right(text: &str, width: usize) -> String {
    let mut out = text.to_string();
    let current = display_width(text);
    if current < width {
        out.extend(std::iter::repeat(' ').take(width - current));
    }
    out
}

pub(super) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    let count = display_width(text);
    if count <= max_len {
        return text.to_string();
    }
    if max_len <= 3 {
        return text.chars().take(max_len).collect();
    }
    let mut out: String = text.chars().take(max_len - 3).collect();
    out.push_str("...");
    out
}
