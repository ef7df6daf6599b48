use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Fit `s` into exactly `width` display columns: right-pad when short, cut
/// and end with ".." when long. Column math uses display width so entry and
/// folder names in CJK or emoji still line up.
pub(crate) fn fit_width(s: &str, width: usize) -> String {
    let sw = UnicodeWidthStr::width(s);
    if sw <= width {
        return format!("{s}{}", " ".repeat(width - sw));
    }

    let budget = width.saturating_sub(2);
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        out.push(ch);
    }
    if width >= 2 {
        out.push_str("..");
        used += 2;
    }
    // A wide char that did not fit leaves a one-column gap.
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
