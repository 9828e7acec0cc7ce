//! Character-cell text measurement. One char is one layout unit wide.

/// Width of `s` in layout units.
pub fn width(s: &str) -> usize {
    s.chars().count()
}

/// Greedy word wrap to at most `max` units per line.
///
/// Words longer than `max` are split. Whitespace runs collapse to a single
/// space; an empty or all-whitespace input yields no lines.
pub fn wrap(text: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let gap = usize::from(line_width > 0);
            if line_width + gap + word.len() <= max {
                if gap == 1 {
                    line.push(' ');
                }
                line.extend(word.iter());
                line_width += gap + word.len();
                break;
            }
            if line_width > 0 {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
                continue;
            }
            // Word alone is wider than a line: hard split.
            let rest = word.split_off(max);
            lines.push(word.into_iter().collect());
            word = rest;
        }
    }
    if line_width > 0 {
        lines.push(line);
    }
    lines
}

/// Cut `s` to `max` units, marking the cut with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if width(s) <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap("Aspiring Cloud & DevOps Engineer", 14);
        assert_eq!(lines, vec!["Aspiring Cloud", "& DevOps", "Engineer"]);
        assert!(lines.iter().all(|l| width(l) <= 14));
    }

    #[test]
    fn splits_overlong_words() {
        assert_eq!(wrap("abcdefgh ij", 3), vec!["abc", "def", "gh", "ij"]);
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(wrap("", 10).is_empty());
        assert!(wrap("   \n ", 10).is_empty());
    }

    #[test]
    fn truncate_marks_the_cut() {
        assert_eq!(truncate("Projects", 8), "Projects");
        assert_eq!(truncate("Projects", 5), "Proj…");
        assert_eq!(truncate("Projects", 0), "");
    }
}
