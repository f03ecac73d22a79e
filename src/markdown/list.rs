use regex::Regex;
use std::sync::LazyLock;

use super::parser::parse_line;

static LIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<prefix>\s*(?:(?P<bullet>\*|-|\d+|>)\.? )?)(?P<rest>.*)").unwrap()
});

/// What pressing Enter at the end of a list line should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEdit {
    /// Insert this text at the cursor.
    Insert(String),
    /// Delete from the start of the line to the cursor, ending the list.
    ClearLine,
}

/// Continue a markdown list, carrying the bullet and any TODO marker onto
/// the next line. Numbered bullets count up; an item with no text ends the
/// list instead.
pub fn continue_list(line: &str) -> ListEdit {
    let Some(caps) = LIST_RE.captures(line) else {
        return ListEdit::Insert("\n".to_string());
    };
    let prefix = &caps["prefix"];
    if prefix.is_empty() {
        return ListEdit::Insert("\n".to_string());
    }
    let rest = caps.name("rest").map_or("", |m| m.as_str());
    if rest.is_empty() {
        return ListEdit::ClearLine;
    }

    let mut next_prefix = prefix.to_string();
    if let Some(bullet) = caps.name("bullet")
        && let Ok(number) = bullet.as_str().parse::<u64>()
        && let Some(next) = number.checked_add(1)
    {
        next_prefix = prefix.replacen(bullet.as_str(), &next.to_string(), 1);
    }

    match parse_line(rest) {
        Some(item) if item.text.trim().is_empty() => ListEdit::ClearLine,
        Some(item) => ListEdit::Insert(format!("\n{}{} ", next_prefix, item.todo_prefix)),
        None => ListEdit::Insert(format!("\n{}", next_prefix)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_gets_a_newline() {
        assert_eq!(continue_list("just prose"), ListEdit::Insert("\n".into()));
        assert_eq!(continue_list(""), ListEdit::Insert("\n".into()));
    }

    #[test]
    fn bullets_carry_over() {
        assert_eq!(continue_list("- milk"), ListEdit::Insert("\n- ".into()));
        assert_eq!(continue_list("  * eggs"), ListEdit::Insert("\n  * ".into()));
        assert_eq!(continue_list("> quoted"), ListEdit::Insert("\n> ".into()));
    }

    #[test]
    fn numbers_count_up() {
        assert_eq!(continue_list("1. first"), ListEdit::Insert("\n2. ".into()));
        assert_eq!(continue_list("  9. ninth"), ListEdit::Insert("\n  10. ".into()));
    }

    #[test]
    fn todo_markers_carry_over() {
        assert_eq!(
            continue_list("- [ ] buy milk"),
            ListEdit::Insert("\n- [ ] ".into())
        );
        assert_eq!(
            continue_list("3. TODO: <CW5> file taxes"),
            ListEdit::Insert("\n4. TODO: ".into())
        );
    }

    #[test]
    fn empty_items_end_the_list() {
        assert_eq!(continue_list("- "), ListEdit::ClearLine);
        assert_eq!(continue_list("- [ ] "), ListEdit::ClearLine);
        assert_eq!(continue_list("- WIP:"), ListEdit::ClearLine);
    }
}
