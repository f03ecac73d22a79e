use thiserror::Error;

use crate::core::transition::Transition;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("line {line} is out of range (document has {count} lines)")]
    LineOutOfRange { line: usize, count: usize },
}

/// Line `line` (1-based) without its line ending.
pub fn line_at(content: &str, line: usize) -> Result<&str, EditError> {
    line.checked_sub(1)
        .and_then(|index| content.lines().nth(index))
        .ok_or(EditError::LineOutOfRange {
            line,
            count: content.lines().count(),
        })
}

/// Apply `transition` to a single line (1-based), leaving every other line
/// and all line endings untouched.
pub fn rewrite_line(content: &str, line: usize, transition: Transition) -> Result<String, EditError> {
    let count = content.lines().count();
    if line == 0 || line > count {
        return Err(EditError::LineOutOfRange { line, count });
    }

    let mut out = String::with_capacity(content.len());
    for (index, chunk) in content.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            out.push_str(&transition.apply(chunk));
        } else {
            out.push_str(chunk);
        }
    }
    Ok(out)
}
