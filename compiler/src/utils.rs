use crate::{error::SpecError, tokenizer::Line};

pub fn quote(text: &str) -> String {
    format!("{:?}", text)
}

/// Builds a `SpecError::Grammar` pointing at `line`.
pub fn grammar_error(msg: &str, line: &Line) -> SpecError {
    SpecError::Grammar {
        msg:  msg.to_string(),
        line: line.number,
        text: line.text.to_string(),
    }
}
