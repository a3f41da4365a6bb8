use crate::{error::SpecError, utils::grammar_error};

/// Spaces per indentation level.
pub const INDENT_UNIT: usize = 2;
pub const COMMENT_MARKER: &str = "//";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Header,
    Continuation,
    Blank,
    Comment,
}

/// One structural line. `text` has indentation and trailing whitespace removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Line<'a> {
    pub number: usize,
    pub depth:  usize,
    pub kind:   LineKind,
    pub text:   &'a str,
}

/// Lazy sequence of structural lines. Blank and comment lines are skipped.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    source:     std::iter::Enumerate<std::str::Lines<'a>>,
    prev_depth: usize,
    done:       bool,
}

pub fn tokenize(text: &str) -> Lines<'_> {
    Lines {
        source:     text.lines().enumerate(),
        prev_depth: 0,
        done:       false,
    }
}

/// Classifies a raw line without looking at its neighbours.
pub fn classify(raw: &str) -> LineKind {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        LineKind::Blank
    } else if trimmed.starts_with(COMMENT_MARKER) {
        LineKind::Comment
    } else if raw.starts_with(char::is_whitespace) {
        LineKind::Continuation
    } else {
        LineKind::Header
    }
}

fn scan_line<'a>(number: usize, raw: &'a str, prev_depth: usize) -> Result<Line<'a>, SpecError> {
    let text   = raw.trim();
    let indent = &raw[..raw.len() - raw.trim_start().len()];
    let line = Line {
        number,
        depth: 0,
        kind: classify(raw),
        text,
    };

    if indent.contains('\t') {
        return Err(grammar_error("Tabs are not allowed in indentation", &line));
    }
    if indent.chars().any(|c| c != ' ') {
        return Err(grammar_error("Only spaces are allowed in indentation", &line));
    }
    if indent.len() % INDENT_UNIT != 0 {
        return Err(grammar_error(
            &format!("Indentation must be a multiple of {} spaces", INDENT_UNIT),
            &line,
        ));
    }

    let depth = indent.len() / INDENT_UNIT;
    if depth > prev_depth + 1 {
        return Err(grammar_error("Indentation jumps more than one level", &line));
    }

    Ok(Line { depth, ..line })
}

impl<'a> Iterator for Lines<'a> {
    type Item = Result<Line<'a>, SpecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        for (index, raw) in self.source.by_ref() {
            match classify(raw) {
                LineKind::Blank | LineKind::Comment => continue,
                _ => {}
            }

            return match scan_line(index + 1, raw, self.prev_depth) {
                Ok(line) => {
                    self.prev_depth = line.depth;
                    Some(Ok(line))
                }
                Err(err) => {
                    self.done = true;
                    Some(Err(err))
                }
            };
        }

        self.done = true;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Result<Vec<Line<'_>>, SpecError> {
        tokenize(input).collect()
    }

    #[test]
    fn test_tokenize_simple() {
        let input = "User:\n  id*: integer\n";
        let expected = vec![
            Line { number: 1, depth: 0, kind: LineKind::Header,       text: "User:" },
            Line { number: 2, depth: 1, kind: LineKind::Continuation, text: "id*: integer" },
        ];
        assert_eq!(collect(input).unwrap(), expected);
    }

    #[test]
    fn test_tokenize_drops_blank_and_comment_lines() {
        let input = "// models\n\nUser:\n    \n  // the email\n  email: string   \n";
        let got = collect(input).unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].number, 3);
        assert_eq!(got[1].number, 6);
        assert_eq!(got[1].text, "email: string");
    }

    #[test]
    fn test_tokenize_handles_crlf() {
        let got = collect("User:\r\n  id: integer\r\n").unwrap();
        assert_eq!(got[1].text, "id: integer");
        assert_eq!(got[1].depth, 1);
    }

    #[test]
    fn test_tokenize_odd_indentation() {
        let err = collect("User:\n   id: integer\n").unwrap_err();
        assert!(
            matches!(err, SpecError::Grammar { line: 2, .. }),
            "expected a Grammar error on line 2 but got {:?}",
            err
        );
    }

    #[test]
    fn test_tokenize_indentation_jump() {
        let err = collect("User:\n    id: integer\n").unwrap_err();
        assert!(matches!(err, SpecError::Grammar { line: 2, .. }));
    }

    #[test]
    fn test_tokenize_rejects_tabs() {
        let err = collect("User:\n\tid: integer\n").unwrap_err();
        assert!(matches!(err, SpecError::Grammar { line: 2, .. }));
    }

    #[test]
    fn test_tokenize_rejects_other_whitespace() {
        for input in ["User:\n\u{a0}a: string\n", "User:\n\x0c\x0ca: string\n", "User:\n \u{2003}a: string\n"] {
            let err = collect(input).unwrap_err();
            assert!(
                matches!(err, SpecError::Grammar { line: 2, .. }),
                "expected a Grammar error on line 2 but got {:?}",
                err
            );
        }
    }

    #[test]
    fn test_tokenize_is_fused_after_error() {
        let mut lines = tokenize("A:\n     x: string\nB:\n");
        assert!(lines.next().unwrap().is_ok());
        assert!(lines.next().unwrap().is_err());
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_tokenize_clone_restarts_from_same_point() {
        let mut lines = tokenize("A:\nB:\nC:\n");
        lines.next();
        let rest: Vec<_> = lines.clone().map(|l| l.unwrap().text).collect();
        assert_eq!(rest, vec!["B:", "C:"]);
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(""), LineKind::Blank);
        assert_eq!(classify("   "), LineKind::Blank);
        assert_eq!(classify("  // note"), LineKind::Comment);
        assert_eq!(classify("GET /users"), LineKind::Header);
        assert_eq!(classify("  => User"), LineKind::Continuation);
    }
}
