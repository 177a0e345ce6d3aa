use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;
use crate::term::Term;
use crate::util::Code;

const PRIMITIVES: &str = "abcdefgh";

static VARIABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());
static ANNOTATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Parse a source string into a [`Term`].
///
/// ```
/// use catenate::parse;
/// let term = parse("[foo] a").unwrap();
/// assert_eq!(term.to_string(), "[foo] a");
/// ```
pub fn parse(src: &str) -> Result<Term, ParseError> {
    let code = Code::new(src.as_bytes());
    let mut stack: Vec<Vec<Term>> = Vec::new();
    let mut build: Vec<Term> = Vec::new();

    for (start, token) in tokenize(src) {
        match token {
            "[" => {
                stack.push(build);
                build = Vec::new();
            }
            "]" => {
                let value = Term::from_array(build).quote();
                build = stack
                    .pop()
                    .ok_or_else(|| ParseError::unbalanced_brackets(&code, start))?;
                build.push(value);
            }
            primitive if primitive.len() == 1 && PRIMITIVES.contains(primitive) => {
                build.push(Term::constant(primitive.chars().next().unwrap()));
            }
            variable if VARIABLE.is_match(variable) => {
                build.push(Term::variable(variable));
            }
            annotate if ANNOTATE.is_match(annotate) => {
                build.push(Term::annotate(&annotate[1..]));
            }
            unknown => return Err(ParseError::unknown_token(&code, start, unknown)),
        }
    }

    // An unmatched opening `[` is accepted silently: the partial sequences
    // still on `stack` are simply discarded, matching the source behavior.
    Ok(Term::from_array(build))
}

/// Tokenize `src`: `[` and `]` are always their own token, runs of any other
/// non-whitespace characters form one token, and whitespace (space, tab,
/// `\r`, `\n`, treated identically) separates tokens and is itself skipped.
/// Yields each token alongside its starting byte offset.
fn tokenize(src: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (i, c) in src.char_indices() {
        if c == '[' || c == ']' {
            if let Some(s) = start.take() {
                tokens.push((s, &src[s..i]));
            }
            tokens.push((i, &src[i..i + c.len_utf8()]));
        } else if c.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push((s, &src[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push((s, &src[s..]));
    }
    tokens
}
