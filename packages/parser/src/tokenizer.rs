use logos::{Lexer, Logos};
use std::fmt;

/// Token types for serialized markup
///
/// Start tags are lexed as a single token including their attributes, so
/// that a `>` inside a quoted attribute value never terminates the tag.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    #[regex(r"<![dD][oO][cC][tT][yY][pP][eE][^>]*>", |lex| lex.slice())]
    Doctype(&'src str),

    /// Comment body, without the `<!--` / `-->` delimiters
    #[token("<!--", lex_comment)]
    Comment(&'src str),

    /// Full start tag, e.g. `<a href="/x">`
    #[regex(r"<[a-zA-Z][a-zA-Z0-9:_.-]*", lex_start_tag)]
    StartTag(&'src str),

    /// Full end tag, e.g. `</a>`
    #[regex(r"</[a-zA-Z][a-zA-Z0-9:_.-]*[ \t\r\n\f]*>", |lex| lex.slice())]
    EndTag(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    /// A `<` that does not open a tag or comment; kept as text
    #[token("<", |lex| lex.slice())]
    StrayAngle(&'src str),
}

impl<'src> Token<'src> {
    /// Tag name of a start or end tag, lowercased
    pub fn tag_name(&self) -> Option<String> {
        let raw = match self {
            Token::StartTag(raw) => &raw[1..],
            Token::EndTag(raw) => &raw[2..],
            _ => return None,
        };
        let end = raw
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '.' | '-')))
            .unwrap_or(raw.len());
        Some(raw[..end].to_ascii_lowercase())
    }
}

fn lex_comment<'src>(lex: &mut Lexer<'src, Token<'src>>) -> Option<&'src str> {
    let rest = lex.remainder();
    let end = rest.find("-->")?;
    lex.bump(end + 3);
    Some(&rest[..end])
}

fn lex_start_tag<'src>(lex: &mut Lexer<'src, Token<'src>>) -> Option<&'src str> {
    let len = scan_tag_end(lex.remainder())?;
    lex.bump(len);
    Some(lex.slice())
}

/// Length up to and including the closing `>`, skipping quoted values
fn scan_tag_end(rest: &str) -> Option<usize> {
    let mut quote: Option<u8> = None;

    for (i, byte) in rest.bytes().enumerate() {
        match quote {
            Some(q) if byte == q => quote = None,
            Some(_) => {}
            None => match byte {
                b'"' | b'\'' => quote = Some(byte),
                b'>' => return Some(i + 1),
                _ => {}
            },
        }
    }

    None
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Doctype(s) => write!(f, "doctype {}", s),
            Token::Comment(_) => write!(f, "comment"),
            Token::StartTag(s) => write!(f, "start tag {}", s),
            Token::EndTag(s) => write!(f, "end tag {}", s),
            Token::Text(_) => write!(f, "text"),
            Token::StrayAngle(_) => write!(f, "<"),
        }
    }
}

/// Tokenize a source string, dropping anything the lexer rejects
pub fn tokenize(source: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let lexer = Token::lexer(source);
    lexer
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, span)))
        .collect()
}
