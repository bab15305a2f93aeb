use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::Token;
use logos::{Lexer, Logos};

/// Deepest element nesting accepted before parsing fails
pub const MAX_DEPTH: usize = 512;

/// Tree builder for serialized markup
///
/// Works over a single token stream with a stack of open elements. Raw-text
/// elements (`<script>`, `<style>`, ...) are read straight from the lexer's
/// remainder so their bodies are never tokenized as markup.
pub struct Parser<'src> {
    lexer: Lexer<'src, Token<'src>>,
    open: Vec<Element>,
    document: Document,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Token::lexer(source),
            open: Vec::new(),
            document: Document::new(),
        }
    }

    /// Parse a complete document
    pub fn parse_document(mut self) -> ParseResult<Document> {
        while let Some(result) = self.lexer.next() {
            let span = self.lexer.span();
            let token = match result {
                Ok(token) => token,
                Err(()) => {
                    return Err(if self.lexer.slice().starts_with("<!--") {
                        ParseError::unterminated_comment(span.start)
                    } else {
                        ParseError::unterminated_tag(span.start)
                    });
                }
            };

            match token {
                Token::Doctype(raw) => {
                    if self.open.is_empty() && self.document.doctype.is_none() {
                        self.document.doctype = Some(raw.to_string());
                    }
                }
                Token::Comment(body) => self.append(Node::comment(body)),
                Token::StartTag(raw) => self.open_element(raw, span.start)?,
                Token::EndTag(_) => {
                    if let Some(name) = token.tag_name() {
                        self.close_element(&name);
                    }
                }
                Token::Text(text) | Token::StrayAngle(text) => self.append_text(text),
            }
        }

        while !self.open.is_empty() {
            self.pop_open();
        }

        Ok(self.document)
    }

    fn open_element(&mut self, raw: &'src str, pos: usize) -> ParseResult<()> {
        let (mut element, self_closing) = parse_start_tag(raw);
        element.self_closing = self_closing;

        while let Some(current) = self.open.last() {
            if implicitly_closes(&current.tag, &element.tag) {
                self.pop_open();
            } else {
                break;
            }
        }

        if element.is_void() || self_closing {
            self.append(Node::Element(element));
            return Ok(());
        }

        if self.open.len() >= MAX_DEPTH {
            return Err(ParseError::nesting_too_deep(pos, MAX_DEPTH));
        }

        if is_raw_text(&element.tag) {
            let body = self.take_raw_text(&element.tag);
            if !body.is_empty() {
                element.children.push(Node::text(body));
            }
            self.append(Node::Element(element));
            return Ok(());
        }

        self.open.push(element);
        Ok(())
    }

    /// Consume input up to and including `</tag>`, returning the body
    fn take_raw_text(&mut self, tag: &str) -> &'src str {
        let rest = self.lexer.remainder();
        let needle = format!("</{}", tag);
        let lower = rest.to_ascii_lowercase();

        match lower.find(&needle) {
            Some(body_end) => {
                let close_end = rest[body_end..]
                    .find('>')
                    .map(|i| body_end + i + 1)
                    .unwrap_or(rest.len());
                self.lexer.bump(close_end);
                &rest[..body_end]
            }
            None => {
                self.lexer.bump(rest.len());
                rest
            }
        }
    }

    fn close_element(&mut self, name: &str) {
        // Stray end tags with no open match are dropped
        if let Some(index) = self.open.iter().rposition(|el| el.tag == name) {
            while self.open.len() > index {
                self.pop_open();
            }
        }
    }

    fn pop_open(&mut self) {
        if let Some(element) = self.open.pop() {
            self.append(Node::Element(element));
        }
    }

    fn children_mut(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.document.children,
        }
    }

    fn append(&mut self, node: Node) {
        self.children_mut().push(node);
    }

    fn append_text(&mut self, text: &str) {
        let children = self.children_mut();
        if let Some(Node::Text { content }) = children.last_mut() {
            content.push_str(text);
        } else {
            children.push(Node::text(text));
        }
    }
}

/// Whether opening `incoming` implicitly ends the open `current` element
fn implicitly_closes(current: &str, incoming: &str) -> bool {
    match current {
        "li" => incoming == "li",
        "dt" | "dd" => matches!(incoming, "dt" | "dd"),
        "option" => matches!(incoming, "option" | "optgroup"),
        "tr" => incoming == "tr",
        "td" | "th" => matches!(incoming, "td" | "th" | "tr"),
        "p" => matches!(
            incoming,
            "p" | "div"
                | "section"
                | "article"
                | "header"
                | "footer"
                | "nav"
                | "aside"
                | "main"
                | "ul"
                | "ol"
                | "table"
                | "form"
                | "figure"
                | "blockquote"
                | "pre"
                | "h1"
                | "h2"
                | "h3"
                | "h4"
                | "h5"
                | "h6"
        ),
        _ => false,
    }
}

/// Split a raw start tag into an element and its self-closing flag
fn parse_start_tag(raw: &str) -> (Element, bool) {
    let inner = raw
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(raw);

    let name_end = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '.' | '-')))
        .unwrap_or(inner.len());
    let mut element = Element::new(&inner[..name_end]);

    let (attributes, self_closing) = parse_attributes(&inner[name_end..]);
    element.attributes = attributes;
    (element, self_closing)
}

/// Attributes of a start tag, and whether it ends in a standalone `/`.
///
/// A slash inside an unquoted value (`href=/docs/`) belongs to the value.
fn parse_attributes(source: &str) -> (Vec<Attribute>, bool) {
    let bytes = source.as_bytes();
    let mut attributes = Vec::new();
    let mut self_closing = false;
    let mut i = 0;

    let skip_ws = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    };

    loop {
        i = skip_ws(i);
        if i >= bytes.len() {
            break;
        }

        if bytes[i] == b'/' || bytes[i] == b'=' {
            self_closing = bytes[i] == b'/';
            i += 1;
            continue;
        }
        self_closing = false;

        let name_start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'/') {
            i += 1;
        }
        let name = source[name_start..i].to_ascii_lowercase();

        let after_name = skip_ws(i);
        let value = if after_name < bytes.len() && bytes[after_name] == b'=' {
            let value_start = skip_ws(after_name + 1);
            match bytes.get(value_start) {
                Some(&quote) if quote == b'"' || quote == b'\'' => {
                    let body_start = value_start + 1;
                    let body_end = source[body_start..]
                        .find(quote as char)
                        .map(|offset| body_start + offset)
                        .unwrap_or(bytes.len());
                    i = (body_end + 1).min(bytes.len());
                    Some(source[body_start..body_end].to_string())
                }
                Some(_) => {
                    let mut end = value_start;
                    while end < bytes.len() && !bytes[end].is_ascii_whitespace() {
                        end += 1;
                    }
                    i = end;
                    Some(source[value_start..end].to_string())
                }
                None => {
                    i = value_start;
                    Some(String::new())
                }
            }
        } else {
            None
        };

        attributes.push(Attribute { name, value });
    }

    (attributes, self_closing)
}

/// Parse a complete document
pub fn parse(source: &str) -> ParseResult<Document> {
    Parser::new(source).parse_document()
}

/// Parse a markup fragment into its top-level nodes, trimming blank text at
/// either end.
pub fn parse_fragment(source: &str) -> ParseResult<Vec<Node>> {
    let mut nodes = parse(source)?.children;

    while nodes.first().is_some_and(Node::is_blank) {
        nodes.remove(0);
    }
    while nodes.last().is_some_and(Node::is_blank) {
        nodes.pop();
    }

    Ok(nodes)
}
