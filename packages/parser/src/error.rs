use std::ops::Range;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unterminated tag at {pos}")]
    UnterminatedTag { pos: usize },

    #[error("Unterminated comment at {pos}")]
    UnterminatedComment { pos: usize },

    #[error("Nesting deeper than {limit} elements at {pos}")]
    NestingTooDeep { pos: usize, limit: usize },
}

impl ParseError {
    pub fn unterminated_tag(pos: usize) -> Self {
        Self::UnterminatedTag { pos }
    }

    pub fn unterminated_comment(pos: usize) -> Self {
        Self::UnterminatedComment { pos }
    }

    pub fn nesting_too_deep(pos: usize, limit: usize) -> Self {
        Self::NestingTooDeep { pos, limit }
    }

    pub fn pos(&self) -> usize {
        match self {
            ParseError::UnterminatedTag { pos }
            | ParseError::UnterminatedComment { pos }
            | ParseError::NestingTooDeep { pos, .. } => *pos,
        }
    }

    /// Source range to highlight: from the error position to the end of its line.
    pub fn span(&self, source: &str) -> Range<usize> {
        let start = self.pos().min(source.len());
        let end = source[start..]
            .find('\n')
            .map(|offset| start + offset)
            .unwrap_or(source.len());
        if end > start {
            start..end
        } else {
            start..(start + 1).min(source.len())
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ParseError::UnterminatedTag { .. } => "tag is never closed with '>'",
            ParseError::UnterminatedComment { .. } => "comment is never closed with '-->'",
            ParseError::NestingTooDeep { .. } => "element opened here exceeds the nesting limit",
        }
    }

    /// Pretty-print the error with source context using ariadne
    #[cfg(feature = "pretty-errors")]
    pub fn report(&self, source: &str, filename: &str) -> String {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        let span = self.span(source);
        let mut output = Vec::new();

        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_color(Color::Red)
                    .with_message(self.label()),
            )
            .finish()
            .write((filename, Source::from(source)), &mut output);

        match written {
            Ok(()) => String::from_utf8(output).unwrap_or_else(|_| self.to_string()),
            Err(_) => self.to_string(),
        }
    }

    #[cfg(not(feature = "pretty-errors"))]
    pub fn report(&self, _source: &str, filename: &str) -> String {
        format!("{}: {} ({})", filename, self, self.label())
    }
}
