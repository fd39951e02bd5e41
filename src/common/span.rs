use std::fmt;
use std::rc::Rc;

use crate::common::source::Source;

/// A `Span` refers to a section of a `Source`, much like a `&str`,
/// but carrying a reference-counted handle to the `Source` it came
/// from rather than a raw string slice. Used throughout the compiler
/// to annotate where a token, parse-tree node, or runtime fault
/// originated, so diagnostics can point back at the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    source: Option<Rc<Source>>,
    offset: usize,
    length: usize,
}

impl Span {
    pub fn new(source: &Rc<Source>, offset: usize, length: usize) -> Span {
        Span { source: Some(Rc::clone(source)), offset, length }
    }

    /// An empty `Span`, used as a placeholder before two real spans
    /// are known to combine, or for synthesized nodes that don't
    /// correspond to any particular source text.
    pub fn empty() -> Span {
        Span { source: None, offset: 0, length: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_none()
    }

    /// Spans the space between (and including) two spans.
    pub fn combine(a: &Span, b: &Span) -> Span {
        if a.is_empty() {
            return b.clone();
        }
        if b.is_empty() {
            return a.clone();
        }

        let offset = a.offset.min(b.offset);
        let end = (a.offset + a.length).max(b.offset + b.length);
        Span { source: a.source.clone(), offset, length: end - offset }
    }

    /// Fold-left over `Span::combine`.
    pub fn join(spans: &[Span]) -> Span {
        let mut combined = Span::empty();
        for span in spans {
            combined = Span::combine(&combined, span);
        }
        combined
    }

    pub fn contents(&self) -> String {
        match &self.source {
            None => String::new(),
            Some(source) => source.contents[self.offset..self.offset + self.length].to_string(),
        }
    }

    fn line_indices(&self) -> Option<((usize, usize), (usize, usize))> {
        let source = self.source.as_ref()?;
        let start = self.offset;
        let end = (self.offset + self.length).max(self.offset + 1);

        let start_lines: Vec<&str> = source.contents[..start.min(source.contents.len())].lines().collect();
        let end_lines: Vec<&str> = source.contents[..end.min(source.contents.len())].lines().collect();

        let start_line = start_lines.len().saturating_sub(1);
        let end_line = end_lines.len().saturating_sub(1);
        let start_col = start_lines.last().map(|l| l.len()).unwrap_or(0);
        let end_col = end_lines.last().map(|l| l.len()).unwrap_or(0);

        Some(((start_line, start_col), (end_line, end_col)))
    }
}

impl fmt::Display for Span {
    /// Renders the source line(s) a span covers with a caret/underline,
    /// e.g.:
    /// ```plain
    /// Line 1:5
    ///   |
    /// 1 | x = blatant error
    ///   |     ^^^^^
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            None => return Ok(()),
            Some(s) => s,
        };

        let lines: Vec<&str> = source.contents.lines().collect();
        let ((start_line, start_col), (end_line, _end_col)) = match self.line_indices() {
            Some(li) => li,
            None => return Ok(()),
        };

        let readable_line = (start_line + 1).to_string();
        let padding = readable_line.len();

        writeln!(f, "Line {}:{}", readable_line, start_col + 1)?;
        writeln!(f, "{} |", " ".repeat(padding))?;

        if start_line == end_line {
            let line = lines.get(start_line).copied().unwrap_or("");
            writeln!(f, "{} | {}", readable_line, line)?;
            let underline_len = self.length.max(1).min(line.len().saturating_sub(start_col).max(1));
            writeln!(f, "{} | {}{}", " ".repeat(padding), " ".repeat(start_col), "^".repeat(underline_len))
        } else {
            for (i, line) in lines[start_line..=end_line.min(lines.len().saturating_sub(1))].iter().enumerate() {
                writeln!(f, "{} | > {}", start_line + i + 1, line)?;
            }
            Ok(())
        }
    }
}

/// Wraps a value with the `Span` it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<T> {
    pub item: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(item: T, span: Span) -> Spanned<T> {
        Spanned { item, span }
    }
}
