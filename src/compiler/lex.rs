use std::rc::Rc;

use crate::common::source::Source;
use crate::common::span::{Span, Spanned};
use crate::compiler::syntax::CompileError;
use crate::compiler::token::{Kind, Token, KEYWORDS};

const PUNCTUATION: &str = "();,";
const OPERATOR_CHARS: &str = "+-*<>&.@/:=~|$!#%^_[]{}\"'?";

/// Turns a `Source` into the token stream the parser consumes. Lexing
/// is out of the interpreter's algorithmic core (spec.md §1), so this
/// stays a simple greedy, longest-match-per-class scanner: whitespace
/// and `//` line comments are skipped, then the next token is
/// classified by its first character, mirroring the "check each rule,
/// take the matching one" style the reference lexer uses.
pub struct Lexer {
    source: Rc<Source>,
    offset: usize,
}

pub fn lex(source: Rc<Source>) -> Result<Vec<Spanned<Token>>, CompileError> {
    Lexer::new(source).run()
}

impl Lexer {
    pub fn new(source: Rc<Source>) -> Lexer {
        Lexer { source, offset: 0 }
    }

    fn remaining(&self) -> &str {
        &self.source.contents[self.offset..]
    }

    fn run(mut self) -> Result<Vec<Spanned<Token>>, CompileError> {
        let mut tokens = vec![];

        loop {
            self.skip_whitespace_and_comments();
            if self.remaining().is_empty() {
                tokens.push(Spanned::new(Token::end(), Span::new(&self.source, self.offset, 0)));
                break;
            }

            let start = self.offset;
            let token = self.next_token()?;
            let span = Span::new(&self.source, start, self.offset - start);
            tokens.push(Spanned::new(token, span));
        }

        Ok(tokens)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            let rest = self.remaining();
            let ws: usize = rest.chars().take_while(|c| c.is_whitespace()).map(|c| c.len_utf8()).sum();
            self.offset += ws;

            if self.remaining().starts_with("//") {
                let eaten: usize = self.remaining().chars().take_while(|&c| c != '\n').map(|c| c.len_utf8()).sum();
                self.offset += eaten;
                continue;
            }
            break;
        }
    }

    fn next_token(&mut self) -> Result<Token, CompileError> {
        let c = self.remaining().chars().next().expect("next_token called at end of input");

        if c == '\'' {
            return self.string();
        }
        if c.is_ascii_digit() {
            return Ok(self.integer());
        }
        if c.is_alphabetic() || c == '_' {
            return Ok(self.identifier());
        }
        if PUNCTUATION.contains(c) {
            self.offset += c.len_utf8();
            return Ok(Token::new(Kind::Punctuation, c.to_string()));
        }
        if OPERATOR_CHARS.contains(c) {
            return Ok(self.operator());
        }

        Err(CompileError::lexical(
            format!("Unexpected character '{}'", c),
            Span::new(&self.source, self.offset, c.len_utf8()),
        ))
    }

    fn integer(&mut self) -> Token {
        let len: usize = self.remaining().chars().take_while(|c| c.is_ascii_digit()).count();
        let lexeme = self.remaining()[..len].to_string();
        self.offset += len;
        Token::new(Kind::Integer, lexeme)
    }

    fn identifier(&mut self) -> Token {
        let len: usize = self
            .remaining()
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .map(|c| c.len_utf8())
            .sum();
        let lexeme = self.remaining()[..len].to_string();
        self.offset += len;

        if KEYWORDS.contains(&lexeme.as_str()) {
            Token::new(Kind::Keyword, lexeme)
        } else {
            Token::new(Kind::Identifier, lexeme)
        }
    }

    fn operator(&mut self) -> Token {
        let len: usize = self
            .remaining()
            .chars()
            .take_while(|c| OPERATOR_CHARS.contains(*c))
            .map(|c| c.len_utf8())
            .sum();
        let lexeme = self.remaining()[..len].to_string();
        self.offset += len;
        Token::new(Kind::Operator, lexeme)
    }

    fn string(&mut self) -> Result<Token, CompileError> {
        let start = self.offset;
        let mut lexeme = String::from("'");
        self.offset += 1; // opening quote

        loop {
            let c = match self.remaining().chars().next() {
                Some(c) => c,
                None => {
                    return Err(CompileError::lexical(
                        "Unexpected end of input while lexing a string literal".to_string(),
                        Span::new(&self.source, start, self.offset - start),
                    ))
                }
            };

            if c == '\\' {
                let escaped = self.remaining().chars().nth(1).ok_or_else(|| {
                    CompileError::lexical(
                        "Unexpected end of input after escape character".to_string(),
                        Span::new(&self.source, self.offset, 1),
                    )
                })?;
                if !matches!(escaped, 'n' | 't' | '\\' | '\'' | '"') {
                    return Err(CompileError::lexical(
                        format!("Unknown escape code '\\{}'", escaped),
                        Span::new(&self.source, self.offset, 2),
                    ));
                }
                lexeme.push(c);
                lexeme.push(escaped);
                self.offset += 2;
                continue;
            }

            lexeme.push(c);
            self.offset += c.len_utf8();

            if c == '\'' {
                return Ok(Token::new(Kind::Str, lexeme));
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(src: &str) -> Vec<Kind> {
        lex(Rc::new(Source::source(src))).unwrap().into_iter().map(|t| t.item.kind).collect()
    }

    fn lexemes(src: &str) -> Vec<String> {
        lex(Rc::new(Source::source(src))).unwrap().into_iter().map(|t| t.item.lexeme).collect()
    }

    #[test]
    fn lex_empty() {
        assert_eq!(kinds(""), vec![Kind::End]);
    }

    #[test]
    fn lex_let_binding() {
        assert_eq!(
            lexemes("let x = 5 in x"),
            vec!["let", "x", "=", "5", "in", "x", ""],
        );
    }

    #[test]
    fn lex_string_escape() {
        let toks = lex(Rc::new(Source::source(r"'a\nb'"))).unwrap();
        assert_eq!(toks[0].item.lexeme, r"'a\nb'");
    }

    #[test]
    fn lex_comment_is_skipped() {
        assert_eq!(kinds("x // a comment\n"), vec![Kind::Identifier, Kind::End]);
    }

    #[test]
    fn lex_arrow_and_double_star() {
        assert_eq!(lexemes("-> **"), vec!["->", "**", ""]);
    }

    #[test]
    fn unexpected_character_is_an_error() {
        assert!(lex(Rc::new(Source::source("x ` y"))).is_err());
    }
}
