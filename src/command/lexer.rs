use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A bare word: command names, keywords, identifiers, unquoted literals.
    Word(String),
    /// A word that was fully or partly quoted. Always a string literal.
    Quoted(String),

    // Punctuation
    Comma,
    Eq,
    LParen,
    RParen,

    // Special
    Eof,
}

impl TokenKind {
    pub fn is_word(&self, keyword: &str) -> bool {
        matches!(self, TokenKind::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, position: usize) -> Self {
        Self { kind, position }
    }
}

/// Splits a command line into shell-like words.
///
/// Whitespace separates words; single or double quotes embed spaces; a
/// backslash escapes the next character outside single quotes. `,`, `=`, `(`
/// and `)` are tokens of their own unless quoted.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, String> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, String> {
        self.skip_whitespace();

        let position = self.position;

        match self.peek() {
            None => Ok(Token::new(TokenKind::Eof, position)),
            Some(',') => {
                self.advance();
                Ok(Token::new(TokenKind::Comma, position))
            }
            Some('=') => {
                self.advance();
                Ok(Token::new(TokenKind::Eq, position))
            }
            Some('(') => {
                self.advance();
                Ok(Token::new(TokenKind::LParen, position))
            }
            Some(')') => {
                self.advance();
                Ok(Token::new(TokenKind::RParen, position))
            }
            Some(_) => self.read_word(),
        }
    }

    fn read_word(&mut self) -> Result<Token, String> {
        let position = self.position;
        let mut value = String::new();
        let mut quoted = false;

        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() || is_punctuation(c) => break,
                '\'' | '"' => {
                    quoted = true;
                    self.read_quoted(c, &mut value)?;
                }
                '\\' => {
                    self.advance();
                    match self.advance() {
                        Some(escaped) => value.push(escaped),
                        None => return Err("No character to escape after '\\'".to_string()),
                    }
                }
                c => {
                    self.advance();
                    value.push(c);
                }
            }
        }

        let kind = if quoted {
            TokenKind::Quoted(value)
        } else {
            TokenKind::Word(value)
        };
        Ok(Token::new(kind, position))
    }

    fn read_quoted(&mut self, quote: char, value: &mut String) -> Result<(), String> {
        let start = self.position;
        self.advance(); // opening quote

        loop {
            match self.advance() {
                None => {
                    return Err(format!(
                        "No closing quotation for {} at position {}",
                        quote, start
                    ))
                }
                Some(c) if c == quote => return Ok(()),
                Some('\\') if quote == '"' => match self.peek() {
                    Some(next @ ('"' | '\\')) => {
                        self.advance();
                        value.push(next);
                    }
                    _ => value.push('\\'),
                },
                Some(c) => value.push(c),
            }
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }
}

fn is_punctuation(c: char) -> bool {
    matches!(c, ',' | '=' | '(' | ')')
}
