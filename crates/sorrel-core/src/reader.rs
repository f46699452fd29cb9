use std::collections::{BTreeMap, BTreeSet};

use im::Vector;

use crate::ast::{Value, CHARACTER_NAMES};
use crate::error::SorrelError;

/// Zero-based source position. Diagnostics print it one-based.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    QuotedString,
    Int,
    Float,
    Char,
    Keyword,
    Symbol,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Hash,
    Quote,
}

/// One lexeme plus its kind and the position of its first character.
/// String tokens hold the decoded content; character tokens hold the
/// resolved character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub lexeme: String,
    pub kind: TokenKind,
    pub span: Span,
}

pub struct Tokenizer {
    chars: Vec<char>,
    index: usize,
    line: usize,
    col: usize,
}

impl Tokenizer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            index: 0,
            line: 0,
            col: 0,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, SorrelError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    pub fn next_token(&mut self) -> Result<Option<Token>, SorrelError> {
        self.skip_ws_and_comments();
        if self.eof() {
            return Ok(None);
        }
        let span = self.current_span();
        let token = match self.current_char() {
            '(' => self.single_char_token(TokenKind::OpenParen, span),
            ')' => self.single_char_token(TokenKind::CloseParen, span),
            '[' => self.single_char_token(TokenKind::OpenBracket, span),
            ']' => self.single_char_token(TokenKind::CloseBracket, span),
            '{' => self.single_char_token(TokenKind::OpenBrace, span),
            '}' => self.single_char_token(TokenKind::CloseBrace, span),
            '\'' => self.single_char_token(TokenKind::Quote, span),
            '#' => self.single_char_token(TokenKind::Hash, span),
            '"' => self.read_string(span)?,
            '\\' => self.read_character(span)?,
            ':' => self.read_keyword(span),
            _ => self.read_word(span)?,
        };
        Ok(Some(token))
    }

    fn single_char_token(&mut self, kind: TokenKind, span: Span) -> Token {
        let lexeme = self.current_char().to_string();
        self.advance();
        Token { lexeme, kind, span }
    }

    fn read_string(&mut self, start: Span) -> Result<Token, SorrelError> {
        self.advance(); // "
        let mut buf = String::new();
        while !self.eof() {
            match self.current_char() {
                '"' => {
                    self.advance();
                    return Ok(Token {
                        lexeme: buf,
                        kind: TokenKind::QuotedString,
                        span: start,
                    });
                }
                '\\' => {
                    let escape_span = self.current_span();
                    self.advance();
                    if self.eof() {
                        break;
                    }
                    let esc = self.current_char();
                    let decoded = match esc {
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        '"' => '"',
                        '\\' => '\\',
                        other => {
                            return self.lex_err(
                                escape_span,
                                format!("invalid escape '\\{}'", other),
                            )
                        }
                    };
                    buf.push(decoded);
                    self.advance();
                }
                ch => {
                    buf.push(ch);
                    self.advance();
                }
            }
        }
        self.lex_err(start, "unterminated string")
    }

    fn read_character(&mut self, start: Span) -> Result<Token, SorrelError> {
        self.advance(); // \
        let name = self.read_run();
        if name.is_empty() {
            return self.lex_err(start, "expected a character after '\\'");
        }
        let mut chars = name.chars();
        let first = chars.next().unwrap_or('\0');
        let resolved = if chars.next().is_none() {
            first
        } else {
            match CHARACTER_NAMES.iter().find(|(_, n)| *n == name) {
                Some((ch, _)) => *ch,
                None => {
                    return self.lex_err(start, format!("unknown character name '\\{}'", name))
                }
            }
        };
        Ok(Token {
            lexeme: resolved.to_string(),
            kind: TokenKind::Char,
            span: start,
        })
    }

    fn read_keyword(&mut self, start: Span) -> Token {
        self.advance(); // :
        let name = self.read_run();
        if name.is_empty() {
            // A lone ':' is a maximal non-delimiter run, hence a symbol.
            return Token {
                lexeme: ":".to_string(),
                kind: TokenKind::Symbol,
                span: start,
            };
        }
        Token {
            lexeme: name,
            kind: TokenKind::Keyword,
            span: start,
        }
    }

    fn read_word(&mut self, start: Span) -> Result<Token, SorrelError> {
        let run = self.read_run();
        if !looks_like_number(&run) {
            return Ok(Token {
                lexeme: run,
                kind: TokenKind::Symbol,
                span: start,
            });
        }
        if run.contains('.') {
            if run.parse::<f64>().is_err() {
                return self.lex_err(start, format!("bad number literal '{}'", run));
            }
            Ok(Token {
                lexeme: run,
                kind: TokenKind::Float,
                span: start,
            })
        } else {
            if run.parse::<i64>().is_err() {
                return self.lex_err(start, format!("bad number literal '{}'", run));
            }
            Ok(Token {
                lexeme: run,
                kind: TokenKind::Int,
                span: start,
            })
        }
    }

    fn read_run(&mut self) -> String {
        let mut buf = String::new();
        while !self.eof() {
            let ch = self.current_char();
            if is_delimiter(ch) {
                break;
            }
            buf.push(ch);
            self.advance();
        }
        buf
    }

    fn skip_ws_and_comments(&mut self) {
        loop {
            while !self.eof() && is_ws_or_comma(self.current_char()) {
                self.advance();
            }
            if self.eof() || self.current_char() != ';' {
                break;
            }
            while !self.eof() && self.current_char() != '\n' {
                self.advance();
            }
        }
    }

    fn current_char(&self) -> char {
        self.chars.get(self.index).copied().unwrap_or('\0')
    }

    fn advance(&mut self) {
        if let Some(&ch) = self.chars.get(self.index) {
            self.index += 1;
            if ch == '\n' {
                self.line += 1;
                self.col = 0;
            } else {
                self.col += 1;
            }
        }
    }

    fn eof(&self) -> bool {
        self.index >= self.chars.len()
    }

    fn current_span(&self) -> Span {
        Span {
            line: self.line,
            col: self.col,
        }
    }

    fn end_span(&self) -> Span {
        self.current_span()
    }

    fn lex_err<T>(&self, span: Span, msg: impl Into<String>) -> Result<T, SorrelError> {
        Err(SorrelError::parse(msg, span))
    }
}

fn is_ws_or_comma(ch: char) -> bool {
    ch.is_whitespace() || ch == ','
}

fn is_delimiter(ch: char) -> bool {
    is_ws_or_comma(ch) || matches!(ch, '(' | ')' | '[' | ']' | '{' | '}' | '"' | ';')
}

/// An optional sign followed by at least one digit reads as a number;
/// everything else in the run is a symbol.
fn looks_like_number(run: &str) -> bool {
    let digits = run
        .strip_prefix('+')
        .or_else(|| run.strip_prefix('-'))
        .unwrap_or(run);
    digits.chars().next().is_some_and(|ch| ch.is_ascii_digit())
}

pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
    end: Span,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, end: Span) -> Self {
        Self {
            tokens,
            index: 0,
            end,
        }
    }

    pub fn parse_all(&mut self) -> Result<Vec<Value>, SorrelError> {
        let mut forms = Vec::new();
        while self.peek().is_some() {
            forms.push(self.read_form()?);
        }
        Ok(forms)
    }

    fn read_form(&mut self) -> Result<Value, SorrelError> {
        let token = match self.bump() {
            Some(token) => token,
            None => return self.parse_err(self.end, "unexpected end of input"),
        };
        match token.kind {
            TokenKind::OpenParen => {
                let items = self.read_seq(TokenKind::CloseParen, token.span, "list")?;
                Ok(Value::List(items.into_iter().collect()))
            }
            TokenKind::OpenBracket => {
                let items = self.read_seq(TokenKind::CloseBracket, token.span, "vector")?;
                Ok(Value::Vector(items.into_iter().collect()))
            }
            TokenKind::OpenBrace => self.read_map(token.span),
            TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace => self
                .parse_err(
                    token.span,
                    format!("unexpected closing delimiter '{}'", token.lexeme),
                ),
            TokenKind::Quote => {
                if self.peek().is_none() {
                    return self.parse_err(self.end, "unexpected end of input after quote");
                }
                Ok(Value::quoted(self.read_form()?))
            }
            TokenKind::Hash => self.read_hash(token.span),
            _ => self.read_atom(token),
        }
    }

    fn read_seq(
        &mut self,
        close: TokenKind,
        open_span: Span,
        what: &str,
    ) -> Result<Vec<Value>, SorrelError> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => return self.parse_err(open_span, format!("unterminated {}", what)),
                Some(token) if token.kind == close => {
                    self.bump();
                    return Ok(items);
                }
                Some(_) => items.push(self.read_form()?),
            }
        }
    }

    fn read_map(&mut self, open_span: Span) -> Result<Value, SorrelError> {
        let items = self.read_seq(TokenKind::CloseBrace, open_span, "map")?;
        if items.len() % 2 != 0 {
            return self.parse_err(open_span, "map literal expects an even number of forms");
        }
        let mut entries = BTreeMap::new();
        let mut iter = items.into_iter();
        // Duplicate keys keep the last binding.
        while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
            entries.insert(key, value);
        }
        Ok(Value::Map(entries))
    }

    fn read_hash(&mut self, hash_span: Span) -> Result<Value, SorrelError> {
        let next = match self.peek() {
            Some(token) => token.clone(),
            None => return self.parse_err(hash_span, "unexpected end of input after '#'"),
        };
        match next.kind {
            TokenKind::OpenBrace => {
                self.bump();
                let items = self.read_seq(TokenKind::CloseBrace, next.span, "set")?;
                let set: BTreeSet<Value> = items.into_iter().collect();
                Ok(Value::Set(set))
            }
            TokenKind::Symbol => {
                self.bump();
                if self.peek().is_none() {
                    return self.parse_err(
                        self.end,
                        format!("unexpected end of input after '#{}'", next.lexeme),
                    );
                }
                let payload = self.read_form()?;
                Ok(Value::tagged(next.lexeme, payload))
            }
            _ => self.parse_err(hash_span, "'#' must be followed by '{' or a tag symbol"),
        }
    }

    fn read_atom(&mut self, token: Token) -> Result<Value, SorrelError> {
        match token.kind {
            TokenKind::Int => token
                .lexeme
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| SorrelError::parse(
                    format!("bad number literal '{}'", token.lexeme),
                    token.span,
                )),
            TokenKind::Float => token
                .lexeme
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| SorrelError::parse(
                    format!("bad number literal '{}'", token.lexeme),
                    token.span,
                )),
            TokenKind::QuotedString => Ok(Value::Str(token.lexeme)),
            TokenKind::Char => match token.lexeme.chars().next() {
                Some(ch) => Ok(Value::Char(ch)),
                None => self.parse_err(token.span, "empty character literal"),
            },
            TokenKind::Keyword => Ok(Value::Keyword(token.lexeme)),
            TokenKind::Symbol => Ok(match token.lexeme.as_str() {
                "nil" => Value::Nil,
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::Symbol(token.lexeme),
            }),
            _ => self.parse_err(token.span, "unexpected token"),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn parse_err<T>(&self, span: Span, msg: impl Into<String>) -> Result<T, SorrelError> {
        Err(SorrelError::parse(msg, span))
    }
}

/// Reads a whole source text into one value. Several top-level forms are
/// wrapped in a synthetic `(do …)`; an empty input reads as nil.
pub fn parse(source: &str) -> Result<Value, SorrelError> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token()? {
        tokens.push(token);
    }
    let end = tokenizer.end_span();
    let mut parser = Parser::new(tokens, end);
    let mut forms = parser.parse_all()?;
    Ok(match forms.len() {
        0 => Value::Nil,
        1 => forms.remove(0),
        _ => {
            let mut items: Vector<Value> = Vector::new();
            items.push_back(Value::symbol("do"));
            items.extend(forms);
            Value::List(items)
        }
    })
}
