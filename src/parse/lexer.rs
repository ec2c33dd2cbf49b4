use std::{iter::Peekable, str::CharIndices};

use super::{token::*, *};
use crate::Source;

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct InputPos {
    pos: CharPos,
    value: char,
}

impl InputPos {
    fn new_opt(value: Option<(CharPos, char)>) -> Option<Self> {
        let (pos, value) = value?;

        Some(InputPos { pos, value })
    }
}

pub struct Lexer<'src> {
    source: &'src Source,
    src: &'src str,
    chars: Peekable<CharIndices<'src>>,
    current: Option<InputPos>,
    prev: Option<char>,
    buffer: [Spanned<Token<'src>>; 2],
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src Source) -> Self {
        let src = &source.code;
        let mut chars = src.char_indices().peekable();

        let mut lexer = Lexer {
            source,
            src,
            current: InputPos::new_opt(chars.next()),
            chars,
            prev: None,
            buffer: [Spanned::new(0, 0, Token::Eof); 2],
        };

        lexer.buffer[0] = lexer.scan_or_eof();
        lexer.buffer[1] = lexer.scan_or_eof();

        lexer
    }
}

impl<'src> Lexer<'src> {
    fn pos(&self) -> CharPos {
        if let Some(InputPos { pos, .. }) = self.current {
            return pos;
        }

        self.src.len()
    }

    fn slice(&self, start: CharPos, end: CharPos) -> &'src str {
        let end = if end > self.src.len() {
            self.src.len()
        } else {
            end
        };

        &self.src[start..end]
    }

    fn spanned<T>(&self, start: CharPos, t: T) -> Spanned<T> {
        Spanned::new(start, self.pos() - self.prev.map_or(0, char::len_utf8), t)
    }
}

impl<'src> TokenSource<'src> for Lexer<'src> {
    fn peek(&self, ahead: usize) -> &Spanned<Token<'src>> {
        &self.buffer[ahead]
    }

    fn next_token(&mut self) -> Spanned<Token<'src>> {
        let next = self.buffer[0];
        self.buffer[0] = self.buffer[1];
        self.buffer[1] = self.scan_or_eof();
        next
    }

    fn source(&self) -> &'src Source {
        self.source
    }
}

macro_rules! consume_single {
    ($self:ident, $start:ident, $token:expr) => {{
        $self.advance();
        $self.spanned($start, $token)
    }};
}

macro_rules! consume_double {
    ($self:ident, $start:ident, $single_tok:expr, $double_tok:expr) => {{
        let InputPos { value: tok, .. } = $self.current.unwrap();
        $self.advance();
        if let Some(InputPos { value: new, .. }) = $self.current {
            if new == tok {
                $self.advance();
                $self.spanned($start, $double_tok)
            } else {
                $self.spanned($start, $single_tok)
            }
        } else {
            $self.spanned($start, $single_tok)
        }
    }};
    ($self:ident, $start:ident, $next_char:expr, $single_tok:expr, $double_tok:expr) => {{
        $self.advance();
        if let Some(InputPos { value: new, .. }) = $self.current {
            if new == $next_char {
                $self.advance();
                $self.spanned($start, $double_tok)
            } else {
                $self.spanned($start, $single_tok)
            }
        } else {
            $self.spanned($start, $single_tok)
        }
    }};
}

impl<'src> Lexer<'src> {
    fn advance(&mut self) -> Option<InputPos> {
        let curr = self.current?;
        self.prev = Some(curr.value);
        self.current = InputPos::new_opt(self.chars.next());
        Some(curr)
    }

    fn read_while<P>(&mut self, predicate: P) -> &'src str
    where
        P: Fn(char) -> bool,
    {
        let start = self.pos();

        while let Some(InputPos { value, .. }) = self.current {
            if predicate(value) {
                self.advance();
            } else {
                break;
            }
        }

        self.slice(start, self.pos())
    }

    fn skip_whitespace(&mut self) {
        self.read_while(char::is_whitespace);
    }

    fn scan_or_eof(&mut self) -> Spanned<Token<'src>> {
        match self.scan_token() {
            Some(token) => token,
            None => {
                let pos = self.pos() - self.prev.map_or(0, char::len_utf8);
                Spanned::new(pos, pos, Token::Eof)
            }
        }
    }

    fn scan_ident(&mut self) -> Spanned<Token<'src>> {
        let start = self.pos();
        let slice = self.read_while(|c| c.is_alphanumeric() || c == '_');
        if let Some(keyword) = self.check_keyword(start, slice) {
            return keyword;
        }

        if !slice.is_ascii() {
            return self.spanned(start, Token::Error(slice));
        }

        self.spanned(start, Token::Name(slice))
    }

    fn check_keyword(&mut self, start: CharPos, slice: &'src str) -> Option<Spanned<Token<'src>>> {
        Some(self.spanned(
            start,
            match slice {
                "if" => Token::If,
                "elseif" => Token::ElseIf,
                "else" => Token::Else,
                "while" => Token::While,
                "var" => Token::Var,
                "return" => Token::Return,
                "true" | "false" | "null" => Token::Literal(slice),
                _ => return None,
            },
        ))
    }

    fn scan_num(&mut self) -> Spanned<Token<'src>> {
        let start = self.pos();
        self.read_while(|c| c.is_digit(10));

        if let Some(InputPos { value: '.', .. }) = self.current {
            if let Some((_, peek)) = self.chars.peek() {
                if peek.is_digit(10) {
                    // consume '.'
                    self.advance();
                    self.read_while(|c| c.is_digit(10));
                }
            }
        }

        let slice = self.slice(start, self.pos());
        self.spanned(start, Token::Literal(slice))
    }

    fn scan_string(&mut self) -> Spanned<Token<'src>> {
        let start = self.pos();
        self.advance();

        while let Some(InputPos { value, .. }) = self.current {
            match value {
                '"' => {
                    // consume the closing '"'
                    self.advance();
                    let slice = self.slice(start, self.pos());
                    return self.spanned(start, Token::Literal(slice));
                }
                '\\' => {
                    // a backslash escapes the next char, so it cannot close the string
                    self.advance();
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }

        let slice = self.slice(start, self.pos());
        self.spanned(start, Token::Error(slice))
    }

    fn scan_pair(&mut self, start: CharPos, expected: char, token: Token<'src>) -> Spanned<Token<'src>> {
        self.advance();
        if let Some(InputPos { value, .. }) = self.current {
            if value == expected {
                self.advance();
                return self.spanned(start, token);
            }
        }

        let slice = self.slice(start, self.pos());
        self.spanned(start, Token::Error(slice))
    }

    fn scan_token(&mut self) -> Option<Spanned<Token<'src>>> {
        self.skip_whitespace();
        let start = self.pos();

        let ch = self.current.map(|InputPos { value, .. }| value)?;

        let scanned = match ch {
            '=' => consume_double!(self, start, Token::Assign, Token::EqualsEquals),
            '+' => consume_double!(self, start, Token::Plus, Token::PlusPlus),
            '-' => consume_double!(self, start, Token::Minus, Token::MinusMinus),
            '!' => consume_double!(self, start, '=', Token::Bang, Token::BangEquals),
            '<' => consume_double!(self, start, '=', Token::Smaller, Token::SmallerEquals),
            '>' => consume_double!(self, start, '=', Token::Greater, Token::GreaterEquals),
            '&' => self.scan_pair(start, '&', Token::AmpersandAmpersand),
            '|' => self.scan_pair(start, '|', Token::PipePipe),
            '*' => consume_single!(self, start, Token::Star),
            '/' => {
                if let Some((_, '/')) = self.chars.peek() {
                    self.read_while(|c| c != '\n');
                    return self.scan_token();
                }
                consume_single!(self, start, Token::Slash)
            }
            ';' => consume_single!(self, start, Token::Semi),
            ',' => consume_single!(self, start, Token::Comma),
            '(' => consume_single!(self, start, Token::LParen),
            ')' => consume_single!(self, start, Token::RParen),
            '{' => consume_single!(self, start, Token::LBrace),
            '}' => consume_single!(self, start, Token::RBrace),
            '"' => self.scan_string(),
            c if c.is_alphabetic() || c == '_' => self.scan_ident(),
            c if c.is_digit(10) => self.scan_num(),
            _ => {
                self.advance();
                let slice = self.slice(start, self.pos());
                self.spanned(start, Token::Error(slice))
            }
        };

        Some(scanned)
    }
}
