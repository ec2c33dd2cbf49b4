use std::fmt;

/// A lexeme of the NanoMorpho language.
///
/// `Literal` covers integers, decimals, double-quoted strings (quotes
/// included in the text) and the keywords `true`, `false` and `null`,
/// which the rest of the compiler treats like any other literal.
/// `Error` carries input the lexer could not turn into a token; the
/// parser reports it like any other unexpected token.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Token<'src> {
    Name(&'src str),
    Literal(&'src str),
    Error(&'src str),

    // Keywords
    If,
    ElseIf,
    Else,
    While,
    Var,
    Return,

    // Operators
    Assign,             // =
    Plus,               // +
    PlusPlus,           // ++
    Minus,              // -
    MinusMinus,         // --
    Star,               // *
    Slash,              // /
    Smaller,            // <
    SmallerEquals,      // <=
    Greater,            // >
    GreaterEquals,      // >=
    EqualsEquals,       // ==
    BangEquals,         // !=
    Bang,               // !
    AmpersandAmpersand, // &&
    PipePipe,           // ||

    Semi,  // ;
    Comma, // ,

    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }

    Eof,
}

impl<'src> Token<'src> {
    /// The text this token matched in the input.
    pub fn text(&self) -> &'src str {
        match *self {
            Token::Name(text) | Token::Literal(text) | Token::Error(text) => text,

            Token::If => "if",
            Token::ElseIf => "elseif",
            Token::Else => "else",
            Token::While => "while",
            Token::Var => "var",
            Token::Return => "return",

            Token::Assign => "=",
            Token::Plus => "+",
            Token::PlusPlus => "++",
            Token::Minus => "-",
            Token::MinusMinus => "--",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Smaller => "<",
            Token::SmallerEquals => "<=",
            Token::Greater => ">",
            Token::GreaterEquals => ">=",
            Token::EqualsEquals => "==",
            Token::BangEquals => "!=",
            Token::Bang => "!",
            Token::AmpersandAmpersand => "&&",
            Token::PipePipe => "||",

            Token::Semi => ";",
            Token::Comma => ",",

            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",

            Token::Eof => "",
        }
    }

    /// Comparison operators form one class in the grammar: a condition
    /// is two sums joined by any one of them.
    pub fn is_cmp(&self) -> bool {
        match self {
            Token::Smaller
            | Token::SmallerEquals
            | Token::Greater
            | Token::GreaterEquals
            | Token::EqualsEquals
            | Token::BangEquals => true,
            _ => false,
        }
    }
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Eof => write!(f, "end of input"),
            _ => write!(f, "'{}'", self.text()),
        }
    }
}
