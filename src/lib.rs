use std::{cmp, error, fmt};

mod cli;
mod codegen;
mod parse;
mod tree;

use self::{
    codegen::masm::generate,
    parse::{lexer::Lexer, parser::Parser},
};

pub use self::{
    cli::print_error,
    parse::{
        error::{ParseError, Rule},
        token::Token,
        Span, Spanned,
    },
    tree::symbol::SymbolError,
};

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

#[derive(Debug)]
pub struct Source {
    pub name: String,
    pub code: String,
}

impl cmp::PartialEq for Source {
    fn eq(&self, other: &Source) -> bool {
        self.name == other.name
    }
}

impl cmp::Eq for Source {}

impl Source {
    pub fn new(name: &str, code: &str) -> Self {
        Self {
            name: name.to_owned(),
            code: code.to_owned(),
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum CompileError<'src> {
    Parse(ParseError<'src>),
    Symbol(SymbolError<'src>),
    Fatal(FatalError),
}

impl<'src> fmt::Display for CompileError<'src> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use CompileError::*;

        match self {
            Parse(err) => write!(f, "{}", err),
            Symbol(err) => write!(f, "error: {}", err),
            Fatal(err) => write!(f, "fatal error: {}", err),
        }
    }
}

impl<'src> error::Error for CompileError<'src> {}

impl<'src> From<ParseError<'src>> for CompileError<'src> {
    fn from(err: ParseError<'src>) -> Self {
        CompileError::Parse(err)
    }
}

impl<'src> From<SymbolError<'src>> for CompileError<'src> {
    fn from(err: SymbolError<'src>) -> Self {
        CompileError::Symbol(err)
    }
}

impl<'src> From<FatalError> for CompileError<'src> {
    fn from(err: FatalError) -> Self {
        CompileError::Fatal(err)
    }
}

/// An error that stops compilation without pointing at a span, like a
/// program without any functions.
#[derive(Eq, PartialEq)]
pub struct FatalError {
    msg: String,
}

impl FatalError {
    pub fn new(msg: &str) -> Self {
        FatalError {
            msg: msg.to_owned(),
        }
    }
}

impl fmt::Debug for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}

impl error::Error for FatalError {}

fn init_ansi() {
    #[cfg(windows)]
    {
        if let Err(code) = ansi_term::enable_ansi_support() {
            eprintln!(
                "Could not initialise windows ansi support. Error code: {}",
                code
            );
        }
    }
}

/// Compiles `source` into the lines of a Morpho assembly file.
///
/// `unit` names the executable in the output header. Nothing is
/// returned unless the whole input parses and every name resolves, so
/// the caller either writes a complete file or reports the error.
pub fn compile<'src>(source: &'src Source, unit: &str) -> Result<Vec<String>, CompileError<'src>> {
    init_ansi();

    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer);
    let prg = parser.parse()?;

    Ok(generate(&prg, unit)?)
}
