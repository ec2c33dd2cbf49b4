use super::{
    error::{ParseError, Rule},
    token::Token,
    Spanned, TokenSource,
};
use crate::{
    tree::{symbol::SymbolTable, Clause, Expr, Function, Program},
    CompileError, FatalError, Source,
};

/// Recursive-descent parser over a two-token lookahead window.
///
/// Every grammar rule is one method. Each method body runs inside
/// `scoped`, which keeps the stack of active rules current so a failing
/// token check can report where in the grammar it happened.
pub struct Parser<'src, S: TokenSource<'src>> {
    tokens: S,
    pub source: &'src Source,
    rules: Vec<Rule>,
}

impl<'src, S: TokenSource<'src>> Parser<'src, S> {
    pub fn new(tokens: S) -> Self {
        let source = tokens.source();

        Parser {
            tokens,
            source,
            rules: vec![],
        }
    }

    pub fn parse(&mut self) -> Result<Program<'src>, CompileError<'src>> {
        self.scoped(Rule::Program, |p| {
            let mut functions = vec![];
            while p.peek(0).node != Token::Eof {
                functions.push(p.function()?);
            }

            if functions.is_empty() {
                return Err(CompileError::Fatal(FatalError::new(
                    "no functions in program",
                )));
            }

            Ok(Program(functions))
        })
    }

    fn scoped<T, F>(&mut self, rule: Rule, f: F) -> Result<T, CompileError<'src>>
    where
        F: FnOnce(&mut Self) -> Result<T, CompileError<'src>>,
    {
        self.rules.push(rule);
        let result = f(self);
        self.rules.pop();

        result
    }

    fn peek(&self, ahead: usize) -> &Spanned<Token<'src>> {
        self.tokens.peek(ahead)
    }

    fn advance(&mut self) -> Spanned<Token<'src>> {
        self.tokens.next_token()
    }

    fn make_err(&self, expected: String, got: Spanned<Token<'src>>) -> CompileError<'src> {
        let rule = self.rules.last().cloned().unwrap_or(Rule::Program);

        CompileError::Parse(ParseError {
            source: self.source,
            rule,
            expected,
            got: got.node,
            span: got.span,
            trace: self.rules.clone(),
        })
    }

    fn consume(&mut self, expected: Token<'src>) -> Result<(), CompileError<'src>> {
        let next = self.advance();
        if next.node == expected {
            return Ok(());
        }

        Err(self.make_err(expected.to_string(), next))
    }

    fn consume_name(&mut self, expected: &str) -> Result<&'src str, CompileError<'src>> {
        let next = self.advance();
        if let Token::Name(name) = next.node {
            return Ok(name);
        }

        Err(self.make_err(expected.to_owned(), next))
    }

    fn function(&mut self) -> Result<Function<'src>, CompileError<'src>> {
        self.scoped(Rule::Function, |p| {
            let name = p.consume_name("a function name")?;
            p.consume(Token::LParen)?;

            let mut params = vec![];
            if let Token::Name(param) = p.peek(0).node {
                p.advance();
                params.push(param);
                while p.peek(0).node == Token::Comma {
                    p.advance();
                    params.push(p.consume_name("a parameter name")?);
                }
            }
            p.consume(Token::RParen)?;
            p.consume(Token::LBrace)?;

            let mut locals = vec![];
            while p.peek(0).node == Token::Var {
                p.advance();
                locals.push(p.consume_name("a variable name")?);
                while p.peek(0).node == Token::Comma {
                    p.advance();
                    locals.push(p.consume_name("a variable name")?);
                }
                p.consume(Token::Semi)?;
            }

            let mut table = SymbolTable::new();
            for &param in &params {
                table.register(param)?;
            }
            for &local in &locals {
                table.register(local)?;
            }

            let mut body = vec![];
            while p.peek(0).node != Token::RBrace {
                body.push(p.expr()?);
                p.consume(Token::Semi)?;
            }

            if body.is_empty() {
                return Err(CompileError::Fatal(FatalError::new(&format!(
                    "no expressions in function '{}'",
                    name
                ))));
            }
            p.advance();

            Ok(Function {
                name,
                params,
                locals,
                table,
                body,
            })
        })
    }

    fn expr(&mut self) -> Result<Expr<'src>, CompileError<'src>> {
        self.scoped(Rule::Expr, |p| match p.peek(0).node {
            Token::Return => {
                p.advance();
                Ok(Expr::Return(Box::new(p.and_expr()?)))
            }
            Token::While => p.loop_expr(),
            Token::If => p.branch_expr(),
            _ if p.peek(1).node == Token::Assign => {
                let name = p.consume_name("a variable name")?;
                p.advance();
                let value = p.and_expr()?;

                Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                })
            }
            _ => p.and_expr(),
        })
    }

    fn branch_expr(&mut self) -> Result<Expr<'src>, CompileError<'src>> {
        self.scoped(Rule::BranchExpr, |p| {
            p.advance();
            let mut clauses = vec![p.clause()?];

            loop {
                match p.peek(0).node {
                    Token::ElseIf => {
                        p.advance();
                        clauses.push(p.clause()?);
                    }
                    Token::Else => {
                        p.advance();
                        let body = p.block()?;
                        clauses.push(Clause {
                            cond: Expr::Literal("true"),
                            body,
                        });
                        break;
                    }
                    _ => break,
                }
            }

            Ok(Expr::Branch(clauses))
        })
    }

    /// A parenthesized condition followed by a block, shared by `if`
    /// and `elseif`.
    fn clause(&mut self) -> Result<Clause<'src>, CompileError<'src>> {
        self.consume(Token::LParen)?;
        let cond = self.and_expr()?;
        self.consume(Token::RParen)?;
        let body = self.block()?;

        Ok(Clause { cond, body })
    }

    fn loop_expr(&mut self) -> Result<Expr<'src>, CompileError<'src>> {
        self.scoped(Rule::LoopExpr, |p| {
            p.advance();
            p.consume(Token::LParen)?;
            let cond = p.and_expr()?;
            p.consume(Token::RParen)?;
            let body = p.block()?;

            Ok(Expr::Loop {
                cond: Box::new(cond),
                body,
            })
        })
    }

    fn block(&mut self) -> Result<Vec<Expr<'src>>, CompileError<'src>> {
        self.scoped(Rule::Block, |p| {
            p.consume(Token::LBrace)?;

            let mut body = vec![];
            while p.peek(0).node != Token::RBrace {
                body.push(p.expr()?);
                p.consume(Token::Semi)?;
            }
            p.advance();

            Ok(body)
        })
    }

    /// `&&` binds looser than `||`, so `a || b && c` is `(a || b) && c`.
    fn and_expr(&mut self) -> Result<Expr<'src>, CompileError<'src>> {
        self.scoped(Rule::AndExpr, |p| {
            let first = p.or_expr()?;
            if p.peek(0).node == Token::AmpersandAmpersand {
                p.advance();
                let rest = p.and_expr()?;
                return Ok(Expr::And(Box::new(first), Box::new(rest)));
            }

            Ok(first)
        })
    }

    fn or_expr(&mut self) -> Result<Expr<'src>, CompileError<'src>> {
        self.scoped(Rule::OrExpr, |p| {
            let first = p.not_expr()?;
            if p.peek(0).node == Token::PipePipe {
                p.advance();
                let rest = p.or_expr()?;
                return Ok(Expr::Or(Box::new(first), Box::new(rest)));
            }

            Ok(first)
        })
    }

    fn not_expr(&mut self) -> Result<Expr<'src>, CompileError<'src>> {
        self.scoped(Rule::NotExpr, |p| {
            if p.peek(0).node == Token::Bang {
                p.advance();
                let inner = p.condition()?;
                return Ok(Expr::Not(Box::new(inner)));
            }

            p.condition()
        })
    }

    fn condition(&mut self) -> Result<Expr<'src>, CompileError<'src>> {
        self.scoped(Rule::Condition, |p| {
            let first = p.sum_expr()?;
            let op = p.peek(0).node;
            if op.is_cmp() {
                p.advance();
                let second = p.sum_expr()?;
                return Ok(Expr::Call(op.text(), vec![first, second]));
            }

            Ok(first)
        })
    }

    fn sum_expr(&mut self) -> Result<Expr<'src>, CompileError<'src>> {
        self.scoped(Rule::SumExpr, |p| {
            let mut expr = p.mul_expr()?;
            loop {
                let op = p.peek(0).node;
                match op {
                    Token::Plus | Token::Minus => {
                        p.advance();
                        let right = p.mul_expr()?;
                        expr = Expr::Call(op.text(), vec![expr, right]);
                    }
                    _ => return Ok(expr),
                }
            }
        })
    }

    fn mul_expr(&mut self) -> Result<Expr<'src>, CompileError<'src>> {
        self.scoped(Rule::MulExpr, |p| {
            let mut expr = p.rvalue()?;
            loop {
                let op = p.peek(0).node;
                match op {
                    Token::Star | Token::Slash => {
                        p.advance();
                        let right = p.rvalue()?;
                        expr = Expr::Call(op.text(), vec![expr, right]);
                    }
                    _ => return Ok(expr),
                }
            }
        })
    }

    fn rvalue(&mut self) -> Result<Expr<'src>, CompileError<'src>> {
        self.scoped(Rule::Rvalue, |p| {
            let next = p.advance();
            match next.node {
                Token::Minus => {
                    let operand = p.advance();
                    match operand.node {
                        Token::Name(name) => Ok(Expr::Call("-", vec![Expr::Value(name)])),
                        Token::Literal(lit) => Ok(Expr::Call("-", vec![Expr::Literal(lit)])),
                        _ => Err(p.make_err("a name or literal".to_owned(), operand)),
                    }
                }
                Token::PlusPlus => {
                    let name = p.consume_name("a variable name")?;
                    Ok(incr_decr(name, "+"))
                }
                Token::MinusMinus => {
                    let name = p.consume_name("a variable name")?;
                    Ok(incr_decr(name, "-"))
                }
                Token::LParen => {
                    let inner = p.and_expr()?;
                    p.consume(Token::RParen)?;
                    Ok(inner)
                }
                Token::Literal(lit) => Ok(Expr::Literal(lit)),
                Token::Name(name) => {
                    if p.peek(0).node != Token::LParen {
                        return Ok(Expr::Value(name));
                    }

                    p.advance();
                    let mut args = vec![];
                    if p.peek(0).node != Token::RParen {
                        args.push(p.and_expr()?);
                        while p.peek(0).node == Token::Comma {
                            p.advance();
                            args.push(p.and_expr()?);
                        }
                    }
                    p.consume(Token::RParen)?;

                    Ok(Expr::Call(name, args))
                }
                _ => Err(p.make_err("a value".to_owned(), next)),
            }
        })
    }
}

/// `++x` and `--x` have no node of their own, they immediately become
/// `x = +(x, 1)` and `x = -(x, 1)`.
fn incr_decr<'src>(name: &'src str, op: &'src str) -> Expr<'src> {
    Expr::Assign {
        name,
        value: Box::new(Expr::Call(op, vec![Expr::Value(name), Expr::Literal("1")])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::lexer::Lexer;
    use crate::tree::symbol::SymbolError;

    fn parse(source: &Source) -> Result<Program<'_>, CompileError<'_>> {
        let lexer = Lexer::new(source);
        let mut parser = Parser::new(lexer);
        parser.parse()
    }

    fn single_body(source: &Source) -> Vec<Expr<'_>> {
        let mut prg = parse(source).unwrap();
        prg.0.remove(0).body
    }

    #[test]
    fn test_parse_function_with_params_and_locals() {
        let source = Source::new("test", "f(x, y) { var a, b; return x; }");
        let prg = parse(&source).unwrap();

        let mut table = SymbolTable::new();
        table.register("x").unwrap();
        table.register("y").unwrap();
        table.register("a").unwrap();
        table.register("b").unwrap();

        let expected = Program(vec![Function {
            name: "f",
            params: vec!["x", "y"],
            locals: vec!["a", "b"],
            table,
            body: vec![Expr::Return(Box::new(Expr::Value("x")))],
        }]);

        assert_eq!(expected, prg);
    }

    #[test]
    fn test_parse_underscore_names() {
        let source = Source::new("test", "f(_x) { return _x; }");
        let body = single_body(&source);

        let expected = vec![Expr::Return(Box::new(Expr::Value("_x")))];

        assert_eq!(expected, body);
    }

    #[test]
    fn test_mul_binds_tighter_than_sum() {
        let source = Source::new("test", "f() { return 1 + 2 * 3; }");
        let body = single_body(&source);

        let expected = vec![Expr::Return(Box::new(Expr::Call(
            "+",
            vec![
                Expr::Literal("1"),
                Expr::Call("*", vec![Expr::Literal("2"), Expr::Literal("3")]),
            ],
        )))];

        assert_eq!(expected, body);
    }

    #[test]
    fn test_sum_is_left_associative() {
        let source = Source::new("test", "f() { return 9 - 2 - 3; }");
        let body = single_body(&source);

        let expected = vec![Expr::Return(Box::new(Expr::Call(
            "-",
            vec![
                Expr::Call("-", vec![Expr::Literal("9"), Expr::Literal("2")]),
                Expr::Literal("3"),
            ],
        )))];

        assert_eq!(expected, body);
    }

    #[test]
    fn test_logic_operators_fold_to_the_right() {
        let source = Source::new("test", "f(x) { return x && x && !x; }");
        let body = single_body(&source);

        let expected = vec![Expr::Return(Box::new(Expr::And(
            Box::new(Expr::Value("x")),
            Box::new(Expr::And(
                Box::new(Expr::Value("x")),
                Box::new(Expr::Not(Box::new(Expr::Value("x")))),
            )),
        )))];

        assert_eq!(expected, body);
    }

    #[test]
    fn test_and_binds_looser_than_or() {
        let source = Source::new("test", "f(x) { return x < 1 || x > 2 && x; }");
        let body = single_body(&source);

        let expected = vec![Expr::Return(Box::new(Expr::And(
            Box::new(Expr::Or(
                Box::new(Expr::Call("<", vec![Expr::Value("x"), Expr::Literal("1")])),
                Box::new(Expr::Call(">", vec![Expr::Value("x"), Expr::Literal("2")])),
            )),
            Box::new(Expr::Value("x")),
        )))];

        assert_eq!(expected, body);
    }

    #[test]
    fn test_incr_decr_and_unary_minus_desugar_to_calls() {
        let source = Source::new("test", "f(x) { ++x; --x; -x; -5; }");
        let body = single_body(&source);

        let expected = vec![
            Expr::Assign {
                name: "x",
                value: Box::new(Expr::Call("+", vec![Expr::Value("x"), Expr::Literal("1")])),
            },
            Expr::Assign {
                name: "x",
                value: Box::new(Expr::Call("-", vec![Expr::Value("x"), Expr::Literal("1")])),
            },
            Expr::Call("-", vec![Expr::Value("x")]),
            Expr::Call("-", vec![Expr::Literal("5")]),
        ];

        assert_eq!(expected, body);
    }

    #[test]
    fn test_assignment_needs_the_lookahead_token() {
        let source = Source::new("test", "f(x) { x = x + 1; x; }");
        let body = single_body(&source);

        let expected = vec![
            Expr::Assign {
                name: "x",
                value: Box::new(Expr::Call("+", vec![Expr::Value("x"), Expr::Literal("1")])),
            },
            Expr::Value("x"),
        ];

        assert_eq!(expected, body);
    }

    #[test]
    fn test_call_with_args_vs_bare_value() {
        let source = Source::new("test", "f(x) { g(); g(x, 1 + 2); x; }");
        let body = single_body(&source);

        let expected = vec![
            Expr::Call("g", vec![]),
            Expr::Call(
                "g",
                vec![
                    Expr::Value("x"),
                    Expr::Call("+", vec![Expr::Literal("1"), Expr::Literal("2")]),
                ],
            ),
            Expr::Value("x"),
        ];

        assert_eq!(expected, body);
    }

    #[test]
    fn test_branch_with_else_gets_a_true_clause() {
        let source = Source::new(
            "test",
            "f(x) { if (x == 1) { return 1; } elseif (x == 2) { return 2; } else { return 3; }; }",
        );
        let body = single_body(&source);

        let expected = vec![Expr::Branch(vec![
            Clause {
                cond: Expr::Call("==", vec![Expr::Value("x"), Expr::Literal("1")]),
                body: vec![Expr::Return(Box::new(Expr::Literal("1")))],
            },
            Clause {
                cond: Expr::Call("==", vec![Expr::Value("x"), Expr::Literal("2")]),
                body: vec![Expr::Return(Box::new(Expr::Literal("2")))],
            },
            Clause {
                cond: Expr::Literal("true"),
                body: vec![Expr::Return(Box::new(Expr::Literal("3")))],
            },
        ])];

        assert_eq!(expected, body);
    }

    #[test]
    fn test_loop_with_empty_block() {
        let source = Source::new("test", "f(x) { while (x < 10) {}; return x; }");
        let body = single_body(&source);

        let expected = vec![
            Expr::Loop {
                cond: Box::new(Expr::Call("<", vec![Expr::Value("x"), Expr::Literal("10")])),
                body: vec![],
            },
            Expr::Return(Box::new(Expr::Value("x"))),
        ];

        assert_eq!(expected, body);
    }

    #[test]
    fn test_missing_semicolon_is_reported_in_function_rule() {
        let source = Source::new("test", "f() { return 1 }");
        let err = parse(&source).unwrap_err();

        match err {
            CompileError::Parse(err) => {
                assert_eq!(Rule::Function, err.rule);
                assert_eq!("';'", err.expected);
                assert_eq!(Token::RBrace, err.got);
                assert_eq!(vec![Rule::Program, Rule::Function], err.trace);
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_value_reports_the_whole_rule_stack() {
        let source = Source::new("test", "f() { return ; }");
        let err = parse(&source).unwrap_err();

        match err {
            CompileError::Parse(err) => {
                assert_eq!(Rule::Rvalue, err.rule);
                assert_eq!("a value", err.expected);
                assert_eq!(Token::Semi, err.got);
                assert_eq!(
                    vec![
                        Rule::Program,
                        Rule::Function,
                        Rule::Expr,
                        Rule::AndExpr,
                        Rule::OrExpr,
                        Rule::NotExpr,
                        Rule::Condition,
                        Rule::SumExpr,
                        Rule::MulExpr,
                        Rule::Rvalue,
                    ],
                    err.trace
                );
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_parameter_is_a_symbol_collision() {
        let source = Source::new("test", "f(x, x) { return x; }");
        let err = parse(&source).unwrap_err();

        assert_eq!(
            CompileError::Symbol(SymbolError::Collision { name: "x" }),
            err
        );
    }

    #[test]
    fn test_local_shadowing_a_parameter_is_a_symbol_collision() {
        let source = Source::new("test", "f(x) { var x; return x; }");
        let err = parse(&source).unwrap_err();

        assert_eq!(
            CompileError::Symbol(SymbolError::Collision { name: "x" }),
            err
        );
    }

    #[test]
    fn test_function_without_expressions_is_fatal() {
        let source = Source::new("test", "f() {}");
        let err = parse(&source).unwrap_err();

        assert_eq!(
            "fatal error: no expressions in function 'f'",
            err.to_string()
        );
    }

    #[test]
    fn test_empty_program_is_fatal() {
        let source = Source::new("test", "  \n");
        let err = parse(&source).unwrap_err();

        assert_eq!("fatal error: no functions in program", err.to_string());
    }
}
