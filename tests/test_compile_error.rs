use nanomorpho::{compile, Source};

#[test]
fn test_missing_semicolon_points_at_the_closing_brace() {
    let source = Source::new("test.nm", "f(){return 1}");

    let err = compile(&source, "test").unwrap_err();

    assert_eq!(
        "error: expected ';', but got '}' in <function>
--> test.nm:1:13
  |
1 |f(){return 1}
  |\u{1b}[31m            ^\u{1b}[0m
parse stack:
<program>
 <function>",
        err.to_string()
    );
}

#[test]
fn test_parse_stack_lists_every_active_rule() {
    let source = Source::new(
        "test.nm",
        "f(x) {\n    if (x < ) {\n        return 1;\n    };\n}",
    );

    let err = compile(&source, "test").unwrap_err();

    assert_eq!(
        "error: expected a value, but got ')' in <rvalue>
--> test.nm:2:13
  |
2 |    if (x < ) {
  |\u{1b}[31m            ^\u{1b}[0m
parse stack:
<program>
 <function>
  <expr>
   <branch_expr>
    <and_expr>
     <or_expr>
      <not_expr>
       <condition>
        <sum_expr>
         <mul_expr>
          <rvalue>",
        err.to_string()
    );
}

#[test]
fn test_illegal_token_is_reported_where_it_stops_the_parse() {
    let source = Source::new("test.nm", "f() { return 1 & 2; }");

    let err = compile(&source, "test").unwrap_err();

    assert_eq!(
        "error: expected ';', but got '&' in <function>
--> test.nm:1:16
  |
1 |f() { return 1 & 2; }
  |\u{1b}[31m               ^\u{1b}[0m
parse stack:
<program>
 <function>",
        err.to_string()
    );
}

#[test]
fn test_undefined_name() {
    let source = Source::new("test.nm", "f(x){ return y; }");

    let err = compile(&source, "test").unwrap_err();

    assert_eq!("error: invalid symbol: 'y' is not defined", err.to_string());
}

#[test]
fn test_duplicate_name() {
    let source = Source::new("test.nm", "f(x, x){ return x; }");

    let err = compile(&source, "test").unwrap_err();

    assert_eq!(
        "error: symbol collision: 'x' already defined",
        err.to_string()
    );
}

#[test]
fn test_function_without_expressions() {
    let source = Source::new("test.nm", "f(){}");

    let err = compile(&source, "test").unwrap_err();

    assert_eq!(
        "fatal error: no expressions in function 'f'",
        err.to_string()
    );
}

#[test]
fn test_empty_program() {
    let source = Source::new("test.nm", "");

    let err = compile(&source, "test").unwrap_err();

    assert_eq!("fatal error: no functions in program", err.to_string());
}
