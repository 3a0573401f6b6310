// Static and runtime failures, reported as positioned diagnostics

use toyscript::diagnostics::DiagnosticKind;
use toyscript::host::terminal::Terminal;
use toyscript::host::{HostError, HostRegistry};
use toyscript::interpreter::constants::MAX_CALL_DEPTH_LIMIT;
use toyscript::interpreter::{CancellationToken, InterpreterConfig, RuntimeError};
use toyscript::memory::value::Value;
use toyscript::Error;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn run_capturing(source: &str, config: InterpreterConfig) -> (Result<(), Error>, Terminal) {
    init_tracing();
    let terminal = Terminal::new();
    let mut host = HostRegistry::new();
    terminal.install(&mut host);
    let result = toyscript::run(source, &mut host, config);
    (result, terminal)
}

fn run_err(source: &str) -> Error {
    run_capturing(source, InterpreterConfig::default())
        .0
        .expect_err("program should fail")
}

#[test]
fn test_lex_error_position() {
    let diag = run_err("let x = 1\nlet y = x @ 2").diagnostic();
    assert_eq!(diag.kind, DiagnosticKind::Lex);
    assert_eq!((diag.line, diag.column), (2, 11));
}

#[test]
fn test_unterminated_char_literal() {
    let diag = run_err("declare function putchar(c: char)\nputchar('a").diagnostic();
    assert_eq!(diag.kind, DiagnosticKind::Lex);
    assert_eq!(diag.line, 2);
}

#[test]
fn test_parse_error_position() {
    let diag = run_err("let = 5").diagnostic();
    assert_eq!(diag.kind, DiagnosticKind::Parse);
    assert_eq!((diag.line, diag.column), (1, 5));
}

#[test]
fn test_undeclared_function_is_type_error_without_output() {
    let source = r#"
declare function putchar(c: char)
putchar('a')
frobnicate(1)
"#;
    let (result, terminal) = run_capturing(source, InterpreterConfig::default());

    let err = result.expect_err("program should fail");
    assert!(matches!(err, Error::Type(_)));
    let diag = err.diagnostic();
    assert_eq!((diag.line, diag.column), (4, 1));
    assert!(diag.message.contains("frobnicate"));
    assert!(terminal.bytes().is_empty());
}

#[test]
fn test_missing_host_binding_is_type_error() {
    let err = run_err("declare function beep()\nbeep()");
    assert!(matches!(err, Error::Type(ref e) if e.message.contains("not provided by the host")));
}

#[test]
fn test_division_by_zero_reports_operator() {
    let source = "declare function putchar(c: char)\nputchar('>')\nlet a = 1\nlet b = a / 0\nputchar('<')";
    let (result, terminal) = run_capturing(source, InterpreterConfig::default());

    match result {
        Err(Error::Runtime(RuntimeError::DivisionByZero { operation, location })) => {
            assert_eq!(operation, "/");
            assert_eq!((location.line, location.column), (4, 11));
        }
        other => panic!("expected division by zero, got {:?}", other),
    }
    assert_eq!(terminal.output(), ">");
}

#[test]
fn test_modulo_by_zero_inside_function() {
    let source = r#"
function rem(a: int, b: int): int {
    return a % b
}
rem(5, 0)
"#;
    let err = run_err(source);
    assert!(matches!(
        err,
        Error::Runtime(RuntimeError::DivisionByZero { ref operation, .. }) if operation == "%"
    ));
    assert_eq!(err.diagnostic().line, 3);
}

#[test]
fn test_unbounded_recursion_overflows() {
    let source = r#"
function down(n: int): int {
    return down(n + 1)
}
down(0)
"#;
    let config = InterpreterConfig::default().with_max_call_depth(32);
    let (result, _) = run_capturing(source, config);

    match result {
        Err(Error::Runtime(RuntimeError::StackOverflow { function, limit, location })) => {
            assert_eq!(function, "down");
            assert_eq!(limit, 32);
            assert_eq!(location.line, 3);
        }
        other => panic!("expected stack overflow, got {:?}", other),
    }
}

#[test]
fn test_recursion_within_limit_succeeds() {
    let source = r#"
function depth(n: int): int {
    if n == 0 {
        return 0
    }
    return 1 + depth(n - 1)
}
let d = depth(30)
"#;
    let config = InterpreterConfig::default().with_max_call_depth(32);
    assert!(run_capturing(source, config).0.is_ok());
}

#[test]
fn test_recursion_at_capped_depth_succeeds() {
    let source = format!(
        r#"
declare function putchar(c: char)
function depth(n: int): int {{
    if n == 0 {{
        return 0
    }}
    return 1 + depth(n - 1)
}}
if depth({}) == {} {{ putchar('y') }}
"#,
        MAX_CALL_DEPTH_LIMIT - 1,
        MAX_CALL_DEPTH_LIMIT - 1
    );
    let config = InterpreterConfig::default().with_max_call_depth(usize::MAX);
    let (result, terminal) = run_capturing(&source, config);

    assert!(result.is_ok(), "{:?}", result);
    assert_eq!(terminal.output(), "y");
}

#[test]
fn test_requested_depth_beyond_cap_still_overflows_cleanly() {
    let source = r#"
function down(n: int): int {
    return down(n + 1)
}
down(0)
"#;
    let config = InterpreterConfig {
        max_call_depth: 1_000_000,
        ..InterpreterConfig::default()
    };
    let (result, _) = run_capturing(source, config);

    match result {
        Err(Error::Runtime(RuntimeError::StackOverflow { function, limit, .. })) => {
            assert_eq!(function, "down");
            assert_eq!(limit, MAX_CALL_DEPTH_LIMIT);
        }
        other => panic!("expected stack overflow, got {:?}", other),
    }
}

#[test]
fn test_host_panic_reaches_the_caller() {
    let mut host = HostRegistry::new();
    host.register("crash", |_args: &[Value]| panic!("host crashed"));

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        toyscript::run("declare function crash()
crash()", &mut host, InterpreterConfig::default())
    }));

    let payload = outcome.expect_err("host panic should propagate");
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"host crashed"));
}

#[test]
fn test_break_outside_loop_is_type_error() {
    let diag = run_err("let i = 0
if i == 0 { break }").diagnostic();
    assert_eq!(diag.kind, DiagnosticKind::Type);
    assert_eq!((diag.line, diag.column), (2, 13));
    assert!(diag.message.contains("'break' outside of a loop"));
}

#[test]
fn test_nesting_limit_is_parse_error() {
    let source = format!("let x = {}1{}", "(".repeat(500), ")".repeat(500));
    let diag = run_err(&source).diagnostic();
    assert_eq!(diag.kind, DiagnosticKind::Parse);
    assert!(diag.message.contains("nested too deeply"), "{}", diag.message);
}

#[test]
fn test_step_budget_cancels_infinite_loop() {
    let source = "for (let i = 0; i >= 0; i = i) { }";
    let config = InterpreterConfig::default().with_step_budget(1_000);
    let (result, _) = run_capturing(source, config);

    match result {
        Err(Error::Runtime(err)) => assert!(err.is_cancellation()),
        other => panic!("expected cancellation, got {:?}", other),
    }
}

#[test]
fn test_cancellation_token_stops_before_first_statement() {
    let token = CancellationToken::new();
    token.cancel();
    let config = InterpreterConfig::default().with_cancellation(token);

    let (result, terminal) = run_capturing(
        "declare function putchar(c: char)\nputchar('x')",
        config,
    );

    assert!(matches!(result, Err(Error::Runtime(RuntimeError::Cancelled { .. }))));
    assert!(terminal.bytes().is_empty());
}

#[test]
fn test_host_failure_is_runtime_error() {
    let mut host = HostRegistry::new();
    host.register("explode", |_args: &[Value]| Err(HostError::new("boom")));

    let err = toyscript::run(
        "declare function explode()\nexplode()",
        &mut host,
        InterpreterConfig::default(),
    )
    .expect_err("host failure should abort the run");

    match err {
        Error::Runtime(RuntimeError::HostFailure { function, source, location }) => {
            assert_eq!(function, "explode");
            assert_eq!(source, HostError::new("boom"));
            assert_eq!((location.line, location.column), (2, 1));
        }
        other => panic!("expected host failure, got {:?}", other),
    }
}

#[test]
fn test_host_breaking_declared_return_type() {
    let mut host = HostRegistry::new();
    host.register("seven", |_args: &[Value]| Ok(Some(Value::Int(7))));

    let err = toyscript::run(
        "declare function seven(): char\nlet c = seven()",
        &mut host,
        InterpreterConfig::default(),
    )
    .expect_err("mismatched host return should abort the run");

    assert!(matches!(err, Error::Runtime(RuntimeError::ForeignCall { .. })));
}

#[test]
fn test_rendered_runtime_diagnostic() {
    let source = "let zero = 0\nlet q = 10 % zero\n";
    let rendered = run_err(source).diagnostic().render("calc.toy", source);

    assert_eq!(
        rendered,
        "calc.toy:2:12: runtime error: Division by zero in '%'\n    let q = 10 % zero\n               ^"
    );
}
