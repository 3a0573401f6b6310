// Value semantics observed through a recording host function

use std::sync::{Arc, Mutex};
use toyscript::checker::types::{FunctionType, Type};
use toyscript::host::HostRegistry;
use toyscript::interpreter::InterpreterConfig;
use toyscript::memory::value::Value;

/// Run `source` with `record(n: int)` and `record_char(c: char)` installed
fn recorded(source: &str) -> Vec<Value> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut host = HostRegistry::new();

    let sink = Arc::clone(&log);
    host.register_typed(
        "record",
        FunctionType::new(vec![Type::Int], None),
        move |args: &[Value]| {
            sink.lock().unwrap().extend_from_slice(args);
            Ok(None)
        },
    );
    let sink = Arc::clone(&log);
    host.register_typed(
        "record_char",
        FunctionType::new(vec![Type::Char], None),
        move |args: &[Value]| {
            sink.lock().unwrap().extend_from_slice(args);
            Ok(None)
        },
    );

    let prelude = "declare function record(n: int)\ndeclare function record_char(c: char)\n";
    toyscript::run(&format!("{prelude}{source}"), &mut host, InterpreterConfig::default())
        .expect("Execution failed");

    let values = log.lock().unwrap().clone();
    values
}

fn ints(values: &[i32]) -> Vec<Value> {
    values.iter().map(|n| Value::Int(*n)).collect()
}

#[test]
fn test_operator_precedence() {
    let values = recorded(
        r#"
record(1 + 2 * 3)
record((1 + 2) * 3)
record(10 - 4 - 3)
record(-2 * 3)
record(20 / 3 % 4)
"#,
    );
    assert_eq!(values, ints(&[7, 9, 3, -6, 2]));
}

#[test]
fn test_int_overflow_wraps() {
    let values = recorded(
        r#"
let max = 2147483647
let min = -2147483647 - 1
record(max + 1)
record(min - 1)
record(max * 2)
record(min / -1)
record(min % -1)
record(-min)
let m = max
m++
record(m)
"#,
    );
    assert_eq!(
        values,
        ints(&[i32::MIN, i32::MAX, -2, i32::MIN, 0, i32::MIN, i32::MIN])
    );
}

#[test]
fn test_division_truncates_toward_zero() {
    let values = recorded(
        r#"
record(7 / 2)
record(-7 / 2)
record(7 % 3)
record(-7 % 3)
record(7 % -3)
"#,
    );
    assert_eq!(values, ints(&[3, -3, 1, -1, 1]));
}

#[test]
fn test_casts_between_int_and_char() {
    let values = recorded(
        r#"
record('A' as int)
record('\n' as int)
record_char(66 as char)
record((300 as char) as int)
record(((-1) as char) as int)
record(('\xff' as int) + 1)
"#,
    );
    assert_eq!(
        values,
        vec![
            Value::Int(65),
            Value::Int(10),
            Value::Char(b'B'),
            Value::Int(44),
            Value::Int(255),
            Value::Int(256),
        ]
    );
}

#[test]
fn test_char_arithmetic_wraps() {
    let values = recorded(
        r#"
let c = '\xff'
c++
record_char(c)
record_char('0' + (7 as char))
record_char('a' - ' ')
let d: char
d--
record(d as int)
"#,
    );
    assert_eq!(
        values,
        vec![
            Value::Char(0),
            Value::Char(b'7'),
            Value::Char(b'A'),
            Value::Int(255),
        ]
    );
}

#[test]
fn test_comparisons_and_negation() {
    let values = recorded(
        r#"
for (let i = 0; i < 4; i++) {
    if !(i != 2) { record(i) }
    if i <= 0 { record(-1) }
    if 'b' > 'a' { if i >= 3 { record(i * 10) } }
}
"#,
    );
    assert_eq!(values, ints(&[-1, 2, 30]));
}

#[test]
fn test_assignment_is_an_expression() {
    let values = recorded(
        r#"
let a = 0, b = 0
a = b = 5
record(a)
record(a += 2)
record(b)
"#,
    );
    assert_eq!(values, ints(&[5, 7, 5]));
}

#[test]
fn test_negative_literals() {
    let values = recorded(
        r#"
record(-2147483648)
record(-2147483648 - 1)
record(-2147483648 / -1)
record_char(-1 as char)
record(-1 as char as int)
record(- 5 * 2)
record(-(3) * 2)
"#,
    );
    assert_eq!(
        values,
        vec![
            Value::Int(i32::MIN),
            Value::Int(i32::MAX),
            Value::Int(i32::MIN),
            Value::Char(255),
            Value::Int(255),
            Value::Int(-10),
            Value::Int(-6),
        ]
    );
}

#[test]
fn test_logical_operators() {
    let values = recorded(
        r#"
for (let i = 0; i < 4; i++) {
    if i > 0 && i < 3 { record(i) }
    if i == 0 || i == 3 { record(-i) }
    if !(i == 1 || i == 2) && i != 3 { record(100) }
}
"#,
    );
    assert_eq!(values, ints(&[0, 100, 1, 2, -3]));
}
