use serde_json::Value;

use crate::channel::{MethodCall, MethodResult};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Blank,
    Help,
    Exit,
    Call(MethodCall),
    Bad(String),
}

/// Parse a line as either a JSON call object or `method [json-arguments]`.
pub fn parse_line(input: &str) -> Line {
    let input = input.trim();
    if input.is_empty() {
        return Line::Blank;
    }
    if input.starts_with('{') {
        return match serde_json::from_str::<MethodCall>(input) {
            Ok(call) => Line::Call(call),
            Err(e) => Line::Bad(format!("Invalid method call: {}", e)),
        };
    }

    let (command, args) = parse_command(input);
    match command {
        "help" | "?" => Line::Help,
        "quit" | "exit" | "q" => Line::Exit,
        method if args.is_empty() => Line::Call(MethodCall::new(method, Value::Null)),
        method => match serde_json::from_str::<Value>(args) {
            Ok(arguments) => Line::Call(MethodCall::new(method, arguments)),
            Err(e) => Line::Bad(format!("Invalid arguments for {}: {}", method, e)),
        },
    }
}

/// Split input into command and the rest.
fn parse_command(input: &str) -> (&str, &str) {
    match input.find(|c: char| c == ' ' || c == '\t') {
        Some(pos) => (&input[..pos], input[pos..].trim()),
        None => (input, ""),
    }
}

/// A reply as written to stdout, one per line.
pub fn render(result: Option<MethodResult>) -> String {
    let result = result.unwrap_or_else(|| MethodResult::error("ERROR", "Request dropped without a reply"));
    serde_json::to_string(&result)
        .unwrap_or_else(|e| format!(r#"{{"error":{{"code":"ERROR","message":"{}","details":null}}}}"#, e))
}
