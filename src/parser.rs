//! Splitting one input line into a command token and its remainder.

/// What one line of input asks the console to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedLine<'a> {
    /// Nothing but spaces; read the next line.
    Empty,
    /// The `quit` built-in: say farewell and end the session.
    Quit,
    /// The `sh` built-in: run the remainder on the host, verbatim.
    HostCommand(&'a str),
    /// Anything else: hand the full line to the dispatch engine.
    Dispatch,
}

/// Split a line at the first space into `(token, remainder)`.
///
/// Leading spaces are skipped before the token. The remainder is
/// everything past the single space ending the token, untrimmed; lines
/// without a space yield an empty remainder.
pub fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim_start_matches(' ');
    match line.split_once(' ') {
        Some((token, remainder)) => (token, remainder),
        None => (line, ""),
    }
}

/// Classify one raw input line (trailing newline already stripped).
///
/// Built-ins match on the token alone, so `quit now` still quits.
pub fn parse_line(line: &str) -> ParsedLine<'_> {
    let (token, remainder) = split_command(line);
    match token {
        "" => ParsedLine::Empty,
        "quit" => ParsedLine::Quit,
        "sh" => ParsedLine::HostCommand(remainder),
        _ => ParsedLine::Dispatch,
    }
}
