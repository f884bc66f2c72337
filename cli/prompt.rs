use std::io::{self, BufRead, IsTerminal, Write};

/// Prompts are only shown when enabled and a person can answer them.
pub fn is_interactive(enabled: bool) -> bool {
    enabled && io::stdin().is_terminal()
}

/// Asks a y/n question on stderr. Anything but an answer starting with `y`
/// counts as no; end of input falls back to `default`.
pub fn confirm(question: &str, default: bool) -> io::Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    let mut stderr = io::stderr();
    write!(stderr, "{} {} ", question, hint)?;
    stderr.flush()?;

    let mut answer = String::new();
    let read = io::stdin().lock().read_line(&mut answer)?;
    if read == 0 {
        return Ok(default);
    }
    Ok(parse_answer(&answer, default))
}

fn parse_answer(answer: &str, default: bool) -> bool {
    let answer = answer.trim().to_lowercase();
    if answer.is_empty() {
        default
    } else {
        answer.starts_with('y')
    }
}
