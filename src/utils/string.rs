/// Decodes a Python string literal token (`'x'`, `r"x"`, `"""x"""`, ...).
///
/// Returns `None` for f-strings and bytes literals, which do not evaluate
/// to a plain `str` constant.
pub fn parse_string_literal(token: &str) -> Option<String> {
    let token = token.trim();
    let quote_at = token.find(['"', '\''])?;
    let (prefix, quoted) = token.split_at(quote_at);
    let prefix = prefix.to_ascii_lowercase();
    if prefix.contains('f') || prefix.contains('b') || prefix.contains('t') {
        return None;
    }
    let raw = prefix.contains('r');

    let body = strip_quotes(quoted)?;
    if raw {
        Some(body.to_string())
    } else {
        Some(unescape(body))
    }
}

fn strip_quotes(quoted: &str) -> Option<&str> {
    for delim in ["\"\"\"", "'''", "\"", "'"] {
        if quoted.len() >= 2 * delim.len() && quoted.starts_with(delim) && quoted.ends_with(delim)
        {
            return Some(&quoted[delim.len()..quoted.len() - delim.len()]);
        }
    }
    None
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            'x' => push_hex(&mut out, &mut chars, 2, "\\x"),
            'u' => push_hex(&mut out, &mut chars, 4, "\\u"),
            'U' => push_hex(&mut out, &mut chars, 8, "\\U"),
            '0'..='7' => {
                let mut value = next.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.extend(char::from_u32(value));
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}

fn push_hex(
    out: &mut String,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    width: usize,
    escape: &str,
) {
    let mut digits = String::with_capacity(width);
    while digits.len() < width {
        match chars.peek() {
            Some(d) if d.is_ascii_hexdigit() => {
                digits.push(*d);
                chars.next();
            }
            _ => break,
        }
    }
    let decoded = (digits.len() == width)
        .then(|| u32::from_str_radix(&digits, 16).ok())
        .flatten()
        .and_then(char::from_u32);
    match decoded {
        Some(ch) => out.push(ch),
        None => {
            out.push_str(escape);
            out.push_str(&digits);
        }
    }
}

/// Normalizes docstring indentation the way Python's `inspect.cleandoc` does.
pub fn clean_docstring(doc: &str) -> String {
    let expanded = expand_tabs(doc, 8);
    let lines: Vec<&str> = expanded.lines().collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    if let Some(first) = lines.first() {
        cleaned.push(first.trim_start().to_string());
    }
    for line in lines.iter().skip(1) {
        cleaned.push(line.chars().skip(margin).collect());
    }

    while cleaned.last().is_some_and(|l| l.is_empty()) {
        cleaned.pop();
    }
    let leading_blank = cleaned.iter().take_while(|l| l.is_empty()).count();
    cleaned.drain(..leading_blank);

    cleaned.join("\n")
}

/// Replaces tabs with spaces up to the next multiple of `tab_size`,
/// restarting the column at each line break.
fn expand_tabs(text: &str, tab_size: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for ch in text.chars() {
        match ch {
            '\t' => {
                let width = tab_size - column % tab_size;
                out.extend(std::iter::repeat(' ').take(width));
                column += width;
            }
            '\n' | '\r' => {
                out.push(ch);
                column = 0;
            }
            _ => {
                out.push(ch);
                column += 1;
            }
        }
    }
    out
}
