//! Light markup used in problem display text.
//!
//! Problems carry `<sup>` and `<sub>` tags; front ends render them however
//! they like. [`to_plain`] turns them into Unicode for terminals.

/// A number written in a given base, e.g. `101<sub>2</sub>`.
pub fn base(digits: &str, radix: u32) -> String {
    format!("{digits}<sub>{radix}</sub>")
}

pub fn superscript(text: impl std::fmt::Display) -> String {
    format!("<sup>{text}</sup>")
}

/// English ordinal suffix: `st`, `nd`, `rd` or `th`.
pub fn ordinal_suffix(n: i64) -> &'static str {
    let n = n.unsigned_abs();
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// `n` followed by its ordinal suffix, e.g. `22nd`.
pub fn ordinal(n: i64) -> String {
    format!("{n}{}", ordinal_suffix(n))
}

/// Render an evaluator expression for display: `^n` becomes a superscript
/// and `*`, `/` become `×`, `÷`.
pub fn prettify_expression(expression: &str) -> String {
    let mut out = String::with_capacity(expression.len());
    let mut chars = expression.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push('×'),
            '/' => out.push('÷'),
            '^' => {
                let mut exponent = String::new();
                if chars.peek() == Some(&'-') {
                    exponent.push('-');
                    chars.next();
                }
                while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                    exponent.push(d);
                    chars.next();
                }
                out.push_str(&superscript(exponent));
            }
            other => out.push(other),
        }
    }
    out
}

fn superscript_char(c: char) -> Option<char> {
    Some(match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '-' => '⁻',
        '+' => '⁺',
        'n' => 'ⁿ',
        'i' => 'ⁱ',
        _ => return None,
    })
}

fn subscript_char(c: char) -> Option<char> {
    Some(match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '-' => '₋',
        '+' => '₊',
        _ => return None,
    })
}

/// Replace `<sup>`/`<sub>` tags with Unicode super/subscripts. Content
/// with no Unicode form falls back to `^(..)` or `_(..)`.
pub fn to_plain(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let tag = [("<sup>", "</sup>", '^'), ("<sub>", "</sub>", '_')]
            .into_iter()
            .find(|(open, _, _)| tail.starts_with(open));
        let Some((open, close, fallback)) = tag else {
            out.push('<');
            rest = &tail[1..];
            continue;
        };
        let body_start = open.len();
        let Some(body_len) = tail[body_start..].find(close) else {
            out.push_str(tail);
            return out;
        };
        let body = &tail[body_start..body_start + body_len];
        let map = if fallback == '^' {
            superscript_char
        } else {
            subscript_char
        };
        match body.chars().map(map).collect::<Option<String>>() {
            Some(converted) => out.push_str(&converted),
            None => {
                out.push(fallback);
                out.push('(');
                out.push_str(body);
                out.push(')');
            }
        }
        rest = &tail[body_start + body_len + close.len()..];
    }
    out.push_str(rest);
    out
}
