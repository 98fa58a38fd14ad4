//! Text forms of scalar node kinds: scaled integers, dates, identifier codes, opaque
//! bytes and strings. Each `render_*` has a `scan_*` inverse where the form is editable.

use chrono::TimeZone;

/// Errors specific to code (short identifier) scanning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("Invalid character in AssetCode")]
    InvalidCharacter,
    #[error("AssetCode too long")]
    TooLong,
    #[error("Invalid escape sequence in AssetCode")]
    BadEscape,
}

/// Format `val / 10^exp` with thousands separators, followed by `e<exp>`.
///
/// `scale_fmt(123456789, 7) == "12.3456789e7"`, `scale_fmt(-5000000, 7) == "-0.5e7"`.
/// An exponent too large for a `u64` scale renders the value unscaled, as `e0`.
pub fn scale_fmt(val: i64, exp: u32) -> String {
    let Some(unit) = 10u64.checked_pow(exp) else {
        return scale_fmt(val, 0);
    };
    let mag = val.unsigned_abs();

    let mut groups = Vec::new();
    let mut whole = mag / unit;
    while whole >= 1000 {
        groups.push(format!("{:03}", whole % 1000));
        whole /= 1000;
    }
    groups.push(whole.to_string());
    groups.reverse();

    let mut out = String::new();
    if val < 0 {
        out.push('-');
    }
    out.push_str(&groups.join(","));

    let frac = mag % unit;
    if frac > 0 {
        let digits = format!("{:0width$}", frac, width = exp as usize);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    format!("{}e{}", out, exp)
}

/// ` (<local date>)` for a positive timestamp, empty otherwise.
pub fn date_comment(ts: u64) -> String {
    let secs = ts as i64;
    if secs <= 0 {
        return String::new();
    }
    match chrono::Local.timestamp_opt(secs, 0).single() {
        Some(t) => format!(" ({})", t.format("%a %b %e %H:%M:%S %Z %Y")),
        None => String::new(),
    }
}

fn render_code_byte(b: u8, out: &mut String) {
    match b {
        b'\\' => out.push_str("\\\\"),
        // a bare trailing `?` would read back as a help request
        b'?' => out.push_str("\\x3f"),
        0x21..=0x7e => out.push(b as char),
        _ => out.push_str(&format!("\\x{:02x}", b)),
    }
}

/// Render a short identifier: trailing zero bytes dropped, other bytes escaped.
pub fn render_code(bytes: &[u8]) -> String {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let mut out = String::with_capacity(end);
    for &b in &bytes[..end] {
        render_code_byte(b, &mut out);
    }
    out
}

/// Inverse of [`render_code`]: fills exactly `len` bytes, zero padded.
pub fn scan_code(input: &str, len: usize) -> Result<Vec<u8>, CodeError> {
    let mut out = vec![0u8; len];
    let mut chars = input.trim_start().chars().peekable();
    let mut i = 0;
    while i < len {
        let c = match chars.peek() {
            None => break,
            Some(c) if c.is_whitespace() => break,
            Some(&c) => c,
        };
        chars.next();
        if c == '\\' {
            match chars.next() {
                Some('x') => {
                    let hi = chars.next().and_then(|c| c.to_digit(16));
                    let lo = chars.next().and_then(|c| c.to_digit(16));
                    match (hi, lo) {
                        (Some(hi), Some(lo)) => out[i] = (hi * 16 + lo) as u8,
                        _ => return Err(CodeError::BadEscape),
                    }
                }
                Some(e) if e.is_ascii() => out[i] = e as u8,
                Some(_) => return Err(CodeError::InvalidCharacter),
                None => return Err(CodeError::BadEscape),
            }
        } else if ('\x21'..='\x7e').contains(&c) {
            out[i] = c as u8;
        } else {
            return Err(CodeError::InvalidCharacter);
        }
        i += 1;
    }
    match chars.peek() {
        Some(c) if !c.is_whitespace() => Err(CodeError::TooLong),
        _ => Ok(out),
    }
}

/// Hex digits, or `0 bytes` for an empty block.
pub fn render_opaque(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        "0 bytes".to_string()
    } else {
        hex::encode(bytes)
    }
}

/// First whitespace-delimited token; the rest of a value is commentary.
pub fn first_token(raw: &str) -> &str {
    raw.split_whitespace().next().unwrap_or("")
}

/// Inverse of [`render_opaque`]; the token `0` means an explicitly empty block.
pub fn scan_opaque(raw: &str) -> Result<Vec<u8>, String> {
    let token = first_token(raw);
    if token == "0" {
        return Ok(Vec::new());
    }
    hex::decode(token).map_err(|e| e.to_string())
}

/// Hex block of exactly `len` bytes.
pub fn scan_fixed_opaque(raw: &str, len: usize) -> Result<Vec<u8>, String> {
    let bytes = hex::decode(first_token(raw)).map_err(|e| e.to_string())?;
    if bytes.len() != len {
        return Err(format!("expected {} bytes, found {}", len, bytes.len()));
    }
    Ok(bytes)
}

/// Double-quoted string with `\"`, `\\`, `\n`, `\t`, `\r` and `\xHH` escapes.
pub fn render_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    for &b in bytes {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out.push('"');
    out
}

/// Inverse of [`render_string`]. An unquoted value is taken as its first token.
pub fn scan_string(raw: &str) -> Result<Vec<u8>, String> {
    let s = raw.trim_start();
    let Some(body) = s.strip_prefix('"') else {
        return Ok(first_token(s).as_bytes().to_vec());
    };
    let mut out = Vec::with_capacity(body.len());
    let mut bytes = body.bytes();
    while let Some(b) = bytes.next() {
        match b {
            b'"' => return Ok(out),
            b'\\' => match bytes.next() {
                Some(b'n') => out.push(b'\n'),
                Some(b't') => out.push(b'\t'),
                Some(b'r') => out.push(b'\r'),
                Some(b'x') => {
                    let hex: Vec<u8> = bytes.by_ref().take(2).collect();
                    let byte = std::str::from_utf8(&hex)
                        .ok()
                        .filter(|h| h.len() == 2)
                        .and_then(|h| u8::from_str_radix(h, 16).ok())
                        .ok_or_else(|| "invalid \\x escape in string".to_string())?;
                    out.push(byte);
                }
                Some(c) => out.push(c),
                None => break,
            },
            _ => out.push(b),
        }
    }
    Err("unterminated string".to_string())
}
