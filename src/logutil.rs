//! Keep user-typed text (item names, authors, raw command lines) on one log line,
//! and keep secrets out of it.

/// Longest preview written to the log before truncating with `…`.
pub const MAX_LOG_PREVIEW: usize = 120;

/// Escape control characters and cap the length of a string for logging.
///
/// Backslash, newline, carriage return and tab become `\\`, `\n`, `\r`, `\t`;
/// other control characters become `\xNN`.
pub fn escape_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_LOG_PREVIEW) + 4);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_LOG_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\x{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Show only the last four characters of a token or key.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.trim().chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
