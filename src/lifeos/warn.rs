fn sanitize_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_ascii_whitespace() {
            if !out.is_empty() && !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else if ch.is_ascii_graphic() {
            out.push(ch);
            prev_sep = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "na".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Structured one-line warning on stderr. Machine-greppable; one bad record
/// warns and the run keeps going.
pub fn emit(code: &str, stage: &str, source: &str, retry: &str, reason: &str, err: &str) {
    eprintln!(
        "LIFEOS_WARN code={} stage={} source={} retry={} reason={} err={}",
        sanitize_value(code),
        sanitize_value(stage),
        sanitize_value(source),
        sanitize_value(retry),
        sanitize_value(reason),
        sanitize_value(err),
    );
}
