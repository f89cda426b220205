//! Recovery of typed values from model text.
//!
//! Providers are asked for bare JSON, but models still occasionally wrap
//! it in a markdown code block or leave a trailing comma. Decoding tries,
//! in order:
//! 1. The trimmed text as-is
//! 2. The contents of the first fenced code block
//! 3. Either of the above with trailing commas stripped
//!
//! If nothing decodes, the error from the first attempt is returned since
//! it describes the text the model actually sent.

use serde::de::DeserializeOwned;

/// Decode model text into `T`, tolerating code fences and trailing commas.
///
/// # Errors
///
/// Returns the `serde_json` error from decoding the raw text if every
/// recovery strategy fails.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    let trimmed = raw.trim();
    let first_error = match serde_json::from_str(trimmed) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let fenced = extract_code_block(trimmed);
    if let Some(inner) = fenced
        && let Ok(value) = serde_json::from_str(inner)
    {
        return Ok(value);
    }

    let candidate = strip_trailing_commas(fenced.unwrap_or(trimmed));
    match serde_json::from_str(&candidate) {
        Ok(value) => Ok(value),
        Err(_) => Err(first_error),
    }
}

/// The body of the first ```` ``` ```` fenced block, with any language tag
/// removed.
fn extract_code_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_fence = text.get(open.checked_add(3)?..)?;
    // The language tag (if any) runs to the end of the opening line.
    let body_start = after_fence.find('\n').and_then(|nl| nl.checked_add(1))?;
    let body = after_fence.get(body_start..)?;
    let close = body.find("```")?;
    body.get(..close).map(str::trim)
}

/// Remove commas that directly precede a closing brace or bracket.
///
/// Commas inside string literals are left alone.
fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars.as_str().trim_start().chars().next();
                if !matches!(next, Some('}' | ']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}
