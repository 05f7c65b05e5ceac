//! Destination names: `"[HHMM] Last, First.wav"`.

use crate::config::NamePolicy;

/// A call time or inmate name that cannot be turned into a file name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    #[error("call time {0:?} is not HH:MM[:SS]")]
    CallTime(String),
    #[error("inmate name {name:?} has {tokens} token(s); expected \"First Last\"")]
    NameTokens { name: String, tokens: usize },
}

/// Given name and surname of the inmate on a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InmateName {
    pub first: String,
    pub last: String,
}

/// `"14:32:07"` -> `"1432"`. Keeps hour and minute, drops the separators.
pub fn time_tag(call_time: &str) -> Result<String, NamingError> {
    let bad = || NamingError::CallTime(call_time.to_string());
    let mut parts = call_time.trim().split(':');
    let (hour, minute) = match (parts.next(), parts.next()) {
        (Some(h), Some(m)) => (h, m),
        _ => return Err(bad()),
    };
    let is_component = |s: &str| !s.is_empty() && s.len() <= 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !is_component(hour) || !is_component(minute) {
        return Err(bad());
    }
    Ok(format!("{hour}{minute}"))
}

/// Split a display name into given name and surname under `policy`.
pub fn split_name(name: &str, policy: NamePolicy) -> Result<InmateName, NamingError> {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    let rejected = || NamingError::NameTokens {
        name: name.to_string(),
        tokens: tokens.len(),
    };
    match (policy, tokens.as_slice()) {
        (_, [first, last]) => Ok(InmateName {
            first: first.to_string(),
            last: last.to_string(),
        }),
        (NamePolicy::SurnameLast, [given @ .., last]) if !given.is_empty() => Ok(InmateName {
            first: given.join(" "),
            last: last.to_string(),
        }),
        _ => Err(rejected()),
    }
}

/// `"[1432] Smith, John.wav"`.
pub fn destination_name(time_tag: &str, name: &InmateName, extension: &str) -> String {
    format!(
        "[{}] {}, {}.{}",
        time_tag,
        name.last,
        name.first,
        extension.trim_start_matches('.')
    )
}

/// Capitalize the first letter of every alphabetic run, lowercase the rest.
/// The portal lists names in capitals ("JOHN SMITH" -> "John Smith").
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
