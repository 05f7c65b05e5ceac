//! Reading result-table rows.

use crate::error::SessionError;

/// The only style the portal puts on the icon of a call nobody has played.
const UNLISTENED_STYLE: &str = "display:none;";

/// One entry of the search results, read while enumerating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRow {
    /// 0-based row index.
    pub index: usize,
    pub inmate_name: String,
    pub call_date: String,
    pub call_time: String,
}

impl CallRow {
    /// 1-based position, as shown to the operator.
    pub fn position(&self) -> usize {
        self.index + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenedState {
    Listened,
    Unlistened,
}

/// Decode the listened-state icon's `style` attribute.
///
/// An absent or empty style means the call was played. Any other style that
/// is not `display:none;` (whitespace ignored; the portal emits both
/// `display: none;` and `display:none;`) is an error: misreading this marker would either skip new
/// calls or re-download old ones.
pub fn decode_listened(position: usize, style: Option<&str>) -> Result<ListenedState, SessionError> {
    let style = match style {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(ListenedState::Listened),
    };
    let normalized: String = style.chars().filter(|c| !c.is_whitespace()).collect();
    if normalized == UNLISTENED_STYLE {
        Ok(ListenedState::Unlistened)
    } else {
        Err(SessionError::ListenedMarker {
            position,
            value: style.to_string(),
        })
    }
}

/// The result-count cell reads like `"12 calls found"`.
pub fn parse_call_count(text: &str) -> Result<usize, SessionError> {
    text.split_whitespace()
        .next()
        .map(|n| n.replace(',', ""))
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| SessionError::CallCount(text.to_string()))
}

/// The date/time cell reads like `"10/16/2026 14:32:07"`.
pub fn split_date_time(position: usize, text: &str) -> Result<(String, String), SessionError> {
    let mut parts = text.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(date), Some(time)) => Ok((date.to_string(), time.to_string())),
        _ => Err(SessionError::CallDateTime {
            position,
            text: text.to_string(),
        }),
    }
}
