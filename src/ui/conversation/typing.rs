use std::time::{SystemTime, UNIX_EPOCH};

/// Dots cycled while a reply is pending
fn dots(millis: u128) -> &'static str {
    match (millis / 300) % 4 {
        0 => ".",
        1 => "..",
        2 => "...",
        _ => "",
    }
}

/// Indicator line shown under the messages while `pending` requests are in flight
pub fn typing_indicator(pending: usize) -> Option<String> {
    if pending == 0 {
        return None;
    }
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    Some(format!("🤖 Relie is typing{}", dots(millis)))
}
