use serde_json::Value;
use std::str::Lines;

/// Prefix of the lines that carry a payload
pub const DATA_MARKER: &str = "data:";

/// Lazily yields the JSON payload of every `data:` line in an event-stream
/// body, in order.
///
/// Other lines (`event:`, `id:`, comments, blank separators) are ignored. A
/// data line with nothing after the marker is skipped silently; a data line
/// that is not valid JSON is logged, counted in [`skipped`](Self::skipped) and
/// skipped, and parsing carries on with the next line.
#[derive(Debug)]
pub struct EventStreamPayloads<'a> {
    lines: Lines<'a>,
    skipped: usize,
}

pub fn parse(body: &str) -> EventStreamPayloads<'_> {
    EventStreamPayloads {
        lines: body.lines(),
        skipped: 0,
    }
}

impl EventStreamPayloads<'_> {
    /// Number of malformed data lines seen so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for EventStreamPayloads<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        for line in self.lines.by_ref() {
            let Some(rest) = line.strip_prefix(DATA_MARKER) else {
                continue;
            };
            let payload = rest.trim();
            if payload.is_empty() {
                continue;
            }

            match serde_json::from_str(payload) {
                Ok(value) => return Some(value),
                Err(e) => {
                    self.skipped += 1;
                    tracing::warn!(error = %e, line = payload, "skipping malformed event-stream data line");
                }
            }
        }
        None
    }
}
