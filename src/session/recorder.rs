use std::time::{Duration, Instant};

/// One accepted keystroke. Backspace is stored as the raw DEL character so
/// a log can be fed straight back into the matcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub ch: char,
    pub timestamp: Instant,
}

impl KeyEvent {
    pub fn byte(&self) -> u8 {
        // Only ASCII is ever recorded.
        u8::try_from(self.ch).unwrap_or(b'?')
    }
}

/// Ordered keystroke log for the run in progress.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    events: Vec<KeyEvent>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, ch: char, timestamp: Instant) {
        self.events.push(KeyEvent { ch, timestamp });
    }

    pub fn snapshot(&self) -> Vec<KeyEvent> {
        self.events.clone()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.events.first().map(|e| e.timestamp)
    }

    pub fn elapsed(&self) -> Duration {
        elapsed(&self.events)
    }
}

/// Time from the first to the last keystroke. Thinking time before the first
/// key is excluded, pauses in between are not.
pub fn elapsed(events: &[KeyEvent]) -> Duration {
    match (events.first(), events.last()) {
        (Some(first), Some(last)) => last.timestamp.saturating_duration_since(first.timestamp),
        _ => Duration::ZERO,
    }
}

/// Pause before each event, zero for the first.
pub fn delays(events: &[KeyEvent]) -> Vec<Duration> {
    let mut out = Vec::with_capacity(events.len());
    if !events.is_empty() {
        out.push(Duration::ZERO);
    }
    out.extend(
        events
            .windows(2)
            .map(|pair| pair[1].timestamp.saturating_duration_since(pair[0].timestamp)),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_snapshot_preserve_order() {
        let t0 = Instant::now();
        let mut rec = Recorder::new();
        rec.record('a', t0);
        rec.record('\x7f', t0 + Duration::from_millis(100));
        rec.record('b', t0 + Duration::from_millis(250));

        let snap = rec.snapshot();
        assert_eq!(snap.len(), 3);
        assert_eq!(snap[1].byte(), 0x7f);
        assert_eq!(rec.started_at(), Some(t0));
        assert_eq!(rec.elapsed(), Duration::from_millis(250));
    }

    #[test]
    fn test_snapshot_is_detached_from_log() {
        let t0 = Instant::now();
        let mut rec = Recorder::new();
        rec.record('a', t0);
        let snap = rec.snapshot();
        rec.clear();
        assert!(rec.is_empty());
        assert_eq!(snap.len(), 1);
    }

    #[test]
    fn test_elapsed_of_empty_and_single() {
        let rec = Recorder::new();
        assert_eq!(rec.elapsed(), Duration::ZERO);
        let mut rec = Recorder::new();
        rec.record('a', Instant::now());
        assert_eq!(rec.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_delays_between_events() {
        let t0 = Instant::now();
        let events = vec![
            KeyEvent { ch: 'a', timestamp: t0 },
            KeyEvent {
                ch: 'b',
                timestamp: t0 + Duration::from_millis(500),
            },
            KeyEvent {
                ch: 'c',
                timestamp: t0 + Duration::from_millis(500),
            },
        ];
        assert_eq!(
            delays(&events),
            vec![Duration::ZERO, Duration::from_millis(500), Duration::ZERO]
        );
        assert!(delays(&[]).is_empty());
    }
}
