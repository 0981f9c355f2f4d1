use crate::domain::{Direction, Message};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub messages: u64,
    pub sent: u64,
    pub received: u64,
    pub empty: u64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub first: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last: Option<OffsetDateTime>,
}

/// First/last follow record order, which is not guaranteed chronological.
pub fn summarize(msgs: &[Message]) -> Summary {
    let mut s = Summary {
        first: msgs.first().map(Message::timestamp),
        last: msgs.last().map(Message::timestamp),
        ..Default::default()
    };
    for m in msgs {
        s.messages += 1;
        match m.direction() {
            Direction::Sent => s.sent += 1,
            Direction::Received => s.received += 1,
        }
        if m.content().is_empty() {
            s.empty += 1;
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn counts_by_direction() {
        let t0 = datetime!(2009-03-01 10:00 UTC);
        let t1 = datetime!(2009-03-01 09:00 UTC);
        let msgs = vec![
            Message::new(t0, Direction::Received, "a".into()),
            Message::new(t0, Direction::Sent, String::new()),
            Message::new(t1, Direction::Received, "c".into()),
        ];
        let s = summarize(&msgs);
        assert_eq!(s.messages, 3);
        assert_eq!(s.received, 2);
        assert_eq!(s.sent, 1);
        assert_eq!(s.empty, 1);
        assert_eq!(s.first, Some(t0));
        assert_eq!(s.last, Some(t1));
    }

    #[test]
    fn empty_archive_has_no_span() {
        assert_eq!(summarize(&[]), Summary::default());
    }
}
