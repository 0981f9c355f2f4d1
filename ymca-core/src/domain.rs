// ymca_core/src/domain.rs
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Written by the correspondent.
    Received,
    /// Written by the archive owner.
    Sent,
}

impl Direction {
    /// Only flag value 1 marks a received message; every other value reads as sent.
    pub fn from_flag(flag: u8) -> Self {
        if flag == 1 {
            Direction::Received
        } else {
            Direction::Sent
        }
    }
}

/// One decoded chat line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Message {
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    direction: Direction,
    content: String,
}

impl Message {
    pub fn new(timestamp: OffsetDateTime, direction: Direction, content: String) -> Self {
        Self {
            timestamp,
            direction,
            content,
        }
    }

    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_received(&self) -> bool {
        self.direction == Direction::Received
    }

    /// Display label: the owner for sent lines, the contact for received ones.
    pub fn sender<'a>(&self, owner: &'a str, contact: &'a str) -> &'a str {
        match self.direction {
            Direction::Received => contact,
            Direction::Sent => owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn only_flag_one_is_received() {
        assert_eq!(Direction::from_flag(1), Direction::Received);
        for flag in [0u8, 2, 7, 0x80, 0xFF] {
            assert_eq!(Direction::from_flag(flag), Direction::Sent, "flag {flag}");
        }
    }

    #[test]
    fn sender_label_follows_direction() {
        let ts = datetime!(2023-11-14 22:13:20 UTC);
        let got = Message::new(ts, Direction::Received, "hi".into());
        let put = Message::new(ts, Direction::Sent, "yo".into());
        assert_eq!(got.sender("me", "buddy"), "buddy");
        assert_eq!(put.sender("me", "buddy"), "me");
    }
}
