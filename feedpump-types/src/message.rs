use feedpump_json::JsonValue;

use crate::{
    AccessEventKind, AccessInformation, List, ListEventKind, PayloadErr, Status, StatusEventKind,
    Timestamp, User, UserEventKind,
};

#[derive(Debug, Clone, PartialEq)]
/// Every non-status element of the stream.
pub enum StreamMessage {
    /// The server is about to close the stream.
    Disconnect {
        code: DisconnectCode,
        stream_name: String,
        reason: String,
        timestamp: Timestamp,
    },
    /// The ids of the accounts the user follows, sent once after connecting.
    Enumeration { ids: Vec<i64> },
    StatusEvent {
        source: User,
        target: User,
        status: Status,
        event: StatusEventKind,
        timestamp: Timestamp,
    },
    UserEvent {
        source: User,
        target: User,
        event: UserEventKind,
        timestamp: Timestamp,
    },
    ListEvent {
        source: User,
        target: User,
        list: List,
        event: ListEventKind,
        timestamp: Timestamp,
    },
    AccessEvent {
        source: User,
        target: User,
        access_information: AccessInformation,
        event: AccessEventKind,
        timestamp: Timestamp,
    },
    /// The user follows more accounts than the stream can deliver.
    TooManyFollowsWarning {
        code: String,
        message: String,
        user_id: i64,
        timestamp: Timestamp,
    },
    /// A status or direct message was deleted.
    Delete {
        id: i64,
        user_id: i64,
        timestamp: Timestamp,
    },
    /// Location data should be removed from the user's statuses.
    ScrubGeo {
        user_id: i64,
        up_to_status_id: i64,
        timestamp: Timestamp,
    },
    /// More statuses matched than could be delivered.
    Limit { undelivered: i64, timestamp: Timestamp },
    StatusWithheld {
        id: i64,
        user_id: i64,
        countries: Vec<String>,
        timestamp: Timestamp,
    },
    UserWithheld {
        id: i64,
        countries: Vec<String>,
        timestamp: Timestamp,
    },
    /// Any other warning, e.g. `FALLING_BEHIND`.
    StallWarning {
        code: String,
        message: String,
        percent_full: Option<i64>,
        timestamp: Timestamp,
    },
    /// A well-formed object no decoder recognises.
    Unknown(JsonValue),
}

/// Why the server closed the stream. The numeric values are fixed by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DisconnectCode {
    Shutdown = 1,
    DuplicateStream = 2,
    ControlRequest = 3,
    Stall = 4,
    Normal = 5,
    TokenRevoked = 6,
    AdminLogout = 7,
    Internal = 8,
    MaxMessageLimit = 9,
    StreamException = 10,
    BrokerStall = 11,
    ShedLoad = 12,
}

impl StreamMessage {
    /// Name of the variant, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Disconnect { .. } => "disconnect",
            Self::Enumeration { .. } => "enumeration",
            Self::StatusEvent { .. } => "status_event",
            Self::UserEvent { .. } => "user_event",
            Self::ListEvent { .. } => "list_event",
            Self::AccessEvent { .. } => "access_event",
            Self::TooManyFollowsWarning { .. } => "too_many_follows_warning",
            Self::Delete { .. } => "delete",
            Self::ScrubGeo { .. } => "scrub_geo",
            Self::Limit { .. } => "limit",
            Self::StatusWithheld { .. } => "status_withheld",
            Self::UserWithheld { .. } => "user_withheld",
            Self::StallWarning { .. } => "stall_warning",
            Self::Unknown(_) => "unknown",
        }
    }

    /// The event name, for the four event variants.
    pub fn event_name(&self) -> Option<&'static str> {
        match self {
            Self::StatusEvent { event, .. } => Some(event.name()),
            Self::UserEvent { event, .. } => Some(event.name()),
            Self::ListEvent { event, .. } => Some(event.name()),
            Self::AccessEvent { event, .. } => Some(event.name()),
            _ => None,
        }
    }

    pub fn timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Disconnect { timestamp, .. }
            | Self::StatusEvent { timestamp, .. }
            | Self::UserEvent { timestamp, .. }
            | Self::ListEvent { timestamp, .. }
            | Self::AccessEvent { timestamp, .. }
            | Self::TooManyFollowsWarning { timestamp, .. }
            | Self::Delete { timestamp, .. }
            | Self::ScrubGeo { timestamp, .. }
            | Self::Limit { timestamp, .. }
            | Self::StatusWithheld { timestamp, .. }
            | Self::UserWithheld { timestamp, .. }
            | Self::StallWarning { timestamp, .. } => Some(*timestamp),
            Self::Enumeration { .. } | Self::Unknown(_) => None,
        }
    }
}

impl DisconnectCode {
    pub fn code(&self) -> i64 {
        *self as u8 as i64
    }
}

impl TryFrom<i64> for DisconnectCode {
    type Error = PayloadErr;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        use DisconnectCode::*;
        Ok(match code {
            1 => Shutdown,
            2 => DuplicateStream,
            3 => ControlRequest,
            4 => Stall,
            5 => Normal,
            6 => TokenRevoked,
            7 => AdminLogout,
            8 => Internal,
            9 => MaxMessageLimit,
            10 => StreamException,
            11 => BrokerStall,
            12 => ShedLoad,
            value => {
                return Err(PayloadErr::OutOfRange {
                    field: "code",
                    value,
                })
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_disconnect_code() {
        for code in 1..=12 {
            assert_eq!(DisconnectCode::try_from(code).unwrap().code(), code);
        }
        assert_eq!(DisconnectCode::Stall.code(), 4);
        assert_eq!(DisconnectCode::ShedLoad.code(), 12);
        assert_eq!(
            DisconnectCode::try_from(13),
            Err(PayloadErr::OutOfRange {
                field: "code",
                value: 13
            })
        );
        assert!(DisconnectCode::try_from(0).is_err());
    }

    #[test]
    fn test_accessors() {
        let now = Timestamp::now_utc();
        let message = StreamMessage::Limit {
            undelivered: 3,
            timestamp: now,
        };
        assert_eq!(message.kind(), "limit");
        assert_eq!(message.timestamp(), Some(now));
        assert_eq!(message.event_name(), None);

        let message = StreamMessage::Enumeration { ids: vec![1, 2] };
        assert_eq!(message.timestamp(), None);
    }
}
