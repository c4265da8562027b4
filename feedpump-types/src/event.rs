use std::fmt::Display;

macro_rules! event_kind {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Every kind, in wire order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// The lower-case name as it appears in the `event` field.
            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($wire => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

event_kind!(
    /// Events whose `target_object` is a status.
    StatusEventKind {
        Favorite => "favorite",
        Unfavorite => "unfavorite",
        QuotedTweet => "quoted_tweet",
        FavoritedRetweet => "favorited_retweet",
        RetweetedRetweet => "retweeted_retweet",
    }
);

event_kind!(
    /// Events between two users, without a `target_object`.
    UserEventKind {
        Block => "block",
        Unblock => "unblock",
        Follow => "follow",
        Unfollow => "unfollow",
        Mute => "mute",
        Unmute => "unmute",
        UserUpdate => "user_update",
        UserDelete => "user_delete",
        UserSuspend => "user_suspend",
    }
);

event_kind!(
    /// Events whose `target_object` is a list.
    ListEventKind {
        ListCreated => "list_created",
        ListDestroyed => "list_destroyed",
        ListUpdated => "list_updated",
        ListMemberAdded => "list_member_added",
        ListMemberRemoved => "list_member_removed",
        ListUserSubscribed => "list_user_subscribed",
        ListUserUnsubscribed => "list_user_unsubscribed",
    }
);

event_kind!(
    /// Events whose `target_object` is an application's access information.
    AccessEventKind {
        AccessRevoked => "access_revoked",
        AccessUnrevoked => "access_unrevoked",
    }
);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// The `event` field, decoded once.
pub enum StreamEvent {
    Status(StatusEventKind),
    User(UserEventKind),
    List(ListEventKind),
    Access(AccessEventKind),
    /// Carries the lower-cased name.
    Unrecognized(String),
}

impl StreamEvent {
    /// Event names are matched case-insensitively.
    pub fn from_wire(name: &str) -> Self {
        let name = name.to_lowercase();
        if let Some(kind) = StatusEventKind::from_name(&name) {
            Self::Status(kind)
        } else if let Some(kind) = UserEventKind::from_name(&name) {
            Self::User(kind)
        } else if let Some(kind) = ListEventKind::from_name(&name) {
            Self::List(kind)
        } else if let Some(kind) = AccessEventKind::from_name(&name) {
            Self::Access(kind)
        } else {
            Self::Unrecognized(name)
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Status(kind) => kind.name(),
            Self::User(kind) => kind.name(),
            Self::List(kind) => kind.name(),
            Self::Access(kind) => kind.name(),
            Self::Unrecognized(name) => name,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl Display for StreamEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_wire() {
        assert_eq!(
            StreamEvent::from_wire("follow"),
            StreamEvent::User(UserEventKind::Follow)
        );
        assert_eq!(
            StreamEvent::from_wire("Favorited_Retweet"),
            StreamEvent::Status(StatusEventKind::FavoritedRetweet)
        );
        assert_eq!(
            StreamEvent::from_wire("LIST_MEMBER_ADDED"),
            StreamEvent::List(ListEventKind::ListMemberAdded)
        );
        assert_eq!(
            StreamEvent::from_wire("access_unrevoked"),
            StreamEvent::Access(AccessEventKind::AccessUnrevoked)
        );
        let unknown = StreamEvent::from_wire("Retweet");
        assert_eq!(unknown, StreamEvent::Unrecognized("retweet".to_owned()));
        assert!(!unknown.is_recognized());
        assert_eq!(unknown.to_string(), "retweet");
    }

    #[test]
    fn test_closed_lists() {
        assert_eq!(StatusEventKind::ALL.len(), 5);
        assert_eq!(UserEventKind::ALL.len(), 9);
        assert_eq!(ListEventKind::ALL.len(), 7);
        assert_eq!(AccessEventKind::ALL.len(), 2);
        for kind in UserEventKind::ALL {
            assert_eq!(StreamEvent::from_wire(kind.name()), StreamEvent::User(*kind));
        }
        for kind in ListEventKind::ALL {
            let upper = kind.name().to_uppercase();
            assert_eq!(StreamEvent::from_wire(&upper), StreamEvent::List(*kind));
        }
    }
}
