use feedpump_json::{parse, JsonValue};
use feedpump_types::{
    field::{
        created_at_or_now, require_i64, require_str, required, timestamp_ms_or_now, to_i64,
        wrong_type,
    },
    AccessInformation, List, PayloadResult, Status, StreamEvent, StreamHandler, StreamMessage,
    StreamParseErr, User,
};

use crate::{decode_generic, LineProcessor};

const FOLLOWS_OVER_LIMIT: &str = "FOLLOWS_OVER_LIMIT";

#[derive(Debug)]
/// Classifies each line and invokes the matching callback of the handler it owns.
///
/// A line is tried as, in order: a status, a friends enumeration, an event, a
/// too-many-follows warning, and finally the generic control messages. Whatever goes wrong
/// with one line is reported through [`StreamHandler::on_exception`] and never escapes
/// [`StreamDispatcher::dispatch_line`].
pub struct StreamDispatcher<H> {
    handler: H,
}

impl<H: StreamHandler> StreamDispatcher<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    pub fn handler(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    pub fn dispatch_line(&mut self, line: &str) {
        match parse(line) {
            Ok(value) => self.dispatch_value(value, line),
            Err(e) => self.handler.on_exception(StreamParseErr::parse(line, e)),
        }
    }

    /// `raw` is attached to any failure.
    pub fn dispatch_value(&mut self, value: JsonValue, raw: &str) {
        if value.as_object().is_none() {
            let reason = format!("expected an object, found {}", value.type_name());
            self.handler
                .on_exception(StreamParseErr::protocol(raw, reason));
            return;
        }

        if Status::is_status_shape(&value) {
            match Status::try_from(&value) {
                Ok(status) => self.handler.on_status(status),
                Err(e) => self
                    .handler
                    .on_exception(StreamParseErr::dispatch("Status parse failed", raw, e)),
            }
            return;
        }

        let friends = match value.get("friends") {
            Some(friends) => Some(friends),
            None => value.get("friends_str"),
        };
        if let Some(friends) = friends {
            match enumeration(friends) {
                Ok(ids) => self.handler.on_message(StreamMessage::Enumeration { ids }),
                Err(e) => self.handler.on_exception(StreamParseErr::dispatch(
                    "Friends enumeration parse failed",
                    raw,
                    e,
                )),
            }
            return;
        }

        if value.contains_key("event") {
            self.dispatch_event(&value, raw);
            return;
        }

        if value["warning"]["code"].as_str() == Some(FOLLOWS_OVER_LIMIT) {
            match too_many_follows(&value["warning"]) {
                Ok(message) => self.handler.on_message(message),
                Err(e) => self
                    .handler
                    .on_exception(StreamParseErr::dispatch("Warning parse failed", raw, e)),
            }
            return;
        }

        match decode_generic(value) {
            Ok(message) => self.handler.on_message(message),
            Err(e) => self.handler.on_exception(StreamParseErr::dispatch(
                "Stream element parse failed",
                raw,
                e,
            )),
        }
    }

    fn dispatch_event(&mut self, value: &JsonValue, raw: &str) {
        let event = match require_str(value, "event") {
            Ok(name) => StreamEvent::from_wire(name),
            Err(e) => {
                self.handler
                    .on_exception(StreamParseErr::dispatch("Event parse failed", raw, e));
                return;
            }
        };
        if !event.is_recognized() {
            log::debug!("StreamDispatcher: ignoring unrecognized event `{event}`");
            return;
        }
        match decode_event(&event, value) {
            Ok(message) => self.handler.on_message(message),
            Err(e) => self.handler.on_exception(StreamParseErr::dispatch(
                format!("Event parse failed: {event}"),
                raw,
                e,
            )),
        }
    }
}

impl<H> LineProcessor for StreamDispatcher<H>
where
    H: StreamHandler + Send + 'static,
{
    fn process(&mut self, line: String) {
        self.dispatch_line(&line)
    }
}

/// `friends` holds numbers, `friends_str` holds the same ids as strings.
fn enumeration(friends: &JsonValue) -> PayloadResult<Vec<i64>> {
    let list = friends
        .as_array()
        .ok_or_else(|| wrong_type("friends", "array", friends))?;
    list.iter().map(|id| to_i64(id, "friends")).collect()
}

fn too_many_follows(warning: &JsonValue) -> PayloadResult<StreamMessage> {
    Ok(StreamMessage::TooManyFollowsWarning {
        code: require_str(warning, "code")?.to_owned(),
        message: require_str(warning, "message")?.to_owned(),
        user_id: require_i64(warning, "user_id")?,
        timestamp: timestamp_ms_or_now(warning)?,
    })
}

fn decode_event(event: &StreamEvent, value: &JsonValue) -> PayloadResult<StreamMessage> {
    let source = User::try_from(required(value, "source")?)?;
    let target = User::try_from(required(value, "target")?)?;
    let timestamp = created_at_or_now(value)?;
    Ok(match event {
        StreamEvent::Status(kind) => StreamMessage::StatusEvent {
            source,
            target,
            status: Status::try_from(required(value, "target_object")?)?,
            event: *kind,
            timestamp,
        },
        StreamEvent::User(kind) => StreamMessage::UserEvent {
            source,
            target,
            event: *kind,
            timestamp,
        },
        StreamEvent::List(kind) => StreamMessage::ListEvent {
            source,
            target,
            list: List::try_from(required(value, "target_object")?)?,
            event: *kind,
            timestamp,
        },
        StreamEvent::Access(kind) => StreamMessage::AccessEvent {
            source,
            target,
            access_information: AccessInformation::try_from(required(value, "target_object")?)?,
            event: *kind,
            timestamp,
        },
        StreamEvent::Unrecognized(_) => StreamMessage::Unknown(value.clone()),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use feedpump_types::{
        DisconnectCode, FailureKind, PayloadErr, StatusEventKind, UserEventKind,
    };

    #[derive(Debug, Default)]
    struct Recorder {
        statuses: Vec<Status>,
        messages: Vec<StreamMessage>,
        errors: Vec<StreamParseErr>,
    }

    impl StreamHandler for Recorder {
        fn on_status(&mut self, status: Status) {
            self.statuses.push(status);
        }

        fn on_message(&mut self, message: StreamMessage) {
            self.messages.push(message);
        }

        fn on_exception(&mut self, error: StreamParseErr) {
            self.errors.push(error);
        }
    }

    fn dispatch(lines: &[&str]) -> Recorder {
        let mut dispatcher = StreamDispatcher::new(Recorder::default());
        for line in lines {
            dispatcher.dispatch_line(line);
        }
        dispatcher.into_handler()
    }

    #[test]
    fn test_status_first() {
        let rec = dispatch(&[
            r#"{"id":1,"text":"hello","user":{"id":2,"screen_name":"a"},"event":"follow","friends":[1]}"#,
        ]);
        assert_eq!(rec.statuses.len(), 1);
        assert_eq!(rec.statuses[0].text, "hello");
        assert!(rec.messages.is_empty());
        assert!(rec.errors.is_empty());
    }

    #[test]
    fn test_friends() {
        let rec = dispatch(&[r#"{"friends":[1,2,3]}"#, r#"{"friends_str":["4","5"]}"#]);
        assert_eq!(
            rec.messages,
            [
                StreamMessage::Enumeration { ids: vec![1, 2, 3] },
                StreamMessage::Enumeration { ids: vec![4, 5] },
            ]
        );

        let rec = dispatch(&[r#"{"friends":[1,"x"]}"#]);
        assert!(rec.messages.is_empty());
        assert_eq!(rec.errors.len(), 1);
        assert!(rec.errors[0].is_dispatch_failure());
    }

    #[test]
    fn test_user_event() {
        let rec = dispatch(&[
            r#"{"event":"Follow","source":{"id":1,"screen_name":"alice"},"target":{"id":2,"screen_name":"bob"},"created_at":"Wed Aug 27 13:08:45 +0000 2008"}"#,
        ]);
        assert!(rec.errors.is_empty(), "{:?}", rec.errors);
        match &rec.messages[..] {
            [StreamMessage::UserEvent {
                source,
                target,
                event,
                timestamp,
            }] => {
                assert_eq!(source.screen_name(), "alice");
                assert_eq!(target.id, 2);
                assert_eq!(*event, UserEventKind::Follow);
                assert_eq!(event.name(), "follow");
                assert_eq!(timestamp.year(), 2008);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_status_event() {
        let rec = dispatch(&[
            r#"{"event":"favorite","source":{"id":1},"target":{"id":2},"target_object":{"id":3,"text":"t","user":{"id":2}}}"#,
            r#"{"event":"favorite","source":{"id":1},"target":{"id":2},"target_object":{"id":3}}"#,
        ]);
        assert_eq!(rec.messages.len(), 1);
        assert_eq!(rec.messages[0].event_name(), Some("favorite"));
        assert!(matches!(
            &rec.messages[0],
            StreamMessage::StatusEvent {
                event: StatusEventKind::Favorite,
                status,
                ..
            } if status.id == 3
        ));
        assert_eq!(rec.errors.len(), 1);
        assert_eq!(rec.errors[0].message(), "Event parse failed: favorite");
        assert_eq!(
            rec.errors[0].kind(),
            &FailureKind::Dispatch(PayloadErr::MissingField("text"))
        );
    }

    #[test]
    fn test_list_and_access_events() {
        let rec = dispatch(&[
            r#"{"event":"list_member_added","source":{"id":1},"target":{"id":2},"target_object":{"id":9,"name":"rust"}}"#,
            r#"{"event":"access_revoked","source":{"id":1},"target":{"id":2},"target_object":{"token":"t","client_application":{"id":5}}}"#,
        ]);
        assert!(rec.errors.is_empty(), "{:?}", rec.errors);
        assert!(matches!(&rec.messages[0], StreamMessage::ListEvent { list, .. } if list.name == "rust"));
        assert!(matches!(
            &rec.messages[1],
            StreamMessage::AccessEvent { access_information, .. }
                if access_information.client_application_id == Some(5)
        ));
    }

    #[test]
    fn test_unrecognized_event() {
        let rec = dispatch(&[r#"{"event":"retweet","source":{"id":1},"target":{"id":2}}"#]);
        assert!(rec.messages.is_empty());
        assert!(rec.errors.is_empty());
    }

    #[test]
    fn test_warnings() {
        let rec = dispatch(&[
            r#"{"warning":{"code":"FOLLOWS_OVER_LIMIT","message":"too many","user_id":13}}"#,
            r#"{"warning":{"code":"FALLING_BEHIND","message":"behind","percent_full":90}}"#,
        ]);
        assert!(rec.errors.is_empty(), "{:?}", rec.errors);
        assert!(matches!(
            &rec.messages[0],
            StreamMessage::TooManyFollowsWarning { user_id: 13, .. }
        ));
        assert!(matches!(
            &rec.messages[1],
            StreamMessage::StallWarning {
                percent_full: Some(90),
                ..
            }
        ));
    }

    #[test]
    fn test_fallback() {
        let rec = dispatch(&[
            r#"{"disconnect":{"code":12,"stream_name":"s","reason":"shed"}}"#,
            r#"{"disconnect":{"code":99,"stream_name":"s","reason":"?"}}"#,
            r#"{"something":"else"}"#,
        ]);
        assert!(matches!(
            &rec.messages[0],
            StreamMessage::Disconnect {
                code: DisconnectCode::ShedLoad,
                ..
            }
        ));
        assert!(matches!(&rec.messages[1], StreamMessage::Unknown(_)));
        assert_eq!(rec.errors.len(), 1);
        assert!(rec.errors[0].is_dispatch_failure());
        assert_eq!(
            rec.errors[0].raw(),
            r#"{"disconnect":{"code":99,"stream_name":"s","reason":"?"}}"#
        );
    }

    #[test]
    fn test_failures_are_isolated() {
        let rec = dispatch(&["not json", "[1,2]", r#"{"friends":[7]}"#]);
        assert_eq!(rec.errors.len(), 2);
        assert!(rec.errors[0].is_parse_failure());
        assert_eq!(rec.errors[0].raw(), "not json");
        assert!(rec.errors[1].is_protocol_failure());
        assert_eq!(rec.messages, [StreamMessage::Enumeration { ids: vec![7] }]);
    }
}
