use feedpump_json::JsonValue;

use crate::field::{optional_i64, optional_str, require_id, require_str, required, wrong_type};
use crate::{parse_created_at, PayloadErr, PayloadResult, Timestamp};

#[derive(Debug, Clone, PartialEq)]
/// An account. Only identity fields are decoded; everything else stays in `json`.
pub struct User {
    pub id: i64,
    pub screen_name: Option<String>,
    pub name: Option<String>,
    pub json: JsonValue,
}

#[derive(Debug, Clone, PartialEq)]
/// A feed post.
pub struct Status {
    pub id: i64,
    pub text: String,
    pub user: User,
    pub created_at: Option<Timestamp>,
    pub retweeted_status: Option<Box<Status>>,
    pub quoted_status: Option<Box<Status>>,
    pub json: JsonValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub id: i64,
    pub name: String,
    pub full_name: Option<String>,
    /// Decoded from the `user` field.
    pub owner: Option<User>,
    pub json: JsonValue,
}

#[derive(Debug, Clone, PartialEq)]
/// The application whose access was revoked or restored.
pub struct AccessInformation {
    pub token: String,
    pub client_application_id: Option<i64>,
    pub client_application_name: Option<String>,
    pub client_application_url: Option<String>,
    pub json: JsonValue,
}

impl User {
    pub fn screen_name(&self) -> &str {
        self.screen_name.as_deref().unwrap_or_default()
    }
}

impl Status {
    /// A status carries its text and its author. Cheap: no field is decoded.
    pub fn is_status_shape(value: &JsonValue) -> bool {
        (value.contains_key("text") || value.contains_key("full_text")) && value.contains_key("user")
    }

    /// The status whose content is shown: the retweeted one for a retweet.
    pub fn original(&self) -> &Status {
        match &self.retweeted_status {
            Some(status) => status,
            None => self,
        }
    }
}

impl TryFrom<&JsonValue> for User {
    type Error = PayloadErr;

    fn try_from(value: &JsonValue) -> PayloadResult<Self> {
        expect_object(value, "user")?;
        Ok(Self {
            id: require_id(value)?,
            screen_name: optional_str(value, "screen_name")?.map(ToOwned::to_owned),
            name: optional_str(value, "name")?.map(ToOwned::to_owned),
            json: value.clone(),
        })
    }
}

impl TryFrom<&JsonValue> for Status {
    type Error = PayloadErr;

    fn try_from(value: &JsonValue) -> PayloadResult<Self> {
        expect_object(value, "status")?;
        let text = match optional_str(value, "full_text")? {
            Some(text) => text,
            None => require_str(value, "text")?,
        };
        let created_at = optional_str(value, "created_at")?
            .map(parse_created_at)
            .transpose()?;
        Ok(Self {
            id: require_id(value)?,
            text: text.to_owned(),
            user: User::try_from(required(value, "user")?)?,
            created_at,
            retweeted_status: nested_status(value, "retweeted_status")?,
            quoted_status: nested_status(value, "quoted_status")?,
            json: value.clone(),
        })
    }
}

impl TryFrom<&JsonValue> for List {
    type Error = PayloadErr;

    fn try_from(value: &JsonValue) -> PayloadResult<Self> {
        expect_object(value, "list")?;
        let owner = match value.get("user") {
            Some(JsonValue::Null) | None => None,
            Some(user) => Some(User::try_from(user)?),
        };
        Ok(Self {
            id: require_id(value)?,
            name: require_str(value, "name")?.to_owned(),
            full_name: optional_str(value, "full_name")?.map(ToOwned::to_owned),
            owner,
            json: value.clone(),
        })
    }
}

impl TryFrom<&JsonValue> for AccessInformation {
    type Error = PayloadErr;

    fn try_from(value: &JsonValue) -> PayloadResult<Self> {
        expect_object(value, "access information")?;
        let app = &value["client_application"];
        Ok(Self {
            token: require_str(value, "token")?.to_owned(),
            client_application_id: optional_i64(app, "id")?,
            client_application_name: optional_str(app, "name")?.map(ToOwned::to_owned),
            client_application_url: optional_str(app, "url")?.map(ToOwned::to_owned),
            json: value.clone(),
        })
    }
}

fn expect_object(value: &JsonValue, what: &'static str) -> PayloadResult<()> {
    if value.as_object().is_some() {
        Ok(())
    } else {
        Err(wrong_type(what, "object", value))
    }
}

fn nested_status(value: &JsonValue, field: &'static str) -> PayloadResult<Option<Box<Status>>> {
    match value.get(field) {
        Some(JsonValue::Null) | None => Ok(None),
        Some(v) => Ok(Some(Box::new(Status::try_from(v)?))),
    }
}
