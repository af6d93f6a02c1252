use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Priority levels, ordered from lowest to highest.
///
/// Travels over the wire and into storage as its ordinal `0..=4`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
#[serde(try_from = "u8", into = "u8")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    #[sea_orm(num_value = 0)]
    Lowest,
    #[sea_orm(num_value = 1)]
    Low,
    #[default]
    #[sea_orm(num_value = 2)]
    Normal,
    #[sea_orm(num_value = 3)]
    High,
    #[sea_orm(num_value = 4)]
    Highest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("priority must be between 0 and 4, got {0}")]
pub struct InvalidPriority(pub u8);

impl Priority {
    pub fn ordinal(self) -> u8 {
        match self {
            Priority::Lowest => 0,
            Priority::Low => 1,
            Priority::Normal => 2,
            Priority::High => 3,
            Priority::Highest => 4,
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.ordinal()
    }
}

impl TryFrom<u8> for Priority {
    type Error = InvalidPriority;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Priority::Lowest),
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Normal),
            3 => Ok(Priority::High),
            4 => Ok(Priority::Highest),
            other => Err(InvalidPriority(other)),
        }
    }
}

/// A persisted todo item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Assigned by the repository on creation, immutable afterwards
    #[ts(as = "String")]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_complete: bool,
    #[schema(value_type = u8, minimum = 0, maximum = 4)]
    #[ts(type = "0 | 1 | 2 | 3 | 4")]
    pub priority: Priority,
}

/// Request body for `POST /todos` and `PUT /todos/{id}`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TodoPayload {
    /// Must be empty on create; on update, empty or equal to the path id
    #[serde(default, deserialize_with = "empty_id")]
    #[schema(value_type = Option<String>, format = Uuid)]
    #[ts(as = "Option<String>")]
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 128))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    #[schema(value_type = u8, minimum = 0, maximum = 4)]
    #[ts(type = "0 | 1 | 2 | 3 | 4")]
    pub priority: Priority,
}

impl TodoPayload {
    /// Build a [`Todo`] with the given id
    pub fn into_todo(self, id: Uuid) -> Todo {
        Todo {
            id,
            title: self.title,
            description: self.description,
            is_complete: self.is_complete,
            priority: self.priority,
        }
    }
}

/// `null`, `""` and the nil UUID all mean "no id".
fn empty_id<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => {
            let id = Uuid::parse_str(s).map_err(serde::de::Error::custom)?;
            Ok((!id.is_nil()).then_some(id))
        }
    }
}

/// Query string for `GET /todos`; every parameter is optional and they are ANDed
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TodoQuery {
    /// Only todos with exactly this priority (0-4)
    #[param(value_type = Option<u8>, minimum = 0, maximum = 4)]
    pub priority: Option<Priority>,
    pub is_complete: Option<bool>,
    /// Case-insensitive substring of the title
    pub title: Option<String>,
}
