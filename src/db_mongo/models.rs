use chrono::{Local, NaiveDateTime};
use mongodb::bson::{self, Bson, Document};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// `DD/MM/YYYY HH:MM:SS`, the format of `create_date` and `review_date`.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Field overwritten by the single-document update operation.
pub const SAMPLE_FIELD_NAME: &str = "sample_field";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Restaurant,
    Review,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Restaurant => "restaurant",
            RecordType::Review => "review",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Bson>,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub name: String,
    pub street_address: String,
    pub description: String,
    pub create_date: String,
}

/// `rating` is stored as given; no range is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Bson>,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub restaurant: Bson,
    pub user_name: String,
    pub rating: i32,
    pub review_text: String,
    pub review_date: String,
}

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl RestaurantRecord {
    pub fn new(
        name: impl Into<String>,
        street_address: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new_at(name, street_address, description, now())
    }

    pub fn new_at(
        name: impl Into<String>,
        street_address: impl Into<String>,
        description: impl Into<String>,
        created: NaiveDateTime,
    ) -> Self {
        Self {
            id: None,
            record_type: RecordType::Restaurant,
            name: name.into(),
            street_address: street_address.into(),
            description: description.into(),
            create_date: format_timestamp(created),
        }
    }

    pub fn to_document(&self) -> Result<Document> {
        Ok(bson::to_document(self)?)
    }
}

impl ReviewRecord {
    pub fn new(
        restaurant_id: Bson,
        user_name: impl Into<String>,
        rating: i32,
        review_text: impl Into<String>,
    ) -> Self {
        Self::new_at(restaurant_id, user_name, rating, review_text, now())
    }

    pub fn new_at(
        restaurant_id: Bson,
        user_name: impl Into<String>,
        rating: i32,
        review_text: impl Into<String>,
        reviewed: NaiveDateTime,
    ) -> Self {
        Self {
            id: None,
            record_type: RecordType::Review,
            restaurant: restaurant_id,
            user_name: user_name.into(),
            rating,
            review_text: review_text.into(),
            review_date: format_timestamp(reviewed),
        }
    }

    pub fn to_document(&self) -> Result<Document> {
        Ok(bson::to_document(self)?)
    }
}
