use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::Display;

use crate::record::Record;

/// The largest `x` coordinate a flat may have.
pub const MAX_X: i64 = 713;

/// A single apartment. Flats are ordered by `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flat {
    // Assigned by the store; whatever the client sends is overwritten on insert.
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub coordinates: Coordinates,
    #[serde(with = "date_format", default = "today")]
    pub creation_date: NaiveDate,
    pub area: f64,
    pub number_of_rooms: i64,
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default)]
    pub view: Option<View>,
    #[serde(default)]
    pub house: Option<House>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i64,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct House {
    #[serde(default)]
    pub name: Option<String>,
    pub year: i64,
    pub number_of_floors: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    Street,
    Yard,
    Bad,
    Good,
}

impl Flat {
    pub fn new(
        name: impl Into<String>,
        coordinates: Coordinates,
        area: f64,
        number_of_rooms: i64,
    ) -> Flat {
        Flat {
            id: 0,
            name: name.into(),
            coordinates,
            creation_date: today(),
            area,
            number_of_rooms,
            height: None,
            view: None,
            house: None,
        }
    }
}

impl Record for Flat {
    type Key = str;

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn key(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> bool {
        let house_is_valid = self.house.as_ref().map_or(true, House::validate);

        self.id > 0
            && !self.name.trim().is_empty()
            && self.coordinates.validate()
            && self.area.is_finite()
            && self.area > 0.0
            && self.number_of_rooms > 0
            && self.height.map_or(true, |height| height > 0)
            && house_is_valid
    }
}

impl Coordinates {
    fn validate(&self) -> bool {
        self.x <= MAX_X && self.y.is_finite()
    }
}

impl House {
    fn validate(&self) -> bool {
        let name_is_valid = self
            .name
            .as_deref()
            .map_or(true, |name| !name.trim().is_empty());

        name_is_valid && self.year > 0 && self.number_of_floors > 0
    }
}

impl fmt::Display for Flat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Flat #{} \"{}\": coordinates=({}, {}), created={}, area={}, rooms={}",
            self.id,
            self.name,
            self.coordinates.x,
            self.coordinates.y,
            self.creation_date.format(date_format::FORMAT),
            self.area,
            self.number_of_rooms,
        )?;

        if let Some(height) = self.height {
            write!(f, ", height={}", height)?;
        }
        if let Some(view) = self.view {
            write!(f, ", view={}", view)?;
        }
        if let Some(house) = &self.house {
            write!(
                f,
                ", house=({}, year {}, {} floors)",
                house.name.as_deref().unwrap_or("unnamed"),
                house.year,
                house.number_of_floors
            )?;
        }

        Ok(())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Dates are stored as plain `YYYY-MM-DD` strings.
mod date_format {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = format!("{}", date.format(FORMAT));
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
