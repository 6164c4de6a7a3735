use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::LeadError;

/// Primary key of the `leads` table.
pub type LeadId = i64;

const DEFAULT_CITY: &str = "Desconocida";

/// Where a lead is in the sales pipeline.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub enum LeadStatus {
    /// Just captured.
    #[default]
    Nuevo,
    /// Someone reached out.
    Contactado,
    /// Waiting on the lead.
    Pendiente,
    /// Won.
    Cerrado,
    /// Dropped.
    Descartado,
    /// A status written by some other tool. Read back, never written.
    #[serde(other)]
    Otro,
}

impl LeadStatus {
    /// Every status a lead can be set to, in pipeline order.
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::Nuevo,
        LeadStatus::Contactado,
        LeadStatus::Pendiente,
        LeadStatus::Cerrado,
        LeadStatus::Descartado,
    ];

    /// Returns the name stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Nuevo => "Nuevo",
            LeadStatus::Contactado => "Contactado",
            LeadStatus::Pendiente => "Pendiente",
            LeadStatus::Cerrado => "Cerrado",
            LeadStatus::Descartado => "Descartado",
            LeadStatus::Otro => "Otro",
        }
    }

    /// Returns `false` for [`LeadStatus::Otro`].
    #[inline]
    pub fn is_known(&self) -> bool {
        *self != LeadStatus::Otro
    }
}

impl Display for LeadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = LeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LeadError::Invalid(format!("unknown status `{s}`")))
    }
}

/// A stored lead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    /// Database id.
    pub id: LeadId,
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Business name.
    #[serde(default)]
    pub business: Option<String>,
    /// Service the lead asked about.
    #[serde(default)]
    pub service: Option<String>,
    /// Free-form message.
    #[serde(default)]
    pub message: Option<String>,
    /// Pipeline status.
    pub status: LeadStatus,
    /// City the lead came from.
    #[serde(default)]
    pub city: Option<String>,
    /// Capture time, assigned by the database.
    ///
    /// Columns without a time zone are read as UTC.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// A lead captured by the landing page form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLead {
    /// Contact name, required.
    pub name: String,
    /// Contact email, required.
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Business name.
    #[serde(default)]
    pub business: Option<String>,
    /// Service the lead asked about.
    #[serde(default)]
    pub service: Option<String>,
    /// Free-form message, stored as `""` when absent.
    #[serde(default)]
    pub message: Option<String>,
    /// Initial status, `Nuevo` when absent.
    #[serde(default)]
    pub status: Option<LeadStatus>,
    /// City, `Desconocida` when absent.
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub(crate) struct InsertRow {
    name: String,
    email: String,
    phone: Option<String>,
    business: Option<String>,
    service: Option<String>,
    message: String,
    status: LeadStatus,
    city: String,
}

impl NewLead {
    /// Checks required fields and fills in the defaults.
    pub(crate) fn into_row(self) -> Result<InsertRow, LeadError> {
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() {
            return Err(LeadError::Invalid("name is required".to_owned()));
        }
        if !email.contains('@') {
            return Err(LeadError::Invalid(format!(
                "`{email}` is not an email address"
            )));
        }
        if let Some(status) = self.status {
            check_status(status)?;
        }
        Ok(InsertRow {
            name: name.to_owned(),
            email: email.to_owned(),
            phone: non_blank(self.phone),
            business: non_blank(self.business),
            service: non_blank(self.service),
            message: self.message.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            city: non_blank(self.city)
                .unwrap_or_else(|| DEFAULT_CITY.to_owned()),
        })
    }
}

/// A partial update; only the fields that are set are written.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadUpdate {
    /// New contact name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New business name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business: Option<String>,
    /// New service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// New message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    /// New city.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl LeadUpdate {
    /// Creates an update that only changes the status.
    #[inline]
    pub fn status(status: LeadStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Returns `true` if nothing would be written.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn validate(&self) -> Result<(), LeadError> {
        if self.is_empty() {
            return Err(LeadError::Invalid("nothing to update".to_owned()));
        }
        match self.status {
            Some(status) => check_status(status),
            None => Ok(()),
        }
    }
}

fn check_status(status: LeadStatus) -> Result<(), LeadError> {
    if status.is_known() {
        Ok(())
    } else {
        Err(LeadError::Invalid("unknown status".to_owned()))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn deserialize_timestamp<'de, D>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| {
        de::Error::custom(format!("invalid timestamp `{raw}`"))
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let with_offset = DateTime::parse_from_rfc3339(raw).or_else(|_| {
        DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z")
    });
    if let Ok(timestamp) = with_offset {
        return Some(timestamp.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .into_iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}
