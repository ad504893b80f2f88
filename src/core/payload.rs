//! Request payloads for the shipment API
//!
//! Bodies are rendered with [`to_wire_json`], which reproduces the spacing
//! and ASCII escaping the downstream consumers of the output file expect:
//! `{"purchase_order": "PO1"}`.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;
use thiserror::Error;
use tracing::{error, warn};

/// Body of the search call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPayload {
    pub purchase_order: String,
}

impl SearchPayload {
    pub fn new(purchase_order: impl Into<String>) -> Self {
        Self {
            purchase_order: purchase_order.into(),
        }
    }
}

/// Delivery appointment block of an update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryDates {
    /// `YYYY-MM-DD`
    pub delivery_appointment_date: String,
    /// `HH:MM:SS`
    pub delivery_time_from: String,
    pub delivery_appointment: String,
}

/// Why appointment fields could not become a [`DeliveryDates`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppointmentError {
    #[error("missing appointment fields (date, time and number are all required)")]
    MissingFields,
    #[error("invalid appointment date '{0}', expected YYYYMMDD")]
    InvalidDate(String),
    #[error("invalid appointment time '{0}', expected HHMMSS")]
    InvalidTime(String),
}

impl DeliveryDates {
    /// Build from the compact `YYYYMMDD` / `HHMMSS` input forms.
    pub fn from_compact(date: &str, time: &str, number: &str) -> Result<Self, AppointmentError> {
        if date.is_empty() || time.is_empty() || number.is_empty() {
            return Err(AppointmentError::MissingFields);
        }

        let date_obj =
            parse_compact_date(date).ok_or_else(|| AppointmentError::InvalidDate(date.to_string()))?;
        let time_obj =
            parse_compact_time(time).ok_or_else(|| AppointmentError::InvalidTime(time.to_string()))?;

        Ok(Self {
            delivery_appointment_date: date_obj.format("%Y-%m-%d").to_string(),
            delivery_time_from: time_obj.format("%H:%M:%S").to_string(),
            delivery_appointment: number.to_string(),
        })
    }
}

/// Body of the update call; `{}` when the appointment fields were unusable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<DeliveryDates>,
}

impl UpdatePayload {
    /// Build an update for one appointment, abandoning it (empty payload) when
    /// the fields are missing or malformed.
    pub fn for_appointment(date: &str, time: &str, number: &str) -> Self {
        match DeliveryDates::from_compact(date, time, number) {
            Ok(dates) => Self { dates: Some(dates) },
            Err(AppointmentError::MissingFields) => {
                warn!(
                    "Missing parameters for update payload: date='{}' time='{}' number='{}'",
                    date, time, number
                );
                Self::default()
            }
            Err(e) => {
                error!("Error generating update payload: {}", e);
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_none()
    }
}

fn parse_compact_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = value[0..4].parse().ok()?;
    let month = value[4..6].parse().ok()?;
    let day = value[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_compact_time(value: &str) -> Option<NaiveTime> {
    if value.len() != 6 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour = value[0..2].parse().ok()?;
    let minute = value[2..4].parse().ok()?;
    let second = value[4..6].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, second)
}

/// Serialize a payload in wire form.
pub fn to_wire_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, WireFormatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

/// `", "` / `": "` separators, non-ASCII escaped as lowercase `\uXXXX`
struct WireFormatter;

impl Formatter for WireFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}
