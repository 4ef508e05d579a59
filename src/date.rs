//! Plist date values: an instant parsed from Apple's XML plist date format.

use std::fmt;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// A UTC instant, as stored by the plist `<date>` element.
///
/// The XML plist date grammar is `YYYY-MM-DDTHH:MM:SSZ` (RFC 3339 restricted
/// to a `Z` offset), which is what `from_xml_format`/`to_xml_format` parse
/// and render.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date {
    inner: OffsetDateTime,
}

impl Date {
    /// Parses an XML plist date string (`YYYY-MM-DDTHH:MM:SSZ`, or any valid
    /// RFC 3339 instant).
    pub fn from_xml_format(s: &str) -> Result<Date, InvalidXmlDate> {
        let inner = OffsetDateTime::parse(s, &Rfc3339).map_err(|_| InvalidXmlDate)?;
        Ok(Date { inner })
    }

    /// Renders this instant back into the XML plist date format.
    pub fn to_xml_format(&self) -> String {
        // `OffsetDateTime::format` only fails on a writer error, which a
        // `String` buffer never produces.
        self.inner
            .to_offset(time::UtcOffset::UTC)
            .format(&Rfc3339)
            .expect("formatting an OffsetDateTime as RFC 3339 is infallible")
    }
}

impl fmt::Debug for Date {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Date({})", self.to_xml_format())
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_xml_format())
    }
}

impl From<OffsetDateTime> for Date {
    fn from(inner: OffsetDateTime) -> Self {
        Date { inner }
    }
}

impl From<Date> for OffsetDateTime {
    fn from(date: Date) -> OffsetDateTime {
        date.inner
    }
}

/// The plist `<date>` element did not contain a valid RFC 3339 / XML plist instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidXmlDate;

impl fmt::Display for InvalidXmlDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid plist date string")
    }
}

impl std::error::Error for InvalidXmlDate {}
