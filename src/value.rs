//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

//! Typed attribute values and the `Bag` collection type.
//!
//! A [`Bag`] is the only collection type XACML knows: an unordered
//! multiset of values sharing a single [`Datatype`]. Every attribute
//! lookup against a request returns a bag, even when exactly one (or
//! zero) values are present.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// The canonical XACML core datatypes, identified by URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    String,
    Boolean,
    Integer,
    Double,
    Date,
    Time,
    DateTime,
    DayTimeDuration,
    YearMonthDuration,
    AnyUri,
    Rfc822Name,
    X500Name,
    HexBinary,
    Base64Binary,
    IpAddress,
    DnsName,
}

impl Datatype {
    /// The datatype's canonical XACML/XML-Schema URI.
    #[must_use]
    pub fn uri(&self) -> &'static str {
        match self {
            Datatype::String => "http://www.w3.org/2001/XMLSchema#string",
            Datatype::Boolean => "http://www.w3.org/2001/XMLSchema#boolean",
            Datatype::Integer => "http://www.w3.org/2001/XMLSchema#integer",
            Datatype::Double => "http://www.w3.org/2001/XMLSchema#double",
            Datatype::Date => "http://www.w3.org/2001/XMLSchema#date",
            Datatype::Time => "http://www.w3.org/2001/XMLSchema#time",
            Datatype::DateTime => "http://www.w3.org/2001/XMLSchema#dateTime",
            Datatype::DayTimeDuration => {
                "urn:oasis:names:tc:xacml:2.0:data-type:dayTimeDuration"
            }
            Datatype::YearMonthDuration => {
                "urn:oasis:names:tc:xacml:2.0:data-type:yearMonthDuration"
            }
            Datatype::AnyUri => "http://www.w3.org/2001/XMLSchema#anyURI",
            Datatype::Rfc822Name => "urn:oasis:names:tc:xacml:1.0:data-type:rfc822Name",
            Datatype::X500Name => "urn:oasis:names:tc:xacml:1.0:data-type:x500Name",
            Datatype::HexBinary => "http://www.w3.org/2001/XMLSchema#hexBinary",
            Datatype::Base64Binary => "http://www.w3.org/2001/XMLSchema#base64Binary",
            Datatype::IpAddress => "urn:oasis:names:tc:xacml:2.0:data-type:ipAddress",
            Datatype::DnsName => "urn:oasis:names:tc:xacml:2.0:data-type:dnsName",
        }
    }

    /// Look up a datatype by its canonical URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Datatype> {
        use Datatype::*;
        [
            String, Boolean, Integer, Double, Date, Time, DateTime, DayTimeDuration,
            YearMonthDuration, AnyUri, Rfc822Name, X500Name, HexBinary, Base64Binary, IpAddress,
            DnsName,
        ]
        .into_iter()
        .find(|dt| dt.uri() == uri)
    }
}

impl fmt::Display for Datatype {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.uri())
    }
}

/// A signed duration expressed in whole days/hours/minutes/seconds,
/// XACML's `dayTimeDuration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayTimeDuration {
    pub negative: bool,
    pub seconds: i64,
}

/// A signed duration expressed in whole years/months, XACML's
/// `yearMonthDuration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonthDuration {
    pub negative: bool,
    pub months: i64,
}

/// A single typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    DayTimeDuration(DayTimeDuration),
    YearMonthDuration(YearMonthDuration),
    AnyUri(String),
    Rfc822Name(String),
    X500Name(String),
    HexBinary(Vec<u8>),
    Base64Binary(Vec<u8>),
    IpAddress(String),
    DnsName(String),
}

impl AttributeValue {
    #[must_use]
    pub fn datatype(&self) -> Datatype {
        match self {
            AttributeValue::String(_) => Datatype::String,
            AttributeValue::Boolean(_) => Datatype::Boolean,
            AttributeValue::Integer(_) => Datatype::Integer,
            AttributeValue::Double(_) => Datatype::Double,
            AttributeValue::Date(_) => Datatype::Date,
            AttributeValue::Time(_) => Datatype::Time,
            AttributeValue::DateTime(_) => Datatype::DateTime,
            AttributeValue::DayTimeDuration(_) => Datatype::DayTimeDuration,
            AttributeValue::YearMonthDuration(_) => Datatype::YearMonthDuration,
            AttributeValue::AnyUri(_) => Datatype::AnyUri,
            AttributeValue::Rfc822Name(_) => Datatype::Rfc822Name,
            AttributeValue::X500Name(_) => Datatype::X500Name,
            AttributeValue::HexBinary(_) => Datatype::HexBinary,
            AttributeValue::Base64Binary(_) => Datatype::Base64Binary,
            AttributeValue::IpAddress(_) => Datatype::IpAddress,
            AttributeValue::DnsName(_) => Datatype::DnsName,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s)
            | AttributeValue::AnyUri(s)
            | AttributeValue::Rfc822Name(s)
            | AttributeValue::X500Name(s)
            | AttributeValue::IpAddress(s)
            | AttributeValue::DnsName(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            AttributeValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            AttributeValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            AttributeValue::Time(t) => Some(*t),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date_time(&self) -> Option<NaiveDateTime> {
        match self {
            AttributeValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_day_time_duration(&self) -> Option<DayTimeDuration> {
        match self {
            AttributeValue::DayTimeDuration(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_year_month_duration(&self) -> Option<YearMonthDuration> {
        match self {
            AttributeValue::YearMonthDuration(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{s}"),
            AttributeValue::Boolean(b) => write!(f, "{b}"),
            AttributeValue::Integer(i) => write!(f, "{i}"),
            AttributeValue::Double(d) => write!(f, "{d}"),
            AttributeValue::Date(d) => write!(f, "{d}"),
            AttributeValue::Time(t) => write!(f, "{t}"),
            AttributeValue::DateTime(dt) => write!(f, "{dt}"),
            AttributeValue::DayTimeDuration(d) => write!(
                f,
                "{}P{}DT{}S",
                if d.negative { "-" } else { "" },
                d.seconds / 86400,
                d.seconds % 86400
            ),
            AttributeValue::YearMonthDuration(d) => write!(
                f,
                "{}P{}Y{}M",
                if d.negative { "-" } else { "" },
                d.months / 12,
                d.months % 12
            ),
            AttributeValue::AnyUri(s)
            | AttributeValue::Rfc822Name(s)
            | AttributeValue::X500Name(s)
            | AttributeValue::IpAddress(s)
            | AttributeValue::DnsName(s) => write!(f, "{s}"),
            AttributeValue::HexBinary(b) | AttributeValue::Base64Binary(b) => {
                write!(f, "{}", b.iter().map(|byte| format!("{byte:02x}")).collect::<String>())
            }
        }
    }
}

/// An unordered multiset of values of a single datatype.
///
/// `Bag` is the sole collection type XACML knows. A scalar function
/// never accepts a `Bag` directly; only bag-typed functions do.
#[derive(Debug, Clone, PartialEq)]
pub struct Bag {
    pub datatype: Datatype,
    values: Vec<AttributeValue>,
}

impl Bag {
    #[must_use]
    pub fn new(datatype: Datatype) -> Self {
        Bag {
            datatype,
            values: Vec::new(),
        }
    }

    /// Build a bag from values, all of which must share `datatype`.
    ///
    /// # Panics
    /// Panics if any value's datatype does not match `datatype`; this
    /// is a programmer error at call sites inside this crate and never
    /// triggered by request data (request bags are built value-by-value
    /// with datatype checked at insertion).
    #[must_use]
    pub fn from_values(datatype: Datatype, values: Vec<AttributeValue>) -> Self {
        debug_assert!(values.iter().all(|v| v.datatype() == datatype));
        Bag { datatype, values }
    }

    #[must_use]
    pub fn empty(datatype: Datatype) -> Self {
        Bag::new(datatype)
    }

    pub fn push(&mut self, value: AttributeValue) {
        self.values.push(value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn contains(&self, value: &AttributeValue) -> bool {
        self.values.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeValue> {
        self.values.iter()
    }

    #[must_use]
    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    /// The single contained value, if and only if the bag has exactly
    /// one member.
    #[must_use]
    pub fn one_and_only(&self) -> Option<&AttributeValue> {
        if self.values.len() == 1 {
            self.values.first()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datatype_uri_round_trips() {
        for dt in [Datatype::String, Datatype::Integer, Datatype::Rfc822Name, Datatype::X500Name] {
            assert_eq!(Datatype::from_uri(dt.uri()), Some(dt));
        }
    }

    #[test]
    fn from_uri_rejects_unknown() {
        assert_eq!(Datatype::from_uri("not-a-datatype"), None);
    }

    #[test]
    fn one_and_only_requires_exactly_one_value() {
        let mut bag = Bag::empty(Datatype::Integer);
        assert_eq!(bag.one_and_only(), None);
        bag.push(AttributeValue::Integer(7));
        assert_eq!(bag.one_and_only(), Some(&AttributeValue::Integer(7)));
        bag.push(AttributeValue::Integer(8));
        assert_eq!(bag.one_and_only(), None);
    }
}
