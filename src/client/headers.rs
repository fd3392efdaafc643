//! Typed decoding of rate-limit response headers
//!
//! A header record is declared once through [`header_record!`], which expands
//! into the struct itself, a static `{field, wire name, kind}` table and a
//! `decode` function. Every field type must implement [`FromHeader`]; a field
//! of any other type is rejected at compile time.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use compact_str::CompactString;
pub use reqwest::header::HeaderMap;
use thiserror::Error;

use super::error::{ClientError, Result};

/// Declares a header-backed record.
///
/// Wire names default to [`field_to_header_name`] applied to the field
/// identifier; `=> "Wire-Name"` after the type overrides it.
///
/// ```
/// use std::time::Duration;
///
/// gh_activity::header_record! {
///     #[derive(Debug)]
///     pub struct RetryHints {
///         pub retry_after: Duration,
///         pub request_id: compact_str::CompactString => "X-GitHub-Request-Id",
///     }
/// }
///
/// assert_eq!(RetryHints::FIELDS[0].wire_name(), "Retry-After");
/// assert_eq!(RetryHints::FIELDS[1].wire_name(), "X-GitHub-Request-Id");
/// ```
#[macro_export]
macro_rules! header_record {
    (@rename) => { None };
    (@rename $wire:literal) => { Some($wire) };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(=> $wire:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field: $ty, )*
        }

        impl $name {
            /// Header table backing [`Self::decode`]
            pub const FIELDS: &'static [$crate::client::headers::HeaderField] = &[
                $(
                    $crate::client::headers::HeaderField {
                        ident: stringify!($field),
                        rename: $crate::header_record!(@rename $($wire)?),
                        kind: <$ty as $crate::client::headers::FromHeader>::KIND,
                    },
                )*
            ];

            /// Decode every declared field from a response header map
            pub fn decode(headers: &$crate::client::headers::HeaderMap) -> $crate::client::Result<Self> {
                Ok(Self {
                    $(
                        $field: $crate::client::headers::decode_field(
                            headers,
                            &$crate::client::headers::wire_name(
                                stringify!($field),
                                $crate::header_record!(@rename $($wire)?),
                            ),
                        )?,
                    )*
                })
            }
        }
    };
}

header_record! {
    /// Poll and rate-limit state advertised by GitHub on every response
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RateLimitHeaders {
        /// Minimum wait before polling the same resource again
        pub x_poll_interval: Duration,
        /// Requests allowed per window
        pub x_ratelimit_limit: i64,
        /// Requests left in the current window
        pub x_ratelimit_remaining: i64,
        /// Requests consumed in the current window
        pub x_ratelimit_used: i64,
        /// When the current window resets
        pub x_ratelimit_reset: DateTime<Utc>,
        /// Named rate-limit bucket, e.g. `core`
        pub x_ratelimit_resource: CompactString,
    }
}

impl RateLimitHeaders {
    /// No requests are left in the current window
    pub fn is_exhausted(&self) -> bool {
        self.x_ratelimit_remaining == 0
    }

    /// Time left until the window resets, zero once it has passed
    pub fn time_until_reset(&self) -> Duration {
        (self.x_ratelimit_reset - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// Decoded representation of a header field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    Integer,
    Text,
    /// Integer count of seconds
    Seconds,
    /// Integer unix timestamp in seconds
    UnixTime,
}

/// One entry of a record's header table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderField {
    pub ident: &'static str,
    pub rename: Option<&'static str>,
    pub kind: HeaderKind,
}

impl HeaderField {
    pub fn wire_name(&self) -> CompactString {
        wire_name(self.ident, self.rename)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderParseError {
    #[error("not a base-10 integer")]
    NotAnInteger,
    #[error("invalid negative timestamp")]
    NegativeTimestamp,
    #[error("invalid negative duration")]
    NegativeDuration,
    #[error("timestamp out of range")]
    TimestampOutOfRange,
    #[error("value is not visible ASCII")]
    NotVisibleAscii,
}

/// Types a header field may be decoded into
///
/// `raw` is `None` when the header is absent or empty.
pub trait FromHeader: Sized {
    const KIND: HeaderKind;

    fn from_header(raw: Option<&str>) -> std::result::Result<Self, HeaderParseError>;
}

impl FromHeader for i64 {
    const KIND: HeaderKind = HeaderKind::Integer;

    fn from_header(raw: Option<&str>) -> std::result::Result<Self, HeaderParseError> {
        raw.map_or(Ok(0), |s| s.parse().map_err(|_| HeaderParseError::NotAnInteger))
    }
}

impl FromHeader for CompactString {
    const KIND: HeaderKind = HeaderKind::Text;

    fn from_header(raw: Option<&str>) -> std::result::Result<Self, HeaderParseError> {
        Ok(raw.map(CompactString::from).unwrap_or_default())
    }
}

/// Whole seconds. A negative count is rejected with
/// [`HeaderParseError::NegativeDuration`], failing the whole request, rather
/// than being read as no wait.
impl FromHeader for Duration {
    const KIND: HeaderKind = HeaderKind::Seconds;

    fn from_header(raw: Option<&str>) -> std::result::Result<Self, HeaderParseError> {
        let seconds = i64::from_header(raw)?;
        u64::try_from(seconds)
            .map(Duration::from_secs)
            .map_err(|_| HeaderParseError::NegativeDuration)
    }
}

impl FromHeader for DateTime<Utc> {
    const KIND: HeaderKind = HeaderKind::UnixTime;

    fn from_header(raw: Option<&str>) -> std::result::Result<Self, HeaderParseError> {
        let Some(raw) = raw else {
            return Ok(Utc::now());
        };

        let seconds: i64 = raw.parse().map_err(|_| HeaderParseError::NotAnInteger)?;
        if seconds < 0 {
            return Err(HeaderParseError::NegativeTimestamp);
        }

        Utc.timestamp_opt(seconds, 0)
            .single()
            .ok_or(HeaderParseError::TimestampOutOfRange)
    }
}

/// Derive a wire header name from a field identifier.
///
/// Every word starts with an upper-case letter and words are joined with
/// hyphens. A word boundary is an upper-case letter other than the first
/// character, or an underscore. Letters of snake_case identifiers are
/// lower-cased after the first one of each word.
///
/// # Panics
///
/// Panics on an empty identifier.
pub fn field_to_header_name(ident: &str) -> CompactString {
    assert!(!ident.is_empty(), "empty field identifier");

    let snake_case = ident.contains('_');
    let mut name = CompactString::with_capacity(ident.len() + 3);
    let mut word_start = true;

    for c in ident.chars() {
        if c == '_' {
            word_start = true;
            continue;
        }

        if c.is_uppercase() && !name.is_empty() {
            word_start = true;
        }

        if word_start {
            if !name.is_empty() {
                name.push('-');
            }
            name.extend(c.to_uppercase());
            word_start = false;
        } else if snake_case {
            name.extend(c.to_lowercase());
        } else {
            name.push(c);
        }
    }

    name
}

pub fn wire_name(ident: &str, rename: Option<&str>) -> CompactString {
    rename.map_or_else(|| field_to_header_name(ident), CompactString::from)
}

/// Decode a single header, attributing failures to its wire name
pub fn decode_field<T: FromHeader>(headers: &HeaderMap, name: &str) -> Result<T> {
    let raw = match headers.get(name) {
        Some(value) => value.to_str().map_err(|_| {
            ClientError::header_decode(
                name,
                String::from_utf8_lossy(value.as_bytes()),
                HeaderParseError::NotVisibleAscii,
            )
        })?,
        None => "",
    };
    let raw = Some(raw).filter(|v| !v.is_empty());

    T::from_header(raw)
        .map_err(|reason| ClientError::header_decode(name, raw.unwrap_or_default(), reason))
}
