use alloc::format;
use alloc::string::String;
use core::fmt;

use serde_core::Deserializer;
use serde_core::de::{Error, MapAccess, Unexpected, Visitor};
use vc_collections::{BoundType, Range};

use super::{Children, ContainerStrategy};
use crate::Value;
use crate::de::{DeserializeDriver, UntypedDeserializer, ValueDeserializer};
use crate::family::{Family, WrapperKind};
use crate::info::TypeDescriptor;

const LOWER_ENDPOINT: &str = "lowerEndpoint";
const LOWER_BOUND_TYPE: &str = "lowerBoundType";
const UPPER_ENDPOINT: &str = "upperEndpoint";
const UPPER_BOUND_TYPE: &str = "upperBoundType";

const FIELDS: &[&str] = &[LOWER_ENDPOINT, LOWER_BOUND_TYPE, UPPER_ENDPOINT, UPPER_BOUND_TYPE];

// -----------------------------------------------------------------------------
// RangeStrategy

/// Reads a range from its self-describing bounds.
///
/// The input is an object with `lowerEndpoint`, `lowerBoundType`,
/// `upperEndpoint` and `upperBoundType`; a missing side is unbounded.
/// Endpoints are read untyped and must be of the same kind. Numeric
/// endpoints are widened to a common kind first, so `1` and `2.5` bound a
/// float range.
///
/// # Examples
///
/// ```
/// use serde_core::de::DeserializeSeed;
/// use vc_collect_de::Value;
/// use vc_collect_de::de::DeserializeDriver;
/// use vc_collect_de::info::{TypeDescriptor, classes};
/// use vc_collect_de::strategy::RangeStrategy;
///
/// let strategy = RangeStrategy::new(TypeDescriptor::of(&classes::RANGE));
/// let mut input = serde_json::Deserializer::from_str(
///     r#"{"lowerEndpoint": 1, "lowerBoundType": "CLOSED", "upperEndpoint": 5, "upperBoundType": "OPEN"}"#,
/// );
/// let value = DeserializeDriver::new(&strategy).deserialize(&mut input).unwrap();
///
/// let range = value.as_range().unwrap();
/// assert_eq!(range.to_string(), "[1..5)");
/// assert!(range.contains(&Value::Int(4)));
/// ```
#[derive(Debug)]
pub struct RangeStrategy {
    descriptor: TypeDescriptor,
}

impl RangeStrategy {
    #[inline]
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self { descriptor }
    }
}

#[derive(Default)]
struct Side {
    endpoint: Option<Value>,
    bound_type: Option<BoundType>,
}

impl Side {
    fn finish<E: Error>(
        self,
        endpoint_field: &'static str,
    ) -> Result<Option<(Value, BoundType)>, E> {
        match (self.endpoint, self.bound_type) {
            (Some(endpoint), Some(bound_type)) => Ok(Some((endpoint, bound_type))),
            (Some(_), None) => Err(E::custom(format!(
                "`{endpoint_field}` given without its bound type"
            ))),
            // A bound type alone leaves the side unbounded.
            (None, _) => Ok(None),
        }
    }
}

fn read_bound_type<'de, A: MapAccess<'de>>(map: &mut A) -> Result<BoundType, A::Error> {
    let text: String = map.next_value()?;
    text.parse()
        .map_err(|_| A::Error::invalid_value(Unexpected::Str(&text), &"`OPEN` or `CLOSED`"))
}

/// Brings two endpoints to the same kind, widening numbers when they differ.
///
/// On failure, returns the kinds of the two endpoints.
fn same_kind(lower: Value, upper: Value) -> Result<(Value, Value), (&'static str, &'static str)> {
    use Value::{Float, Int, UInt};

    Ok(match (lower, upper) {
        (Int(lo), UInt(hi)) => match u64::try_from(lo) {
            Ok(lo) => (UInt(lo), UInt(hi)),
            Err(_) => (Float(lo as f64), Float(hi as f64)),
        },
        (UInt(lo), Int(hi)) => match u64::try_from(hi) {
            Ok(hi) => (UInt(lo), UInt(hi)),
            Err(_) => (Float(lo as f64), Float(hi as f64)),
        },
        (Int(lo), Float(hi)) => (Float(lo as f64), Float(hi)),
        (UInt(lo), Float(hi)) => (Float(lo as f64), Float(hi)),
        (Float(lo), Int(hi)) => (Float(lo), Float(hi as f64)),
        (Float(lo), UInt(hi)) => (Float(lo), Float(hi as f64)),
        (lo, hi) if lo.kind() == hi.kind() => (lo, hi),
        (lo, hi) => return Err((lo.kind(), hi.kind())),
    })
}

fn set_once<T, E: Error>(slot: &mut Option<T>, value: T, field: &'static str) -> Result<(), E> {
    if slot.is_some() {
        return Err(E::duplicate_field(field));
    }
    *slot = Some(value);
    Ok(())
}

struct RangeVisitor<'a> {
    descriptor: &'a TypeDescriptor,
}

impl<'de> Visitor<'de> for RangeVisitor<'_> {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an object describing a `{}`", self.descriptor)
    }

    fn visit_unit<E: Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let endpoint = DeserializeDriver::new(&UntypedDeserializer);
        let mut lower = Side::default();
        let mut upper = Side::default();

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                LOWER_ENDPOINT => {
                    let value = map.next_value_seed(endpoint)?;
                    set_once(&mut lower.endpoint, value, LOWER_ENDPOINT)?;
                }
                UPPER_ENDPOINT => {
                    let value = map.next_value_seed(endpoint)?;
                    set_once(&mut upper.endpoint, value, UPPER_ENDPOINT)?;
                }
                LOWER_BOUND_TYPE => {
                    let bound_type = read_bound_type(&mut map)?;
                    set_once(&mut lower.bound_type, bound_type, LOWER_BOUND_TYPE)?;
                }
                UPPER_BOUND_TYPE => {
                    let bound_type = read_bound_type(&mut map)?;
                    set_once(&mut upper.bound_type, bound_type, UPPER_BOUND_TYPE)?;
                }
                other => return Err(A::Error::unknown_field(other, FIELDS)),
            }
        }

        let (lower, upper) = match (lower.finish(LOWER_ENDPOINT)?, upper.finish(UPPER_ENDPOINT)?) {
            (Some((lo, lo_type)), Some((hi, hi_type))) => {
                let (lo, hi) = same_kind(lo, hi).map_err(|(lo, hi)| {
                    A::Error::custom(format!("range endpoints differ in kind: {lo} and {hi}"))
                })?;
                (Some((lo, lo_type)), Some((hi, hi_type)))
            }
            sides => sides,
        };

        let range = Range::new(lower, upper).map_err(A::Error::custom)?;
        Ok(Value::Range(range.into()))
    }
}

impl ValueDeserializer for RangeStrategy {
    fn deserialize<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error> {
        deserializer.deserialize_any(RangeVisitor {
            descriptor: &self.descriptor,
        })
    }
}

impl ContainerStrategy for RangeStrategy {
    #[inline]
    fn family(&self) -> Family {
        Family::ScalarWrapper(WrapperKind::Range)
    }

    #[inline]
    fn descriptor(&self) -> Option<&TypeDescriptor> {
        Some(&self.descriptor)
    }

    fn children(&self) -> Children {
        Children::default()
    }
}

#[cfg(test)]
mod tests {
    use super::RangeStrategy;
    use crate::Value;
    use crate::de::DeserializeDriver;
    use crate::info::{TypeDescriptor, classes};
    use alloc::string::ToString;
    use serde_core::de::DeserializeSeed;
    use vc_collections::BoundType;

    fn read(input: &str) -> Result<Value, serde_json::Error> {
        let strategy = RangeStrategy::new(TypeDescriptor::of(&classes::RANGE));
        let mut input = serde_json::Deserializer::from_str(input);
        DeserializeDriver::new(&strategy).deserialize(&mut input)
    }

    #[test]
    fn half_open_ranges() {
        let value = read(r#"{"lowerEndpoint": "a", "lowerBoundType": "OPEN"}"#).unwrap();
        let range = value.as_range().unwrap();
        assert_eq!(range.lower_endpoint(), Some(&Value::from("a")));
        assert_eq!(range.lower_bound_type(), Some(BoundType::Open));
        assert!(!range.has_upper_bound());

        let all = read("{}").unwrap();
        assert!(!all.as_range().unwrap().has_lower_bound());
        assert_eq!(read("null").unwrap(), Value::Null);
    }

    #[test]
    fn numeric_endpoints_widen() {
        let value = read(
            r#"{"lowerEndpoint": 1, "lowerBoundType": "CLOSED", "upperEndpoint": 2.5, "upperBoundType": "OPEN"}"#,
        )
        .unwrap();
        let range = value.as_range().unwrap();
        assert_eq!(range.lower_endpoint(), Some(&Value::Float(1.0)));
        assert_eq!(range.upper_endpoint(), Some(&Value::Float(2.5)));
        assert!(range.contains(&Value::Float(2.0)));

        let value = read(
            r#"{"lowerEndpoint": 0, "lowerBoundType": "CLOSED", "upperEndpoint": 18446744073709551615, "upperBoundType": "CLOSED"}"#,
        )
        .unwrap();
        let range = value.as_range().unwrap();
        assert_eq!(range.lower_endpoint(), Some(&Value::UInt(0)));
        assert_eq!(range.upper_endpoint(), Some(&Value::UInt(u64::MAX)));

        let value = read(
            r#"{"lowerEndpoint": -1.5, "lowerBoundType": "OPEN", "upperEndpoint": 3, "upperBoundType": "OPEN"}"#,
        )
        .unwrap();
        assert_eq!(value.to_string(), "(-1.5..3)");
    }

    #[test]
    fn invalid_ranges() {
        let cases = [
            (r#"{"lowerEndpoint": 1}"#, "without its bound type"),
            (
                r#"{"lowerEndpoint": 1, "lowerBoundType": "closed"}"#,
                "`OPEN` or `CLOSED`",
            ),
            (
                r#"{"lowerEndpoint": 1, "lowerBoundType": "OPEN", "upperEndpoint": "z", "upperBoundType": "OPEN"}"#,
                "differ in kind",
            ),
            (
                r#"{"lowerEndpoint": 5, "lowerBoundType": "OPEN", "upperEndpoint": 1, "upperBoundType": "OPEN"}"#,
                "invalid range",
            ),
            (r#"{"lower": 1}"#, "unknown field"),
            (
                r#"{"lowerEndpoint": 1, "lowerEndpoint": 2}"#,
                "duplicate field",
            ),
        ];
        for (input, message) in cases {
            let err = read(input).unwrap_err().to_string();
            assert!(err.contains(message), "{input}: {err}");
        }
    }
}
