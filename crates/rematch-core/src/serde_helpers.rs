/// Serde helper functions shared across the data model.
///
/// The primary export is [`deserialize_attributes`], which accepts an
/// attribute map whose values may arrive as strings, numbers, booleans or
/// `null` and coerces every value to a `String`. Markup attributes are always
/// strings, but trees handed over as JSON by a host application frequently
/// carry `"size": 20` or `"inline": true`; hashing works on the string form,
/// so the coercion happens once at the boundary.
use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// A single attribute value coerced to its string form.
struct AttrValue(String);

impl<'de> Deserialize<'de> for AttrValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AttrValueVisitor)
    }
}

struct AttrValueVisitor;

impl Visitor<'_> for AttrValueVisitor {
    type Value = AttrValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean, or null attribute value")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<AttrValue, E> {
        Ok(AttrValue(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<AttrValue, E> {
        Ok(AttrValue(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<AttrValue, E> {
        Ok(AttrValue(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<AttrValue, E> {
        Ok(AttrValue(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<AttrValue, E> {
        Ok(AttrValue(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<AttrValue, E> {
        Ok(AttrValue(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<AttrValue, E> {
        Ok(AttrValue(String::new()))
    }

    fn visit_none<E: de::Error>(self) -> Result<AttrValue, E> {
        Ok(AttrValue(String::new()))
    }
}

struct AttributesVisitor;

impl<'de> Visitor<'de> for AttributesVisitor {
    type Value = BTreeMap<String, String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of attribute names to scalar values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut out = BTreeMap::new();
        while let Some((key, AttrValue(value))) = access.next_entry::<String, AttrValue>()? {
            out.insert(key, value);
        }
        Ok(out)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(BTreeMap::new())
    }
}

/// Deserializer for an attribute map that coerces scalar values to strings.
///
/// | JSON value   | Stored string |
/// |--------------|---------------|
/// | `"abc"`      | `abc`         |
/// | `20`         | `20`          |
/// | `1.5`        | `1.5`         |
/// | `true`       | `true`        |
/// | `null`       | (empty)       |
///
/// A `null` map is accepted as an empty map. Nested arrays or objects are
/// rejected.
///
/// Use with `#[serde(default, deserialize_with = "...")]`:
///
/// ```rust,ignore
/// #[serde(default, deserialize_with = "crate::serde_helpers::deserialize_attributes")]
/// pub attributes: BTreeMap<String, String>,
/// ```
pub fn deserialize_attributes<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(AttributesVisitor)
}
