// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Serialization codec for persisted block records.
//!
//! Every unbounded-precision integer field is persisted as a tagged value
//! `{"kind": "bigint", "value": "<exact decimal string>"}` instead of a
//! native numeric literal. JSON numbers round-trip through 64-bit floats in
//! many readers; transaction values and nonces routinely exceed that range,
//! so the decimal-string form is the only representation that survives a
//! write/read cycle exactly.
//!
//! This codec is the exclusive path for all disk writes and for populating
//! the memory tier from a disk read. Decoding also accepts the provider's
//! wire forms (0x-prefixed hex strings, native integers) so a single serde
//! surface parses both RPC responses and cached payloads.

use std::fmt;

use alloy_primitives::U256;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::blocks::BlockRecord;
use crate::errors::CodecError;

/// Tag discriminating the persisted bigint form.
const BIGINT_KIND: &str = "bigint";

/// An unbounded-precision integer field of a block record.
///
/// Wraps a [`U256`] and controls its serde representation:
///
/// - serializes as `{"kind": "bigint", "value": "<decimal>"}`
/// - deserializes from the tagged form, from a bare decimal or `0x`-hex
///   string (the JSON-RPC wire encoding), or from a native integer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BigInt(pub U256);

impl BigInt {
    /// The wrapped value as an exact decimal string.
    pub fn to_decimal(self) -> String {
        self.0.to_string()
    }
}

impl From<u64> for BigInt {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for BigInt {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for BigInt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("BigInt", 2)?;
        state.serialize_field("kind", BIGINT_KIND)?;
        state.serialize_field("value", &self.0.to_string())?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for BigInt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BigIntVisitor;

        impl<'de> Visitor<'de> for BigIntVisitor {
            type Value = BigInt;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a tagged bigint, an integer string, or an integer")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(BigInt(U256::from(value)))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                u64::try_from(value)
                    .map(|v| BigInt(U256::from(v)))
                    .map_err(|_| E::custom("negative value for unsigned bigint field"))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                parse_u256(value).map(BigInt).map_err(E::custom)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut kind: Option<String> = None;
                let mut value: Option<String> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "kind" => kind = Some(map.next_value()?),
                        "value" => value = Some(map.next_value()?),
                        other => {
                            return Err(serde::de::Error::custom(format!(
                                "unexpected key '{other}' in tagged bigint"
                            )))
                        }
                    }
                }

                match kind.as_deref() {
                    Some(BIGINT_KIND) => {}
                    Some(other) => {
                        return Err(serde::de::Error::custom(format!(
                            "unexpected tag kind '{other}', expected '{BIGINT_KIND}'"
                        )))
                    }
                    None => return Err(serde::de::Error::missing_field("kind")),
                }

                let value = value.ok_or_else(|| serde::de::Error::missing_field("value"))?;
                parse_u256(&value).map(BigInt).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_any(BigIntVisitor)
    }
}

/// Parses a decimal or `0x`-prefixed hex string into a [`U256`].
fn parse_u256(text: &str) -> Result<U256, String> {
    text.parse::<U256>()
        .map_err(|e| format!("'{text}' is not an unsigned integer: {e}"))
}

/// Serde adapter for `u64` quantity fields (block number, timestamp).
///
/// JSON-RPC encodes quantities as `0x`-prefixed hex strings; cached payloads
/// hold them as plain integers. Deserialization accepts both, serialization
/// always emits the integer form.
pub mod quantity {
    use std::fmt;

    use serde::de::Visitor;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(*value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct QuantityVisitor;

        impl Visitor<'_> for QuantityVisitor {
            type Value = u64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a u64 or a 0x-prefixed hex string")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let digits = value
                    .strip_prefix("0x")
                    .or_else(|| value.strip_prefix("0X"));
                match digits {
                    Some(digits) => u64::from_str_radix(digits, 16)
                        .map_err(|e| E::custom(format!("'{value}' is not a hex quantity: {e}"))),
                    None => value
                        .parse::<u64>()
                        .map_err(|e| E::custom(format!("'{value}' is not a quantity: {e}"))),
                }
            }
        }

        deserializer.deserialize_any(QuantityVisitor)
    }
}

/// Encodes a block record to its persisted byte form.
pub fn encode(block: &BlockRecord) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(block).map_err(CodecError::encode)
}

/// Decodes a persisted payload back into a block record.
///
/// Accepts both the tagged persisted form and raw provider wire values, so
/// the same function parses cache entries written by any earlier run.
pub fn decode(bytes: &[u8]) -> Result<BlockRecord, CodecError> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bigint_serializes_tagged() {
        let value = BigInt(U256::from(12345u64));
        let encoded = serde_json::to_value(value).unwrap();
        assert_eq!(encoded, json!({"kind": "bigint", "value": "12345"}));
    }

    #[test]
    fn bigint_round_trips_beyond_u64() {
        // 2^200, far outside any native numeric range
        let big = U256::from(2u64).pow(U256::from(200u64));
        let encoded = serde_json::to_string(&BigInt(big)).unwrap();
        let decoded: BigInt = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.0, big);
        assert_eq!(decoded.to_decimal(), big.to_string());
    }

    #[test]
    fn bigint_decodes_hex_wire_form() {
        let decoded: BigInt = serde_json::from_value(json!("0xde0b6b3a7640000")).unwrap();
        assert_eq!(decoded.to_decimal(), "1000000000000000000");
    }

    #[test]
    fn bigint_decodes_untagged_literals() {
        let from_number: BigInt = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(from_number, BigInt::from(42u64));

        let from_decimal: BigInt = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(from_decimal, BigInt::from(42u64));
    }

    #[test]
    fn bigint_rejects_wrong_tag() {
        let result: Result<BigInt, _> =
            serde_json::from_value(json!({"kind": "float", "value": "1.5"}));
        assert!(result.is_err());
    }

    #[test]
    fn bigint_rejects_negative() {
        let result: Result<BigInt, _> = serde_json::from_value(json!(-3));
        assert!(result.is_err());
    }

    #[test]
    fn quantity_accepts_hex_and_integer() {
        #[derive(serde::Deserialize)]
        struct Holder {
            #[serde(with = "quantity")]
            n: u64,
        }

        let hex: Holder = serde_json::from_value(json!({"n": "0x64"})).unwrap();
        assert_eq!(hex.n, 100);

        let plain: Holder = serde_json::from_value(json!({"n": 100})).unwrap();
        assert_eq!(plain.n, 100);
    }
}
