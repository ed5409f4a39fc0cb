//! The command vocabulary accepted by the car and its wire format.
//!
//! Producers outside the car (a web form, a scheduler, a remote) carry a
//! command as the string value of a field named `op`. Input is parsed into the
//! closed [`CarOp`] set at this boundary; anything unrecognised becomes
//! [`CarOp::Brake`].

use core::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::error::CarError;

/// A single high-level command for the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarOp {
    Forward,
    Backward,
    /// Short left turn impulse.
    Left,
    /// Short right turn impulse.
    Right,
    Brake,
    Honk,
    Blink,
    /// Steer the front wheels one step to the left.
    SteerLeft,
    /// Steer the front wheels one step to the right.
    SteerRight,
    /// Center the front wheels.
    SteerReset,
}

impl CarOp {
    pub const ALL: [CarOp; 10] = [
        CarOp::Forward,
        CarOp::Backward,
        CarOp::Left,
        CarOp::Right,
        CarOp::Brake,
        CarOp::Honk,
        CarOp::Blink,
        CarOp::SteerLeft,
        CarOp::SteerRight,
        CarOp::SteerReset,
    ];

    /// The wire tag of this command.
    pub const fn as_str(self) -> &'static str {
        match self {
            CarOp::Forward => "forward",
            CarOp::Backward => "backward",
            CarOp::Left => "left",
            CarOp::Right => "right",
            CarOp::Brake => "brake",
            CarOp::Honk => "honk",
            CarOp::Blink => "blink",
            CarOp::SteerLeft => "steeringleft",
            CarOp::SteerRight => "steeringright",
            CarOp::SteerReset => "steeringreset",
        }
    }

    /// Parse a wire tag, falling back to `Brake` for anything unknown.
    pub fn from_wire(tag: &str) -> CarOp {
        tag.parse().unwrap_or_else(|_| {
            tracing::warn!(tag, "unknown car op, braking");
            CarOp::Brake
        })
    }

    /// Decode a JSON request body such as `{"op":"honk"}`.
    pub fn from_json(body: &[u8]) -> Result<CarOp, CarError> {
        serde_json::from_slice::<OpRequest>(body)
            .map(|req| req.op)
            .map_err(|error| {
                tracing::error!(?error, "error deserializing OpRequest");
                CarError::Malformed
            })
    }
}

impl FromStr for CarOp {
    type Err = CarError;

    /// Tags match exactly; case or padding variants are unknown.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CarOp::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or(CarError::UnknownOp)
    }
}

impl fmt::Display for CarOp {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CarOp {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CarOp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TagVisitor;

        impl de::Visitor<'_> for TagVisitor {
            type Value = CarOp;

            fn expecting(
                &self,
                f: &mut fmt::Formatter<'_>,
            ) -> fmt::Result {
                f.write_str("a car op tag")
            }

            fn visit_str<E: de::Error>(
                self,
                v: &str,
            ) -> Result<CarOp, E> {
                Ok(CarOp::from_wire(v))
            }
        }

        deserializer.deserialize_str(TagVisitor)
    }
}

/// Body of a command request: `{"op": "<tag>"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpRequest {
    pub op: CarOp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_back_to_their_op() {
        for op in CarOp::ALL {
            assert_eq!(op.as_str().parse::<CarOp>(), Ok(op));
        }
    }

    #[test]
    fn near_miss_tags_brake() {
        for tag in ["FORWARD", "Honk", " left ", "forward\n", "steering left"] {
            assert_eq!(tag.parse::<CarOp>(), Err(CarError::UnknownOp), "{tag:?}");
            assert_eq!(CarOp::from_wire(tag), CarOp::Brake, "{tag:?}");
        }
    }

    #[test]
    fn unknown_tags_brake() {
        assert_eq!("warp".parse::<CarOp>(), Err(CarError::UnknownOp));
        assert_eq!(CarOp::from_wire("warp"), CarOp::Brake);
        assert_eq!(CarOp::from_wire(""), CarOp::Brake);
    }

    #[test]
    fn json_request_body() {
        assert_eq!(
            CarOp::from_json(br#"{"op":"steeringleft"}"#),
            Ok(CarOp::SteerLeft)
        );
        assert_eq!(CarOp::from_json(br#"{"op":"jump"}"#), Ok(CarOp::Brake));
        assert_eq!(CarOp::from_json(b"op=honk"), Err(CarError::Malformed));
    }

    #[test]
    fn serializes_as_wire_tag() {
        let body = serde_json::to_string(&OpRequest {
            op: CarOp::SteerReset,
        })
        .unwrap();
        assert_eq!(body, r#"{"op":"steeringreset"}"#);
    }
}
