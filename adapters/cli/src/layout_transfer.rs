#![allow(clippy::missing_errors_doc)]

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use pigpen_core::{EntityId, Event, GridCoordinate, LevelId, Orientation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CODE_DOMAIN: &str = "pigpen";
const CODE_VERSION: &str = "v1";

/// Identifier prefix emitted before the level and encoded payload.
pub(crate) const CODE_HEADER: &str = "pigpen:v1";
/// Delimiter used to separate the prefix, level index and payload.
const FIELD_DELIMITER: char = ':';

/// Committed houses of a single level, shareable as a one-line layout code.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LayoutSnapshot {
    /// Level the houses were committed on.
    pub(crate) level: LevelId,
    /// Houses composing the layout, ordered by identifier.
    pub(crate) houses: Vec<PlacedHouse>,
}

impl LayoutSnapshot {
    /// Rebuilds the committed layout of `level` from a broadcast event log.
    ///
    /// Each house keeps the anchor and orientation of its latest commit. A
    /// `LevelStarted` event discards everything committed before it.
    #[must_use]
    pub(crate) fn capture(level: LevelId, events: &[Event]) -> Self {
        let mut committed = BTreeMap::new();
        for event in events {
            match event {
                Event::PlacementCommitted {
                    entity,
                    anchor,
                    orientation,
                } => {
                    let _ = committed.insert(entity.clone(), (*anchor, *orientation));
                }
                Event::LevelStarted { .. } => committed.clear(),
                _ => {}
            }
        }

        let houses = committed
            .into_iter()
            .map(|(entity, (anchor, orientation))| PlacedHouse {
                entity,
                anchor,
                orientation,
            })
            .collect();
        Self { level, houses }
    }

    /// Encodes the snapshot into a single-line string suitable for sharing.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableLayout {
            houses: self.houses.clone(),
        };
        let json = serde_json::to_vec(&payload).expect("layout serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{CODE_HEADER}:{}:{encoded}", self.level)
    }

    /// Decodes a snapshot from the provided layout code.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let level = parts.next().ok_or(LayoutTransferError::MissingLevel)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != CODE_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != CODE_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let level = parse_level(level)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: SerializableLayout =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            level,
            houses: decoded.houses,
        })
    }
}

/// House description captured within a layout snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct PlacedHouse {
    /// House the entry describes.
    pub(crate) entity: EntityId,
    /// Anchor cell the house was committed to.
    pub(crate) anchor: GridCoordinate,
    /// Orientation the house had when it was committed.
    pub(crate) orientation: Orientation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableLayout {
    houses: Vec<PlacedHouse>,
}

/// Errors that can occur while decoding layout codes.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout code was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the layout code.
    #[error("layout code is missing the prefix")]
    MissingPrefix,
    /// The layout code did not contain a version segment.
    #[error("layout code is missing the version")]
    MissingVersion,
    /// The layout code did not include the level index.
    #[error("layout code is missing the level")]
    MissingLevel,
    /// The layout code did not include the payload segment.
    #[error("layout code is missing the payload")]
    MissingPayload,
    /// The layout code used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The layout code used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The level index could not be parsed from the layout code.
    #[error("could not parse level index '{0}'")]
    InvalidLevel(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

fn parse_level(level: &str) -> Result<LevelId, LayoutTransferError> {
    match level.trim().parse::<u32>() {
        Ok(index) if index > 0 => Ok(LevelId::new(index)),
        _ => Err(LayoutTransferError::InvalidLevel(level.to_owned())),
    }
}
