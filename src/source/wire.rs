// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON shapes exchanged with the point feed.
//!
//! Decoding is lenient below the point level: a limit with an unknown
//! currency, a negative amount, or a repeated currency is dropped. A response
//! without `payload`, or a point without `id`, fails the whole snapshot.

use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::types::{Cluster, Currency, Limit, Point, Snapshot};

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a coordinate.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Rectangular area to query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    /// South-west corner.
    pub bottom_left: GeoPoint,
    /// North-east corner.
    pub top_right: GeoPoint,
}

impl Bounds {
    /// Creates bounds from two corners.
    #[must_use]
    pub const fn new(bottom_left: GeoPoint, top_right: GeoPoint) -> Self {
        Self {
            bottom_left,
            top_right,
        }
    }
}

/// Request body of the clusters endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ClustersRequest {
    pub bounds: Bounds,
    pub filters: Filters,
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Filters {
    pub banks: Vec<String>,
    pub show_unavailable: bool,
    pub currencies: Vec<Currency>,
}

#[derive(Debug, Deserialize)]
struct StateResponse {
    payload: Payload,
}

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(default)]
    clusters: Vec<RawCluster>,
}

#[derive(Debug, Deserialize)]
struct RawCluster {
    #[serde(default)]
    points: Vec<RawPoint>,
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    id: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    limits: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawLimit {
    currency: String,
    amount: i64,
}

impl RawPoint {
    fn into_point(self) -> Point {
        let mut point = Point::new(self.id, self.address.unwrap_or_default());

        for value in self.limits {
            let Ok(raw) = serde_json::from_value::<RawLimit>(value) else {
                tracing::debug!(point = %point.id(), "Skipping malformed limit");
                continue;
            };
            let Ok(currency) = raw.currency.parse::<Currency>() else {
                tracing::debug!(point = %point.id(), currency = %raw.currency, "Skipping unknown currency");
                continue;
            };
            let Ok(amount) = u64::try_from(raw.amount) else {
                tracing::debug!(point = %point.id(), amount = raw.amount, "Skipping negative limit");
                continue;
            };
            if point.limit(currency).is_some() {
                continue;
            }
            point = point.with_limit(Limit::new(currency, amount));
        }

        point
    }
}

/// Decodes a clusters response body into a snapshot.
///
/// # Errors
///
/// Returns `FetchError::Decode` if the body is not a structurally valid
/// response.
pub fn decode_snapshot(body: &str) -> Result<Snapshot, FetchError> {
    let response: StateResponse = serde_json::from_str(body)?;

    let clusters = response
        .payload
        .clusters
        .into_iter()
        .map(|cluster| {
            Cluster::new(
                cluster
                    .points
                    .into_iter()
                    .map(RawPoint::into_point)
                    .collect(),
            )
        })
        .collect();

    Ok(Snapshot::new(clusters))
}
