// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the ATM clusters endpoint.

use std::time::Duration;

use reqwest::Client;

use crate::error::FetchError;
use crate::types::{Currency, Snapshot};

use super::StateSource;
use super::wire::{Bounds, ClustersRequest, Filters, GeoPoint, decode_snapshot};

// ============================================================================
// SourceConfig
// ============================================================================

/// Configuration of the point feed request.
///
/// The geographic bounds and bank/currency filters are fixed request
/// parameters; the defaults cover Saint Petersburg, bank `tcs`, USD.
///
/// # Examples
///
/// ```
/// use atm_watch::source::{Bounds, GeoPoint, SourceConfig};
/// use atm_watch::types::Currency;
/// use std::time::Duration;
///
/// let config = SourceConfig::default()
///     .with_bounds(Bounds::new(GeoPoint::new(55.5, 37.3), GeoPoint::new(55.9, 37.9)))
///     .with_currencies([Currency::Usd, Currency::Eur])
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.zoom(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct SourceConfig {
    url: String,
    bounds: Bounds,
    banks: Vec<String>,
    currencies: Vec<Currency>,
    show_unavailable: bool,
    zoom: u8,
    timeout: Duration,
}

impl SourceConfig {
    /// Default clusters endpoint.
    pub const DEFAULT_URL: &'static str = "https://api.tinkoff.ru/geo/withdraw/clusters";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default map zoom level sent with the request.
    pub const DEFAULT_ZOOM: u8 = 12;
    /// Default query area.
    pub const DEFAULT_BOUNDS: Bounds = Bounds::new(
        GeoPoint::new(59.786_322_383_354_694, 30.057_925_550_468_347),
        GeoPoint::new(60.015_530_066_377_03, 30.560_550_062_187_09),
    );

    /// Creates a configuration for the given endpoint with default filters.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bounds: Self::DEFAULT_BOUNDS,
            banks: vec!["tcs".to_string()],
            currencies: vec![Currency::Usd],
            show_unavailable: true,
            zoom: Self::DEFAULT_ZOOM,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the endpoint URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the query area.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the bank filter.
    #[must_use]
    pub fn with_banks<I, S>(mut self, banks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.banks = banks.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the currency filter.
    #[must_use]
    pub fn with_currencies(mut self, currencies: impl IntoIterator<Item = Currency>) -> Self {
        self.currencies = currencies.into_iter().collect();
        self
    }

    /// Sets whether points that are currently out of service are included.
    #[must_use]
    pub fn with_show_unavailable(mut self, show: bool) -> Self {
        self.show_unavailable = show;
        self
    }

    /// Sets the zoom level.
    #[must_use]
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the query area.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Returns the bank filter.
    #[must_use]
    pub fn banks(&self) -> &[String] {
        &self.banks
    }

    /// Returns the currency filter.
    #[must_use]
    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    /// Returns the zoom level.
    #[must_use]
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn request(&self) -> ClustersRequest {
        ClustersRequest {
            bounds: self.bounds,
            filters: Filters {
                banks: self.banks.clone(),
                show_unavailable: self.show_unavailable,
                currencies: self.currencies.clone(),
            },
            zoom: self.zoom,
        }
    }

    /// Creates an `HttpStateSource` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_source(self) -> Result<HttpStateSource, FetchError> {
        let client = Client::builder().timeout(self.timeout).build()?;
        let request = self.request();

        Ok(HttpStateSource {
            client,
            url: self.url,
            request,
        })
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_URL)
    }
}

// ============================================================================
// HttpStateSource
// ============================================================================

/// Fetches point snapshots from the clusters endpoint over HTTP.
///
/// Each fetch is a JSON `POST` carrying the configured bounds and filters.
#[derive(Debug, Clone)]
pub struct HttpStateSource {
    client: Client,
    url: String,
    request: ClustersRequest,
}

impl HttpStateSource {
    /// Returns the endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl StateSource for HttpStateSource {
    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        tracing::debug!(url = %self.url, "Fetching point snapshot");

        let response = self.client.post(&self.url).json(&self.request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        let snapshot = decode_snapshot(&body)?;

        tracing::debug!(points = snapshot.point_count(), "Received point snapshot");

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = SourceConfig::default();
        assert_eq!(config.url(), SourceConfig::DEFAULT_URL);
        assert_eq!(config.banks(), ["tcs".to_string()]);
        assert_eq!(config.currencies(), [Currency::Usd]);
        assert_eq!(config.zoom(), 12);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.bounds(), SourceConfig::DEFAULT_BOUNDS);
    }

    #[test]
    fn builder_chain() {
        let config = SourceConfig::new("http://localhost:1234/clusters")
            .with_banks(["tcs", "other"])
            .with_currencies([Currency::Eur])
            .with_show_unavailable(false)
            .with_zoom(10);

        let request = config.request();
        assert_eq!(request.filters.banks, ["tcs", "other"]);
        assert_eq!(request.filters.currencies, [Currency::Eur]);
        assert!(!request.filters.show_unavailable);
        assert_eq!(request.zoom, 10);
    }

    #[test]
    fn into_source_keeps_url() {
        let source = SourceConfig::default()
            .with_url("http://127.0.0.1:9/clusters")
            .into_source()
            .unwrap();
        assert_eq!(source.url(), "http://127.0.0.1:9/clusters");
    }
}
