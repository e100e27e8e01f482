//! Generic payload envelope
//!
//! Carries a parsed extension payload made of a shared `prebid` part and a
//! bidder-specific part, plus an optional auction environment tag (`"ae"`).

use serde::{Deserialize, Serialize};

/// Two-part payload with an optional auction environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<P, B> {
    /// Shared part
    pub prebid: P,

    /// Bidder-specific part
    pub bidder: B,

    /// Where the auction runs; omitted from JSON when absent
    #[serde(rename = "ae", default, skip_serializing_if = "Option::is_none")]
    pub auction_environment: Option<AuctionEnvironment>,
}

impl<P, B> Envelope<P, B> {
    /// Create an envelope without an auction environment
    pub fn of(prebid: P, bidder: B) -> Self {
        Self {
            prebid,
            bidder,
            auction_environment: None,
        }
    }

    /// Set the auction environment
    ///
    /// `Unknown` tags that have a named variant are stored as that variant.
    pub fn with_auction_environment(mut self, environment: AuctionEnvironment) -> Self {
        self.auction_environment = Some(environment.normalized());
        self
    }
}

/// Numeric auction environment tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum AuctionEnvironment {
    /// Standard server-side auction (`0`)
    ServerSide,
    /// On-device interest-group auction (`1`)
    OnDeviceInterestGroup,
    /// Server-side interest-group auction (`3`)
    ServerSideInterestGroup,
    /// Any other tag, preserved as received
    ///
    /// Only carries unrecognized tags: decoding `0`, `1` or `3` always yields the named
    /// variant.
    Unknown(u8),
}

impl AuctionEnvironment {
    /// Same tag, with `Unknown(0 | 1 | 3)` mapped to its named variant
    pub fn normalized(self) -> Self {
        Self::from(u8::from(self))
    }
}

impl From<u8> for AuctionEnvironment {
    fn from(value: u8) -> Self {
        match value {
            0 => AuctionEnvironment::ServerSide,
            1 => AuctionEnvironment::OnDeviceInterestGroup,
            3 => AuctionEnvironment::ServerSideInterestGroup,
            other => AuctionEnvironment::Unknown(other),
        }
    }
}

impl From<AuctionEnvironment> for u8 {
    fn from(value: AuctionEnvironment) -> Self {
        match value {
            AuctionEnvironment::ServerSide => 0,
            AuctionEnvironment::OnDeviceInterestGroup => 1,
            AuctionEnvironment::ServerSideInterestGroup => 3,
            AuctionEnvironment::Unknown(other) => other,
        }
    }
}
