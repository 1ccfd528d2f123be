// trato-core/src/core/party.rs
// ============================================================================
// Module: Trato Parties
// Description: Negotiation participant roles and message sender attribution.
// Purpose: Provide stable role enums shared by topics, messages, and signatures.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A negotiation involves exactly two signing parties: the service provider
//! and the client. Timeline messages additionally carry a system sender for
//! engine-generated entries, which never signs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Roles
// ============================================================================

/// Signing party role within a negotiation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    /// The party offering the service.
    Provider,
    /// The party contracting the service.
    Client,
}

impl Party {
    /// Returns the counterparty for this role.
    #[must_use]
    pub const fn counterpart(self) -> Self {
        match self {
            Self::Provider => Self::Client,
            Self::Client => Self::Provider,
        }
    }

    /// Returns the stable wire label for this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sender attribution for a timeline message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Message authored by the provider party.
    Provider,
    /// Message authored by the client party.
    Client,
    /// Message generated by the engine itself.
    System,
}

impl Sender {
    /// Returns the signing party behind this sender, if any.
    #[must_use]
    pub const fn party(self) -> Option<Party> {
        match self {
            Self::Provider => Some(Party::Provider),
            Self::Client => Some(Party::Client),
            Self::System => None,
        }
    }
}

impl From<Party> for Sender {
    fn from(party: Party) -> Self {
        match party {
            Party::Provider => Self::Provider,
            Party::Client => Self::Client,
        }
    }
}
