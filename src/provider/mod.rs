//! Wallet-provider adapters
//!
//! The browser original probed several injected globals (`window.aptos`,
//! `window.petra`, `window.ethereum.providers[..]`) for a usable wallet.
//! Here each candidate is one `ProviderKind` adapter, detection over the
//! configured availability list is a pure function, and selection follows
//! a fixed ranking.

use serde::{Deserialize, Serialize};

use crate::error::WalletError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Petra,
    Martian,
    Pontem,
}

/// Preference order when several providers are present.
pub const DETECTION_ORDER: [ProviderKind; 3] =
    [ProviderKind::Petra, ProviderKind::Martian, ProviderKind::Pontem];

impl ProviderKind {
    /// The injected-global key this adapter answers to.
    pub fn injected_key(&self) -> &'static str {
        match self {
            ProviderKind::Petra => "petra",
            ProviderKind::Martian => "martian",
            ProviderKind::Pontem => "pontem",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Petra => "Petra Wallet",
            ProviderKind::Martian => "Martian Wallet",
            ProviderKind::Pontem => "Pontem Wallet",
        }
    }

    /// Deterministic demo account address for this provider.
    pub fn demo_address(&self) -> &'static str {
        match self {
            ProviderKind::Petra => {
                "0x1a2b3c4d5e6f7890abcdef1234567890abcdef1234567890abcdef1234567890"
            }
            ProviderKind::Martian => {
                "0x9876543210fedcba0987654321fedcba0987654321fedcba0987654321fedcba"
            }
            ProviderKind::Pontem => {
                "0xabcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890"
            }
        }
    }

    /// Resolve a provider name by its injected-global key. "aptos" is
    /// the legacy alias Petra also registers under.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        if name == "aptos" {
            return Some(ProviderKind::Petra);
        }
        DETECTION_ORDER
            .into_iter()
            .find(|kind| kind.injected_key() == name)
    }
}

/// Map the configured availability list to known adapters, ranked.
pub fn detect_providers(available: &[String]) -> Vec<ProviderKind> {
    DETECTION_ORDER
        .into_iter()
        .filter(|kind| {
            available
                .iter()
                .any(|name| ProviderKind::parse(name) == Some(*kind))
        })
        .collect()
}

/// Choose the provider to connect with: the preferred one if detected,
/// otherwise the highest-ranked detected adapter.
pub fn select_provider(
    detected: &[ProviderKind],
    preferred: Option<ProviderKind>,
) -> Result<ProviderKind, WalletError> {
    if let Some(kind) = preferred {
        return if detected.contains(&kind) {
            Ok(kind)
        } else {
            Err(WalletError::ProviderNotAvailable(
                kind.display_name().to_string(),
            ))
        };
    }

    detected
        .first()
        .copied()
        .ok_or_else(|| WalletError::ProviderNotAvailable("no wallet detected".to_string()))
}
