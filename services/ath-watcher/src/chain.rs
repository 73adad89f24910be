//! The statically-known set of monitored chains

use serde::{Deserialize, Serialize};
use std::fmt;

/// One independently monitored pool deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Chain {
    Bch,
    Xec,
    Btc,
    Dbg,
}

impl Chain {
    /// Every chain the supervisor starts a watcher for, in startup order
    pub const ALL: [Chain; 4] = [Chain::Bch, Chain::Xec, Chain::Btc, Chain::Dbg];

    /// Short tag used in logs and announcements
    pub fn tag(self) -> &'static str {
        match self {
            Chain::Bch => "BCH",
            Chain::Xec => "XEC",
            Chain::Btc => "BTC",
            Chain::Dbg => "DBG",
        }
    }

    /// Key of this chain's base URL in the configuration document
    pub fn config_key(self) -> &'static str {
        match self {
            Chain::Bch => "bch_base",
            Chain::Xec => "xec_base",
            Chain::Btc => "btc_base",
            Chain::Dbg => "dbg_base",
        }
    }

    /// Embed colour used for this chain's announcements
    pub fn color(self) -> u32 {
        match self {
            Chain::Bch => 706958,
            Chain::Xec => 0x0074C2,
            Chain::Btc => 0xF7931A,
            Chain::Dbg => 0x8B4513,
        }
    }

    pub fn thumbnail_url(self) -> &'static str {
        match self {
            Chain::Bch => "https://cryptologos.cc/logos/bitcoin-cash-bch-logo.png",
            Chain::Xec => "https://cryptologos.cc/logos/ecash-xec-logo.png",
            Chain::Btc => "https://cryptologos.cc/logos/bitcoin-btc-logo.png",
            Chain::Dbg => "https://via.placeholder.com/150/8B4513/FFFFFF?text=DBG",
        }
    }

    pub fn footer(self) -> String {
        format!("Axe{} Solo Node", self.tag())
    }

    /// File name of this chain's persisted history
    pub fn state_file_name(self) -> String {
        format!("{}_state.json", self.tag().to_lowercase())
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
