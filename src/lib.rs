//! anonchat library exports for testing

use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod core;
pub mod runtime;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Which flavour of room to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Public room: everyone sees everything, random senders.
    Broadcast,
    /// Interest picker, simulated matching, one-on-one chat.
    #[default]
    Paired,
    /// Public room without the online counter.
    Simple,
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Variant as ValueEnum>::from_str(s, true)
    }
}

impl Variant {
    pub fn label(&self) -> &'static str {
        match self {
            Variant::Broadcast => "broadcast",
            Variant::Paired => "paired",
            Variant::Simple => "simple",
        }
    }
}
