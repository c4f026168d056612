use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;

use serde::Deserialize;

/// A unique ID that is a property of all the agents in the simulation.
#[derive(Deserialize, Default, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct AgentId(u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AgentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.parse::<u64>()?;
        Ok(Self(id))
    }
}

impl From<u64> for AgentId {
    fn from(f: u64) -> Self {
        Self(f)
    }
}

impl From<usize> for AgentId {
    fn from(f: usize) -> Self {
        Self(f as u64)
    }
}

impl AgentId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// The kind of agent taking part in an offloading scenario. Vehicles generate payloads and
/// offload them; roadside units receive them and run the edge processing.
#[derive(Deserialize, Debug, Hash, Copy, Default, Clone, PartialEq, Eq)]
pub enum AgentKind {
    #[default]
    Vehicle = 0,
    RSU,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Vehicle => write!(f, "Vehicle"),
            AgentKind::RSU => write!(f, "RSU"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_parse() {
        let id: AgentId = "42".parse().unwrap();
        assert_eq!(id, AgentId::from(42u64));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<AgentId>().is_err());
    }
}
