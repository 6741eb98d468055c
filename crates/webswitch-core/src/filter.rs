// ── Fleet filter stage ──
//
// Narrows a Config to a subset of switches and/or VLANs before
// compilation. Templates are shared between switches and are never
// filtered.

use crate::model::Config;

/// Switch/VLAN selection. Empty token lists mean "no filtering".
#[derive(Debug, Clone, Default)]
pub struct Filter {
    switches: Vec<String>,
    vlans: Vec<String>,
}

impl Filter {
    pub fn new(switches: Vec<String>, vlans: Vec<String>) -> Self {
        Self { switches, vlans }
    }

    pub fn is_empty(&self) -> bool {
        self.switches.is_empty() && self.vlans.is_empty()
    }

    /// Produce the narrowed config.
    ///
    /// Switch tokens match the switch key exactly. VLAN tokens that parse
    /// as a number match by id; anything else is a case-insensitive exact
    /// name match.
    pub fn apply(&self, config: &Config) -> Config {
        let mut out = config.clone();

        if !self.switches.is_empty() {
            out.switches.retain(|key, _| self.switches.iter().any(|t| t == key));
        }

        if !self.vlans.is_empty() {
            out.vlans.retain(|id, name| {
                self.vlans.iter().any(|t| match t.parse::<u16>() {
                    Ok(n) => n == *id,
                    Err(_) => t.eq_ignore_ascii_case(name),
                })
            });
        }

        out
    }
}
