// ── Fleet configuration model ──
//
// In-memory representation of VLANs, port templates, switches, and ports.
// Built once by `webswitch-config` from validated YAML and immutable
// thereafter. Every mapping whose iteration order carries meaning is an
// IndexMap: VLAN insertion order is the compiler's command order, and
// switch insertion order is the batch order.

use indexmap::IndexMap;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// A port's participation state in one VLAN.
///
/// Entries absent from a template are implicitly not-member. The firmware's
/// numeric form encoding is the inverse of this human-facing naming; see
/// `compile::membership_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    /// Frames carry the VLAN tag.
    Tagged,
    /// Untagged/native VLAN for the port (at most one per template).
    Pvid,
}

/// Named, reusable VLAN-membership profile, shared across any number of
/// ports and switches. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template(pub IndexMap<u16, Membership>);

impl Template {
    pub fn membership_of(&self, vlan_id: u16) -> Option<Membership> {
        self.0.get(&vlan_id).copied()
    }
}

/// A physical switch port. Ports reference their template by name; a
/// dangling reference degrades to not-member at compile time, it is not a
/// load-time error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub name: String,
    pub template: String,
}

/// Static web-UI credentials. The firmware performs no live login
/// handshake: the `response` value is the precomputed answer the login
/// form would have produced, sent verbatim in a cookie.
#[derive(Debug, Clone)]
pub struct SwitchAuth {
    pub user: String,
    pub response: SecretString,
}

/// One managed switch.
///
/// `ports` is an ordered sequence on purpose: the firmware's form fields
/// address ports by zero-based position, so a name-keyed container here
/// would silently reorder commands.
#[derive(Debug, Clone)]
pub struct Switch {
    /// Human-facing display name.
    pub name: String,
    /// Hostname or IP of the web UI (plain HTTP, port 80).
    pub host: String,
    pub auth: Option<SwitchAuth>,
    pub ports: Vec<Port>,
}

/// The whole declarative fleet model. Loaded once per invocation.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// VLAN id → name, in document order.
    pub vlans: IndexMap<u16, String>,
    /// Template name → membership profile.
    pub templates: IndexMap<String, Template>,
    /// Stable switch key → switch, in document order.
    pub switches: IndexMap<String, Switch>,
}

impl Config {
    /// The tie-broken PVID VLAN for a template: the first VLAN in *config
    /// VLAN iteration order* that the template marks `pvid`.
    ///
    /// A template assigning `pvid` to several VLANs is a misconfiguration
    /// the firmware cannot express; the tie-break keeps compilation
    /// deterministic instead of failing. The config validator warns about
    /// it upstream.
    pub fn pvid_vlan(&self, template: &Template) -> Option<u16> {
        self.vlans
            .keys()
            .copied()
            .find(|id| template.membership_of(*id) == Some(Membership::Pvid))
    }
}
