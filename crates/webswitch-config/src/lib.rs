//! Fleet configuration loading for webswitch.
//!
//! One YAML document describes the whole fleet: VLANs, shared port
//! templates, and switches with their ordered port lists. Deserialization
//! goes through raw serde structs (IndexMap-backed so document order
//! survives — VLAN order and switch order are semantic downstream), then a
//! validation pass, then conversion into `webswitch_core::Config`.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use webswitch_core::model::{Config, Membership, Port, Switch, SwitchAuth, Template};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {message}")]
    Validation { message: String },
}

// ── Raw YAML structs ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    vlans: IndexMap<u16, String>,
    #[serde(default)]
    templates: IndexMap<String, IndexMap<u16, Membership>>,
    #[serde(default)]
    switches: IndexMap<String, RawSwitch>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSwitch {
    name: Option<String>,
    host: String,
    auth: Option<RawAuth>,
    #[serde(default)]
    ports: Vec<RawPort>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAuth {
    user: String,
    response: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPort {
    name: String,
    template: String,
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load and validate a fleet config from a YAML file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    from_str(&text)
}

/// Parse and validate a fleet config from a YAML string.
pub fn from_str(text: &str) -> Result<Config, ConfigError> {
    let raw: RawConfig = serde_yaml::from_str(text)?;
    validate(&raw)?;
    Ok(convert(raw))
}

// ── Validation ──────────────────────────────────────────────────────

/// Hard errors for structurally unusable configs; warnings for the
/// misconfigurations the compiler tolerates (it has defined degradation
/// for dangling template references and multi-pvid templates, so those
/// stay non-fatal here — this is where that validation debt lives).
fn validate(raw: &RawConfig) -> Result<(), ConfigError> {
    if raw.vlans.contains_key(&0) {
        return Err(ConfigError::Validation {
            message: "VLAN id 0 is not a valid VLAN".into(),
        });
    }

    for (key, switch) in &raw.switches {
        if switch.host.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: format!("switch '{key}' has an empty host"),
            });
        }
    }

    for (name, template) in &raw.templates {
        let pvids: Vec<u16> = template
            .iter()
            .filter(|(_, m)| **m == Membership::Pvid)
            .map(|(id, _)| *id)
            .collect();
        if pvids.len() > 1 {
            warn!(
                template = name.as_str(),
                vlans = ?pvids,
                "template marks pvid on multiple VLANs; the first in VLAN order will win"
            );
        }
        for id in template.keys() {
            if !raw.vlans.contains_key(id) {
                warn!(
                    template = name.as_str(),
                    vlan = id,
                    "template references a VLAN id not in the vlans section"
                );
            }
        }
    }

    for (key, switch) in &raw.switches {
        for port in &switch.ports {
            if !raw.templates.contains_key(&port.template) {
                warn!(
                    switch = key.as_str(),
                    port = port.name.as_str(),
                    template = port.template.as_str(),
                    "port references an unknown template"
                );
            }
        }
    }

    Ok(())
}

// ── Conversion ──────────────────────────────────────────────────────

fn convert(raw: RawConfig) -> Config {
    Config {
        vlans: raw.vlans,
        templates: raw
            .templates
            .into_iter()
            .map(|(name, entries)| (name, Template(entries)))
            .collect(),
        switches: raw
            .switches
            .into_iter()
            .map(|(key, sw)| {
                let switch = Switch {
                    name: sw.name.unwrap_or_else(|| key.clone()),
                    host: sw.host,
                    auth: sw.auth.map(|a| SwitchAuth {
                        user: a.user,
                        response: a.response.into(),
                    }),
                    ports: sw
                        .ports
                        .into_iter()
                        .map(|p| Port {
                            name: p.name,
                            template: p.template,
                        })
                        .collect(),
                };
                (key, switch)
            })
            .collect(),
    }
}
