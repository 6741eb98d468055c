// ── VLAN plan compiler ──
//
// Pure function from the (possibly filtered) fleet model to per-switch
// ordered HTTP command descriptors. No I/O here; everything the executor
// needs, including headers and the exact body bytes, is materialized up
// front so execution is a dumb replay.
//
// Ordering is load-bearing against the firmware state machine: all
// membership commands (in config VLAN order) must precede all PVID
// commands (in port order) — a PVID referencing a VLAN the port is not yet
// a member of misconfigures silently.

use tracing::warn;

use crate::auth::CredentialMap;
use crate::model::{Config, Membership};

/// Membership form endpoint (static VLAN table page).
pub const MEMBERSHIP_PATH: &str = "/vlan.cgi?page=static";
/// PVID form endpoint (port-based VLAN page).
pub const PVID_PATH: &str = "/vlan.cgi?page=port_based";
/// Persist-running-config endpoint.
pub const SAVE_PATH: &str = "/save.cgi";

pub(crate) const USER_AGENT: &str = concat!("webswitch/", env!("CARGO_PKG_VERSION"));

/// A fully materialized HTTP request descriptor, ready for execution or
/// display. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct Command {
    /// Key of the switch this command targets.
    pub switch: String,
    pub method: &'static str,
    pub path: &'static str,
    /// Header set in wire order.
    pub headers: Vec<(String, String)>,
    /// `application/x-www-form-urlencoded` body (empty for save).
    pub body: String,
}

/// All commands for one switch, in the order they must be executed.
#[derive(Debug, Clone)]
pub struct SwitchPlan {
    pub key: String,
    /// Web UI host, copied out of the model so the executor needs no
    /// config access.
    pub host: String,
    pub commands: Vec<Command>,
}

/// The firmware's three-state port code. Note the inversion relative to
/// the human-facing naming: `0` is pvid (untagged/native), `1` is tagged,
/// `2` is not-member. Dictated by the CGI form semantics, not by us.
fn membership_code(membership: Option<Membership>) -> u8 {
    match membership {
        Some(Membership::Pvid) => 0,
        Some(Membership::Tagged) => 1,
        None => 2,
    }
}

fn form_escape(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// The fixed header template every command uses, in wire order.
fn command_headers(host: &str, cookie: &str, body_len: usize) -> Vec<(String, String)> {
    vec![
        ("Host".to_string(), host.to_string()),
        ("User-Agent".to_string(), USER_AGENT.to_string()),
        ("Accept".to_string(), "*/*".to_string()),
        ("Cookie".to_string(), cookie.to_string()),
        ("Content-Length".to_string(), body_len.to_string()),
        (
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        ),
    ]
}

fn command(switch: &str, host: &str, cookie: &str, path: &'static str, body: String) -> Command {
    Command {
        switch: switch.to_string(),
        method: "POST",
        path,
        headers: command_headers(host, cookie, body.len()),
        body,
    }
}

/// Compile the VLAN/PVID plan for every switch in the config.
///
/// Per switch: one membership command per VLAN in config VLAN order, then
/// one PVID command per port that has a pvid-marked VLAN, in port order.
/// A port whose template reference does not resolve participates as
/// not-member everywhere (warned once per port, never fatal).
pub fn compile(config: &Config, credentials: &CredentialMap) -> Vec<SwitchPlan> {
    config
        .switches
        .iter()
        .map(|(key, switch)| {
            let cookie = credentials
                .get(key)
                .map(|c| c.as_str().to_string())
                .unwrap_or_default();
            let mut commands = Vec::with_capacity(config.vlans.len() + switch.ports.len());

            // Warn once per dangling template reference, not once per VLAN.
            for port in &switch.ports {
                if !config.templates.contains_key(&port.template) {
                    warn!(
                        switch = key.as_str(),
                        port = port.name.as_str(),
                        template = port.template.as_str(),
                        "unknown template, port treated as not-member"
                    );
                }
            }

            for (vid, vname) in &config.vlans {
                let mut body = format!("vid={vid}&name={}", form_escape(vname));
                for (index, port) in switch.ports.iter().enumerate() {
                    let membership = config
                        .templates
                        .get(&port.template)
                        .and_then(|t| t.membership_of(*vid));
                    body.push_str(&format!("&vlanPort_{index}={}", membership_code(membership)));
                }
                commands.push(command(key, &switch.host, &cookie, MEMBERSHIP_PATH, body));
            }

            for (index, port) in switch.ports.iter().enumerate() {
                let Some(template) = config.templates.get(&port.template) else {
                    continue;
                };
                if let Some(pvid) = config.pvid_vlan(template) {
                    let body = format!("ports={index}&pvid={pvid}&vlan_accept_frame_type=0");
                    commands.push(command(key, &switch.host, &cookie, PVID_PATH, body));
                }
            }

            SwitchPlan {
                key: key.clone(),
                host: switch.host.clone(),
                commands,
            }
        })
        .collect()
}

/// Compile the persistence ("save") step: one empty-body POST per switch.
pub fn compile_save(config: &Config, credentials: &CredentialMap) -> Vec<SwitchPlan> {
    config
        .switches
        .iter()
        .map(|(key, switch)| {
            let cookie = credentials
                .get(key)
                .map(|c| c.as_str().to_string())
                .unwrap_or_default();
            SwitchPlan {
                key: key.clone(),
                host: switch.host.clone(),
                commands: vec![command(key, &switch.host, &cookie, SAVE_PATH, String::new())],
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::auth;
    use crate::model::{Port, Switch, SwitchAuth, Template};

    fn port(name: &str, template: &str) -> Port {
        Port {
            name: name.into(),
            template: template.into(),
        }
    }

    fn auth_block() -> Option<SwitchAuth> {
        Some(SwitchAuth {
            user: "admin".into(),
            response: "cafe".to_string().into(),
        })
    }

    /// The worked example from the firmware docs: two VLANs, one switch
    /// with two ports on different templates.
    fn example_config() -> Config {
        let mut config = Config::default();
        config.vlans.insert(10, "data".into());
        config.vlans.insert(20, "voice".into());
        config.templates.insert(
            "both".into(),
            Template(
                [(10, Membership::Tagged), (20, Membership::Pvid)]
                    .into_iter()
                    .collect(),
            ),
        );
        config.templates.insert(
            "data-native".into(),
            Template([(10, Membership::Pvid)].into_iter().collect()),
        );
        config.switches.insert(
            "office".into(),
            Switch {
                name: "Office Switch".into(),
                host: "192.0.2.10".into(),
                auth: auth_block(),
                ports: vec![port("Port 1", "both"), port("Port 2", "data-native")],
            },
        );
        config
    }

    fn compile_example() -> Vec<SwitchPlan> {
        let config = example_config();
        let creds = auth::derive_all(&config).unwrap();
        compile(&config, &creds)
    }

    #[test]
    fn worked_example_emits_expected_commands_in_order() {
        let plans = compile_example();
        assert_eq!(plans.len(), 1);
        let commands = &plans[0].commands;
        assert_eq!(commands.len(), 4);

        // Membership commands in VLAN config order, positional port codes.
        assert_eq!(commands[0].path, MEMBERSHIP_PATH);
        assert_eq!(commands[0].body, "vid=10&name=data&vlanPort_0=1&vlanPort_1=0");
        assert_eq!(commands[1].path, MEMBERSHIP_PATH);
        assert_eq!(commands[1].body, "vid=20&name=voice&vlanPort_0=0&vlanPort_1=2");

        // PVID commands in port order: port 0 → VLAN 20, port 1 → VLAN 10.
        assert_eq!(commands[2].path, PVID_PATH);
        assert_eq!(commands[2].body, "ports=0&pvid=20&vlan_accept_frame_type=0");
        assert_eq!(commands[3].path, PVID_PATH);
        assert_eq!(commands[3].body, "ports=1&pvid=10&vlan_accept_frame_type=0");
    }

    #[test]
    fn compilation_is_deterministic() {
        let first: Vec<String> = compile_example()
            .into_iter()
            .flat_map(|p| p.commands.into_iter().map(|c| c.body))
            .collect();
        let second: Vec<String> = compile_example()
            .into_iter()
            .flat_map(|p| p.commands.into_iter().map(|c| c.body))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn membership_command_count_equals_vlan_count() {
        let plans = compile_example();
        let membership = plans[0]
            .commands
            .iter()
            .filter(|c| c.path == MEMBERSHIP_PATH)
            .count();
        assert_eq!(membership, example_config().vlans.len());
    }

    #[test]
    fn headers_carry_cookie_and_exact_content_length() {
        let plans = compile_example();
        let cmd = &plans[0].commands[0];
        let names: Vec<&str> = cmd.headers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            ["Host", "User-Agent", "Accept", "Cookie", "Content-Length", "Content-Type"]
        );
        let get = |n: &str| {
            cmd.headers
                .iter()
                .find(|(k, _)| k == n)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get("Host"), "192.0.2.10");
        assert_eq!(get("Cookie"), "admin=cafe");
        assert_eq!(get("Content-Length"), cmd.body.len().to_string());
        assert_eq!(get("Content-Type"), "application/x-www-form-urlencoded");
        assert_eq!(cmd.method, "POST");
    }

    #[test]
    fn vlan_names_are_form_escaped() {
        let mut config = example_config();
        config.vlans.insert(30, "guest wifi & iot".into());
        let creds = auth::derive_all(&config).unwrap();
        let plans = compile(&config, &creds);
        let cmd = plans[0]
            .commands
            .iter()
            .find(|c| c.body.starts_with("vid=30"))
            .unwrap();
        assert!(cmd.body.starts_with("vid=30&name=guest+wifi+%26+iot&"));
    }

    #[test]
    fn port_index_ignores_vlan_filtering() {
        // Filtering VLANs must not shift the positional port parameters.
        let config = example_config();
        let filtered = crate::filter::Filter::new(vec![], vec!["20".into()]).apply(&config);
        let creds = auth::derive_all(&filtered).unwrap();
        let plans = compile(&filtered, &creds);
        assert_eq!(
            plans[0].commands[0].body,
            "vid=20&name=voice&vlanPort_0=0&vlanPort_1=2"
        );
    }

    #[test]
    fn unresolved_template_degrades_to_not_member() {
        let mut config = example_config();
        config
            .switches
            .get_mut("office")
            .unwrap()
            .ports
            .push(port("Port 3", "missing"));
        let creds = auth::derive_all(&config).unwrap();
        let plans = compile(&config, &creds);

        // Code 2 (not-member) on every VLAN, and no PVID command for it.
        assert_eq!(
            plans[0].commands[0].body,
            "vid=10&name=data&vlanPort_0=1&vlanPort_1=0&vlanPort_2=2"
        );
        let pvid_count = plans[0].commands.iter().filter(|c| c.path == PVID_PATH).count();
        assert_eq!(pvid_count, 2);
    }

    #[test]
    fn template_without_pvid_emits_no_pvid_command() {
        let mut config = Config::default();
        config.vlans.insert(10, "data".into());
        config.templates.insert(
            "tagged-only".into(),
            Template([(10, Membership::Tagged)].into_iter().collect()),
        );
        config.switches.insert(
            "sw".into(),
            Switch {
                name: "sw".into(),
                host: "192.0.2.2".into(),
                auth: auth_block(),
                ports: vec![port("Port 1", "tagged-only")],
            },
        );
        let creds = auth::derive_all(&config).unwrap();
        let plans = compile(&config, &creds);
        assert!(plans[0].commands.iter().all(|c| c.path != PVID_PATH));
    }

    #[test]
    fn multi_pvid_template_tie_breaks_on_first_config_vlan() {
        let mut config = Config::default();
        config.vlans.insert(20, "voice".into());
        config.vlans.insert(10, "data".into());
        config.templates.insert(
            "bad".into(),
            Template(
                [(10, Membership::Pvid), (20, Membership::Pvid)]
                    .into_iter()
                    .collect(),
            ),
        );
        config.switches.insert(
            "sw".into(),
            Switch {
                name: "sw".into(),
                host: "192.0.2.2".into(),
                auth: auth_block(),
                ports: vec![port("Port 1", "bad")],
            },
        );
        let creds = auth::derive_all(&config).unwrap();
        let plans = compile(&config, &creds);
        let pvid = plans[0].commands.iter().find(|c| c.path == PVID_PATH).unwrap();
        // VLAN 20 was inserted first into the config, so it wins.
        assert_eq!(pvid.body, "ports=0&pvid=20&vlan_accept_frame_type=0");
    }

    #[test]
    fn save_plan_is_one_empty_post_per_switch() {
        let config = example_config();
        let creds = auth::derive_all(&config).unwrap();
        let plans = compile_save(&config, &creds);
        assert_eq!(plans.len(), 1);
        let cmd = &plans[0].commands[0];
        assert_eq!(cmd.path, SAVE_PATH);
        assert_eq!(cmd.body, "");
        let len = cmd
            .headers
            .iter()
            .find(|(k, _)| k == "Content-Length")
            .map(|(_, v)| v.clone())
            .unwrap();
        assert_eq!(len, "0");
    }
}
