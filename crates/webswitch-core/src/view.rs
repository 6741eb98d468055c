// ── Inspection view ──
//
// JSON-serializable per-switch VLAN/port membership view, used by the
// non-executing `vlan --mode json` path. Mirrors exactly what the
// compiler would encode, in the same iteration orders, without producing
// HTTP commands.

use serde::Serialize;

use crate::model::{Config, Membership};

#[derive(Debug, Serialize)]
pub struct SwitchView {
    pub switch: String,
    pub name: String,
    pub vlans: Vec<VlanView>,
    pub pvids: Vec<PvidView>,
}

#[derive(Debug, Serialize)]
pub struct VlanView {
    pub id: u16,
    pub name: String,
    pub ports: Vec<PortMembershipView>,
}

#[derive(Debug, Serialize)]
pub struct PortMembershipView {
    pub port: String,
    pub membership: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PvidView {
    pub port: String,
    pub pvid: u16,
}

fn membership_label(membership: Option<Membership>) -> &'static str {
    match membership {
        Some(Membership::Pvid) => "pvid",
        Some(Membership::Tagged) => "tagged",
        None => "not-member",
    }
}

/// Build the membership view for every switch in the (filtered) config.
pub fn membership_view(config: &Config) -> Vec<SwitchView> {
    config
        .switches
        .iter()
        .map(|(key, switch)| {
            let vlans = config
                .vlans
                .iter()
                .map(|(vid, vname)| VlanView {
                    id: *vid,
                    name: vname.clone(),
                    ports: switch
                        .ports
                        .iter()
                        .map(|port| PortMembershipView {
                            port: port.name.clone(),
                            membership: membership_label(
                                config
                                    .templates
                                    .get(&port.template)
                                    .and_then(|t| t.membership_of(*vid)),
                            ),
                        })
                        .collect(),
                })
                .collect();

            let pvids = switch
                .ports
                .iter()
                .filter_map(|port| {
                    let template = config.templates.get(&port.template)?;
                    config.pvid_vlan(template).map(|pvid| PvidView {
                        port: port.name.clone(),
                        pvid,
                    })
                })
                .collect();

            SwitchView {
                switch: key.clone(),
                name: switch.name.clone(),
                vlans,
                pvids,
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Port, Switch, Template};

    #[test]
    fn view_mirrors_compiler_semantics() {
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
        config.switches.insert(
            "office".into(),
            Switch {
                name: "Office".into(),
                host: "192.0.2.10".into(),
                auth: None,
                ports: vec![
                    Port {
                        name: "Port 1".into(),
                        template: "both".into(),
                    },
                    Port {
                        name: "Port 2".into(),
                        template: "missing".into(),
                    },
                ],
            },
        );

        let views = membership_view(&config);
        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.vlans.len(), 2);
        assert_eq!(view.vlans[0].ports[0].membership, "tagged");
        assert_eq!(view.vlans[1].ports[0].membership, "pvid");
        // Dangling template reference degrades to not-member, as in compile.
        assert_eq!(view.vlans[0].ports[1].membership, "not-member");

        assert_eq!(view.pvids.len(), 1);
        assert_eq!(view.pvids[0].port, "Port 1");
        assert_eq!(view.pvids[0].pvid, 20);
    }
}
