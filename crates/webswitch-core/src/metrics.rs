// ── Metrics rendering ──
//
// Prometheus exposition-format text for scraped port statistics. The
// values are point-in-time snapshots read off the firmware, not
// instrumented counters, so they are rendered directly instead of going
// through a recorder pipeline.

use std::fmt::Write as _;

use crate::stats::PortStats;

/// Stats for one switch, labeled by its config key.
pub struct SwitchStats<'a> {
    pub switch: &'a str,
    pub ports: &'a [PortStats],
}

/// Render all switches' port stats as one metrics document.
pub fn render(fleets: &[SwitchStats<'_>]) -> String {
    let mut out = String::new();

    push_header(
        &mut out,
        "webswitch_port_link_up",
        "gauge",
        "Whether the port reports an active link.",
    );
    for fleet in fleets {
        for port in fleet.ports {
            let _ = writeln!(
                out,
                "webswitch_port_link_up{{switch=\"{}\",port=\"{}\"}} {}",
                escape_label(fleet.switch),
                escape_label(&port.port),
                u8::from(port.link_up)
            );
        }
    }

    push_header(
        &mut out,
        "webswitch_port_tx_packets_total",
        "counter",
        "Packets transmitted, by result.",
    );
    for fleet in fleets {
        for port in fleet.ports {
            push_counter(&mut out, "tx", fleet.switch, port, port.tx_good, port.tx_bad);
        }
    }

    push_header(
        &mut out,
        "webswitch_port_rx_packets_total",
        "counter",
        "Packets received, by result.",
    );
    for fleet in fleets {
        for port in fleet.ports {
            push_counter(&mut out, "rx", fleet.switch, port, port.rx_good, port.rx_bad);
        }
    }

    out
}

fn push_header(out: &mut String, name: &str, kind: &str, help: &str) {
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} {kind}");
}

fn push_counter(
    out: &mut String,
    direction: &str,
    switch: &str,
    port: &PortStats,
    good: u64,
    bad: u64,
) {
    for (result, value) in [("good", good), ("bad", bad)] {
        let _ = writeln!(
            out,
            "webswitch_port_{direction}_packets_total{{switch=\"{}\",port=\"{}\",result=\"{result}\"}} {value}",
            escape_label(switch),
            escape_label(&port.port),
        );
    }
}

/// Escape a label value per the exposition format.
fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port() -> PortStats {
        PortStats {
            port: "Port 1".into(),
            state: "Enable".into(),
            link_up: true,
            tx_good: 10,
            tx_bad: 1,
            rx_good: 20,
            rx_bad: 0,
        }
    }

    #[test]
    fn renders_link_and_counters_with_labels() {
        let ports = [port()];
        let text = render(&[SwitchStats {
            switch: "office",
            ports: &ports,
        }]);

        assert!(text.contains("# TYPE webswitch_port_link_up gauge"));
        assert!(text.contains("webswitch_port_link_up{switch=\"office\",port=\"Port 1\"} 1"));
        assert!(text.contains(
            "webswitch_port_tx_packets_total{switch=\"office\",port=\"Port 1\",result=\"good\"} 10"
        ));
        assert!(text.contains(
            "webswitch_port_rx_packets_total{switch=\"office\",port=\"Port 1\",result=\"bad\"} 0"
        ));
    }

    #[test]
    fn escapes_label_values() {
        assert_eq!(escape_label("a\"b\\c"), "a\\\"b\\\\c");
    }
}
