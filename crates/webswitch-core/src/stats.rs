// ── Port statistics scraper ──
//
// Read-only sibling of the provisioning pipeline: fetches the firmware's
// port statistics page over the same raw client and extracts the stats
// table. The firmware emits no structured API, so this is deliberate
// string-level HTML scraping scoped to the one page this firmware family
// renders — not a general HTML parser.

use thiserror::Error;
use tracing::{debug, warn};

use webswitch_net::{NetError, RawClient};

use crate::auth::Credential;
use crate::compile::USER_AGENT;

/// Stats page of the web UI.
pub const STATS_PATH: &str = "/port.cgi?page=stats";

/// One row of the firmware's seven-column port statistics table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PortStats {
    pub port: String,
    /// Administrative state ("Enable"/"Disable" in this firmware).
    pub state: String,
    pub link_up: bool,
    pub tx_good: u64,
    pub tx_bad: u64,
    pub rx_good: u64,
    pub rx_bad: u64,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Net(#[from] NetError),

    #[error("stats page returned HTTP {status}")]
    Status { status: u16 },

    #[error("no statistics table found in stats page")]
    NoTable,
}

/// Fetch and parse one switch's port statistics.
pub async fn scrape(
    client: &RawClient,
    host: &str,
    http_port: u16,
    credential: &Credential,
) -> Result<Vec<PortStats>, ScrapeError> {
    let headers = vec![
        ("Host".to_string(), host.to_string()),
        ("User-Agent".to_string(), USER_AGENT.to_string()),
        ("Accept".to_string(), "*/*".to_string()),
        ("Cookie".to_string(), credential.as_str().to_string()),
    ];

    let resp = client
        .request(host, http_port, "GET", STATS_PATH, &headers, "")
        .await?;
    if !resp.is_success() {
        return Err(ScrapeError::Status {
            status: resp.status,
        });
    }

    let rows = parse_stats_table(&resp.body)?;
    debug!(%host, ports = rows.len(), "scraped port stats");
    Ok(rows)
}

/// Extract stats rows from the page body.
///
/// Header rows and decorative rows simply fail the numeric-cell check and
/// are skipped; a row that looks like data but does not parse is warned
/// about rather than silently dropped.
pub fn parse_stats_table(body: &str) -> Result<Vec<PortStats>, ScrapeError> {
    let rows: Vec<Vec<String>> = extract_rows(body);
    if rows.is_empty() {
        return Err(ScrapeError::NoTable);
    }

    let mut stats = Vec::new();
    for cells in &rows {
        if cells.len() < 7 {
            continue;
        }
        let counters: Option<Vec<u64>> = cells[3..7]
            .iter()
            .map(|c| c.replace(',', "").parse::<u64>().ok())
            .collect();
        let Some(counters) = counters else {
            // Header row ("TxGoodPkt" etc.) or some firmware oddity.
            if !cells[3].chars().all(|c| c.is_ascii_alphabetic()) {
                warn!(row = ?cells, "unparseable stats row skipped");
            }
            continue;
        };
        stats.push(PortStats {
            port: cells[0].clone(),
            state: cells[1].clone(),
            link_up: cells[2].to_ascii_lowercase().contains("up"),
            tx_good: counters[0],
            tx_bad: counters[1],
            rx_good: counters[2],
            rx_bad: counters[3],
        });
    }

    if stats.is_empty() {
        return Err(ScrapeError::NoTable);
    }
    Ok(stats)
}

/// Split the document into `<tr>` rows of stripped `<td>`/`<th>` cell text.
fn extract_rows(body: &str) -> Vec<Vec<String>> {
    let lower = body.to_ascii_lowercase();
    let mut rows = Vec::new();
    let mut pos = 0;
    while let Some(start) = lower[pos..].find("<tr") {
        let start = pos + start;
        let Some(end) = lower[start..].find("</tr>") else {
            break;
        };
        let end = start + end;
        rows.push(extract_cells(&body[start..end], &lower[start..end]));
        pos = end + 5;
    }
    rows
}

fn extract_cells(row: &str, row_lower: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut pos = 0;
    loop {
        let Some(open) = row_lower[pos..].find("<td") else {
            break;
        };
        let open = pos + open;
        let Some(content_start) = row_lower[open..].find('>') else {
            break;
        };
        let content_start = open + content_start + 1;
        let Some(close) = row_lower[content_start..].find("</td>") else {
            break;
        };
        let close = content_start + close;
        cells.push(strip_tags(&row[content_start..close]));
        pos = close + 5;
    }
    cells
}

/// Drop nested tags and collapse the usual entities/whitespace.
fn strip_tags(cell: &str) -> String {
    let mut out = String::with_capacity(cell.len());
    let mut in_tag = false;
    for c in cell.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&nbsp;", " ").replace("&amp;", "&").trim().to_string()
}
