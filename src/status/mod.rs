use futures::stream::FuturesUnordered;
use futures::StreamExt;
use serde::Deserialize;

use crate::client::{ClientError, MasterClient, WireValue};

// flat metric payload shared by the master and node status endpoints
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Performance {
    #[serde(default)]
    pub cpu: WireValue,
    #[serde(default)]
    pub virtual_memory: WireValue,
    #[serde(default)]
    pub swap_memory: WireValue,
    #[serde(default)]
    pub disk_usage: WireValue,
    #[serde(default)]
    pub disk_io_read: WireValue,
    #[serde(default)]
    pub disk_io_write: WireValue,
    #[serde(default)]
    pub net_io_sent: WireValue,
    #[serde(default)]
    pub net_io_receive: WireValue,
}

pub const PERFORMANCE_HEADERS: [&str; 8] = [
    "Cpu",
    "VirtualMemory",
    "SwapMemory",
    "DiskUsage",
    "DiskRead",
    "DiskWrite",
    "NetSent",
    "NetReceive",
];

pub fn performance_row(performance: &Performance) -> Vec<String> {
    vec![
        performance.cpu.to_string(),
        performance.virtual_memory.to_string(),
        performance.swap_memory.to_string(),
        performance.disk_usage.to_string(),
        performance.disk_io_read.to_string(),
        performance.disk_io_write.to_string(),
        performance.net_io_sent.to_string(),
        performance.net_io_receive.to_string(),
    ]
}

pub async fn fetch_master(client: &MasterClient) -> Result<Option<Performance>, ClientError> {
    client.fetch_status("system/detail/status", &[]).await
}

pub async fn fetch_node(
    client: &MasterClient,
    node_id: &str,
) -> Result<Option<Performance>, ClientError> {
    client
        .fetch_status("node/detail/status", &[("id", node_id.to_string())])
        .await
}

// one concurrent probe per node on the current page; results come back
// in completion order and are re-sorted by label
pub async fn probe_nodes(
    client: &MasterClient,
    nodes: &[(String, String)],
) -> Vec<(String, Result<Option<Performance>, ClientError>)> {
    let mut probes = FuturesUnordered::new();
    for (label, node_id) in nodes {
        let label = label.clone();
        let node_id = node_id.clone();
        probes.push(async move { (label, fetch_node(client, &node_id).await) });
    }
    let mut results = Vec::with_capacity(nodes.len());
    while let Some(done) = probes.next().await {
        results.push(done);
    }
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
