//! Common test utilities and fixtures

#![allow(dead_code)]

use ganymede_aggregations::store::{DocumentStore, FileStore, MemoryStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

/// A store under test, with direct access for seeding and inspection
pub enum TestStore {
    Memory(Arc<MemoryStore>),
    File(Arc<FileStore>, TempDir),
}

impl TestStore {
    pub fn memory() -> Self {
        Self::Memory(Arc::new(MemoryStore::new("ganymede")))
    }

    pub async fn file() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path(), "ganymede").await.unwrap();
        Self::File(Arc::new(store), temp_dir)
    }

    /// One of each backend
    pub async fn all() -> Vec<Self> {
        vec![Self::memory(), Self::file().await]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::File(..) => "file",
        }
    }

    pub fn store(&self) -> Arc<dyn DocumentStore> {
        match self {
            Self::Memory(store) => store.clone() as Arc<dyn DocumentStore>,
            Self::File(store, _) => store.clone() as Arc<dyn DocumentStore>,
        }
    }

    pub async fn seed(&self, collection: &str, documents: Vec<Value>) {
        match self {
            Self::Memory(store) => store.insert_many(collection, documents).await,
            Self::File(store, _) => store.insert_many(collection, documents).await.unwrap(),
        }
    }

    pub async fn read(&self, collection: &str) -> Option<Vec<Value>> {
        match self {
            Self::Memory(store) => store.collection(collection).await,
            Self::File(store, _) => store.collection(collection).await.unwrap(),
        }
    }
}

/// A server with three disks, two NICs and one software label
pub fn server(server_id: &str, report_period: &str) -> Value {
    json!({
        "_id": format!("oid-{}", server_id),
        "general": {
            "server_id": server_id,
            "name": format!("{}.example.net", server_id),
            "state": "active",
        },
        "hardware": {
            "disk": [
                {"slot": 0, "size_gb": 300, "model": "ST300MM0006"},
                {"slot": 1, "size_gb": 300, "model": "ST300MM0006"},
                {"slot": 2, "size_gb": 1200, "model": "ST1200MM0088"},
            ],
            "nic": [
                {"nic_id": "eth0", "speed": 10000},
                {"nic_id": "eth1", "speed": 10000},
            ],
            "software_label": [
                {"display_name": "RHEL 7.2", "vendor": "Red Hat"},
            ],
        },
        "report_period": report_period,
        "ganymede_doc_version": 3,
    })
}

pub fn image(image_id: &str, disks: Value) -> Value {
    json!({
        "_id": format!("oid-{}", image_id),
        "general": {"image_id": image_id},
        "hardware": {"disk": disks},
        "report_period": "2016-05",
        "ganymede_doc_version": 3,
    })
}

pub fn mcp(geo: &str, sites: Value) -> Value {
    json!({
        "_id": format!("oid-mcp-{}", geo),
        "geo": geo,
        "sites": sites,
        "report_period": "2016-05",
        "ganymede_doc_version": 2,
    })
}

pub fn drs_pair(pair_id: &str, groups: Value) -> Value {
    json!({
        "_id": format!("oid-{}", pair_id),
        "general": {"drs_pair_id": pair_id, "consistency_groups": groups},
        "report_period": "2016-05",
        "ganymede_doc_version": 1,
    })
}

/// Seed every source collection the built-in jobs read
pub async fn seed_inventory(store: &TestStore) {
    store
        .seed(
            "servers",
            vec![server("srv-001", "2016-05"), server("srv-002", "2016-06")],
        )
        .await;
    store
        .seed(
            "images",
            vec![image("img-001", json!([{"size_gb": 40}]))],
        )
        .await;
    store
        .seed(
            "mcps",
            vec![mcp(
                "emea",
                json!([
                    {"mcp_id": "m1", "display_name": "LON", "type": "core", "site_name": "london", "racks": 12},
                    {"mcp_id": "m2", "display_name": "FRA", "type": "edge", "site_name": "frankfurt", "racks": 4},
                ]),
            )],
        )
        .await;
    store
        .seed(
            "drs_cluster_pairs",
            vec![drs_pair(
                "pair-1",
                json!([{"cg_id": "cg-1", "state": "ok", "lag_s": 3}]),
            )],
        )
        .await;
}
