//! Read-only JSON data store for orders, products and FAQs.
//!
//! Every call re-reads the backing file. Nothing is cached, so editing the
//! JSON on disk takes effect on the very next request. A missing or corrupt
//! file degrades to an empty collection and a warning in the log.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub status: String,
    pub expected_delivery: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A canned question/answer pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// The three record files the store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Orders,
    Products,
    Faqs,
}

impl DataKind {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Orders => "orders.json",
            Self::Products => "products.json",
            Self::Faqs => "faq.json",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Products => "products",
            Self::Faqs => "faqs",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything the support agent may consult for one request.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub orders: Vec<Order>,
    pub products: Vec<Product>,
    pub faqs: Vec<FaqEntry>,
}

/// File-backed store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read and parse one collection, surfacing the failure.
    pub async fn try_load<T: DeserializeOwned>(&self, kind: DataKind) -> Result<Vec<T>, LoadError> {
        let path = self.dir.join(kind.file_name());
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
        let records: Vec<T> =
            serde_json::from_str(&raw).map_err(|source| LoadError::Parse { path, source })?;
        debug!(kind = %kind, count = records.len(), "Loaded collection");
        Ok(records)
    }

    /// Read one collection; on any failure log it and return an empty vector.
    pub async fn load<T: DeserializeOwned>(&self, kind: DataKind) -> Vec<T> {
        match self.try_load(kind).await {
            Ok(records) => records,
            Err(e) => {
                warn!(kind = %kind, error = %e, "Error loading collection, using empty set");
                Vec::new()
            }
        }
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.load(DataKind::Orders).await
    }

    pub async fn products(&self) -> Vec<Product> {
        self.load(DataKind::Products).await
    }

    pub async fn faqs(&self) -> Vec<FaqEntry> {
        self.load(DataKind::Faqs).await
    }

    /// Load all three collections concurrently.
    pub async fn load_all(&self) -> Collections {
        let (orders, products, faqs) = tokio::join!(self.orders(), self.products(), self.faqs());
        Collections {
            orders,
            products,
            faqs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, kind: DataKind, body: &str) {
        std::fs::write(dir.join(kind.file_name()), body).unwrap();
    }

    #[tokio::test]
    async fn test_load_all_reads_each_file() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            DataKind::Orders,
            r#"[{"orderId":"ORD1","status":"Shipped","expectedDelivery":"2024-05-01","items":["Mouse"]}]"#,
        );
        write(
            tmp.path(),
            DataKind::Products,
            r#"[{"id":1,"name":"Earbuds","category":"Electronics","price":2999,"tags":["audio"]}]"#,
        );
        write(
            tmp.path(),
            DataKind::Faqs,
            r#"[{"question":"Do you ship abroad?","answer":"No.","keywords":["abroad"]}]"#,
        );

        let store = DataStore::new(tmp.path());
        let all = store.load_all().await;
        assert_eq!(all.orders[0].order_id, "ORD1");
        assert_eq!(all.orders[0].items, vec!["Mouse"]);
        assert_eq!(all.products[0].price, 2999.0);
        assert!(all.products[0].description.is_none());
        assert_eq!(all.faqs[0].keywords, vec!["abroad"]);
    }

    #[tokio::test]
    async fn test_missing_file_degrades_to_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DataStore::new(tmp.path());

        let err = store.try_load::<Order>(DataKind::Orders).await.unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("orders.json"));

        assert!(store.orders().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_degrades_to_empty() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), DataKind::Products, "{ not json");
        let store = DataStore::new(tmp.path());

        let err = store.try_load::<Product>(DataKind::Products).await.unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(store.products().await.is_empty());
    }

    #[tokio::test]
    async fn test_reload_sees_changes() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DataStore::new(tmp.path());
        write(tmp.path(), DataKind::Faqs, "[]");
        assert!(store.faqs().await.is_empty());

        write(
            tmp.path(),
            DataKind::Faqs,
            r#"[{"question":"Q","answer":"A","keywords":[]}]"#,
        );
        assert_eq!(store.faqs().await.len(), 1);
    }

    #[test]
    fn test_order_serializes_camel_case() {
        let order = Order {
            order_id: "ORD9".into(),
            status: "Processing".into(),
            expected_delivery: "soon".into(),
            items: vec![],
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["orderId"], "ORD9");
        assert_eq!(json["expectedDelivery"], "soon");
    }
}
