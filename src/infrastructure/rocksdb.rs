use crate::domain::cart::{Cart, OwnerId};
use crate::domain::ports::{CartRepository, VersionedCart};
use crate::error::{CartError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing cart states.
pub const CF_CARTS: &str = "carts";

/// Stored record: the cart together with its write version.
#[derive(Debug, Serialize, Deserialize)]
struct StoredCart {
    version: u64,
    cart: Cart,
}

/// A persistent cart repository backed by RocksDB.
///
/// Carts are stored as JSON values keyed by owner id in a dedicated column
/// family. RocksDB itself has no conditional writes, so the version
/// compare-and-swap runs under an in-process mutex; the conflict guarantee
/// holds for all handles cloned from one store within a single process.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbCartStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDbCartStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the "carts" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_carts = ColumnFamilyDescriptor::new(CF_CARTS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_carts])
            .map_err(|e| CartError::Storage(Box::new(e)))?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_CARTS).ok_or_else(|| {
            CartError::Storage(Box::new(std::io::Error::other(
                "carts column family not found",
            )))
        })
    }

    fn read(&self, owner: &OwnerId) -> Result<Option<StoredCart>> {
        let cf = self.cf()?;
        let bytes = self
            .db
            .get_cf(cf, owner.as_str().as_bytes())
            .map_err(|e| CartError::Storage(Box::new(e)))?;

        match bytes {
            Some(bytes) => {
                let stored =
                    serde_json::from_slice(&bytes).map_err(|e| CartError::Storage(Box::new(e)))?;
                Ok(Some(stored))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl CartRepository for RocksDbCartStore {
    async fn load(&self, owner: &OwnerId) -> Result<VersionedCart> {
        Ok(match self.read(owner)? {
            Some(stored) => VersionedCart {
                cart: stored.cart,
                version: stored.version,
            },
            None => VersionedCart::empty(owner.clone()),
        })
    }

    async fn save(&self, versioned: VersionedCart) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let owner = versioned.cart.owner_id.clone();
        let current = self.read(&owner)?.map(|stored| stored.version).unwrap_or(0);
        if current != versioned.version {
            return Err(CartError::Conflict(owner));
        }

        let record = StoredCart {
            version: versioned.version + 1,
            cart: versioned.cart,
        };
        let value = serde_json::to_vec(&record).map_err(|e| CartError::Storage(Box::new(e)))?;

        let cf = self.cf()?;
        self.db
            .put_cf(cf, owner.as_str().as_bytes(), value)
            .map_err(|e| CartError::Storage(Box::new(e)))?;

        Ok(())
    }

    async fn all_carts(&self) -> Result<Vec<Cart>> {
        let cf = self.cf()?;
        let mut carts = Vec::new();

        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item.map_err(|e| CartError::Storage(Box::new(e)))?;
            let stored: StoredCart =
                serde_json::from_slice(&value).map_err(|e| CartError::Storage(Box::new(e)))?;
            carts.push(stored.cart);
        }

        Ok(carts)
    }
}
