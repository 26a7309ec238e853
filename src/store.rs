use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::errors::CrudsError;
use crate::parse::MAX_COPIES;
use crate::products::Product;

/// Flat key/value string storage holding whole serialized blobs.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, CrudsError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), CrudsError>;
}

/// One file per key inside a data directory.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, CrudsError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "opened file storage");
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CrudsError> {
        match fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CrudsError> {
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CrudsError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CrudsError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The ordered product list. A product's position is its identity, and every
/// mutation rewrites the whole list under a single storage key.
#[derive(Debug)]
pub struct ProductStore<S> {
    storage: S,
    key: String,
    products: Vec<Product>,
}

impl<S: Storage> ProductStore<S> {
    pub fn open(storage: S, key: impl Into<String>) -> Result<Self, CrudsError> {
        let key = key.into();
        let products = load(&storage, &key)?;
        info!(key = %key, count = products.len(), "loaded products");
        Ok(Self {
            storage,
            key,
            products,
        })
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Product, CrudsError> {
        self.products.get(index).ok_or(CrudsError::OutOfRange {
            index,
            len: self.products.len(),
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn snapshot(&self) -> Vec<Product> {
        self.products.clone()
    }

    pub fn insert(&mut self, product: Product, count: u32) -> Result<(), CrudsError> {
        if count > MAX_COPIES {
            return Err(CrudsError::InvalidArgument(format!(
                "cannot insert {count} copies, at most {MAX_COPIES}"
            )));
        }
        let count = count.max(1) as usize;
        let mut next = self.products.clone();
        next.extend(std::iter::repeat(product).take(count));
        self.commit(next)?;
        debug!(count, len = self.products.len(), "inserted products");
        Ok(())
    }

    pub fn replace_at(&mut self, index: usize, product: Product) -> Result<(), CrudsError> {
        self.get(index)?;
        let mut next = self.products.clone();
        next[index] = product;
        self.commit(next)?;
        debug!(index, "replaced product");
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Product, CrudsError> {
        self.get(index)?;
        let mut next = self.products.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        debug!(index, len = self.products.len(), "removed product");
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<(), CrudsError> {
        self.commit(Vec::new())?;
        info!("cleared all products");
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn commit(&mut self, next: Vec<Product>) -> Result<(), CrudsError> {
        let blob = serde_json::to_string(&next)?;
        self.storage.set(&self.key, &blob)?;
        self.products = next;
        Ok(())
    }
}

/// Reads the list stored under `key`. A missing or unreadable blob is an empty list.
pub fn load(storage: &impl Storage, key: &str) -> Result<Vec<Product>, CrudsError> {
    let Some(blob) = storage.get(key)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&blob) {
        Ok(products) => Ok(products),
        Err(e) => {
            warn!(key, error = %e, "stored products are unreadable, starting empty");
            Ok(Vec::new())
        }
    }
}
