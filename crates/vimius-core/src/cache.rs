use crate::source::ManifestSource;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::{debug, info, trace};
use vimius_schema::{ManifestError, SubmoduleName, SubmoduleRecord};

/// Loaded manifest: records in manifest order plus a name index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<SubmoduleRecord>,
    index: HashMap<SubmoduleName, usize>,
}

impl Catalog {
    pub fn new(records: Vec<SubmoduleRecord>) -> Result<Self, ManifestError> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if index.insert(record.name.clone(), pos).is_some() {
                return Err(ManifestError::DuplicateSubmodule(record.name.to_string()));
            }
        }
        Ok(Self { records, index })
    }

    pub fn records(&self) -> &[SubmoduleRecord] {
        &self.records
    }

    pub fn get(&self, name: &str) -> Option<&SubmoduleRecord> {
        self.index.get(name).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Memoized manifest, loaded from its source on first access.
///
/// Only a successful load is cached. Concurrent first accesses serialize on
/// the init guard so the source is parsed once.
pub struct ManifestCache {
    source: Box<dyn ManifestSource>,
    catalog: OnceLock<Catalog>,
    init: Mutex<()>,
}

impl ManifestCache {
    pub fn new(source: impl ManifestSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            catalog: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    pub fn catalog(&self) -> Result<&Catalog, ManifestError> {
        if let Some(catalog) = self.catalog.get() {
            trace!("manifest cache hit");
            return Ok(catalog);
        }

        // The guard protects no data, so a poisoned lock is still usable.
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(catalog) = self.catalog.get() {
            return Ok(catalog);
        }

        debug!("loading submodule manifest from {}", self.source.describe());
        let catalog = Catalog::new(self.source.load()?)?;
        info!("loaded {} submodules", catalog.len());
        Ok(self.catalog.get_or_init(|| catalog))
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.get().is_some()
    }
}

impl std::fmt::Debug for ManifestCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestCache")
            .field("source", &self.source.describe())
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use vimius_schema::GroupName;

    struct CountingSource {
        loads: Arc<AtomicUsize>,
        fail_first: bool,
    }

    impl ManifestSource for CountingSource {
        fn describe(&self) -> String {
            "counting".to_owned()
        }

        fn load(&self) -> Result<Vec<SubmoduleRecord>, ManifestError> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && n == 0 {
                return Err(ManifestError::Empty);
            }
            Ok(vec![record("pathogen")])
        }
    }

    fn record(name: &str) -> SubmoduleRecord {
        SubmoduleRecord {
            name: SubmoduleName::new(name),
            path: format!("vim/{name}"),
            group: GroupName::new("core"),
            dependencies: Vec::new(),
        }
    }

    #[test]
    fn loads_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let cache = ManifestCache::new(CountingSource {
            loads: Arc::clone(&loads),
            fail_first: false,
        });
        assert!(!cache.is_loaded());

        cache.catalog().unwrap();
        cache.catalog().unwrap();
        assert!(cache.is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let loads = Arc::new(AtomicUsize::new(0));
        let cache = ManifestCache::new(CountingSource {
            loads: Arc::clone(&loads),
            fail_first: true,
        });

        assert!(cache.catalog().is_err());
        assert!(!cache.is_loaded());
        assert_eq!(cache.catalog().unwrap().len(), 1);
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn concurrent_first_access_loads_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let cache = ManifestCache::new(CountingSource {
            loads: Arc::clone(&loads),
            fail_first: false,
        });

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    assert_eq!(cache.catalog().unwrap().len(), 1);
                });
            }
        });
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn catalog_rejects_duplicate_names() {
        let err = Catalog::new(vec![record("a"), record("a")]).unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateSubmodule(name) if name == "a"));
    }

    #[test]
    fn catalog_lookup_by_name() {
        let catalog = Catalog::new(vec![record("a"), record("b")]).unwrap();
        assert_eq!(catalog.get("b").unwrap().path, "vim/b");
        assert!(catalog.contains("a"));
        assert!(!catalog.contains("c"));
        assert!(!catalog.is_empty());
    }
}
