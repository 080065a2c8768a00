use crate::{
    mapping::{
        catalog::{Catalog, catalog},
        type_map::{RowBinding, TypeMap},
    },
    model::entity::EntityModel,
    traits::FromRow,
};
use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc, LazyLock, Mutex, MutexGuard, OnceLock, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};
use tracing::debug;

static GLOBAL: LazyLock<TypeRegistry> = LazyLock::new(|| TypeRegistry::new(catalog()));

///
/// UnitMaps
/// Every type map built by one unit scan, keyed by type path.
///

type UnitMaps = HashMap<&'static str, Arc<TypeMap>>;

///
/// TypeRegistry
///
/// Memoized, per-unit registration of type maps.
///
/// The first use of any type from a mapping unit scans the whole unit once;
/// racing callers block on the same cell and observe the finished maps.
/// Entries live for the process lifetime.
///

pub struct TypeRegistry {
    catalog: &'static Catalog,
    units: Mutex<HashMap<&'static str, Arc<OnceLock<UnitMaps>>>>,
    scans: AtomicUsize,
}

impl TypeRegistry {
    #[must_use]
    pub fn new(catalog: &'static Catalog) -> Self {
        Self {
            catalog,
            units: Mutex::new(HashMap::new()),
            scans: AtomicUsize::new(0),
        }
    }

    /// Registry over the process-wide catalog.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Register `T`'s unit if needed. Scalars are a no-op.
    pub fn ensure_registered<T: FromRow>(&self) {
        if let Some(model) = T::MODEL {
            self.registered(model.unit);
        }
    }

    /// Type map for `model`, registering its unit on first use.
    ///
    /// Types the scan skipped (no annotations) get a convention-only map.
    #[must_use]
    pub fn type_map_for(&self, model: &'static EntityModel) -> Arc<TypeMap> {
        self.registered(model.unit)
            .get()
            .and_then(|maps| maps.get(model.path))
            .cloned()
            .unwrap_or_else(|| Arc::new(TypeMap::conventional(model)))
    }

    #[must_use]
    pub fn type_map<T: FromRow>(&self) -> Option<Arc<TypeMap>> {
        T::MODEL.map(|model| self.type_map_for(model))
    }

    /// Column binding of `T` against a result set's columns.
    #[must_use]
    pub fn binding_for<T: FromRow>(&self, columns: &[String]) -> Option<RowBinding> {
        self.type_map::<T>().map(|map| map.bind(columns))
    }

    #[must_use]
    pub fn is_registered(&self, unit: &str) -> bool {
        self.lock_units()
            .get(unit)
            .is_some_and(|cell| cell.get().is_some())
    }

    /// Units scanned so far, sorted.
    #[must_use]
    pub fn registered_units(&self) -> Vec<&'static str> {
        let mut units: Vec<_> = self
            .lock_units()
            .iter()
            .filter(|(_, cell)| cell.get().is_some())
            .map(|(unit, _)| *unit)
            .collect();
        units.sort_unstable();
        units
    }

    /// Number of unit scans performed.
    #[must_use]
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    // The map lock only guards cell lookup; scans run outside it so units
    // register independently.
    fn registered(&self, unit: &'static str) -> Arc<OnceLock<UnitMaps>> {
        let cell = Arc::clone(self.lock_units().entry(unit).or_default());
        cell.get_or_init(|| self.scan(unit));
        cell
    }

    fn scan(&self, unit: &'static str) -> UnitMaps {
        self.scans.fetch_add(1, Ordering::SeqCst);

        let maps: UnitMaps = self
            .catalog
            .unit(unit)
            .into_iter()
            .filter(|model| model.is_annotated())
            .map(|model| (model.path, Arc::new(TypeMap::annotated(model))))
            .collect();

        debug!(unit, types = maps.len(), "registered mapping unit");

        maps
    }

    fn lock_units(&self) -> MutexGuard<'_, HashMap<&'static str, Arc<OnceLock<UnitMaps>>>> {
        self.units.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("units", &self.registered_units())
            .field("scans", &self.scan_count())
            .finish_non_exhaustive()
    }
}
