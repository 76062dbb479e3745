use core::any::TypeId;
use std::sync::Arc;

use crate::any::{self, BoxedAny};

/// Storage for constructed singleton instances, keyed by capability.
/// Values are `Arc<Dep>` handles boxed behind `dyn Any`, so unsized
/// capabilities (`dyn Trait`) cache the same way as concrete types.
#[derive(Default)]
pub(crate) struct Cache {
    map: any::Map,
}

impl Cache {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self { map: any::Map::new() }
    }

    #[must_use]
    pub(crate) fn get<Dep>(&self, type_id: &TypeId) -> Option<Arc<Dep>>
    where
        Dep: ?Sized + Send + Sync + 'static,
    {
        self.map.get(type_id).and_then(|boxed| boxed.downcast_ref::<Arc<Dep>>()).cloned()
    }

    #[inline]
    pub(crate) fn insert<Dep>(&mut self, type_id: TypeId, dependency: Arc<Dep>)
    where
        Dep: ?Sized + Send + Sync + 'static,
    {
        self.map.insert(type_id, Box::new(dependency));
    }

    #[inline]
    #[must_use]
    pub(crate) fn remove(&mut self, type_id: &TypeId) -> Option<BoxedAny> {
        self.map.remove(type_id)
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;
    use std::sync::Arc;

    use super::Cache;

    trait Named: Send + Sync {
        fn name(&self) -> &'static str;
    }

    struct Value(&'static str);

    impl Named for Value {
        fn name(&self) -> &'static str {
            self.0
        }
    }

    #[test]
    fn test_concrete_round_trip() {
        let mut cache = Cache::new();
        let type_id = TypeId::of::<Value>();

        assert!(cache.get::<Value>(&type_id).is_none());

        let value = Arc::new(Value("tiger"));
        cache.insert(type_id, value.clone());

        let cached = cache.get::<Value>(&type_id).unwrap();
        assert!(Arc::ptr_eq(&value, &cached));
    }

    #[test]
    fn test_unsized_capability() {
        let mut cache = Cache::new();
        let type_id = TypeId::of::<dyn Named>();

        let value: Arc<dyn Named> = Arc::new(Value("lion"));
        cache.insert(type_id, value);

        let cached = cache.get::<dyn Named>(&type_id).unwrap();
        assert_eq!(cached.name(), "lion");
    }
}
