//! Cache Key Module
//!
//! Canonical key wrapper that lets keys of unrelated types share one index.
//!
//! Two keys are equal only if they have the same concrete type and compare
//! equal as that type, so `5_i64` and `FloatKey::from(5.0)` are different
//! keys even though they look alike.

use std::any::{Any, TypeId};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// == Key Object ==
/// Object-safe view of a hashable key.
///
/// Implemented for every `Hash + Eq + Debug + Send + Sync + 'static` type, so
/// callers never implement it by hand.
pub trait KeyObject: Any + fmt::Debug + Send + Sync + 'static {
    /// Upcast used for type-checked comparison.
    fn as_any(&self) -> &dyn Any;

    /// Equality that first requires both sides to be the same type.
    fn key_eq(&self, other: &dyn KeyObject) -> bool;

    /// Feeds the type discriminator and then the value into `state`.
    fn key_hash(&self, state: &mut dyn Hasher);
}

impl<K> KeyObject for K
where
    K: Hash + Eq + fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn key_eq(&self, other: &dyn KeyObject) -> bool {
        other
            .as_any()
            .downcast_ref::<K>()
            .map_or(false, |other| other == self)
    }

    fn key_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<K>().hash(&mut state);
        self.hash(&mut state);
    }
}

impl PartialEq for dyn KeyObject {
    fn eq(&self, other: &Self) -> bool {
        self.key_eq(other)
    }
}

impl Eq for dyn KeyObject {}

impl Hash for dyn KeyObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_hash(state);
    }
}

// == Cache Key ==
/// Owned, cheaply clonable canonical key.
#[derive(Clone)]
pub struct CacheKey(Arc<dyn KeyObject>);

impl CacheKey {
    // == Constructor ==
    /// Wraps a concrete key. An already wrapped key is shared, not nested.
    pub fn new<K: KeyObject>(key: K) -> Self {
        if let Some(wrapped) = (&key as &dyn Any).downcast_ref::<CacheKey>() {
            return wrapped.clone();
        }
        Self(Arc::new(key))
    }

    /// Borrows the type-erased key, usable for index lookups.
    pub fn as_key_object(&self) -> &dyn KeyObject {
        &*self.0
    }

    /// Recovers the original key if it has type `K`.
    pub fn downcast_ref<K: Any>(&self) -> Option<&K> {
        self.as_key_object().as_any().downcast_ref::<K>()
    }
}

/// Sees through a [`CacheKey`] passed where a plain key is expected, so keys
/// handed out by the cache look up the same entry as the original key.
pub(crate) fn canonical(key: &dyn KeyObject) -> &dyn KeyObject {
    match key.as_any().downcast_ref::<CacheKey>() {
        Some(wrapped) => wrapped.as_key_object(),
        None => key,
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_key_object() == other.as_key_object()
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_key_object().hash(state);
    }
}

impl Borrow<dyn KeyObject> for CacheKey {
    fn borrow(&self) -> &(dyn KeyObject + 'static) {
        &*self.0
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_key_object(), f)
    }
}

// == Float Key ==
/// Hashable floating-point key.
///
/// `f32` and `f64` are neither `Hash` nor `Eq`, so float keys go through
/// this wrapper. Equality is on the bit pattern after folding `-0.0` into
/// `0.0` and every NaN into a single NaN.
#[derive(Clone, Copy)]
pub struct FloatKey(f64);

impl FloatKey {
    /// Wraps a float.
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Returns the wrapped float.
    pub fn get(self) -> f64 {
        self.0
    }

    fn canonical_bits(self) -> u64 {
        if self.0.is_nan() {
            f64::NAN.to_bits()
        } else if self.0 == 0.0 {
            0.0f64.to_bits()
        } else {
            self.0.to_bits()
        }
    }
}

impl From<f64> for FloatKey {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<f32> for FloatKey {
    fn from(value: f32) -> Self {
        Self(f64::from(value))
    }
}

impl PartialEq for FloatKey {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_bits() == other.canonical_bits()
    }
}

impl Eq for FloatKey {}

impl Hash for FloatKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_bits().hash(state);
    }
}

impl fmt::Debug for FloatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}
