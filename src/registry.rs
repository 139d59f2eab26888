//! Message identifier to constructor mapping
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::debug;

/// Zero argument constructor
pub type Constructor<P> = Box<dyn Fn() -> Box<P> + Send + Sync>;

/// [Registry] maps message identifiers to constructors.
/// Registering an identifier twice replaces the previous constructor
/// ("last wins"): this is how extended message sets are layered
/// on top of the default ones.
pub struct Registry<K, P: ?Sized> {
    constructors: HashMap<K, Constructor<P>>,
}

impl<K: Eq + Hash + Debug, P: ?Sized> Default for Registry<K, P> {
    fn default() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Debug, P: ?Sized> Debug for Registry<K, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_set().entries(self.constructors.keys()).finish()
    }
}

impl<K: Eq + Hash + Debug, P: ?Sized> Registry<K, P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructor for `id`.
    /// Returns true if a previous registration was replaced.
    pub fn register<F>(&mut self, id: K, constructor: F) -> bool
    where
        F: Fn() -> Box<P> + Send + Sync + 'static,
    {
        let replaced = self.constructors.contains_key(&id);
        if replaced {
            debug!("registry: {:?} overwritten", id);
        }
        self.constructors.insert(id, Box::new(constructor));
        replaced
    }

    /// Layers all registrations of `other` over [Self].
    pub fn extend(&mut self, other: Self) {
        for (id, constructor) in other.constructors {
            if self.constructors.contains_key(&id) {
                debug!("registry: {:?} overwritten", id);
            }
            self.constructors.insert(id, constructor);
        }
    }

    /// Instantiates the message registered under `id`
    pub fn create<Q>(&self, id: &Q) -> Option<Box<P>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.constructors.get(id).map(|constructor| constructor())
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.constructors.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Registered identifiers, in arbitrary order
    pub fn ids(&self) -> impl Iterator<Item = &K> + '_ {
        self.constructors.keys()
    }
}
