//! Firing functions: native callbacks that spawn entities.
//!
//! A firing function is keyed by `(type name, function name)` and receives
//! the values popped by `Fire`. Its arity comes from the closure signature:
//! a callback `Fn(&FireContext, f32, f32)` has arity 2.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use bulletscript_core::RegistrationError;

/// Bullet updater attached by `FireWithUpdater`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachedUpdater {
    /// Index into the bullet-updater table.
    pub index: usize,
    /// Updater arguments in declaration order.
    pub arguments: Vec<f32>,
}

/// Extra information passed to every firing callback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FireContext {
    /// Updater the spawned entity should run each tick, if any.
    pub updater: Option<AttachedUpdater>,
}

/// Callables usable as firing functions.
///
/// Implemented for `Fn(&FireContext, f32, ..)` closures with up to eight
/// float parameters. `Args` only disambiguates the impls.
pub trait FiringCallback<Args>: Send + Sync + 'static {
    /// Number of float parameters.
    const ARITY: usize;

    /// Call with exactly [`ARITY`](Self::ARITY) arguments.
    fn invoke(&self, context: &FireContext, args: &[f32]);
}

macro_rules! float {
    ($_arg:ident) => {
        f32
    };
}

macro_rules! impl_firing_callback {
    ($arity:literal $(, $arg:ident)*) => {
        impl<F> FiringCallback<($(float!($arg),)*)> for F
        where
            F: Fn(&FireContext $(, float!($arg))*) + Send + Sync + 'static,
        {
            const ARITY: usize = $arity;

            #[allow(unused_variables, unused_mut)]
            fn invoke(&self, context: &FireContext, args: &[f32]) {
                debug_assert_eq!(args.len(), $arity, "firing function arity");
                let mut args = args.iter().copied();
                $(let $arg = args.next().unwrap_or_default();)*
                (self)(context $(, $arg)*)
            }
        }
    };
}

impl_firing_callback!(0);
impl_firing_callback!(1, a);
impl_firing_callback!(2, a, b);
impl_firing_callback!(3, a, b, c);
impl_firing_callback!(4, a, b, c, d);
impl_firing_callback!(5, a, b, c, d, e);
impl_firing_callback!(6, a, b, c, d, e, f);
impl_firing_callback!(7, a, b, c, d, e, f, g);
impl_firing_callback!(8, a, b, c, d, e, f, g, h);

type ErasedFiring = dyn Fn(&FireContext, &[f32]) + Send + Sync;

/// A registered firing function.
///
/// Only the firing arity lives here. When `FireWithUpdater` attaches a
/// bullet updater, the number of updater arguments is that updater
/// scope's parameter count.
#[derive(Clone)]
pub struct FiringFunctionDefinition {
    /// Owning entity type.
    pub type_name: String,
    /// Function name.
    pub name: String,
    /// Index baked into `Fire` instructions.
    pub index: usize,
    /// Number of values popped by `Fire`.
    pub arity: usize,
    callback: Arc<ErasedFiring>,
}

impl FiringFunctionDefinition {
    /// Invoke the callback with values in push order.
    ///
    /// `args` must hold exactly [`arity`](Self::arity) values.
    pub fn call(&self, context: &FireContext, args: &[f32]) {
        (self.callback)(context, args)
    }
}

impl fmt::Debug for FiringFunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiringFunctionDefinition")
            .field("type_name", &self.type_name)
            .field("name", &self.name)
            .field("index", &self.index)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Firing functions by key and by global index.
#[derive(Debug, Default)]
pub struct FiringRegistry {
    functions: Vec<FiringFunctionDefinition>,
    by_key: FxHashMap<(String, String), usize>,
}

impl FiringRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for `(type_name, name)`, returning its index.
    pub fn add<Args, C>(
        &mut self,
        type_name: &str,
        name: &str,
        callback: C,
    ) -> Result<usize, RegistrationError>
    where
        C: FiringCallback<Args>,
    {
        let key = (type_name.to_string(), name.to_string());
        if self.by_key.contains_key(&key) {
            return Err(RegistrationError::DuplicateRegistration {
                name: format!("{type_name}.{name}"),
                kind: "firing function",
            });
        }

        let index = self.functions.len();
        self.functions.push(FiringFunctionDefinition {
            type_name: type_name.to_string(),
            name: name.to_string(),
            index,
            arity: C::ARITY,
            callback: Arc::new(move |context: &FireContext, args: &[f32]| {
                callback.invoke(context, args)
            }),
        });
        self.by_key.insert(key, index);
        Ok(index)
    }

    /// Look up by `(type_name, name)`.
    pub fn get(&self, type_name: &str, name: &str) -> Option<&FiringFunctionDefinition> {
        self.by_key
            .get(&(type_name.to_string(), name.to_string()))
            .map(|&i| &self.functions[i])
    }

    /// Look up by global index.
    pub fn by_index(&self, index: usize) -> Option<&FiringFunctionDefinition> {
        self.functions.get(index)
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
