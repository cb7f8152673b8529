//! Entity types and their float properties.
//!
//! Each script-visible type is bound to exactly one Rust type. Properties
//! are plain `fn` getter/setter pairs over that Rust type, erased behind
//! [`PropertyAccessor`] so the VM can call them through `&dyn Any`.
//!
//! # Global property indices
//!
//! Bytecode never names a type. `GetProperty`/`SetProperty` carry a
//! *global* index into the union of every registered property name, built
//! by [`TypeRegistry::update_property_mappings`]. Two types declaring
//! `speed` share one global index, so the same compiled body runs against
//! either.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

use rustc_hash::FxHashMap;
use tracing::debug;

use bulletscript_core::{RegistrationError, RuntimeError};

/// Reads a float property from a concrete entity.
pub type PropertyGetter<T> = fn(&T) -> f32;

/// Writes a float property on a concrete entity.
pub type PropertySetter<T> = fn(&mut T, f32);

// ============================================================================
// Accessors
// ============================================================================

/// Type-erased getter/setter pair.
///
/// Returns `None`/`false` when the entity is not the bound Rust type.
pub trait PropertyAccessor: Send + Sync {
    /// Read the property.
    fn get(&self, entity: &dyn Any) -> Option<f32>;

    /// Write the property.
    fn set(&self, entity: &mut dyn Any, value: f32) -> bool;
}

struct TypedAccessor<T> {
    getter: PropertyGetter<T>,
    setter: PropertySetter<T>,
    _marker: PhantomData<fn(T)>,
}

impl<T: Any> PropertyAccessor for TypedAccessor<T> {
    fn get(&self, entity: &dyn Any) -> Option<f32> {
        entity.downcast_ref::<T>().map(self.getter)
    }

    fn set(&self, entity: &mut dyn Any, value: f32) -> bool {
        match entity.downcast_mut::<T>() {
            Some(entity) => {
                (self.setter)(entity, value);
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Definitions
// ============================================================================

/// A named float property bound on one type.
pub struct PropertyBinding {
    /// Property name.
    pub name: String,
    /// Position within the owning type.
    pub local_index: usize,
    /// Position in the global property table, once mappings are built.
    pub global_index: Option<usize>,
    accessor: Box<dyn PropertyAccessor>,
}

impl PropertyBinding {
    /// The erased accessor.
    pub fn accessor(&self) -> &dyn PropertyAccessor {
        self.accessor.as_ref()
    }
}

impl fmt::Debug for PropertyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBinding")
            .field("name", &self.name)
            .field("local_index", &self.local_index)
            .field("global_index", &self.global_index)
            .finish_non_exhaustive()
    }
}

/// A registered entity type.
#[derive(Debug)]
pub struct TypeDefinition {
    /// Script-visible name.
    pub name: String,
    /// Registration order index.
    pub index: usize,
    type_id: TypeId,
    properties: Vec<PropertyBinding>,
    by_name: FxHashMap<String, usize>,
    global_to_local: FxHashMap<usize, usize>,
}

impl TypeDefinition {
    /// Properties in binding order.
    pub fn properties(&self) -> &[PropertyBinding] {
        &self.properties
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyBinding> {
        self.by_name.get(name).map(|&i| &self.properties[i])
    }

    /// Resolve a global property index to this type's binding.
    pub fn property_by_global(&self, global: usize) -> Option<&PropertyBinding> {
        self.global_to_local
            .get(&global)
            .map(|&local| &self.properties[local])
    }

    /// The bound Rust type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

// ============================================================================
// TypeRegistry
// ============================================================================

/// Registered entity types plus the global property table.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: Vec<TypeDefinition>,
    by_name: FxHashMap<String, usize>,
    by_type_id: FxHashMap<TypeId, usize>,
    /// Union of all property names in registration order.
    property_names: Vec<String>,
    property_index: FxHashMap<String, usize>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register Rust type `T` under a script-visible name.
    pub fn add_type<T: Any>(&mut self, name: &str) -> Result<usize, RegistrationError> {
        if self.by_name.contains_key(name) {
            return Err(RegistrationError::DuplicateType(name.to_string()));
        }
        let type_id = TypeId::of::<T>();
        if let Some(&existing) = self.by_type_id.get(&type_id) {
            return Err(RegistrationError::DuplicateRustType {
                existing: self.types[existing].name.clone(),
                name: name.to_string(),
            });
        }

        let index = self.types.len();
        self.types.push(TypeDefinition {
            name: name.to_string(),
            index,
            type_id,
            properties: Vec::new(),
            by_name: FxHashMap::default(),
            global_to_local: FxHashMap::default(),
        });
        self.by_name.insert(name.to_string(), index);
        self.by_type_id.insert(type_id, index);

        debug!(type_name = name, index, "registered entity type");
        Ok(index)
    }

    /// Bind a float property on a registered type, returning its local index.
    ///
    /// `T` must be the Rust type the name was registered with.
    pub fn add_property<T: Any>(
        &mut self,
        type_name: &str,
        name: &str,
        getter: PropertyGetter<T>,
        setter: PropertySetter<T>,
    ) -> Result<usize, RegistrationError> {
        let &type_index = self
            .by_name
            .get(type_name)
            .ok_or_else(|| RegistrationError::TypeNotFound(type_name.to_string()))?;
        let def = &mut self.types[type_index];

        if def.type_id != TypeId::of::<T>() {
            return Err(RegistrationError::AccessorTypeMismatch {
                type_name: type_name.to_string(),
                property: name.to_string(),
            });
        }
        if def.by_name.contains_key(name) {
            return Err(RegistrationError::DuplicateProperty {
                type_name: type_name.to_string(),
                property: name.to_string(),
            });
        }

        let local_index = def.properties.len();
        def.properties.push(PropertyBinding {
            name: name.to_string(),
            local_index,
            global_index: None,
            accessor: Box::new(TypedAccessor {
                getter,
                setter,
                _marker: PhantomData,
            }),
        });
        def.by_name.insert(name.to_string(), local_index);

        debug!(type_name, property = name, local_index, "bound property");
        Ok(local_index)
    }

    /// Rebuild the global property table.
    ///
    /// Must run after the last `add_property` and before compiling or
    /// interpreting anything that touches properties. Indices for names
    /// seen on earlier types never change.
    pub fn update_property_mappings(&mut self) {
        self.property_names.clear();
        self.property_index.clear();

        for def in &mut self.types {
            def.global_to_local.clear();
            for binding in &mut def.properties {
                let global = match self.property_index.get(&binding.name) {
                    Some(&global) => global,
                    None => {
                        let global = self.property_names.len();
                        self.property_names.push(binding.name.clone());
                        self.property_index.insert(binding.name.clone(), global);
                        global
                    }
                };
                binding.global_index = Some(global);
                def.global_to_local.insert(global, binding.local_index);
            }
        }

        debug!(
            properties = self.property_names.len(),
            types = self.types.len(),
            "rebuilt property mappings"
        );
    }

    /// Global index of a property name.
    pub fn global_property_index(&self, name: &str) -> Option<usize> {
        self.property_index.get(name).copied()
    }

    /// All property names, indexed by global index.
    pub fn property_names(&self) -> &[String] {
        &self.property_names
    }

    /// Look up a type by name.
    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.by_name.get(name).map(|&i| &self.types[i])
    }

    /// Check if a type name is registered.
    pub fn contains_type(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// The type definition bound to the entity's concrete Rust type.
    pub fn type_of(&self, entity: &dyn Any) -> Option<&TypeDefinition> {
        self.by_type_id
            .get(&Any::type_id(entity))
            .map(|&i| &self.types[i])
    }

    /// Number of registered types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    // ==========================================================================
    // Runtime access
    // ==========================================================================

    fn resolve(&self, entity: &dyn Any, global: usize) -> Result<&PropertyBinding, RuntimeError> {
        let name = self
            .property_names
            .get(global)
            .ok_or(RuntimeError::UnknownProperty(global))?;
        let def = self
            .type_of(entity)
            .ok_or(RuntimeError::UnregisteredEntityType)?;
        def.property_by_global(global)
            .ok_or_else(|| RuntimeError::PropertyNotOnType {
                type_name: def.name.clone(),
                property: name.clone(),
            })
    }

    /// Read the property at `global` from `entity`.
    pub fn get_property(&self, entity: &dyn Any, global: usize) -> Result<f32, RuntimeError> {
        let binding = self.resolve(entity, global)?;
        binding
            .accessor()
            .get(entity)
            .ok_or(RuntimeError::UnregisteredEntityType)
    }

    /// Write the property at `global` on `entity`.
    pub fn set_property(
        &self,
        entity: &mut dyn Any,
        global: usize,
        value: f32,
    ) -> Result<(), RuntimeError> {
        let binding = self.resolve(&*entity, global)?;
        if binding.accessor().set(entity, value) {
            Ok(())
        } else {
            Err(RuntimeError::UnregisteredEntityType)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Bullet {
        x: f32,
        speed: f32,
    }

    #[derive(Debug, Default)]
    struct Emitter {
        speed: f32,
        angle: f32,
    }

    fn registry() -> TypeRegistry {
        let mut types = TypeRegistry::new();
        types.add_type::<Bullet>("bullet").unwrap();
        types.add_type::<Emitter>("emitter").unwrap();
        types
            .add_property::<Bullet>("bullet", "x", |b| b.x, |b, v| b.x = v)
            .unwrap();
        types
            .add_property::<Bullet>("bullet", "speed", |b| b.speed, |b, v| b.speed = v)
            .unwrap();
        types
            .add_property::<Emitter>("emitter", "angle", |e| e.angle, |e, v| e.angle = v)
            .unwrap();
        types
            .add_property::<Emitter>("emitter", "speed", |e| e.speed, |e, v| e.speed = v)
            .unwrap();
        types.update_property_mappings();
        types
    }

    #[test]
    fn global_indices_union_in_registration_order() {
        let types = registry();
        assert_eq!(types.property_names(), &["x", "speed", "angle"]);
        assert_eq!(types.global_property_index("speed"), Some(1));

        let emitter = types.get_type("emitter").unwrap();
        assert_eq!(emitter.property("speed").unwrap().local_index, 1);
        assert_eq!(emitter.property("speed").unwrap().global_index, Some(1));
    }

    #[test]
    fn shared_index_resolves_per_type() {
        let types = registry();
        let speed = types.global_property_index("speed").unwrap();

        let mut bullet = Bullet::default();
        let mut emitter = Emitter::default();
        types.set_property(&mut bullet, speed, 3.0).unwrap();
        types.set_property(&mut emitter, speed, 7.0).unwrap();

        assert_eq!(bullet.speed, 3.0);
        assert_eq!(emitter.speed, 7.0);
        assert_eq!(types.get_property(&emitter, speed), Ok(7.0));
    }

    #[test]
    fn property_missing_on_type() {
        let types = registry();
        let angle = types.global_property_index("angle").unwrap();
        let bullet = Bullet::default();

        assert!(matches!(
            types.get_property(&bullet, angle),
            Err(RuntimeError::PropertyNotOnType { .. })
        ));
        assert_eq!(
            types.get_property(&bullet, 99),
            Err(RuntimeError::UnknownProperty(99))
        );
        assert_eq!(
            types.get_property(&5.0_f32, angle),
            Err(RuntimeError::UnregisteredEntityType)
        );
    }

    #[test]
    fn duplicate_registrations_fail() {
        let mut types = registry();
        assert_eq!(
            types.add_type::<Bullet>("other"),
            Err(RegistrationError::DuplicateRustType {
                existing: "bullet".to_string(),
                name: "other".to_string()
            })
        );
        assert!(matches!(
            types.add_type::<u8>("bullet"),
            Err(RegistrationError::DuplicateType(_))
        ));
        assert!(matches!(
            types.add_property::<Bullet>("bullet", "x", |b| b.x, |b, v| b.x = v),
            Err(RegistrationError::DuplicateProperty { .. })
        ));
    }

    #[test]
    fn accessor_must_match_bound_type() {
        let mut types = registry();
        assert!(matches!(
            types.add_property::<Emitter>("bullet", "angle", |e| e.angle, |e, v| e.angle = v),
            Err(RegistrationError::AccessorTypeMismatch { .. })
        ));
        assert!(matches!(
            types.add_property::<Bullet>("ghost", "x", |b| b.x, |b, v| b.x = v),
            Err(RegistrationError::TypeNotFound(_))
        ));
    }
}
