//! Symbol interning for the logic layer.
//!
//! Names are stored once and passed around as compact, copyable IDs. A
//! single string pool backs three lookup namespaces:
//! - atoms (symbolic constants)
//! - functors, shared by compound terms and predicate heads since the
//!   language does not distinguish them
//! - variable names; a variable's full identity also carries a scope-id,
//!   and only the textual half lives here
//!
//! Each namespace has its own ID type so the type system keeps them apart.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Declare the ID newtype for one interner namespace.
///
/// IDs compare and hash as plain u32s and serialize as their raw value;
/// resolution back to text always goes through the [`Interner`].
macro_rules! symbol_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Get the raw ID value (for debugging/serialization)
            pub fn as_u32(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.0.serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                u32::deserialize(deserializer).map($name)
            }
        }
    };
}

symbol_id! {
    /// ID for an interned atom name
    AtomId, "A"
}

symbol_id! {
    /// ID for an interned functor name
    FunctorId, "F"
}

symbol_id! {
    /// ID for an interned variable name
    VariableId, "V"
}

/// Generate the intern/resolve/get/count accessors for one namespace
macro_rules! namespace_api {
    ($table:ident, $id:ident, $intern:ident, $resolve:ident, $get:ident, $count:ident) => {
        /// Intern a name in this namespace, returning its ID (get-or-create)
        pub fn $intern(&mut self, name: &str) -> $id {
            $id(Self::intern_raw(&mut self.names, &mut self.$table, name))
        }

        /// Resolve an ID back to its text
        pub fn $resolve(&self, id: $id) -> &str {
            &self.names[id.0 as usize]
        }

        /// Look up a name without interning it
        pub fn $get(&self, name: &str) -> Option<$id> {
            self.$table.get(name).copied().map($id)
        }

        /// Number of names interned in this namespace
        pub fn $count(&self) -> usize {
            self.$table.len()
        }
    };
}

/// Symbol interner for the language.
///
/// Owned by the session and threaded through parsing and display; nothing
/// lives in global state.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    /// Every interned name, indexed by raw ID; shared by all namespaces
    names: Vec<String>,
    atoms: HashMap<String, u32>,
    functors: HashMap<String, u32>,
    variables: HashMap<String, u32>,
}

impl Interner {
    /// Create a new empty interner
    pub fn new() -> Self {
        Interner::default()
    }

    /// Get-or-create a pool slot for `name` through one namespace table
    fn intern_raw(names: &mut Vec<String>, table: &mut HashMap<String, u32>, name: &str) -> u32 {
        if let Some(&raw) = table.get(name) {
            return raw;
        }
        let raw = names.len() as u32;
        names.push(name.to_string());
        table.insert(name.to_string(), raw);
        raw
    }

    namespace_api!(atoms, AtomId, intern_atom, resolve_atom, get_atom, atom_count);
    namespace_api!(
        functors,
        FunctorId,
        intern_functor,
        resolve_functor,
        get_functor,
        functor_count
    );
    namespace_api!(
        variables,
        VariableId,
        intern_variable,
        resolve_variable,
        get_variable,
        variable_count
    );
}
