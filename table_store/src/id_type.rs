//! Id Type module
//!
//! Identifier types a table can be keyed by.

use std::fmt::{self, Debug, Display};
use type_mapping::NativeScalar;
use uuid::Uuid;

/// Universal ID type used for logging identifiers of any key type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UniversalId {
    /// Numeric ID (i32, i64, etc.)
    Numeric(i64),
    /// UUID ID
    Uuid(Uuid),
    /// String-based ID
    String(String),
}

impl Display for UniversalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniversalId::Numeric(n) => write!(f, "{}", n),
            UniversalId::Uuid(uuid) => write!(f, "{}", uuid),
            UniversalId::String(s) => write!(f, "{}", s),
        }
    }
}

/// Trait for types that can provide a universal ID
pub trait HasUniversalId {
    fn universal_id(&self) -> UniversalId;
}

impl HasUniversalId for i32 {
    fn universal_id(&self) -> UniversalId {
        UniversalId::Numeric(i64::from(*self))
    }
}

impl HasUniversalId for i64 {
    fn universal_id(&self) -> UniversalId {
        UniversalId::Numeric(*self)
    }
}

impl HasUniversalId for Uuid {
    fn universal_id(&self) -> UniversalId {
        UniversalId::Uuid(*self)
    }
}

impl HasUniversalId for String {
    fn universal_id(&self) -> UniversalId {
        UniversalId::String(self.clone())
    }
}

/// A scalar, totally ordered identifier for a single-column primary key
pub trait TableId:
    NativeScalar + HasUniversalId + Clone + Debug + Ord + Send + Sync + 'static
{
}

impl<T> TableId for T where
    T: NativeScalar + HasUniversalId + Clone + Debug + Ord + Send + Sync + 'static
{
}
