pub mod auditable;
pub mod crud;

pub use auditable::{
    AuditColumns, AuditMetadata, AuditableTable, DefaultPrincipal, PrincipalResolver, ResolveWith,
};
pub use crud::CrudTable;
