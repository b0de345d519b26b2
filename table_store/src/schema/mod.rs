pub mod column;
pub mod descriptor;

pub use column::{Column, ColumnDef};
pub use descriptor::{
    create_enum_type_sql, create_unique_index_sql, drop_enum_type_sql, TableDescriptor,
    TableDescriptorBuilder, UniqueConstraint,
};
