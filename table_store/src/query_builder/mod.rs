//! Query builder utilities
//!
//! This module provides expression trees and SQL clause construction.

pub mod filter;
pub mod ordering;
pub mod pagination;
pub mod predicate;
pub mod sql_generation;

pub use filter::{ComparisonOperator, Expression, Op};
pub use ordering::SortOrder;
pub use pagination::Pageable;
pub use predicate::index_predicate;
pub use sql_generation::SqlGenerator;
