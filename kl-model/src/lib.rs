mod columns;
mod filter;
mod properties;
mod registry;

pub mod extensions;

pub use crate::columns::{
    CellRenderer,
    Column,
};
pub use crate::filter::SearchFilter;
pub use crate::properties::Property;
pub use crate::registry::{
    EXTENSIONS,
    ExtensionRegistry,
    ResourceExtension,
};
