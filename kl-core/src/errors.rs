pub use anyhow::{
    anyhow,
    bail,
};

pub type EmptyResult = anyhow::Result<()>;
