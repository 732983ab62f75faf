//! Strongly-typed model name.

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// A dbt model name: the base name of its SQL file without extension.
    ///
    /// Prevents model names from being mixed up with source paths or
    /// fully-qualified manifest node keys.
    pub struct ModelName;
}

#[cfg(test)]
#[path = "model_name_test.rs"]
mod tests;
