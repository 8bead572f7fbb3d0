//! Host modules exposed to Emplode configuration.
//!
//! Each module is a native object the simulation runtime keeps alive for the
//! whole run. [`register_module`] binds one into a configuration tree as a
//! borrowed object and links its configurable fields:
//!
//! ```
//! use std::sync::{Arc, RwLock};
//!
//! use emplode::{Scope, SymbolPath};
//! use emplode_core::Value;
//! use mabe_modules::{SelectElite, register_module};
//!
//! let elite = Arc::new(RwLock::new(SelectElite::default()));
//! let mut root = Scope::new("root", "");
//! register_module(&mut root, &elite)?;
//!
//! root.assign_value(&SymbolPath::from("SelectElite.top_count"), Value::Int(4))?;
//! assert_eq!(elite.read().unwrap().top_count, 4);
//! # Ok::<(), emplode_core::SymbolError>(())
//! ```

mod module;
mod organism;
mod select_elite;

pub use module::{Module, register_module};
pub use organism::{OrganismType, VarMap};
pub use select_elite::SelectElite;
