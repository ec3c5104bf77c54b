//! Ducky Script translation engine.
//!
//! Turns a Ducky Script into an Arduino keyboard sketch. The main entry
//! points are [`translate_str`] for whole scripts and [`Engine`] for feeding
//! lines one at a time. Problems are reported as [`Diagnostic`]s rather than
//! panics or early returns.
//!
//! ```
//! use ducky_toolchain_core::{EngineConfig, RenderConfig, translate_str};
//! use ducky_toolchain_alphabet::Alphabet;
//!
//! let alphabet = Alphabet::with_builtin(&[]).unwrap();
//! let t = translate_str("STRING Hi\nENTER\n", EngineConfig::default(), alphabet, &RenderConfig::default());
//! assert!(t.ok);
//! assert!(t.sketch.unwrap().contains("printAltString({72_S, 105_S});"));
//! ```

#![warn(missing_docs)]

/// Command names, aliases, and key tables.
pub mod catalog;
/// Command instances, argument grammars, and emission.
pub mod command;
/// Code tree, payloads, and sketch layout.
pub mod emit;
/// Dispatcher, history, and run configuration.
pub mod engine;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Engine
pub use engine::history::History;
pub use engine::{EngineConfig, Engine, ErrorPolicy, Halted, Translation, translate_str};

// Commands
pub use catalog::{Catalog, CommandClass, CommandSpec, Variant};
pub use command::{Command, CommandError};

// Output
pub use emit::sketch::SketchBuilder;
pub use emit::{CodeNode, RenderConfig};

// Diagnostics (re-exported from the diagnostics crate)
pub use ducky_toolchain_diagnostics::{Diagnostic, Severity, Span, codes};
