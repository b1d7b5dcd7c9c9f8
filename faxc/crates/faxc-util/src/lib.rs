//! faxc-util - identifiers, source locations, diagnostics, and typed
//! collections shared by every phase of the compiler.
//!
//! Nothing in this crate knows about the language's grammar or type system;
//! it's the foundation `faxc-par`, `faxc-ty`, `faxc-eval` and `faxc-sem`
//! build on.

pub mod def_id;
pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use def_id::{DefId, DefIdGenerator};
pub use diagnostic::CheckError;
pub use error::{DiagnosticError, IndexVecError, SourceMapError, SymbolError};
pub use index_vec::{define_idx, Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::Symbol;

pub use rustc_hash::{FxHashMap, FxHashSet};
