//! The mutable state threaded through every `check_*` call: the scope
//! stack, the type store, and the handful of flags that depend on where
//! in the tree we currently are (current function, defer nesting,
//! synthetic-name counter).

use faxc_eval::ConstValue;
use faxc_par::ast::Ident;
use faxc_ty::{TypeId, TypeStore};
use faxc_util::Symbol;

use crate::scope::{ScopeId, ScopeTree};

pub struct CheckCtx {
    pub types: TypeStore,
    pub scopes: ScopeTree,
    pub unit_scope: ScopeId,
    pub current: ScopeId,
    /// The function currently being checked, used as the hint for
    /// `return`. `None` at the top level and while checking const/global
    /// initializers.
    pub current_function: Option<TypeId>,
    /// Set while checking a `defer`'s operand; a nested `defer` is
    /// rejected.
    pub deferring: bool,
    /// Per-unit counter backing `static.<N>` mangled names. Not reset
    /// across subunits.
    static_counter: u32,
}

impl CheckCtx {
    pub fn new() -> Self {
        let (scopes, unit_scope) = ScopeTree::new();
        CheckCtx {
            types: TypeStore::new(),
            scopes,
            unit_scope,
            current: unit_scope,
            current_function: None,
            deferring: false,
            static_counter: 0,
        }
    }

    pub fn next_static_name(&mut self) -> Symbol {
        let n = self.static_counter;
        self.static_counter += 1;
        Symbol::intern(&format!("static.{n}"))
    }
}

impl Default for CheckCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl faxc_eval::ConstContext for CheckCtx {
    fn types(&self) -> &TypeStore {
        &self.types
    }

    fn lookup_const(&self, ident: &Ident) -> Option<&ConstValue> {
        self.scopes.lookup(self.current, ident).and_then(|obj| obj.value.as_ref())
    }
}
