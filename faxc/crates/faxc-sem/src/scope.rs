//! The scope tree: an arena of nested scopes, each an insertion-ordered
//! list of scope objects. Lookup walks the parent chain; label lookup
//! (for `break`/`continue`) additionally restricts to `for` scopes.

use faxc_eval::ConstValue;
use faxc_par::ast::Ident;
use faxc_ty::TypeId;
use faxc_util::{define_idx, IndexVec, Symbol};

define_idx!(ScopeId);

/// What kind of named entry a [`ScopeObject`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Named compile-time value (`const`).
    Const,
    /// Type alias (`type`).
    Type,
    /// Runtime local (`let`, function parameter).
    Bind,
    /// Runtime global or function.
    Decl,
}

/// An entry in a scope: a name bound to a type and, for `O_CONST`, its
/// evaluated value.
#[derive(Debug, Clone)]
pub struct ScopeObject {
    pub kind: ObjectKind,
    pub ident: Ident,
    pub mangled: Symbol,
    pub ty: TypeId,
    pub value: Option<ConstValue>,
}

/// The expression kind that created a scope, used by label search to
/// decide eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Unit,
    SubUnit,
    Function,
    For,
    List,
}

#[derive(Debug)]
pub struct Scope {
    parent: Option<ScopeId>,
    kind: ScopeKind,
    label: Option<Symbol>,
    objects: Vec<ScopeObject>,
}

/// Arena of all scopes created during a check. Scopes are never removed;
/// `pop` just means "stop inserting here", the node stays reachable from
/// any typed expression that captured it.
pub struct ScopeTree {
    scopes: IndexVec<ScopeId, Scope>,
}

impl ScopeTree {
    /// A fresh tree with a single root `Unit` scope.
    pub fn new() -> (Self, ScopeId) {
        let mut scopes = IndexVec::new();
        let root = scopes.push(Scope { parent: None, kind: ScopeKind::Unit, label: None, objects: Vec::new() });
        (ScopeTree { scopes }, root)
    }

    /// Create a child scope under `parent` and return its id. Does not
    /// change any notion of "current" scope — that's the caller's job.
    pub fn push(&mut self, parent: ScopeId, kind: ScopeKind, label: Option<Symbol>) -> ScopeId {
        let id = self.scopes.push(Scope { parent: Some(parent), kind, label, objects: Vec::new() });
        tracing::debug!(?kind, ?parent, child = ?id, "scope pushed");
        id
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope].parent
    }

    pub fn kind(&self, scope: ScopeId) -> ScopeKind {
        self.scopes[scope].kind
    }

    /// Insert an object. Per spec, a duplicate name silently overwrites
    /// by appending — lookup always finds the most recently inserted
    /// match first, so the new binding shadows without needing to
    /// remove the old entry.
    pub fn insert(&mut self, scope: ScopeId, object: ScopeObject) {
        self.scopes[scope].objects.push(object);
    }

    /// Search `scope`, then its ancestors, for an object whose
    /// identifier equals `ident` (name and full namespace chain).
    pub fn lookup(&self, scope: ScopeId, ident: &Ident) -> Option<&ScopeObject> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = &self.scopes[id];
            if let Some(obj) = s.objects.iter().rev().find(|o| &o.ident == ident) {
                return Some(obj);
            }
            current = s.parent;
        }
        None
    }

    /// Resolve a `break`/`continue` target. `label` of `None` matches the
    /// innermost ancestor `for` scope; `Some` matches the nearest
    /// ancestor `for` scope whose own label equals it.
    pub fn lookup_label(&self, scope: ScopeId, label: Option<Symbol>) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = &self.scopes[id];
            if s.kind == ScopeKind::For {
                match label {
                    None => return Some(id),
                    Some(target) if s.label == Some(target) => return Some(id),
                    _ => {}
                }
            }
            current = s.parent;
        }
        None
    }

    /// Whether `label` already names an ancestor `for` scope — used to
    /// reject a duplicate loop label before pushing a new one.
    pub fn label_in_use(&self, scope: ScopeId, label: Symbol) -> bool {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = &self.scopes[id];
            if s.kind == ScopeKind::For && s.label == Some(label) {
                return true;
            }
            current = s.parent;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faxc_par::ast::Ident;
    use faxc_ty::{StorageClass, TypeStore};

    fn ident(name: &str) -> Ident {
        Ident::bare(Symbol::intern(name))
    }

    #[test]
    fn lookup_walks_up_parent_chain() {
        let (mut tree, root) = ScopeTree::new();
        let types = TypeStore::new();
        let int = types.builtin(StorageClass::Int, false);
        tree.insert(root, ScopeObject { kind: ObjectKind::Decl, ident: ident("x"), mangled: Symbol::intern("x"), ty: int, value: None });
        let child = tree.push(root, ScopeKind::List, None);
        assert!(tree.lookup(child, &ident("x")).is_some());
        assert!(tree.lookup(root, &ident("y")).is_none());
    }

    #[test]
    fn shadowing_prefers_most_recent_insert() {
        let (mut tree, root) = ScopeTree::new();
        let types = TypeStore::new();
        let int = types.builtin(StorageClass::Int, false);
        let bool_ = types.builtin(StorageClass::Bool, false);
        tree.insert(root, ScopeObject { kind: ObjectKind::Bind, ident: ident("x"), mangled: Symbol::intern("x"), ty: int, value: None });
        tree.insert(root, ScopeObject { kind: ObjectKind::Bind, ident: ident("x"), mangled: Symbol::intern("x.1"), ty: bool_, value: None });
        let found = tree.lookup(root, &ident("x")).unwrap();
        assert_eq!(found.ty, bool_);
    }

    #[test]
    fn label_lookup_only_matches_for_scopes() {
        let (mut tree, root) = ScopeTree::new();
        let outer = tree.push(root, ScopeKind::For, Some(Symbol::intern("outer")));
        let block = tree.push(outer, ScopeKind::List, None);
        let inner = tree.push(block, ScopeKind::For, None);
        assert_eq!(tree.lookup_label(inner, None), Some(inner));
        assert_eq!(tree.lookup_label(inner, Some(Symbol::intern("outer"))), Some(outer));
        assert_eq!(tree.lookup_label(inner, Some(Symbol::intern("nope"))), None);
    }

    #[test]
    fn duplicate_label_detected_among_ancestors() {
        let (mut tree, root) = ScopeTree::new();
        let outer = tree.push(root, ScopeKind::For, Some(Symbol::intern("l")));
        assert!(tree.label_in_use(outer, Symbol::intern("l")));
        assert!(!tree.label_in_use(outer, Symbol::intern("other")));
    }
}
