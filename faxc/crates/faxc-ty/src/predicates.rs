use faxc_util::Symbol;

use crate::store::{StorageClass, TypeId, TypePayload, TypeStore};

/// Result of looking through one level of pointer indirection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deref {
    /// Either the referent of a non-nullable pointer, or the original
    /// type unchanged if it wasn't a pointer at all — index/field/slice/
    /// call all transparently work through a single level of pointer.
    Type(TypeId),
    /// The type was a nullable pointer; the caller must reject this site
    /// unless it's already behind a null check.
    Nullable,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: Symbol,
    pub ty: TypeId,
    pub index: usize,
}

impl TypeStore {
    /// Follow `Alias` links to the underlying non-alias type.
    pub fn dealias(&self, mut id: TypeId) -> TypeId {
        while let TypePayload::Alias { target, .. } = &self.data(id).payload {
            id = *target;
        }
        id
    }

    pub fn dereference(&self, id: TypeId) -> Deref {
        let resolved = self.dealias(id);
        match &self.data(resolved).payload {
            TypePayload::Pointer { referent, nullable: false } => Deref::Type(*referent),
            TypePayload::Pointer { nullable: true, .. } => Deref::Nullable,
            _ => Deref::Type(id),
        }
    }

    pub fn is_integer(&self, id: TypeId) -> bool {
        use StorageClass::*;
        matches!(
            self.storage(self.dealias(id)),
            I8 | I16 | I32 | I64 | Int | U8 | U16 | U32 | U64 | Uint | Rune | Uintptr | Size | Char
        )
    }

    pub fn is_signed(&self, id: TypeId) -> bool {
        use StorageClass::*;
        matches!(self.storage(self.dealias(id)), I8 | I16 | I32 | I64 | Int)
    }

    pub fn is_float(&self, id: TypeId) -> bool {
        matches!(self.storage(self.dealias(id)), StorageClass::F32 | StorageClass::F64)
    }

    pub fn is_numeric(&self, id: TypeId) -> bool {
        self.is_integer(id) || self.is_float(id)
    }

    pub fn is_pointer(&self, id: TypeId) -> bool {
        matches!(self.storage(self.dealias(id)), StorageClass::Pointer)
    }

    pub fn is_nullable_pointer(&self, id: TypeId) -> bool {
        matches!(&self.data(self.dealias(id)).payload, TypePayload::Pointer { nullable: true, .. })
    }

    /// Field lookup through struct/union, transparently through a single
    /// level of (non-nullable) pointer indirection.
    pub fn get_field(&self, id: TypeId, name: Symbol) -> Option<FieldDescriptor> {
        let target = match self.dereference(id) {
            Deref::Type(t) => t,
            Deref::Nullable => return None,
        };
        let fields = match &self.data(self.dealias(target)).payload {
            TypePayload::Struct { fields } | TypePayload::Union { fields } => fields,
            _ => return None,
        };
        fields
            .iter()
            .position(|f| f.name == name)
            .map(|index| FieldDescriptor { name: fields[index].name, ty: fields[index].ty, index })
    }

    /// True if a value of type `src` may be used directly where `dst` is
    /// expected: identical types (ignoring `const`), `null` into a
    /// nullable pointer, a sized array into the matching unsized array,
    /// or a tagged union member into its union.
    pub fn is_assignable(&self, dst: TypeId, src: TypeId) -> bool {
        let (dst, src) = (self.dealias(dst), self.dealias(src));
        if dst == src {
            return true;
        }
        if self.storage(src) == StorageClass::Null && self.is_nullable_pointer(dst) {
            return true;
        }
        if let (TypePayload::Array { elem: de, len: None }, TypePayload::Array { elem: se, len: Some(_) }) =
            (&self.data(dst).payload, &self.data(src).payload)
        {
            if self.dealias(*de) == self.dealias(*se) {
                return true;
            }
        }
        if let TypePayload::TaggedUnion { members } = &self.data(dst).payload {
            if members.iter().any(|&m| self.dealias(m) == src) {
                return true;
            }
        }
        false
    }

    /// True if `src as dst` is permitted. A superset of [`is_assignable`]:
    /// any numeric-to-numeric conversion, pointer-to-pointer regardless
    /// of referent, and the usual pointer/uintptr round-trip.
    pub fn is_castable(&self, dst: TypeId, src: TypeId) -> bool {
        if self.is_assignable(dst, src) {
            return true;
        }
        let (dst_resolved, src_resolved) = (self.dealias(dst), self.dealias(src));
        if self.is_numeric(dst_resolved) && self.is_numeric(src_resolved) {
            return true;
        }
        if self.is_pointer(dst_resolved) && self.is_pointer(src_resolved) {
            return true;
        }
        let is_uintptr = |t: TypeId| self.storage(t) == StorageClass::Uintptr;
        if (self.is_pointer(dst_resolved) && is_uintptr(src_resolved))
            || (is_uintptr(dst_resolved) && self.is_pointer(src_resolved))
        {
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Field, TypeFlags};
    use faxc_util::Symbol;

    #[test]
    fn scalar_builtins_are_deduplicated() {
        let store = TypeStore::new();
        let a = store.builtin(StorageClass::Int, false);
        let b = store.builtin(StorageClass::Int, false);
        assert_eq!(a, b);
        let c = store.builtin(StorageClass::Int, true);
        assert_ne!(a, c);
    }

    #[test]
    fn identical_pointers_are_interned_once() {
        let mut store = TypeStore::new();
        let int = store.builtin(StorageClass::Int, false);
        let p1 = store.lookup_pointer(int, false, TypeFlags::NONE);
        let p2 = store.lookup_pointer(int, false, TypeFlags::NONE);
        assert_eq!(p1, p2);
        let p3 = store.lookup_pointer(int, true, TypeFlags::NONE);
        assert_ne!(p1, p3);
    }

    #[test]
    fn null_is_assignable_to_nullable_pointer_only() {
        let mut store = TypeStore::new();
        let int = store.builtin(StorageClass::Int, false);
        let null = store.builtin(StorageClass::Null, false);
        let nullable = store.lookup_pointer(int, true, TypeFlags::NONE);
        let non_nullable = store.lookup_pointer(int, false, TypeFlags::NONE);
        assert!(store.is_assignable(nullable, null));
        assert!(!store.is_assignable(non_nullable, null));
    }

    #[test]
    fn sized_array_is_assignable_to_unsized_array() {
        let mut store = TypeStore::new();
        let int = store.builtin(StorageClass::Int, false);
        let sized = store.lookup_array(int, Some(4), TypeFlags::NONE);
        let unsized_ = store.lookup_array(int, None, TypeFlags::NONE);
        assert!(store.is_assignable(unsized_, sized));
        assert!(!store.is_assignable(sized, unsized_));
    }

    #[test]
    fn numeric_cast_allowed_but_not_assignable() {
        let store_int;
        let store_f64;
        let mut store = TypeStore::new();
        store_int = store.builtin(StorageClass::Int, false);
        store_f64 = store.builtin(StorageClass::F64, false);
        assert!(!store.is_assignable(store_int, store_f64));
        assert!(store.is_castable(store_int, store_f64));
    }

    #[test]
    fn struct_field_lookup_through_pointer() {
        let mut store = TypeStore::new();
        let int = store.builtin(StorageClass::Int, false);
        let name = Symbol::intern("x");
        let st = store.lookup_struct(vec![Field { name, ty: int }], TypeFlags::NONE);
        let ptr = store.lookup_pointer(st, false, TypeFlags::NONE);
        let field = store.get_field(ptr, name).expect("field x");
        assert_eq!(field.ty, int);
        assert_eq!(field.index, 0);
    }

    #[test]
    fn tagged_union_member_is_assignable() {
        let mut store = TypeStore::new();
        let int = store.builtin(StorageClass::Int, false);
        let void = store.builtin(StorageClass::Void, false);
        let tu = store.lookup_tagged_union(vec![int, void], TypeFlags::NONE);
        assert!(store.is_assignable(tu, int));
        assert!(store.is_assignable(tu, void));
    }
}
