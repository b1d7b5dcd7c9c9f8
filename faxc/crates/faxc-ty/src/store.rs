use faxc_util::{define_idx, FxHashMap, Idx, IndexVec, Symbol};

define_idx!(TypeId);

/// Sentinel for "no fixed size", used by unsized arrays (`[*]T`) and
/// function types.
pub const UNDEFINED: u64 = u64::MAX;

/// Pointer-ish builtin width, in bytes. The checker never emits code, so
/// this only has to be internally consistent, not match any real target.
const WORD_SIZE: u64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageClass {
    Void,
    Bool,
    Null,
    I8,
    I16,
    I32,
    I64,
    Int,
    U8,
    U16,
    U32,
    U64,
    Uint,
    Rune,
    F32,
    F64,
    Char,
    Uintptr,
    Size,
    String,
    Pointer,
    Slice,
    Array,
    Struct,
    Union,
    TaggedUnion,
    Enum,
    Function,
    Alias,
}

impl StorageClass {
    /// Whether this class is one of the scalar builtins with no payload,
    /// i.e. whether it can appear in [`TypeStore::builtin`].
    fn is_scalar_builtin(self) -> bool {
        !matches!(
            self,
            StorageClass::Pointer
                | StorageClass::Slice
                | StorageClass::Array
                | StorageClass::Struct
                | StorageClass::Union
                | StorageClass::TaggedUnion
                | StorageClass::Enum
                | StorageClass::Function
                | StorageClass::Alias
        )
    }
}

/// Type flags bitset. The only flag today is `const`; kept as its own
/// struct rather than a bare `bool` so a second flag doesn't require
/// threading a new parameter through every constructor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TypeFlags {
    bits: u8,
}

const CONST_BIT: u8 = 1 << 0;

impl TypeFlags {
    pub const NONE: TypeFlags = TypeFlags { bits: 0 };
    pub const CONST: TypeFlags = TypeFlags { bits: CONST_BIT };

    pub fn is_const(self) -> bool {
        self.bits & CONST_BIT != 0
    }

    pub fn with_const(self, is_const: bool) -> TypeFlags {
        if is_const {
            TypeFlags { bits: self.bits | CONST_BIT }
        } else {
            TypeFlags { bits: self.bits & !CONST_BIT }
        }
    }
}

/// A named field of a struct or union.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: Symbol,
    pub ty: TypeId,
}

/// Storage-class-specific data. `StorageClass` alone is the discriminant;
/// this carries everything else a composite type needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypePayload {
    None,
    Pointer { referent: TypeId, nullable: bool },
    Slice { elem: TypeId },
    /// `len` of `None` means unsized (`[*]T`).
    Array { elem: TypeId, len: Option<u64> },
    Struct { fields: Vec<Field> },
    Union { fields: Vec<Field> },
    TaggedUnion { members: Vec<TypeId> },
    /// `values` holds each member's already-evaluated constant; the
    /// evaluator (faxc-eval) is what produces those, this crate just
    /// stores them.
    Enum { storage: TypeId, values: Vec<(Symbol, i128)> },
    Function { params: Vec<TypeId>, variadic: bool, result: TypeId },
    /// `display_name` makes two aliases of the same target remain
    /// distinct types, matching named declarations' nominal identity.
    Alias { target: TypeId, display_name: Symbol },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeData {
    pub storage: StorageClass,
    pub flags: TypeFlags,
    pub size: u64,
    pub align: u64,
    pub payload: TypePayload,
}

/// Hash-consed type arena. Every `lookup_*` method either returns the
/// existing id for a structurally identical type or interns a new one;
/// callers never construct a `TypeId` any other way.
pub struct TypeStore {
    types: IndexVec<TypeId, TypeData>,
    interned: FxHashMap<TypeData, TypeId>,
    builtins: FxHashMap<(StorageClass, bool), TypeId>,
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeStore {
    pub fn new() -> Self {
        let mut store = TypeStore { types: IndexVec::new(), interned: FxHashMap::default(), builtins: FxHashMap::default() };
        store.seed_builtins();
        store
    }

    fn seed_builtins(&mut self) {
        use StorageClass::*;
        let scalars: &[(StorageClass, u64, u64)] = &[
            (Void, 0, 1),
            (Bool, 1, 1),
            (Null, WORD_SIZE, WORD_SIZE),
            (I8, 1, 1),
            (I16, 2, 2),
            (I32, 4, 4),
            (I64, 8, 8),
            (Int, WORD_SIZE, WORD_SIZE),
            (U8, 1, 1),
            (U16, 2, 2),
            (U32, 4, 4),
            (U64, 8, 8),
            (Uint, WORD_SIZE, WORD_SIZE),
            (Rune, 4, 4),
            (F32, 4, 4),
            (F64, 8, 8),
            (Char, 1, 1),
            (Uintptr, WORD_SIZE, WORD_SIZE),
            (Size, WORD_SIZE, WORD_SIZE),
            (String, 3 * WORD_SIZE, WORD_SIZE),
        ];
        for &(storage, size, align) in scalars {
            for &is_const in &[false, true] {
                let flags = TypeFlags::NONE.with_const(is_const);
                let id = self.intern(TypeData { storage, flags, size, align, payload: TypePayload::None });
                self.builtins.insert((storage, is_const), id);
            }
        }
    }

    fn intern(&mut self, data: TypeData) -> TypeId {
        if let Some(&id) = self.interned.get(&data) {
            return id;
        }
        let id = self.types.push(data.clone());
        self.interned.insert(data, id);
        id
    }

    pub fn data(&self, id: TypeId) -> &TypeData {
        &self.types[id]
    }

    pub fn storage(&self, id: TypeId) -> StorageClass {
        self.types[id].storage
    }

    pub fn flags(&self, id: TypeId) -> TypeFlags {
        self.types[id].flags
    }

    pub fn is_const(&self, id: TypeId) -> bool {
        self.types[id].flags.is_const()
    }

    pub fn size(&self, id: TypeId) -> u64 {
        self.types[id].size
    }

    pub fn align(&self, id: TypeId) -> u64 {
        self.types[id].align
    }

    /// Look up a pre-interned scalar builtin. Panics (debug-only) if
    /// `storage` names a composite class; those go through their own
    /// `lookup_*` constructor instead.
    pub fn builtin(&self, storage: StorageClass, is_const: bool) -> TypeId {
        debug_assert!(storage.is_scalar_builtin(), "{storage:?} is not a scalar builtin");
        self.builtins[&(storage, is_const)]
    }

    /// Re-intern an existing type with different flags, e.g. to propagate
    /// `const` from a declaration into its element/field types.
    pub fn lookup_with_flags(&mut self, id: TypeId, flags: TypeFlags) -> TypeId {
        let mut data = self.types[id].clone();
        if data.flags == flags {
            return id;
        }
        data.flags = flags;
        self.intern(data)
    }

    pub fn lookup_pointer(&mut self, referent: TypeId, nullable: bool, flags: TypeFlags) -> TypeId {
        let data = TypeData {
            storage: StorageClass::Pointer,
            flags,
            size: WORD_SIZE,
            align: WORD_SIZE,
            payload: TypePayload::Pointer { referent, nullable },
        };
        self.intern(data)
    }

    pub fn lookup_slice(&mut self, elem: TypeId, flags: TypeFlags) -> TypeId {
        let data = TypeData {
            storage: StorageClass::Slice,
            flags,
            size: 2 * WORD_SIZE,
            align: WORD_SIZE,
            payload: TypePayload::Slice { elem },
        };
        self.intern(data)
    }

    pub fn lookup_array(&mut self, elem: TypeId, len: Option<u64>, flags: TypeFlags) -> TypeId {
        let elem_size = self.size(elem);
        let elem_align = self.align(elem);
        let size = match len {
            Some(n) if elem_size != UNDEFINED => elem_size.saturating_mul(n),
            _ => UNDEFINED,
        };
        let data = TypeData {
            storage: StorageClass::Array,
            flags,
            size,
            align: elem_align,
            payload: TypePayload::Array { elem, len },
        };
        self.intern(data)
    }

    pub fn lookup_struct(&mut self, fields: Vec<Field>, flags: TypeFlags) -> TypeId {
        let (size, align) = self.aggregate_layout(&fields);
        let data = TypeData { storage: StorageClass::Struct, flags, size, align, payload: TypePayload::Struct { fields } };
        self.intern(data)
    }

    pub fn lookup_union(&mut self, fields: Vec<Field>, flags: TypeFlags) -> TypeId {
        let align = fields.iter().map(|f| self.align(f.ty)).max().unwrap_or(1);
        let size = fields.iter().map(|f| self.size(f.ty)).max().unwrap_or(0);
        let data = TypeData { storage: StorageClass::Union, flags, size, align, payload: TypePayload::Union { fields } };
        self.intern(data)
    }

    fn aggregate_layout(&self, fields: &[Field]) -> (u64, u64) {
        let mut size = 0u64;
        let mut align = 1u64;
        for f in fields {
            let (fs, fa) = (self.size(f.ty), self.align(f.ty));
            if fs == UNDEFINED {
                return (UNDEFINED, align.max(fa));
            }
            size += fs;
            align = align.max(fa);
        }
        (size, align)
    }

    pub fn lookup_tagged_union(&mut self, members: Vec<TypeId>, flags: TypeFlags) -> TypeId {
        let variant_align = members.iter().map(|&m| self.align(m)).max().unwrap_or(1);
        let variant_size = members.iter().map(|&m| self.size(m)).fold(Some(0u64), |acc, s| {
            if s == UNDEFINED {
                None
            } else {
                acc.map(|a| a.max(s))
            }
        });
        let align = variant_align.max(WORD_SIZE);
        let size = variant_size.map(|s| WORD_SIZE + s).unwrap_or(UNDEFINED);
        let data = TypeData {
            storage: StorageClass::TaggedUnion,
            flags,
            size,
            align,
            payload: TypePayload::TaggedUnion { members },
        };
        self.intern(data)
    }

    pub fn lookup_enum(&mut self, storage: TypeId, values: Vec<(Symbol, i128)>, flags: TypeFlags) -> TypeId {
        let size = self.size(storage);
        let align = self.align(storage);
        let data = TypeData { storage: StorageClass::Enum, flags, size, align, payload: TypePayload::Enum { storage, values } };
        self.intern(data)
    }

    pub fn lookup_function(&mut self, params: Vec<TypeId>, variadic: bool, result: TypeId) -> TypeId {
        let data = TypeData {
            storage: StorageClass::Function,
            flags: TypeFlags::NONE,
            size: UNDEFINED,
            align: 1,
            payload: TypePayload::Function { params, variadic, result },
        };
        self.intern(data)
    }

    /// Number of types interned so far, including reserved-but-not-yet-
    /// [`finalize`]d placeholders. Used by callers of [`TypeStore::reserve`]
    /// to tell a brand-new id minted during their own resolution apart
    /// from one that already existed (a builtin, or an earlier
    /// declaration) — see `faxc-sem`'s `scan_type`.
    ///
    /// [`finalize`]: TypeStore::finalize
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Reserve a placeholder id for a named `type` declaration before its
    /// definition is resolved, so a self-referential body (`type Node =
    /// struct { next: *Node }`) can build a pointer back to this id while
    /// the struct itself is still under construction. The slot's payload
    /// is nonsense until [`TypeStore::finalize`] overwrites it — nothing
    /// may call `data`/`storage`/`size`/`align` on it before that happens,
    /// only wrap it in a `Pointer`/`Slice`/etc., which just stores the id.
    ///
    /// Deliberately bypassed by the normal hash-cons lookup: nothing else
    /// can be resolving to this exact id yet, since it was just minted.
    pub fn reserve(&mut self) -> TypeId {
        let placeholder = TypeData {
            storage: StorageClass::Alias,
            flags: TypeFlags::NONE,
            size: UNDEFINED,
            align: 1,
            payload: TypePayload::Alias { target: TypeId(0), display_name: Symbol::intern("") },
        };
        self.types.push(placeholder)
    }

    /// Complete a [`TypeStore::reserve`]d id, overwriting its placeholder
    /// with `data` and registering it as the canonical interned id for
    /// `data` from now on. Only correct when `data` was itself built using
    /// `id` as a self-reference (directly or through a pointer/slice/
    /// array/struct field); for anything else the normal `lookup_*`
    /// constructors already dedupe and should be used instead.
    pub fn finalize(&mut self, id: TypeId, data: TypeData) {
        self.types[id] = data.clone();
        self.interned.insert(data, id);
    }
}
