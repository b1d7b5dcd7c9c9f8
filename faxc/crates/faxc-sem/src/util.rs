//! Small helpers shared across the check pass: identifier rendering for
//! diagnostics, and a type-name renderer bounded against cyclic types.

use faxc_par::ast::Ident;
use faxc_ty::{StorageClass, TypeId, TypePayload, TypeStore};

pub fn ident_text(ident: &Ident) -> String {
    let mut parts = vec![ident.name.as_str()];
    let mut cur = ident.namespace.as_deref();
    while let Some(ns) = cur {
        parts.push(ns.name.as_str());
        cur = ns.namespace.as_deref();
    }
    parts.reverse();
    parts.join("::")
}

const MAX_DEPTH: u32 = 6;

/// Render a type for an error message. Bounded recursion: pointer,
/// slice, and array element types unwind a few levels deep since that's
/// what makes `*int` more useful than `pointer`, but structs/unions/
/// tagged unions/enums/functions/aliases print only their keyword —
/// those are exactly the shapes that can be cyclic.
pub fn type_name(types: &TypeStore, id: TypeId) -> String {
    type_name_depth(types, id, 0)
}

fn type_name_depth(types: &TypeStore, id: TypeId, depth: u32) -> String {
    if depth >= MAX_DEPTH {
        return "...".to_string();
    }
    let data = types.data(id);
    let is_const = data.flags.is_const();
    let prefix = if is_const { "const " } else { "" };
    let body = match data.storage {
        StorageClass::Void => "void".to_string(),
        StorageClass::Bool => "bool".to_string(),
        StorageClass::Null => "null".to_string(),
        StorageClass::I8 => "i8".to_string(),
        StorageClass::I16 => "i16".to_string(),
        StorageClass::I32 => "i32".to_string(),
        StorageClass::I64 => "i64".to_string(),
        StorageClass::Int => "int".to_string(),
        StorageClass::U8 => "u8".to_string(),
        StorageClass::U16 => "u16".to_string(),
        StorageClass::U32 => "u32".to_string(),
        StorageClass::U64 => "u64".to_string(),
        StorageClass::Uint => "uint".to_string(),
        StorageClass::Rune => "rune".to_string(),
        StorageClass::F32 => "f32".to_string(),
        StorageClass::F64 => "f64".to_string(),
        StorageClass::Char => "char".to_string(),
        StorageClass::Uintptr => "uintptr".to_string(),
        StorageClass::Size => "size".to_string(),
        StorageClass::String => "str".to_string(),
        StorageClass::Pointer => match &data.payload {
            TypePayload::Pointer { referent, nullable } => {
                let r = type_name_depth(types, *referent, depth + 1);
                if *nullable {
                    format!("nullable *{r}")
                } else {
                    format!("*{r}")
                }
            }
            _ => unreachable!(),
        },
        StorageClass::Slice => match &data.payload {
            TypePayload::Slice { elem } => format!("[]{}", type_name_depth(types, *elem, depth + 1)),
            _ => unreachable!(),
        },
        StorageClass::Array => match &data.payload {
            TypePayload::Array { elem, len } => {
                let e = type_name_depth(types, *elem, depth + 1);
                match len {
                    Some(n) => format!("[{n}]{e}"),
                    None => format!("[*]{e}"),
                }
            }
            _ => unreachable!(),
        },
        StorageClass::Struct => "struct".to_string(),
        StorageClass::Union => "union".to_string(),
        StorageClass::TaggedUnion => "tagged union".to_string(),
        StorageClass::Enum => "enum".to_string(),
        StorageClass::Function => "fn".to_string(),
        StorageClass::Alias => match &data.payload {
            TypePayload::Alias { display_name, .. } => display_name.as_str().to_string(),
            _ => unreachable!(),
        },
    };
    format!("{prefix}{body}")
}
