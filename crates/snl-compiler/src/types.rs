//! Type descriptors and the type table.
//!
//! Types are compared by identity: two variables have compatible types only
//! when they share the same [`TypeId`]. Every `array` or `record` type
//! expression therefore creates a fresh, distinct type, while a named type
//! reuses the descriptor it was declared with.

use std::fmt;

// ============================================================================
// TypeId
// ============================================================================

/// Handle to a descriptor in a [`TypeTable`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    /// The `integer` singleton.
    pub const INTEGER: TypeId = TypeId(0);
    /// The `char` singleton.
    pub const CHAR: TypeId = TypeId(1);
    /// The boolean singleton, produced only by comparisons.
    pub const BOOLEAN: TypeId = TypeId(2);

    /// Index into the owning table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

// ============================================================================
// TypeDescriptor
// ============================================================================

/// A record field with its word offset from the start of the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
    pub offset: i64,
}

/// Structure of a type. Sizes are in words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Integer,
    Char,
    Boolean,
    /// `array [low..high] of element`, indexed by integers.
    Array {
        element: TypeId,
        low: i64,
        high: i64,
        size: i64,
    },
    /// Fields in declaration order with sequential offsets.
    Record { fields: Vec<Field>, size: i64 },
}

impl TypeDescriptor {
    /// Storage size in words.
    pub fn size(&self) -> i64 {
        match self {
            TypeDescriptor::Integer | TypeDescriptor::Char | TypeDescriptor::Boolean => 1,
            TypeDescriptor::Array { size, .. } | TypeDescriptor::Record { size, .. } => *size,
        }
    }

    /// Whether values of this type fit in a register.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Integer | TypeDescriptor::Char | TypeDescriptor::Boolean
        )
    }

    /// Look up a record field by name. The first field with the name wins.
    pub fn field(&self, name: &str) -> Option<&Field> {
        match self {
            TypeDescriptor::Record { fields, .. } => fields.iter().find(|f| f.name == name),
            _ => None,
        }
    }
}

// ============================================================================
// TypeTable
// ============================================================================

/// Owns every type descriptor created during analysis.
#[derive(Debug, Clone)]
pub struct TypeTable {
    types: Vec<TypeDescriptor>,
}

impl TypeTable {
    /// Create a table holding the three built-in singletons.
    pub fn new() -> Self {
        Self {
            types: vec![
                TypeDescriptor::Integer,
                TypeDescriptor::Char,
                TypeDescriptor::Boolean,
            ],
        }
    }

    /// Get a descriptor.
    pub fn get(&self, id: TypeId) -> &TypeDescriptor {
        &self.types[id.index()]
    }

    /// Size of a type in words.
    pub fn size(&self, id: TypeId) -> i64 {
        self.get(id).size()
    }

    /// Number of descriptors, built-ins included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false; the built-ins are present from the start.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Create an array type. Callers validate `low <= high` first.
    ///
    /// Returns `None` when the size in words does not fit an `i64`.
    pub fn add_array(&mut self, element: TypeId, low: i64, high: i64) -> Option<TypeId> {
        debug_assert!(low <= high);
        let size = high
            .checked_sub(low)?
            .checked_add(1)?
            .checked_mul(self.size(element))?;
        Some(self.push(TypeDescriptor::Array {
            element,
            low,
            high,
            size,
        }))
    }

    /// Create a record type, assigning field offsets left to right.
    ///
    /// Returns `None` when the summed field sizes do not fit an `i64`.
    pub fn add_record(
        &mut self,
        fields: impl IntoIterator<Item = (String, TypeId)>,
    ) -> Option<TypeId> {
        let mut offset: i64 = 0;
        let mut laid_out = Vec::new();
        for (name, ty) in fields {
            laid_out.push(Field { name, ty, offset });
            offset = offset.checked_add(self.size(ty))?;
        }
        Some(self.push(TypeDescriptor::Record {
            fields: laid_out,
            size: offset,
        }))
    }

    fn push(&mut self, descriptor: TypeDescriptor) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(descriptor);
        id
    }

    /// Human-readable form of a type.
    pub fn describe(&self, id: TypeId) -> String {
        match self.get(id) {
            TypeDescriptor::Integer => "integer".to_string(),
            TypeDescriptor::Char => "char".to_string(),
            TypeDescriptor::Boolean => "boolean".to_string(),
            TypeDescriptor::Array {
                element, low, high, ..
            } => format!("array [{low}..{high}] of {}", self.describe(*element)),
            TypeDescriptor::Record { fields, .. } => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|f| format!("{}: {}", f.name, self.describe(f.ty)))
                    .collect();
                format!("record {} end", fields.join("; "))
            }
        }
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_preinterned() {
        let table = TypeTable::new();
        assert_eq!(table.get(TypeId::INTEGER), &TypeDescriptor::Integer);
        assert_eq!(table.get(TypeId::CHAR), &TypeDescriptor::Char);
        assert_eq!(table.get(TypeId::BOOLEAN), &TypeDescriptor::Boolean);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn array_size_is_count_times_element() {
        let mut table = TypeTable::new();
        let ty = table.add_array(TypeId::INTEGER, 2, 5).unwrap();
        assert_eq!(table.size(ty), 4);

        let nested = table.add_array(ty, 0, 2).unwrap();
        assert_eq!(table.size(nested), 12);
    }

    #[test]
    fn record_offsets_accumulate() {
        let mut table = TypeTable::new();
        let arr = table.add_array(TypeId::CHAR, 1, 3).unwrap();
        let rec = table.add_record([
            ("a".to_string(), TypeId::INTEGER),
            ("b".to_string(), TypeId::CHAR),
            ("c".to_string(), arr),
            ("d".to_string(), TypeId::INTEGER),
        ])
        .unwrap();

        let desc = table.get(rec);
        assert_eq!(desc.size(), 6);
        assert_eq!(desc.field("a").map(|f| f.offset), Some(0));
        assert_eq!(desc.field("b").map(|f| f.offset), Some(1));
        assert_eq!(desc.field("c").map(|f| f.offset), Some(2));
        assert_eq!(desc.field("d").map(|f| f.offset), Some(5));
        assert!(desc.field("e").is_none());
    }

    #[test]
    fn record_of_integer_and_char_is_two_words() {
        let mut table = TypeTable::new();
        let rec = table.add_record([
            ("a".to_string(), TypeId::INTEGER),
            ("b".to_string(), TypeId::CHAR),
        ])
        .unwrap();
        assert_eq!(table.size(rec), 2);
    }

    #[test]
    fn duplicate_field_first_wins() {
        let mut table = TypeTable::new();
        let rec = table.add_record([
            ("x".to_string(), TypeId::INTEGER),
            ("x".to_string(), TypeId::CHAR),
        ])
        .unwrap();
        let field = table.get(rec).field("x").expect("field");
        assert_eq!(field.ty, TypeId::INTEGER);
        assert_eq!(field.offset, 0);
    }

    #[test]
    fn oversized_array_has_no_size() {
        let mut table = TypeTable::new();
        assert_eq!(table.add_array(TypeId::INTEGER, 0, i64::MAX), None);
        assert_eq!(table.add_array(TypeId::INTEGER, i64::MIN, 0), None);

        let wide = table.add_array(TypeId::INTEGER, 1, i64::MAX / 2).unwrap();
        assert_eq!(table.add_array(wide, 1, 3), None);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn oversized_record_has_no_size() {
        let mut table = TypeTable::new();
        let wide = table.add_array(TypeId::INTEGER, 1, i64::MAX).unwrap();
        assert_eq!(table.size(wide), i64::MAX);
        assert_eq!(
            table.add_record([("a".to_string(), wide), ("b".to_string(), TypeId::CHAR)]),
            None
        );
    }

    #[test]
    fn identical_structures_are_distinct_types() {
        let mut table = TypeTable::new();
        let a = table.add_array(TypeId::INTEGER, 1, 10).unwrap();
        let b = table.add_array(TypeId::INTEGER, 1, 10).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn describe_nested() {
        let mut table = TypeTable::new();
        let arr = table.add_array(TypeId::INTEGER, 2, 5).unwrap();
        let rec = table.add_record([("v".to_string(), arr)]).unwrap();
        assert_eq!(
            table.describe(rec),
            "record v: array [2..5] of integer end"
        );
    }
}
