//! Core registry model types.
//!
//! These types describe everything the generator reads: instruction-set tiers,
//! numeric types, operations, and the three lookup tables keyed by them. All
//! instances are owned values so a registry can be built in code or loaded from
//! JSON. The built-in entry point is [`Registry::x86()`](crate::Registry::x86).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An action the intrinsic table is keyed by.
///
/// The four arithmetic actions are the operations the generator emits kernels
/// for. The pack/unpack actions are the aligned and unaligned loads and stores
/// of one register-width chunk; they are lookup keys only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Element-wise addition.
    Add,
    /// Element-wise subtraction.
    Sub,
    /// Element-wise multiplication.
    Mul,
    /// Element-wise division.
    Div,
    /// Aligned load of one register from memory.
    PackAligned,
    /// Unaligned load of one register from memory.
    PackUnaligned,
    /// Aligned store of one register to memory.
    UnpackAligned,
    /// Unaligned store of one register to memory.
    UnpackUnaligned,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 8] = [
        Action::Add,
        Action::Sub,
        Action::Mul,
        Action::Div,
        Action::PackAligned,
        Action::PackUnaligned,
        Action::UnpackAligned,
        Action::UnpackUnaligned,
    ];

    /// The arithmetic actions, in declaration order.
    pub const ARITHMETIC: [Action; 4] = [Action::Add, Action::Sub, Action::Mul, Action::Div];

    /// Returns `true` for ADD, SUB, MUL and DIV.
    #[must_use]
    pub fn is_arithmetic(self) -> bool {
        self.operator().is_some()
    }

    /// Returns the scalar C operator for an arithmetic action.
    #[must_use]
    pub fn operator(self) -> Option<char> {
        match self {
            Action::Add => Some('+'),
            Action::Sub => Some('-'),
            Action::Mul => Some('*'),
            Action::Div => Some('/'),
            _ => None,
        }
    }

    /// Returns the identifier used in tables and JSON (e.g. `"PACK_ALIGNED"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Add => "ADD",
            Action::Sub => "SUB",
            Action::Mul => "MUL",
            Action::Div => "DIV",
            Action::PackAligned => "PACK_ALIGNED",
            Action::PackUnaligned => "PACK_UNALIGNED",
            Action::UnpackAligned => "UNPACK_ALIGNED",
            Action::UnpackUnaligned => "UNPACK_UNALIGNED",
        }
    }

    /// The load action for a pointer with the given alignment.
    #[must_use]
    pub fn load(aligned: bool) -> Action {
        if aligned {
            Action::PackAligned
        } else {
            Action::PackUnaligned
        }
    }

    /// The store action for a pointer with the given alignment.
    #[must_use]
    pub fn store(aligned: bool) -> Action {
        if aligned {
            Action::UnpackAligned
        } else {
            Action::UnpackUnaligned
        }
    }
}

/// An operation entry in the registry's operation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// The action this entry names.
    pub action: Action,
    /// Function name used in generated code (e.g. `"add"`).
    pub name: String,
    /// Macro-friendly alias (e.g. `"ADD"`).
    pub macro_name: String,
}

/// A numeric element type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericTypeDescriptor {
    /// Table identifier (e.g. `"INT8"`).
    pub id: String,
    /// Short lowercase name (e.g. `"int8"`).
    pub class_name: String,
    /// C type spelled in generated code (e.g. `"int8_t"`).
    pub type_name: String,
    /// Width of one element in bits.
    pub bit_width: u32,
    /// Recognized but never generated.
    #[serde(default)]
    pub excluded: bool,
}

/// An instruction-set tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDescriptor {
    /// Table identifier (e.g. `"SSE2"`).
    pub id: String,
    /// Preprocessor token that must be defined for this tier's code to be
    /// compiled (e.g. `"__SSE2__"`).
    pub guard: String,
    /// Width of one vector register in bits.
    pub bit_width: u32,
    /// Argument of `__attribute__((target(...)))` (e.g. `"sse2"`).
    pub target: String,
    /// Header declaring this tier's intrinsics.
    pub header: String,
    /// Statement that resets register state after the vector loop.
    #[serde(default)]
    pub cleanup: Option<String>,
}

impl TierDescriptor {
    /// Width of one vector register in bytes.
    #[must_use]
    pub fn byte_width(&self) -> u32 {
        self.bit_width / 8
    }

    /// Number of `numeric` elements one register holds, or `0` for a
    /// zero-width numeric type.
    ///
    /// Exactness is not re-checked here; see [`Registry::check_widths`].
    #[must_use]
    pub fn lanes(&self, numeric: &NumericTypeDescriptor) -> u32 {
        self.bit_width.checked_div(numeric.bit_width).unwrap_or(0)
    }
}

/// (tier, action, numeric type) → whether a vector implementation exists.
///
/// Absent entries read as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupportMatrix(pub BTreeMap<String, BTreeMap<Action, BTreeMap<String, bool>>>);

impl SupportMatrix {
    /// Returns whether `tier` vectorizes `action` for `numeric`.
    #[must_use]
    pub fn is_supported(&self, tier: &str, action: Action, numeric: &str) -> bool {
        self.0
            .get(tier)
            .and_then(|by_action| by_action.get(&action))
            .and_then(|by_type| by_type.get(numeric))
            .copied()
            .unwrap_or(false)
    }

    /// Sets one cell of the matrix.
    pub fn insert(&mut self, tier: &str, action: Action, numeric: &str, supported: bool) {
        self.0
            .entry(tier.to_owned())
            .or_default()
            .entry(action)
            .or_default()
            .insert(numeric.to_owned(), supported);
    }

    /// Iterates over every cell set to `true`, in key order.
    pub fn supported(&self) -> impl Iterator<Item = (&str, Action, &str)> + '_ {
        self.0.iter().flat_map(|(tier, by_action)| {
            by_action.iter().flat_map(move |(action, by_type)| {
                by_type
                    .iter()
                    .filter(|(_, supported)| **supported)
                    .map(move |(numeric, _)| (tier.as_str(), *action, numeric.as_str()))
            })
        })
    }
}

/// (tier, numeric type) → vector register type name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegisterTypeTable(pub BTreeMap<String, BTreeMap<String, String>>);

impl RegisterTypeTable {
    /// Looks up the register type holding `numeric` on `tier`.
    #[must_use]
    pub fn get(&self, tier: &str, numeric: &str) -> Option<&str> {
        self.0
            .get(tier)
            .and_then(|by_type| by_type.get(numeric))
            .map(String::as_str)
    }

    /// Sets the register type of one (tier, numeric type) pair.
    pub fn insert(&mut self, tier: &str, numeric: &str, register: impl Into<String>) {
        self.0
            .entry(tier.to_owned())
            .or_default()
            .insert(numeric.to_owned(), register.into());
    }
}

/// (tier, action, numeric type) → intrinsic symbol or callable expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntrinsicTable(pub BTreeMap<String, BTreeMap<Action, BTreeMap<String, String>>>);

impl IntrinsicTable {
    /// Looks up the intrinsic implementing `action` for `numeric` on `tier`.
    #[must_use]
    pub fn get(&self, tier: &str, action: Action, numeric: &str) -> Option<&str> {
        self.0
            .get(tier)
            .and_then(|by_action| by_action.get(&action))
            .and_then(|by_type| by_type.get(numeric))
            .map(String::as_str)
    }

    /// Sets one intrinsic entry.
    pub fn insert(&mut self, tier: &str, action: Action, numeric: &str, symbol: impl Into<String>) {
        self.0
            .entry(tier.to_owned())
            .or_default()
            .entry(action)
            .or_default()
            .insert(numeric.to_owned(), symbol.into());
    }
}

/// A complete metadata registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    /// Registry version (e.g. `"1.0.0"`).
    pub version: String,
    /// Tiers, in generation order (lowest first).
    pub tiers: Vec<TierDescriptor>,
    /// Numeric types, in generation order.
    pub numeric_types: Vec<NumericTypeDescriptor>,
    /// Operations, in generation order. May contain helper actions.
    pub operations: Vec<OperationDescriptor>,
    /// Which tiers vectorize which (operation, numeric type) pairs.
    pub support: SupportMatrix,
    /// Register type names.
    pub register_types: RegisterTypeTable,
    /// Intrinsic symbols.
    pub intrinsics: IntrinsicTable,
}

impl Registry {
    /// Looks up a tier by identifier.
    #[must_use]
    pub fn find_tier(&self, id: &str) -> Option<&TierDescriptor> {
        self.tiers.iter().find(|t| t.id == id)
    }

    /// Looks up a numeric type by identifier.
    #[must_use]
    pub fn find_numeric_type(&self, id: &str) -> Option<&NumericTypeDescriptor> {
        self.numeric_types.iter().find(|n| n.id == id)
    }

    /// Looks up the operation entry for an action.
    #[must_use]
    pub fn find_operation(&self, action: Action) -> Option<&OperationDescriptor> {
        self.operations.iter().find(|o| o.action == action)
    }

    /// Iterates over the operations that produce user-facing kernels.
    pub fn arithmetic_operations(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.operations.iter().filter(|o| o.action.is_arithmetic())
    }

    /// Iterates over the numeric types that are not excluded.
    pub fn generated_numeric_types(&self) -> impl Iterator<Item = &NumericTypeDescriptor> {
        self.numeric_types.iter().filter(|n| !n.excluded)
    }

    /// Returns the number of supported (tier, arithmetic action, numeric type)
    /// cells, i.e. the number of tier kernels a full generation emits.
    #[must_use]
    pub fn supported_count(&self) -> usize {
        self.support
            .supported()
            .filter(|(tier, action, numeric)| {
                action.is_arithmetic()
                    && self.find_tier(tier).is_some()
                    && self
                        .find_numeric_type(numeric)
                        .is_some_and(|n| !n.excluded)
            })
            .count()
    }

    /// Checks that every table key names a declared tier or numeric type.
    ///
    /// This is an existence check only; see the conformance crate for the
    /// full registry validator.
    ///
    /// # Errors
    ///
    /// Returns the first reference to an undeclared tier or numeric type.
    pub fn check_references(&self) -> Result<(), crate::RegistryError> {
        let tier_keys = self
            .support
            .0
            .keys()
            .chain(self.register_types.0.keys())
            .chain(self.intrinsics.0.keys());
        for tier in tier_keys {
            if self.find_tier(tier).is_none() {
                return Err(crate::RegistryError::UnknownTier(tier.clone()));
            }
        }

        let support_types = self
            .support
            .0
            .values()
            .flat_map(|by_action| by_action.values())
            .flat_map(|by_type| by_type.keys());
        let register_type_keys = self.register_types.0.values().flat_map(|m| m.keys());
        let intrinsic_types = self
            .intrinsics
            .0
            .values()
            .flat_map(|by_action| by_action.values())
            .flat_map(|by_type| by_type.keys());
        for numeric in support_types
            .chain(register_type_keys)
            .chain(intrinsic_types)
        {
            if self.find_numeric_type(numeric).is_none() {
                return Err(crate::RegistryError::UnknownNumericType(numeric.clone()));
            }
        }
        Ok(())
    }

    /// Checks that every supported cell splits its register into whole lanes.
    ///
    /// Cells naming an undeclared tier or type are left to
    /// [`Registry::check_references`].
    ///
    /// # Errors
    ///
    /// Returns the first cell whose tier width is not a whole number of bytes
    /// or is not a non-zero multiple of the numeric type's width.
    pub fn check_widths(&self) -> Result<(), crate::RegistryError> {
        for (tier_id, _, numeric_id) in self.support.supported() {
            let (Some(tier), Some(numeric)) =
                (self.find_tier(tier_id), self.find_numeric_type(numeric_id))
            else {
                continue;
            };
            let whole_lanes = numeric.bit_width != 0 && tier.bit_width % numeric.bit_width == 0;
            if tier.bit_width == 0 || tier.bit_width % 8 != 0 || !whole_lanes {
                return Err(crate::RegistryError::UnevenLanes {
                    tier: tier.id.clone(),
                    tier_bits: tier.bit_width,
                    numeric: numeric.id.clone(),
                    numeric_bits: numeric.bit_width,
                });
            }
        }
        Ok(())
    }
}
