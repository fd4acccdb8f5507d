//! `MMX` tier: 64-bit integer registers.
//!
//! MMX has no load/store intrinsics, so packing goes through the `__m64` bit
//! pattern directly (aligned) or through `memcpy` (unaligned). MMX registers
//! alias the x87 stack, which must be released with `_mm_empty()` before any
//! scalar floating point runs.

use super::{rows, same, TierModule};
use crate::model::{Action, TierDescriptor};

const TYPES: [&str; 6] = ["INT8", "INT16", "INT32", "UINT8", "UINT16", "UINT32"];

/// Returns the `MMX` tier module.
#[must_use]
pub fn module() -> TierModule {
    TierModule {
        descriptor: TierDescriptor {
            id: "MMX".to_owned(),
            guard: "__MMX__".to_owned(),
            bit_width: 64,
            target: "mmx".to_owned(),
            header: "mmintrin.h".to_owned(),
            cleanup: Some("_mm_empty()".to_owned()),
        },
        register_types: same(&TYPES, "__m64"),
        support: vec![
            (Action::Add, TYPES.to_vec()),
            (Action::Sub, TYPES.to_vec()),
            (Action::Mul, vec!["INT16", "UINT16"]),
        ],
        intrinsics: vec![
            (
                Action::PackAligned,
                rows(&TYPES, |c| {
                    format!("[](const {c}* ptr) {{return *reinterpret_cast<const __m64*>(ptr);}}")
                }),
            ),
            (
                Action::PackUnaligned,
                rows(&TYPES, |c| {
                    format!(
                        "[](const {c}* ptr) {{uint64_t temp; std::memcpy(&temp, ptr, sizeof(temp)); \
                         return *reinterpret_cast<__m64*>(&temp);}}"
                    )
                }),
            ),
            (
                Action::Add,
                vec![
                    ("INT8", "_mm_add_pi8".to_owned()),
                    ("INT16", "_mm_add_pi16".to_owned()),
                    ("INT32", "_mm_add_pi32".to_owned()),
                    ("UINT8", "_mm_add_pi8".to_owned()),
                    ("UINT16", "_mm_add_pi16".to_owned()),
                    ("UINT32", "_mm_add_pi32".to_owned()),
                ],
            ),
            (
                Action::Sub,
                vec![
                    ("INT8", "_mm_sub_pi8".to_owned()),
                    ("INT16", "_mm_sub_pi16".to_owned()),
                    ("INT32", "_mm_sub_pi32".to_owned()),
                    ("UINT8", "_mm_sub_pi8".to_owned()),
                    ("UINT16", "_mm_sub_pi16".to_owned()),
                    ("UINT32", "_mm_sub_pi32".to_owned()),
                ],
            ),
            (Action::Mul, same(&["INT16", "UINT16"], "_mm_mullo_pi16")),
            (
                Action::UnpackAligned,
                rows(&TYPES, |c| {
                    format!("[]({c}* ptr, const __m64 vec) {{*reinterpret_cast<__m64*>(ptr) = vec;}}")
                }),
            ),
            (
                Action::UnpackUnaligned,
                rows(&TYPES, |c| {
                    format!("[]({c}* ptr, const __m64 vec) {{std::memcpy(ptr, &vec, sizeof(__m64));}}")
                }),
            ),
        ],
    }
}
