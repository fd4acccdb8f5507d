//! `SSE` tier: 128-bit single-precision registers.

use super::{same, TierModule};
use crate::model::{Action, TierDescriptor};

const TYPES: [&str; 1] = ["FLOAT32"];

/// Returns the `SSE` tier module.
#[must_use]
pub fn module() -> TierModule {
    TierModule {
        descriptor: TierDescriptor {
            id: "SSE".to_owned(),
            guard: "__SSE__".to_owned(),
            bit_width: 128,
            target: "sse".to_owned(),
            header: "xmmintrin.h".to_owned(),
            cleanup: None,
        },
        register_types: same(&TYPES, "__m128"),
        support: Action::ARITHMETIC
            .iter()
            .map(|&action| (action, TYPES.to_vec()))
            .collect(),
        intrinsics: vec![
            (Action::PackAligned, same(&TYPES, "_mm_load_ps")),
            (Action::PackUnaligned, same(&TYPES, "_mm_loadu_ps")),
            (Action::Add, same(&TYPES, "_mm_add_ps")),
            (Action::Sub, same(&TYPES, "_mm_sub_ps")),
            (Action::Mul, same(&TYPES, "_mm_mul_ps")),
            (Action::Div, same(&TYPES, "_mm_div_ps")),
            (Action::UnpackAligned, same(&TYPES, "_mm_store_ps")),
            (Action::UnpackUnaligned, same(&TYPES, "_mm_storeu_ps")),
        ],
    }
}
