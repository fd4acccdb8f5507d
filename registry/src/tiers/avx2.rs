//! `AVX2` tier: 256-bit integer registers.

use super::sse2::integer_bits;
use super::{rows, same, TierModule};
use crate::catalog::INTEGERS_UP_TO_64;
use crate::model::{Action, TierDescriptor};

/// Returns the `AVX2` tier module.
#[must_use]
pub fn module() -> TierModule {
    let epi = |prefix: &str| -> Vec<(&'static str, String)> {
        INTEGERS_UP_TO_64
            .iter()
            .map(|&id| (id, format!("{prefix}{}", integer_bits(id))))
            .collect()
    };
    let mul_types = ["INT16", "INT32", "UINT16", "UINT32"];

    TierModule {
        descriptor: TierDescriptor {
            id: "AVX2".to_owned(),
            guard: "__AVX2__".to_owned(),
            bit_width: 256,
            target: "avx2".to_owned(),
            header: "immintrin.h".to_owned(),
            cleanup: None,
        },
        register_types: same(&INTEGERS_UP_TO_64, "__m256i"),
        support: vec![
            (Action::Add, INTEGERS_UP_TO_64.to_vec()),
            (Action::Sub, INTEGERS_UP_TO_64.to_vec()),
            (Action::Mul, mul_types.to_vec()),
        ],
        intrinsics: vec![
            (
                Action::PackAligned,
                rows(&INTEGERS_UP_TO_64, |c| {
                    format!("[](const {c}* ptr) {{return _mm256_load_si256(reinterpret_cast<const __m256i*>(ptr));}}")
                }),
            ),
            (
                Action::PackUnaligned,
                rows(&INTEGERS_UP_TO_64, |c| {
                    format!("[](const {c}* ptr) {{return _mm256_loadu_si256(reinterpret_cast<const __m256i*>(ptr));}}")
                }),
            ),
            (Action::Add, epi("_mm256_add_epi")),
            (Action::Sub, epi("_mm256_sub_epi")),
            (
                Action::Mul,
                mul_types
                    .iter()
                    .map(|&id| (id, format!("_mm256_mullo_epi{}", integer_bits(id))))
                    .collect(),
            ),
            (
                Action::UnpackAligned,
                rows(&INTEGERS_UP_TO_64, |c| {
                    format!("[]({c}* ptr, const __m256i vec) {{_mm256_store_si256(reinterpret_cast<__m256i*>(ptr), vec);}}")
                }),
            ),
            (
                Action::UnpackUnaligned,
                rows(&INTEGERS_UP_TO_64, |c| {
                    format!("[]({c}* ptr, const __m256i vec) {{_mm256_storeu_si256(reinterpret_cast<__m256i*>(ptr), vec);}}")
                }),
            ),
        ],
    }
}
