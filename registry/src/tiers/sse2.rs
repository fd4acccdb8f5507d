//! `SSE2` tier: 128-bit integer and double-precision registers.
//!
//! Integer loads and stores go through `__m128i` pointer casts; doubles use
//! the `_pd` intrinsics directly.

use super::{rows, same, TierModule};
use crate::catalog::INTEGERS_UP_TO_64;
use crate::model::{Action, TierDescriptor};

/// Returns the `SSE2` tier module.
#[must_use]
pub fn module() -> TierModule {
    let mut all = INTEGERS_UP_TO_64.to_vec();
    all.push("FLOAT64");

    let mut packs_aligned = rows(&INTEGERS_UP_TO_64, |c| {
        format!("[](const {c}* ptr) {{return _mm_load_si128(reinterpret_cast<const __m128i*>(ptr));}}")
    });
    packs_aligned.push(("FLOAT64", "_mm_load_pd".to_owned()));

    let mut packs_unaligned = rows(&INTEGERS_UP_TO_64, |c| {
        format!("[](const {c}* ptr) {{return _mm_loadu_si128(reinterpret_cast<const __m128i*>(ptr));}}")
    });
    packs_unaligned.push(("FLOAT64", "_mm_loadu_pd".to_owned()));

    let mut unpacks_aligned = rows(&INTEGERS_UP_TO_64, |c| {
        format!("[]({c}* ptr, const __m128i vec) {{_mm_store_si128(reinterpret_cast<__m128i*>(ptr), vec);}}")
    });
    unpacks_aligned.push(("FLOAT64", "_mm_store_pd".to_owned()));

    let mut unpacks_unaligned = rows(&INTEGERS_UP_TO_64, |c| {
        format!("[]({c}* ptr, const __m128i vec) {{_mm_storeu_si128(reinterpret_cast<__m128i*>(ptr), vec);}}")
    });
    unpacks_unaligned.push(("FLOAT64", "_mm_storeu_pd".to_owned()));

    let mut register_types = same(&INTEGERS_UP_TO_64, "__m128i");
    register_types.push(("FLOAT64", "__m128d".to_owned()));

    TierModule {
        descriptor: TierDescriptor {
            id: "SSE2".to_owned(),
            guard: "__SSE2__".to_owned(),
            bit_width: 128,
            target: "sse2".to_owned(),
            header: "emmintrin.h".to_owned(),
            cleanup: None,
        },
        register_types,
        support: vec![
            (Action::Add, all.clone()),
            (Action::Sub, all),
            (Action::Mul, vec!["INT16", "UINT16", "FLOAT64"]),
            (Action::Div, vec!["FLOAT64"]),
        ],
        intrinsics: vec![
            (Action::PackAligned, packs_aligned),
            (Action::PackUnaligned, packs_unaligned),
            (Action::Add, integer_and_double("_mm_add_epi", "_mm_add_pd")),
            (Action::Sub, integer_and_double("_mm_sub_epi", "_mm_sub_pd")),
            (
                Action::Mul,
                vec![
                    ("INT16", "_mm_mullo_epi16".to_owned()),
                    ("UINT16", "_mm_mullo_epi16".to_owned()),
                    ("FLOAT64", "_mm_mul_pd".to_owned()),
                ],
            ),
            (Action::Div, same(&["FLOAT64"], "_mm_div_pd")),
            (Action::UnpackAligned, unpacks_aligned),
            (Action::UnpackUnaligned, unpacks_unaligned),
        ],
    }
}

/// `_mm_add_epi8` … `_mm_add_epi64` for the integers, `_mm_add_pd` for doubles.
fn integer_and_double(epi_prefix: &str, pd: &str) -> Vec<(&'static str, String)> {
    let mut out: Vec<(&'static str, String)> = INTEGERS_UP_TO_64
        .iter()
        .map(|&id| (id, format!("{epi_prefix}{}", integer_bits(id))))
        .collect();
    out.push(("FLOAT64", pd.to_owned()));
    out
}

pub(super) fn integer_bits(id: &str) -> &str {
    id.trim_start_matches('U').trim_start_matches("INT")
}
