//! Compiles the generated artifacts with the system C++ compiler and runs the
//! dispatched kernels against scalar results.
//!
//! Only built on x86-64; each test logs and returns early when neither `g++`
//! nor `c++` is on `PATH`.

#![cfg(target_arch = "x86_64")]

use std::path::{Path, PathBuf};
use std::process::Command;

use ezsimd_codegen::writer::write_artifacts;
use ezsimd_codegen::{generate_all, GeneratorConfig};
use ezsimd_registry::Registry;

/// Checks every alignment combination of one kernel, then the wrappers and an
/// invocation macro. Prints `ok` and exits 0 when everything matches.
const HARNESS: &str = r##"
#include <array>
#include <cstddef>
#include <cstdint>
#include <cstdio>
#include <vector>

template <typename T, typename Kernel, typename Scalar>
int check(const char* label, std::size_t len, Kernel kernel, Scalar scalar) {
    int failures = 0;
    for (int mask = 0; mask < 8; ++mask) {
        alignas(64) T bufA[64];
        alignas(64) T bufB[64];
        alignas(64) T bufC[64];
        T* a = bufA + (mask & 1);
        T* b = bufB + ((mask >> 1) & 1);
        T* c = bufC + ((mask >> 2) & 1);
        for (std::size_t i = 0; i < len; ++i) {
            a[i] = static_cast<T>(3 * i + 7);
            b[i] = static_cast<T>(i % 5 + 1);
            c[i] = static_cast<T>(0);
        }
        kernel(a, b, c, len);
        for (std::size_t i = 0; i < len; ++i) {
            if (c[i] != scalar(a[i], b[i])) {
                std::printf("FAIL %s len=%zu mask=%d index=%zu\n", label, len, mask, i);
                ++failures;
            }
        }
    }
    return failures;
}

#define KERNEL(op, T) [](const T* a, const T* b, T* c, std::size_t l) { ezsimd::op(a, b, c, l); }
#define SCALAR(T, expr) [](T x, T y) { return static_cast<T>(expr); }

int main() {
    int failures = 0;
    failures += check<int32_t>("add int32", 10, KERNEL(add, int32_t), SCALAR(int32_t, x + y));

    const std::size_t lengths[] = {0, 1, 3, 4, 9, 16, 17, 37};
    for (std::size_t len : lengths) {
        failures += check<int32_t>("add int32", len, KERNEL(add, int32_t), SCALAR(int32_t, x + y));
        failures += check<int8_t>("add int8", len, KERNEL(add, int8_t), SCALAR(int8_t, x + y));
        failures += check<int16_t>("sub int16", len, KERNEL(sub, int16_t), SCALAR(int16_t, x - y));
        failures += check<uint16_t>("mul uint16", len, KERNEL(mul, uint16_t), SCALAR(uint16_t, x * y));
        failures += check<float>("mul float", len, KERNEL(mul, float), SCALAR(float, x * y));
        failures += check<double>("div double", len, KERNEL(div, double), SCALAR(double, x / y));
    }

    std::vector<int32_t> va(10), vb(10), vc(10);
    std::array<double, 7> xa{}, xb{}, xc{};
    int32_t ra[10], rb[10], rc[10];
    for (std::size_t i = 0; i < 10; ++i) {
        va[i] = ra[i] = static_cast<int32_t>(i * 7);
        vb[i] = rb[i] = static_cast<int32_t>(i + 1);
    }
    for (std::size_t i = 0; i < 7; ++i) {
        xa[i] = static_cast<double>(i * 9 + 1);
        xb[i] = static_cast<double>(i + 2);
    }
    ezsimd::add(va, vb, vc);
    ezsimd::div(xa, xb, xc);
    {
        using namespace ezsimd;
        SUB(ra, rb, rc);
    }
    for (std::size_t i = 0; i < 10; ++i) {
        if (vc[i] != va[i] + vb[i] || rc[i] != ra[i] - rb[i]) {
            std::printf("FAIL wrappers index=%zu\n", i);
            ++failures;
        }
    }
    for (std::size_t i = 0; i < 7; ++i) {
        if (xc[i] != xa[i] / xb[i]) {
            std::printf("FAIL array wrapper index=%zu\n", i);
            ++failures;
        }
    }

    if (failures == 0) {
        std::printf("ok\n");
    }
    return failures == 0 ? 0 : 1;
}
"##;

fn harness(include: &str) -> String {
    format!("#include \"{include}\"\n{HARNESS}")
}

/// First C++ compiler found on `PATH`, or `None` after logging the skip.
fn compiler() -> Option<&'static str> {
    let _ = env_logger::builder().is_test(true).try_init();
    let found = ["g++", "c++"].into_iter().find(|cc| {
        Command::new(cc)
            .arg("--version")
            .output()
            .is_ok_and(|out| out.status.success())
    });
    if found.is_none() {
        log::warn!("no C++ compiler (g++ or c++) on PATH; skipping compiled kernel checks");
    }
    found
}

/// Writes the default artifacts into a fresh directory.
fn artifacts_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ezsimd-compiled-{tag}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let config = GeneratorConfig::default();
    let rendered = generate_all(Registry::x86(), &config).render();
    let report = write_artifacts(rendered, &dir, &config.names);
    assert!(report.is_complete(), "{:?}", report.failed);
    dir
}

fn write(dir: &Path, name: &str, text: &str) {
    if let Err(e) = std::fs::write(dir.join(name), text) {
        panic!("failed to write {name}: {e}");
    }
}

/// Compiles `sources` in `dir` into one program, runs it and returns stdout.
fn build_and_run(cc: &str, dir: &Path, sources: &[&str], flags: &[&str]) -> String {
    let exe = dir.join("harness");
    let build = Command::new(cc)
        .current_dir(dir)
        .args(["-std=c++17", "-O2", "-I."])
        .args(flags)
        .args(sources)
        .arg("-o")
        .arg(&exe)
        .output();
    let build = match build {
        Ok(out) => out,
        Err(e) => panic!("failed to start {cc}: {e}"),
    };
    let stderr: String = String::from_utf8_lossy(&build.stderr).chars().take(4000).collect();
    assert!(build.status.success(), "{cc} {flags:?} failed:\n{stderr}");

    let run = match Command::new(&exe).output() {
        Ok(out) => out,
        Err(e) => panic!("failed to run {}: {e}", exe.display()),
    };
    let stdout = String::from_utf8_lossy(&run.stdout).into_owned();
    assert!(run.status.success(), "harness {flags:?} failed:\n{stdout}");
    assert!(stdout.lines().any(|l| l == "ok"), "{stdout}");
    stdout
}

#[test]
fn kernels_match_scalar_results() {
    let Some(cc) = compiler() else {
        return;
    };
    let dir = artifacts_dir("default");
    write(&dir, "check.cpp", &harness("ezsimd.hpp"));
    let stdout = build_and_run(cc, &dir, &["check.cpp"], &["-DEZSIMD_SHOW_FUNC=std::cout"]);
    // every x86-64 host runs the SSE2 and SSE kernels
    assert!(stdout.contains("target(\"sse2\") add"), "{stdout}");
    assert!(stdout.contains("target(\"sse\") mul"), "{stdout}");
    assert!(stdout.contains("target(\"sse2\") div"), "{stdout}");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn avx2_kernels_match_scalar_results() {
    if !std::is_x86_feature_detected!("avx2") {
        log::warn!("host lacks AVX2; skipping");
        return;
    }
    let Some(cc) = compiler() else {
        return;
    };
    let dir = artifacts_dir("avx2");
    write(&dir, "check.cpp", &harness("ezsimd.hpp"));
    let stdout = build_and_run(
        cc,
        &dir,
        &["check.cpp"],
        &["-mavx2", "-DEZSIMD_SHOW_FUNC=std::cout"],
    );
    assert!(stdout.contains("target(\"avx2\") add"), "{stdout}");
    assert!(stdout.contains("target(\"avx\") div"), "{stdout}");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn public_interface_links_against_one_definitions_unit() {
    let Some(cc) = compiler() else {
        return;
    };
    let dir = artifacts_dir("link");
    write(&dir, "main.cpp", &harness("libezsimd.hpp"));
    write(&dir, "definitions.cpp", "#include \"ezsimd.hpp\"\n");
    // the forwarding file compiles on its own and defines nothing
    build_and_run(cc, &dir, &["main.cpp", "definitions.cpp", "ezsimd.cpp"], &[]);
    let _ = std::fs::remove_dir_all(&dir);
}
