//! US crochet hook letters and their metric diameters.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HookSize {
    pub us: &'static str,
    pub mm: f64,
}

const fn hook(us: &'static str, mm: f64) -> HookSize {
    HookSize { us, mm }
}

/// Smallest to largest.
pub static HOOK_SIZES: [HookSize; 16] = [
    hook("B-1", 2.25),
    hook("C-2", 2.75),
    hook("D-3", 3.25),
    hook("E-4", 3.5),
    hook("F-5", 3.75),
    hook("G-6", 4.0),
    hook("7", 4.5),
    hook("H-8", 5.0),
    hook("I-9", 5.5),
    hook("J-10", 6.0),
    hook("K-10.5", 6.5),
    hook("L-11", 8.0),
    hook("M/N-13", 9.0),
    hook("N/P-15", 10.0),
    hook("P/Q", 15.0),
    hook("Q", 16.0),
];

/// Metric size for a US label, matched case-insensitively.
pub fn us_to_mm(us: &str) -> Option<f64> {
    let wanted = us.trim();
    HOOK_SIZES
        .iter()
        .find(|size| size.us.eq_ignore_ascii_case(wanted))
        .map(|size| size.mm)
}

/// Nearest US size to a metric diameter. On a tie the smaller hook wins.
pub fn closest_us(mm: f64) -> HookSize {
    let mut best = HOOK_SIZES[0];
    for size in HOOK_SIZES.iter().skip(1) {
        if (size.mm - mm).abs() < (best.mm - mm).abs() {
            best = *size;
        }
    }
    best
}
