use core::fmt::{self, Write};

use num::traits::float::FloatCore;

/// Writes `v` as fixed point with `percision` fractional digits, without
/// pulling in the core float formatting machinery.
pub fn write_fixed<W: Write>(w: &mut W, v: f32, percision: u32) -> fmt::Result {
    let scale = 10u32.pow(percision);
    let scaled = FloatCore::round(FloatCore::abs(v) * scale as f32) as u32;
    let sign = if v < 0.0 && scaled != 0 { "-" } else { "" };

    if percision == 0 {
        write!(w, "{}{}", sign, scaled)
    } else {
        write!(
            w,
            "{}{}.{:0width$}",
            sign,
            scaled / scale,
            scaled % scale,
            width = percision as usize
        )
    }
}
