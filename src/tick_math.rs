// 2.1 tick_math.rs: exact Q64.96 sqrt ratios for the discrete tick grid.
// the per-bit multiplier table is the protocol-defined constant set; each
// entry is sqrt(1.0001)^-(2^bit) in Q128.128.

use alloy_primitives::U256;

use crate::curve::CurveError;

pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = -MIN_TICK;

/// sqrt ratio at MIN_TICK, the smallest representable sqrt price.
pub const MIN_SQRT_PRICE: U256 = U256::from_limbs([4295128739, 0, 0, 0]);
/// sqrt ratio at MAX_TICK; valid sqrt prices are strictly below this, so a
/// price lookup can return at most MAX_TICK - 1.
pub const MAX_SQRT_PRICE: U256 =
    U256::from_limbs([6743328256752651558, 17280870778742802505, 4294805859, 0]);

// Multipliers for tick bits 1..=19, as (low, high) 64-bit limbs of a
// Q128.128 value. Bit 0 has its own starting ratio below.
const BIT_MULTIPLIERS: [[u64; 2]; 19] = [
    [6459403834229662010, 18444899583751176498],
    [17226890335427755468, 18443055278223354162],
    [2032852871939366096, 18439367220385604838],
    [14545316742740207172, 18431993317065449817],
    [5129152022828963008, 18417254355718160513],
    [4894419605888772193, 18387811781193591352],
    [1280255884321894483, 18329067761203520168],
    [15924666964335305636, 18212142134806087854],
    [8010504389359918676, 17980523815641551639],
    [10668036004952895731, 17526086738831147013],
    [4878133418470705625, 16651378430235024244],
    [9537173718739605541, 15030750278693429944],
    [9972618978014552549, 12247334978882834399],
    [10428997489610666743, 8131365268884726200],
    [9305304367709015974, 3584323654723342297],
    [14301143598189091785, 696457651847595233],
    [7393154844743099908, 26294789957452057],
    [2209338891292245656, 37481735321082],
    [10518117631919034274, 76158723],
];

/// Sqrt ratio (Q64.96) at a tick index. Errors when the tick lies outside
/// [MIN_TICK, MAX_TICK].
pub fn sqrt_price_at_tick(tick: i32) -> Result<U256, CurveError> {
    let abs_tick = tick.unsigned_abs();
    if abs_tick > MAX_TICK as u32 {
        return Err(CurveError::TickOutOfBounds(tick));
    }

    // Running product in Q128.128. Bit 0 seeds sqrt(1.0001)^-1.
    let mut ratio = if abs_tick & 1 != 0 {
        U256::from_limbs([12262481743371124737, 18445821805675392311, 0, 0])
    } else {
        U256::from_limbs([0, 0, 1, 0])
    };

    for (bit, limbs) in BIT_MULTIPLIERS.iter().enumerate() {
        if abs_tick & (1 << (bit + 1)) != 0 {
            ratio = ratio.wrapping_mul(U256::from_limbs([limbs[0], limbs[1], 0, 0])) >> 128;
        }
    }

    // The table computes negative ticks; invert for positive ones.
    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.96, rounding up so the result round-trips through
    // tick_at_sqrt_price.
    let round = (ratio.as_limbs()[0] & 0xFFFF_FFFF != 0) as u64;
    Ok((ratio >> 32) + U256::from(round))
}

/// Largest tick whose sqrt ratio is <= the given sqrt price (Q64.96).
/// Errors when the price lies outside [MIN_SQRT_PRICE, MAX_SQRT_PRICE).
///
/// Binary search over `sqrt_price_at_tick`; exact by construction, at the
/// cost of ~20 ratio evaluations per lookup.
pub fn tick_at_sqrt_price(sqrt_price: U256) -> Result<i32, CurveError> {
    if sqrt_price < MIN_SQRT_PRICE || sqrt_price >= MAX_SQRT_PRICE {
        return Err(CurveError::SqrtPriceOutOfBounds(sqrt_price));
    }

    let mut lo = MIN_TICK;
    let mut hi = MAX_TICK;
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if sqrt_price_at_tick(mid)? <= sqrt_price {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Ok(lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Q96;
    use std::str::FromStr;

    #[test]
    fn rejects_out_of_bounds_ticks() {
        assert!(matches!(
            sqrt_price_at_tick(MIN_TICK - 1),
            Err(CurveError::TickOutOfBounds(_))
        ));
        assert!(matches!(
            sqrt_price_at_tick(MAX_TICK + 1),
            Err(CurveError::TickOutOfBounds(_))
        ));
    }

    #[test]
    fn tick_zero_is_unit_price() {
        assert_eq!(sqrt_price_at_tick(0).unwrap(), Q96);
    }

    #[test]
    fn boundary_ratios() {
        assert_eq!(sqrt_price_at_tick(MIN_TICK).unwrap(), MIN_SQRT_PRICE);
        assert_eq!(
            sqrt_price_at_tick(MIN_TICK + 1).unwrap(),
            U256::from(4295343490u64)
        );
        assert_eq!(
            sqrt_price_at_tick(MAX_TICK).unwrap(),
            U256::from_str("1461446703485210103287273052203988822378723970342").unwrap()
        );
    }

    #[test]
    fn reference_ratios() {
        // spot checks against the protocol reference values
        assert_eq!(
            sqrt_price_at_tick(50).unwrap(),
            U256::from(79426470787362580746886972461u128)
        );
        assert_eq!(
            sqrt_price_at_tick(100).unwrap(),
            U256::from(79625275426524748796330556128u128)
        );
        assert_eq!(
            sqrt_price_at_tick(3000).unwrap(),
            U256::from(92049301871182272007977902845u128)
        );
        assert_eq!(
            sqrt_price_at_tick(250000).unwrap(),
            U256::from(21246587762933397357449903968194344u128)
        );
    }

    #[test]
    fn rejects_out_of_bounds_prices() {
        assert!(matches!(
            tick_at_sqrt_price(MIN_SQRT_PRICE - U256::ONE),
            Err(CurveError::SqrtPriceOutOfBounds(_))
        ));
        assert!(matches!(
            tick_at_sqrt_price(MAX_SQRT_PRICE),
            Err(CurveError::SqrtPriceOutOfBounds(_))
        ));
    }

    #[test]
    fn tick_lookup_boundaries() {
        assert_eq!(tick_at_sqrt_price(MIN_SQRT_PRICE).unwrap(), MIN_TICK);
        assert_eq!(
            tick_at_sqrt_price(U256::from(4295343490u64)).unwrap(),
            MIN_TICK + 1
        );
        assert_eq!(
            tick_at_sqrt_price(MAX_SQRT_PRICE - U256::ONE).unwrap(),
            MAX_TICK - 1
        );
        assert_eq!(tick_at_sqrt_price(Q96).unwrap(), 0);
    }

    #[test]
    fn tick_lookup_between_grid_points() {
        // a price strictly between tick 0 and tick 1 resolves to tick 0
        let between = sqrt_price_at_tick(1).unwrap() - U256::ONE;
        assert_eq!(tick_at_sqrt_price(between).unwrap(), 0);
    }

    #[test]
    fn round_trips_across_the_grid() {
        for tick in [MIN_TICK, -250000, -60, -1, 0, 1, 60, 3000, 250000, MAX_TICK - 1] {
            let ratio = sqrt_price_at_tick(tick).unwrap();
            assert_eq!(tick_at_sqrt_price(ratio).unwrap(), tick, "tick {tick}");
        }
    }
}
