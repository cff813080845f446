use soroban_sdk::{Env, U256};

/// Multiply and divide with 256-bit intermediate precision (rounds down)
/// Returns (a * b) / denominator, or None for negative inputs, a zero
/// denominator, or a result that doesn't fit in i128
pub fn mul_div(env: &Env, a: i128, b: i128, denominator: i128) -> Option<i128> {
    if a < 0 || b < 0 || denominator <= 0 {
        return None;
    }

    let product = U256::from_u128(env, a as u128).mul(&U256::from_u128(env, b as u128));
    let result = product.div(&U256::from_u128(env, denominator as u128));

    i128_from_u256(env, &result)
}

/// Full-width product of two non-negative amounts
pub fn wide_mul(env: &Env, a: i128, b: i128) -> U256 {
    let a = if a < 0 { 0 } else { a as u128 };
    let b = if b < 0 { 0 } else { b as u128 };
    U256::from_u128(env, a).mul(&U256::from_u128(env, b))
}

fn i128_from_u256(env: &Env, value: &U256) -> Option<i128> {
    if *value > U256::from_u128(env, i128::MAX as u128) {
        return None;
    }
    value.to_u128().map(|v| v as i128)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    #[test]
    fn test_mul_div_basic() {
        let env = Env::default();
        assert_eq!(mul_div(&env, 10, 20, 5), Some(40));
    }

    #[test]
    fn test_mul_div_phantom_overflow() {
        let env = Env::default();
        // a * b overflows i128 but the quotient fits
        let large = 1i128 << 100;
        assert_eq!(mul_div(&env, large, large, large), Some(large));
    }

    #[test]
    fn test_mul_div_rounds_down() {
        let env = Env::default();
        assert_eq!(mul_div(&env, 1, 1, 2), Some(0));
        assert_eq!(mul_div(&env, 3, 1, 2), Some(1));
        assert_eq!(mul_div(&env, 5, 1, 3), Some(1));
    }

    #[test]
    fn test_mul_div_rejects_bad_input() {
        let env = Env::default();
        assert_eq!(mul_div(&env, 10, 20, 0), None);
        assert_eq!(mul_div(&env, -1, 20, 5), None);
        assert_eq!(mul_div(&env, 1, -20, 5), None);
        assert_eq!(mul_div(&env, 1, 20, -5), None);
    }

    #[test]
    fn test_mul_div_result_overflow() {
        let env = Env::default();
        assert_eq!(mul_div(&env, i128::MAX, 2, 1), None);
        assert_eq!(mul_div(&env, i128::MAX, 2, 2), Some(i128::MAX));
    }

    #[test]
    fn test_wide_mul_exceeds_i128() {
        let env = Env::default();
        let big = i128::MAX;
        let product = wide_mul(&env, big, 2);
        assert!(product > U256::from_u128(&env, i128::MAX as u128));
        assert_eq!(wide_mul(&env, 6, 7), U256::from_u32(&env, 42));
    }
}
