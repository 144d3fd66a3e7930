/// Greatest common divisor by Euclid's algorithm.
///
/// `gcd(m, 0) == m`, so `gcd(0, 0) == 0`; callers dividing by the result
/// must handle that case. Negative inputs are not supported.
pub fn gcd(mut m: i64, mut n: i64) -> i64 {
    while n != 0 {
        (m, n) = (n, m.wrapping_rem(n));
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcd_known_values() {
        assert_eq!(gcd(1920, 1080), 120);
        assert_eq!(gcd(1280, 720), 80);
        assert_eq!(gcd(1200, 600), 600);
    }

    #[test]
    fn test_gcd_zero() {
        assert_eq!(gcd(42, 0), 42);
        assert_eq!(gcd(0, 42), 42);
        assert_eq!(gcd(0, 0), 0);
    }

    #[test]
    fn test_gcd_argument_order() {
        assert_eq!(gcd(1080, 1920), 120);
        assert_eq!(gcd(17, 5), 1);
    }
}
