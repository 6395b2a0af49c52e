//! Prime sizing for table capacities.
//!
//! Double hashing visits every slot only when the step is coprime to the
//! capacity, so capacities are always prime.

/// Trial-division primality test. 0 and 1 are not prime.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut d = 5usize;
    while d.saturating_mul(d) <= n {
        if n % d == 0 || n % (d + 2) == 0 {
            return false;
        }
        d += 6;
    }
    true
}

/// Smallest prime `>= n`.
pub fn next_prime(n: usize) -> usize {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values() {
        let primes: Vec<usize> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn squares_of_primes_are_composite() {
        for p in [5usize, 7, 11, 13, 53, 97] {
            assert!(!is_prime(p * p), "{} is not prime", p * p);
        }
    }

    #[test]
    fn next_prime_is_identity_on_primes() {
        assert_eq!(next_prime(53), 53);
        assert_eq!(next_prime(257), 257);
    }

    #[test]
    fn next_prime_rounds_up() {
        assert_eq!(next_prime(0), 2);
        assert_eq!(next_prime(1), 2);
        assert_eq!(next_prime(54), 59);
        assert_eq!(next_prime(106), 107);
        assert_eq!(next_prime(214), 223);
    }
}
