//! Modular combinatorics for sizing order-statistics evictions.
//!
//! Counts how many insertion orders of a code sequence rebuild the same
//! binary search tree. All arithmetic is modulo [`MODULUS`], with binomial
//! coefficients computed from factorials and Fermat inverses.

/// Prime modulus for every count in this module.
pub const MODULUS: u64 = 1_000_000_007;

/// `base^exp mod modulus` by square-and-multiply.
pub fn pow_mod(base: u64, mut exp: u64, modulus: u64) -> u64 {
    let mut result = 1 % modulus;
    let mut base = base % modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % modulus;
        }
        base = base * base % modulus;
        exp >>= 1;
    }
    result
}

/// Inverse of `n` modulo the prime `p` (Fermat's little theorem).
pub fn mod_inverse(n: u64, p: u64) -> u64 {
    pow_mod(n, p - 2, p)
}

/// Factorials `0!..=n!` modulo [`MODULUS`].
#[derive(Debug, Clone)]
pub struct Factorials {
    table: Vec<u64>,
}

impl Factorials {
    pub fn up_to(n: usize) -> Self {
        let mut table = Vec::with_capacity(n + 1);
        table.push(1);
        for i in 1..=n as u64 {
            let prev = table[table.len() - 1];
            table.push(prev * i % MODULUS);
        }
        Self { table }
    }

    /// `C(n, r) mod MODULUS`; 0 when `r > n`.
    ///
    /// `n` must not exceed the table bound.
    pub fn binomial(&self, n: usize, r: usize) -> u64 {
        if r > n {
            return 0;
        }
        if r == 0 {
            return 1;
        }
        let numerator = self.table[n];
        let denominator = self.table[r] * self.table[n - r] % MODULUS;
        numerator * mod_inverse(denominator, MODULUS) % MODULUS
    }
}

/// Number of insertion orders producing the BST implied by `seq`.
///
/// `seq[0]` is the root; smaller codes form the left subtree and codes
/// greater or equal form the right subtree, recursively. The count is the
/// product over every subtree of `C(size - 1, left size)`.
pub fn insertion_orders(seq: &[u32]) -> u64 {
    let factorials = Factorials::up_to(seq.len());
    let mut ways = 1;
    let mut pending = vec![seq.to_vec()];

    while let Some(subtree) = pending.pop() {
        let Some((&root, rest)) = subtree.split_first() else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }
        let (left, right): (Vec<u32>, Vec<u32>) = rest.iter().partition(|&&code| code < root);
        ways = ways * factorials.binomial(rest.len(), left.len()) % MODULUS;
        pending.push(left);
        pending.push(right);
    }
    ways
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pow_mod() {
        assert_eq!(pow_mod(2, 10, MODULUS), 1024);
        assert_eq!(pow_mod(3, 0, MODULUS), 1);
        assert_eq!(pow_mod(7, 1, 5), 2);
    }

    #[test]
    fn test_mod_inverse() {
        for n in [1u64, 2, 3, 12345, MODULUS - 1] {
            assert_eq!(n * mod_inverse(n, MODULUS) % MODULUS, 1);
        }
    }

    #[test]
    fn test_binomial() {
        let f = Factorials::up_to(10);
        assert_eq!(f.binomial(5, 2), 10);
        assert_eq!(f.binomial(10, 0), 1);
        assert_eq!(f.binomial(10, 10), 1);
        assert_eq!(f.binomial(3, 4), 0);
    }

    #[test]
    fn test_binomial_large_stays_reduced() {
        let f = Factorials::up_to(1000);
        let c = f.binomial(1000, 500);
        assert!(c < MODULUS);
        // Pascal's rule holds modulo the prime
        assert_eq!(c, (f.binomial(999, 499) + f.binomial(999, 500)) % MODULUS);
    }

    #[test]
    fn test_insertion_orders() {
        assert_eq!(insertion_orders(&[]), 1);
        assert_eq!(insertion_orders(&[4]), 1);
        // 2 can go before or after 3, 1 is fixed
        assert_eq!(insertion_orders(&[2, 1, 3]), 2);
        assert_eq!(insertion_orders(&[3, 4, 5, 1, 2]), 6);
        // chain: only one order
        assert_eq!(insertion_orders(&[1, 2, 3, 4]), 1);
        // duplicates go right
        assert_eq!(insertion_orders(&[5, 3, 8, 3]), 3);
    }

    #[test]
    fn test_insertion_orders_long_chain() {
        let chain: Vec<u32> = (0..20_000).collect();
        assert_eq!(insertion_orders(&chain), 1);

        // root with a long chain on each side: C(2n, n) interleavings
        let n = 5_000u32;
        let mut seq = vec![n];
        seq.extend((0..n).rev());
        seq.extend(n + 1..=2 * n);
        let f = Factorials::up_to(seq.len());
        assert_eq!(insertion_orders(&seq), f.binomial(2 * n as usize, n as usize));
    }
}
