/// Lexicographic iterator over every 5-element index subset of `0..n`.
///
/// `n` below 5 yields nothing; `n == 5` yields once; `n == 7` yields C(7,5) = 21.
pub(crate) struct FiveCardCombinations {
    n: usize,
    indices: [usize; 5],
    done: bool,
}

impl FiveCardCombinations {
    pub fn new(n: usize) -> Self {
        Self { n, indices: [0, 1, 2, 3, 4], done: n < 5 }
    }
}

impl Iterator for FiveCardCombinations {
    type Item = [usize; 5];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.indices;

        // Rightmost index that still has room to move.
        let mut i = 4;
        loop {
            if self.indices[i] < self.n - (5 - i) {
                self.indices[i] += 1;
                for j in (i + 1)..5 {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
        }
        Some(result)
    }
}
