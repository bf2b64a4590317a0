//! Enumeration of repeat-free guesses over a palette

use super::{Colour, Palette};
use itertools::Itertools;

/// Every ordered selection of `columns` distinct colours from the palette
pub fn all_guesses(palette: &Palette, columns: usize) -> impl Iterator<Item = Vec<Colour>> + '_ {
    palette.colours().iter().cloned().permutations(columns)
}

/// Number of guesses `all_guesses` yields: palette_len! / (palette_len - columns)!
pub fn guess_space_size(palette_len: usize, columns: usize) -> u128 {
    if columns > palette_len {
        return 0;
    }
    ((palette_len - columns + 1)..=palette_len).fold(1u128, |acc, n| acc.saturating_mul(n as u128))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_count_matches_enumeration() {
        let palette = Palette::new(["purple", "red", "green", "yellow", "teal"]).unwrap();
        let guesses: Vec<_> = all_guesses(&palette, 3).collect();

        assert_eq!(guesses.len() as u128, guess_space_size(5, 3));
        assert_eq!(guesses.len(), 60);
        assert!(guesses.iter().all(|g| g.iter().all_unique()));
    }

    #[test]
    fn test_guess_space_edges() {
        assert_eq!(guess_space_size(4, 4), 24);
        assert_eq!(guess_space_size(3, 4), 0);
        assert_eq!(guess_space_size(6, 0), 1);
    }
}
