//! Mastermind board model

pub mod board;
pub mod fixture;
pub mod guesses;
pub mod rules;

pub use board::{BoardDimensions, Colour, FeedbackKind, Palette};
pub use fixture::{create_example_fixtures, load_fixture_from_file, save_fixture_to_file, Fixture};
pub use guesses::{all_guesses, guess_space_size};
pub use rules::FeedbackRules;
