pub mod number;

pub use number::{parse_episode_token, EpisodeChange, EpisodeMark, EpisodeNumber, EPISODE_MARKER};
