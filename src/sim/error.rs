//! Simulation error types

/// Errors from sampling a [`RandomDistribution`](super::RandomDistribution).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Lower bound is greater than the upper bound.
    #[error("invalid sample range: {low} > {high}")]
    Inverted { low: i32, high: i32 },
}

/// Errors that can occur while generating terrain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// The requested pads cannot be spaced out on the available segments.
    #[error("cannot place {landing_pad_count} landing pads on {segment_count} segments")]
    PadPlacement {
        segment_count: usize,
        landing_pad_count: usize,
    },

    /// Generation parameters the algorithm cannot work with.
    #[error("invalid terrain parameters: {0}")]
    InvalidConfig(String),

    /// A sampler was asked for an empty range.
    #[error(transparent)]
    Sampling(#[from] RangeError),
}

/// Errors that can occur while setting up a mission.
#[derive(Debug, thiserror::Error)]
pub enum MissionError {
    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// The first terrain could not be generated.
    #[error(transparent)]
    Terrain(#[from] TerrainError),
}
