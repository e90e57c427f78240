pub type ShowResult<T> = Result<T, ShowError>;

/// Failures that can come out of playlist edits and preset lookups.
///
/// Timing and playback transitions never fail: invalid transitions are no-ops
/// and malformed durations are floored before use.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ShowError {
    #[error("timeline is full ({max} selections)")]
    PlaylistFull { max: usize },

    #[error("no selection at index {index} (playlist has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid color {0:?}")]
    InvalidColor(String),

    #[error("unknown firework category {0:?}")]
    UnknownCategory(String),

    #[error("unknown color preset {0:?}")]
    UnknownColorPreset(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_the_offending_value() {
        assert!(ShowError::PlaylistFull { max: 9 }.to_string().contains('9'));
        let oob = ShowError::IndexOutOfRange { index: 4, len: 2 }.to_string();
        assert!(oob.contains("index 4") && oob.contains("has 2"));
        assert!(ShowError::InvalidColor("#zz".into())
            .to_string()
            .contains("#zz"));
    }
}
