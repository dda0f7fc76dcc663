use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A point position outside the sequence.
    IndexOutOfRange { index: usize, len: usize },
    /// An empty range, or one reaching past the end. `end` is exclusive.
    Range { start: usize, end: usize, len: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for sequence of length {len}")
            }
            Self::Range { start, end, len } => write!(
                f,
                "range {start}..{end} is empty or out of bounds for sequence of length {len}"
            ),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn display_names_the_bounds() {
        let err = Error::IndexOutOfRange { index: 4, len: 3 };
        assert_eq!(
            err.to_string(),
            "index 4 out of range for sequence of length 3"
        );
        let err = Error::Range {
            start: 2,
            end: 1,
            len: 5,
        };
        assert!(err.to_string().starts_with("range 2..1"));
    }
}
