//! Line-oriented driver for [`SplaySequence`].
//!
//! Input is `n`, then `n` integers, then `q`, then `q` requests of the form
//!
//! | request   | effect                                   |
//! |-----------|------------------------------------------|
//! | `1 l r`   | print `sum(l..=r)`                       |
//! | `2 x pos` | `insert(pos, x)`                         |
//! | `3 pos`   | `remove(pos)`                            |
//! | `4 x l r` | `assign(l..=r, x)`                       |
//! | `5 x l r` | `add(l..=r, x)`                          |
//! | `6 l r`   | `next_permutation(l..=r)`                |
//! | `7 l r`   | `prev_permutation(l..=r)`                |
//!
//! Positions are 0-based. Once every request is answered the final sequence
//! is printed on one line.

pub mod logger;

use std::fmt;
use std::io::{self, BufRead, Write};

use proconio::input;
use proconio::source::once::OnceSource;
use splay_sequence::SplaySequence;

#[derive(Debug)]
pub enum Error {
    UnknownOpcode(u8),
    Sequence(splay_sequence::Error),
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOpcode(op) => write!(f, "unknown request type {op}"),
            Self::Sequence(err) => write!(f, "rejected request: {err}"),
            Self::Io(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownOpcode(_) => None,
            Self::Sequence(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<splay_sequence::Error> for Error {
    fn from(err: splay_sequence::Error) -> Self {
        Self::Sequence(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Query {
    Sum { l: usize, r: usize },
    Insert { index: usize, value: i64 },
    Remove { index: usize },
    Assign { l: usize, r: usize, value: i64 },
    Add { l: usize, r: usize, delta: i64 },
    NextPermutation { l: usize, r: usize },
    PrevPermutation { l: usize, r: usize },
}

impl Query {
    /// Reads one request. Opcodes outside `1..=7` are reported as
    /// [`Error::UnknownOpcode`]; a token that does not parse, or input that
    /// ends mid-request, aborts inside `proconio` like every other read.
    pub fn read<R: BufRead>(source: &mut OnceSource<R>) -> Result<Self, Error> {
        input! { from &mut *source, op: u8 }
        let query = match op {
            1 => {
                input! { from &mut *source, l: usize, r: usize }
                Query::Sum { l, r }
            }
            2 => {
                input! { from &mut *source, value: i64, index: usize }
                Query::Insert { index, value }
            }
            3 => {
                input! { from &mut *source, index: usize }
                Query::Remove { index }
            }
            4 => {
                input! { from &mut *source, value: i64, l: usize, r: usize }
                Query::Assign { l, r, value }
            }
            5 => {
                input! { from &mut *source, delta: i64, l: usize, r: usize }
                Query::Add { l, r, delta }
            }
            6 => {
                input! { from &mut *source, l: usize, r: usize }
                Query::NextPermutation { l, r }
            }
            7 => {
                input! { from &mut *source, l: usize, r: usize }
                Query::PrevPermutation { l, r }
            }
            _ => return Err(Error::UnknownOpcode(op)),
        };
        Ok(query)
    }

    /// Runs the request against `seq`, writing an answer line if it has one.
    pub fn apply<W: Write>(self, seq: &mut SplaySequence, out: &mut W) -> Result<(), Error> {
        match self {
            Query::Sum { l, r } => writeln!(out, "{}", seq.sum(l..=r)?)?,
            Query::Insert { index, value } => seq.insert(index, value)?,
            Query::Remove { index } => {
                seq.remove(index)?;
            }
            Query::Assign { l, r, value } => seq.assign(l..=r, value)?,
            Query::Add { l, r, delta } => seq.add(l..=r, delta)?,
            Query::NextPermutation { l, r } => seq.next_permutation(l..=r)?,
            Query::PrevPermutation { l, r } => seq.prev_permutation(l..=r)?,
        }
        Ok(())
    }
}

/// Answers a whole request file. Malformed input panics in `proconio`;
/// only rejected requests and write failures come back as [`Error`].
pub fn run<R: BufRead, W: Write>(source: &mut OnceSource<R>, out: &mut W) -> Result<(), Error> {
    input! {
        from &mut *source,
        n: usize,
        values: [i64; n],
        q: usize,
    }
    let mut seq = SplaySequence::from(values);
    log::info!("loaded {n} values, answering {q} requests");

    for i in 0..q {
        let query = Query::read(source)?;
        log::trace!("request {i}: {query:?}");
        query.apply(&mut seq, out)?;
    }

    let mut sep = "";
    for value in seq.to_vec() {
        write!(out, "{sep}{value}")?;
        sep = " ";
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Error, Query, run};
    use proconio::source::once::OnceSource;
    use splay_sequence::SplaySequence;

    fn run_str(input: &str) -> Result<String, Error> {
        let mut source = OnceSource::from(input);
        let mut out = Vec::new();
        run(&mut source, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn answers_sums_and_prints_sequence() {
        let input = "3\n5 5 5\n4\n5 3 0 2\n1 0 2\n4 100 1 1\n1 0 2\n";
        assert_eq!(run_str(input).unwrap(), "24\n116\n8 100 8\n");
    }

    #[test]
    fn insert_remove_and_permutations() {
        let input = "3\n1 2 3\n5\n2 9 3\n3 0\n6 0 2\n7 1 3\n6 0 3\n";
        // The last request addresses 1..=3 after the sequence shrank to three
        // elements.
        match run_str(input) {
            Err(Error::Sequence(splay_sequence::Error::Range { start: 1, end: 4, len: 3 })) => {}
            other => panic!("unexpected result {other:?}"),
        }

        let input = "3\n1 2 3\n6\n2 9 3\n3 0\n6 0 2\n7 0 2\n6 0 2\n6 1 2\n";
        assert_eq!(run_str(input).unwrap(), "2 3 9\n");
    }

    #[test]
    fn rejects_unknown_opcodes() {
        let input = "1\n7\n1\n9 0 0\n";
        assert!(matches!(run_str(input), Err(Error::UnknownOpcode(9))));
    }

    #[test]
    fn reads_each_request_shape() {
        let mut source = OnceSource::from("1 0 2 2 7 4 3 4 4 -1 0 1 5 2 0 0 6 1 2 7 0 1");
        let expected = [
            Query::Sum { l: 0, r: 2 },
            Query::Insert { index: 4, value: 7 },
            Query::Remove { index: 4 },
            Query::Assign { l: 0, r: 1, value: -1 },
            Query::Add { l: 0, r: 0, delta: 2 },
            Query::NextPermutation { l: 1, r: 2 },
            Query::PrevPermutation { l: 0, r: 1 },
        ];
        for want in expected {
            assert_eq!(Query::read(&mut source).unwrap(), want);
        }
    }

    #[test]
    #[should_panic(expected = "failed to parse")]
    fn malformed_token_aborts() {
        let mut source = OnceSource::from("1 zero 2");
        let _ = Query::read(&mut source);
    }

    #[test]
    fn opcode_zero_is_unknown() {
        let mut source = OnceSource::from("0 1 2");
        assert!(matches!(Query::read(&mut source), Err(Error::UnknownOpcode(0))));
    }

    #[test]
    fn apply_writes_only_for_sums() {
        let mut seq = SplaySequence::from_slice(&[1, 2, 3]);
        let mut out = Vec::new();
        Query::Add { l: 0, r: 2, delta: 1 }
            .apply(&mut seq, &mut out)
            .unwrap();
        assert!(out.is_empty());
        Query::Sum { l: 1, r: 2 }.apply(&mut seq, &mut out).unwrap();
        assert_eq!(out, b"7\n");
    }
}
