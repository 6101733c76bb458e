use std::path::PathBuf;

use crate::combat_log::{ParseError, ReaderError};
use crate::identity::{IdentityError, RosterError};

/// Where the events of a match come from, for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOrigin {
    Memory,
    File(PathBuf),
}

impl std::fmt::Display for EventOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventOrigin::Memory => write!(f, "<in-memory events>"),
            EventOrigin::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A match that could not be parsed, or a query it can't answer.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("match {match_id} is not parsed: no event log at {path}")]
    ReplayNotFound { match_id: u64, path: PathBuf },

    #[error("match {match_id} is not parsed: failed to read {origin}")]
    Read {
        match_id: u64,
        origin: EventOrigin,
        #[source]
        source: ReaderError,
    },

    #[error("match {match_id} is not parsed: malformed event in {origin}")]
    Parse {
        match_id: u64,
        origin: EventOrigin,
        #[source]
        source: ParseError,
    },

    #[error("match {match_id} is not parsed: {origin} has no events")]
    EmptyStream { match_id: u64, origin: EventOrigin },

    #[error("match {match_id} is not parsed: {origin} has no epilogue")]
    MissingRoster { match_id: u64, origin: EventOrigin },

    #[error("match {match_id} is not parsed: undecodable roster at line {line_number} of {origin}")]
    InvalidRoster {
        match_id: u64,
        origin: EventOrigin,
        line_number: u64,
        #[source]
        source: RosterError,
    },

    #[error(
        "match {match_id} is not parsed: roster lists {roster} players, {slots} slots observed in {origin}"
    )]
    RosterMismatch {
        match_id: u64,
        origin: EventOrigin,
        roster: usize,
        slots: usize,
    },

    #[error("match {match_id} is not parsed: no hero units in {origin}")]
    NoUnits { match_id: u64, origin: EventOrigin },

    #[error("match {match_id} is not parsed: unknown unit {unit} in {origin}")]
    UnknownUnit {
        match_id: u64,
        origin: EventOrigin,
        unit: String,
    },

    #[error("match {match_id} has no player on {hero_name}")]
    PlayerNotFound { match_id: u64, hero_name: String },
}

impl MatchError {
    pub fn match_id(&self) -> u64 {
        match self {
            MatchError::ReplayNotFound { match_id, .. }
            | MatchError::Read { match_id, .. }
            | MatchError::Parse { match_id, .. }
            | MatchError::EmptyStream { match_id, .. }
            | MatchError::MissingRoster { match_id, .. }
            | MatchError::InvalidRoster { match_id, .. }
            | MatchError::RosterMismatch { match_id, .. }
            | MatchError::NoUnits { match_id, .. }
            | MatchError::UnknownUnit { match_id, .. }
            | MatchError::PlayerNotFound { match_id, .. } => *match_id,
        }
    }

    pub(crate) fn from_reader(match_id: u64, origin: EventOrigin, err: ReaderError) -> Self {
        match err {
            ReaderError::Parse { source, .. } => MatchError::Parse {
                match_id,
                origin,
                source,
            },
            source => MatchError::Read {
                match_id,
                origin,
                source,
            },
        }
    }

    pub(crate) fn from_identity(match_id: u64, origin: EventOrigin, err: IdentityError) -> Self {
        match err {
            IdentityError::EmptyStream => MatchError::EmptyStream { match_id, origin },
            IdentityError::NoUnits => MatchError::NoUnits { match_id, origin },
            IdentityError::UnknownUnit { unit } => MatchError::UnknownUnit {
                match_id,
                origin,
                unit,
            },
            IdentityError::MissingRoster => MatchError::MissingRoster { match_id, origin },
            IdentityError::Roster {
                line_number,
                source,
            } => MatchError::InvalidRoster {
                match_id,
                origin,
                line_number,
                source,
            },
            IdentityError::RosterMismatch { roster, slots } => MatchError::RosterMismatch {
                match_id,
                origin,
                roster,
                slots,
            },
        }
    }
}
