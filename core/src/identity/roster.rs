//! Roster decoding from the terminal `epilogue` record.

use serde::Deserialize;
use thiserror::Error;

use crate::combat_log::Epilogue;

/// External (Steam) account id of a player.
pub type SteamId = u64;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("epilogue has no roster payload")]
    MissingPayload,

    #[error("epilogue roster payload is malformed")]
    InvalidPayload(#[source] serde_json::Error),
}

/// Extracts the ordered list of external player ids from the epilogue.
///
/// The payload encoding belongs to whatever produced the event log, so the
/// engine only depends on this hook.
pub trait RosterDecoder: Send + Sync {
    fn decode(&self, epilogue: &Epilogue) -> Result<Vec<SteamId>, RosterError>;
}

/// Decoder for the OpenDota parser output: `key` holds a JSON document with
/// `gameInfo_.dota_.playerInfo_[].steamid_`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenDotaRosterDecoder;

#[derive(Deserialize)]
struct EpiloguePayload {
    #[serde(rename = "gameInfo_")]
    game_info: GameInfo,
}

#[derive(Deserialize)]
struct GameInfo {
    #[serde(rename = "dota_")]
    dota: DotaInfo,
}

#[derive(Deserialize)]
struct DotaInfo {
    #[serde(rename = "playerInfo_")]
    player_info: Vec<PlayerInfo>,
}

#[derive(Deserialize)]
struct PlayerInfo {
    #[serde(rename = "steamid_")]
    steam_id: SteamId,
}

impl RosterDecoder for OpenDotaRosterDecoder {
    fn decode(&self, epilogue: &Epilogue) -> Result<Vec<SteamId>, RosterError> {
        let key = epilogue.key.as_deref().ok_or(RosterError::MissingPayload)?;
        let payload: EpiloguePayload =
            serde_json::from_str(key).map_err(RosterError::InvalidPayload)?;
        Ok(payload
            .game_info
            .dota
            .player_info
            .into_iter()
            .map(|p| p.steam_id)
            .collect())
    }
}

/// Builds an epilogue `key` in the OpenDota layout. Handy for synthetic logs.
pub fn encode_opendota_roster(steam_ids: &[SteamId]) -> String {
    let players: Vec<serde_json::Value> = steam_ids
        .iter()
        .map(|id| serde_json::json!({ "steamid_": id }))
        .collect();
    serde_json::json!({ "gameInfo_": { "dota_": { "playerInfo_": players } } }).to_string()
}
