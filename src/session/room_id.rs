//! Room addressing and matchmaking room ids.

use rand::Rng;

pub type RoomId = String;

/// Join-time room id that asks for any waiting opponent instead of a named room.
pub const MATCHMAKING_ROOM: &str = "matchmaking";

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinTarget {
    Named(RoomId),
    Matchmaking,
}

impl JoinTarget {
    pub fn parse(room_id: &str) -> Self {
        let room_id = room_id.trim();
        if room_id == MATCHMAKING_ROOM {
            JoinTarget::Matchmaking
        } else {
            JoinTarget::Named(room_id.to_owned())
        }
    }
}

/// `matchmaking_<unix millis>_<6 base36 chars>`
pub fn generate_matchmaking_room_id() -> RoomId {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!(
        "{MATCHMAKING_ROOM}_{}_{suffix}",
        chrono::Utc::now().timestamp_millis()
    )
}
