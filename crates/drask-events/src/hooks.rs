use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Numeric scope narrowing a hook to one template entry.
pub type EntryId = u32;

/// Entry id shared by callbacks that fire for every entry of their hook.
pub const GLOBAL_ENTRY: EntryId = 0;

/// One kind of host-side event scripts can attach to.
///
/// The set is closed at compile time. Event names resolve through `FromStr`
/// with an exact, case-sensitive match (`"PLAYER_LOGIN"`,
/// `"CREATURE_ADD_WORLD"`, ...); a name that does not resolve never produces
/// a hook.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Hook {
    // Account
    AccountFailedLogin,
    AccountLogin,

    // Creature
    CreatureAddWorld,
    CreatureGossipHello,
    CreatureGossipSelect,
    CreatureRemoveWorld,

    // GameObject. The explicit spellings keep the single-word prefix these
    // names have always had on the script side.
    #[strum(serialize = "GAMEOBJECT_ADD_WORLD")]
    GameObjectAddWorld,
    #[strum(serialize = "GAMEOBJECT_GOSSIP_HELLO")]
    GameObjectGossipHello,
    #[strum(serialize = "GAMEOBJECT_GOSSIP_SELECT")]
    GameObjectGossipSelect,
    #[strum(serialize = "GAMEOBJECT_REMOVE_WORLD")]
    GameObjectRemoveWorld,

    // Player
    PlayerDuelEnd,
    PlayerDuelRequest,
    PlayerDuelStart,
    PlayerGiveXp,
    PlayerJustDied,
    PlayerLevelChanged,
    PlayerLogin,
    PlayerLogout,
    PlayerMoneyChanged,
    PlayerPvpKill,
}

impl Hook {
    /// Resolve an event name to its hook, `None` for unknown names.
    pub fn resolve(name: &str) -> Option<Hook> {
        name.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_resolves_known_names() {
        assert_eq!(Hook::resolve("PLAYER_LOGIN"), Some(Hook::PlayerLogin));
        assert_eq!(
            Hook::resolve("CREATURE_ADD_WORLD"),
            Some(Hook::CreatureAddWorld)
        );
        assert_eq!(
            Hook::resolve("ACCOUNT_FAILED_LOGIN"),
            Some(Hook::AccountFailedLogin)
        );
    }

    #[test]
    fn test_gameobject_names_resolve_to_gameobject_hooks() {
        assert_eq!(
            Hook::resolve("GAMEOBJECT_GOSSIP_SELECT"),
            Some(Hook::GameObjectGossipSelect)
        );
        assert_eq!(
            Hook::resolve("GAMEOBJECT_REMOVE_WORLD"),
            Some(Hook::GameObjectRemoveWorld)
        );
    }

    #[test]
    fn test_rejects_unknown_and_misspelled_names() {
        assert_eq!(Hook::resolve("PLAYER_TELEPORTED"), None);
        assert_eq!(Hook::resolve("player_login"), None);
        assert_eq!(Hook::resolve(" PLAYER_LOGIN"), None);
        assert_eq!(Hook::resolve(""), None);
    }

    #[test]
    fn test_every_hook_round_trips_through_its_name() {
        for hook in Hook::iter() {
            assert_eq!(Hook::resolve(&hook.to_string()), Some(hook));
        }
    }
}
