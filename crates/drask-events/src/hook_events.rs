use serde::{Deserialize, Serialize};

use crate::hooks::Hook;
use crate::object::ObjectRef;

/// Canonical argument value forwarded into a script callback.
///
/// One variant per host type the engine is willing to hand to the runtime;
/// the runtime side owns the single mapping from each variant to its Lua
/// value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HookArg {
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u32),
    Float(f64),
    Str(String),
    Object(ObjectRef),
}

impl From<bool> for HookArg {
    fn from(value: bool) -> Self {
        HookArg::Bool(value)
    }
}

impl From<i64> for HookArg {
    fn from(value: i64) -> Self {
        HookArg::Int(value)
    }
}

impl From<u32> for HookArg {
    fn from(value: u32) -> Self {
        HookArg::Uint(value)
    }
}

impl From<f64> for HookArg {
    fn from(value: f64) -> Self {
        HookArg::Float(value)
    }
}

impl From<&str> for HookArg {
    fn from(value: &str) -> Self {
        HookArg::Str(value.to_string())
    }
}

impl From<String> for HookArg {
    fn from(value: String) -> Self {
        HookArg::Str(value)
    }
}

impl From<ObjectRef> for HookArg {
    fn from(value: ObjectRef) -> Self {
        HookArg::Object(value)
    }
}

impl From<Option<ObjectRef>> for HookArg {
    fn from(value: Option<ObjectRef>) -> Self {
        value.map_or(HookArg::Nil, HookArg::Object)
    }
}

/// One host event occurrence, tagged with its hook's payload.
///
/// Variants mirror the host callbacks raising them; field order is the order
/// script callbacks receive the arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HookEvent {
    AccountFailedLogin {
        account_id: u32,
    },
    AccountLogin {
        account_id: u32,
    },
    CreatureAddWorld {
        creature: ObjectRef,
    },
    CreatureGossipHello {
        player: ObjectRef,
        creature: ObjectRef,
    },
    CreatureGossipSelect {
        player: ObjectRef,
        creature: ObjectRef,
        sender: u32,
        action: u32,
    },
    CreatureRemoveWorld {
        creature: ObjectRef,
    },
    GameObjectAddWorld {
        object: ObjectRef,
    },
    GameObjectGossipHello {
        player: ObjectRef,
        object: ObjectRef,
    },
    GameObjectGossipSelect {
        player: ObjectRef,
        object: ObjectRef,
        sender: u32,
        action: u32,
    },
    GameObjectRemoveWorld {
        object: ObjectRef,
    },
    PlayerDuelEnd {
        winner: ObjectRef,
        loser: ObjectRef,
    },
    PlayerDuelRequest {
        target: ObjectRef,
        challenger: ObjectRef,
    },
    PlayerDuelStart {
        player1: ObjectRef,
        player2: ObjectRef,
    },
    PlayerGiveXp {
        player: ObjectRef,
        amount: u32,
        victim: Option<ObjectRef>,
        source: u8,
    },
    PlayerJustDied {
        player: ObjectRef,
    },
    PlayerLevelChanged {
        player: ObjectRef,
        old_level: u8,
    },
    PlayerLogin {
        player: ObjectRef,
    },
    PlayerLogout {
        player: ObjectRef,
    },
    PlayerMoneyChanged {
        player: ObjectRef,
        amount: i64,
    },
    PlayerPvpKill {
        killer: ObjectRef,
        killed: ObjectRef,
    },
}

impl HookEvent {
    /// The hook this event dispatches on.
    pub fn hook(&self) -> Hook {
        match self {
            HookEvent::AccountFailedLogin { .. } => Hook::AccountFailedLogin,
            HookEvent::AccountLogin { .. } => Hook::AccountLogin,
            HookEvent::CreatureAddWorld { .. } => Hook::CreatureAddWorld,
            HookEvent::CreatureGossipHello { .. } => Hook::CreatureGossipHello,
            HookEvent::CreatureGossipSelect { .. } => Hook::CreatureGossipSelect,
            HookEvent::CreatureRemoveWorld { .. } => Hook::CreatureRemoveWorld,
            HookEvent::GameObjectAddWorld { .. } => Hook::GameObjectAddWorld,
            HookEvent::GameObjectGossipHello { .. } => Hook::GameObjectGossipHello,
            HookEvent::GameObjectGossipSelect { .. } => Hook::GameObjectGossipSelect,
            HookEvent::GameObjectRemoveWorld { .. } => Hook::GameObjectRemoveWorld,
            HookEvent::PlayerDuelEnd { .. } => Hook::PlayerDuelEnd,
            HookEvent::PlayerDuelRequest { .. } => Hook::PlayerDuelRequest,
            HookEvent::PlayerDuelStart { .. } => Hook::PlayerDuelStart,
            HookEvent::PlayerGiveXp { .. } => Hook::PlayerGiveXp,
            HookEvent::PlayerJustDied { .. } => Hook::PlayerJustDied,
            HookEvent::PlayerLevelChanged { .. } => Hook::PlayerLevelChanged,
            HookEvent::PlayerLogin { .. } => Hook::PlayerLogin,
            HookEvent::PlayerLogout { .. } => Hook::PlayerLogout,
            HookEvent::PlayerMoneyChanged { .. } => Hook::PlayerMoneyChanged,
            HookEvent::PlayerPvpKill { .. } => Hook::PlayerPvpKill,
        }
    }

    /// Flatten the payload into the canonical argument list, in the order
    /// callbacks receive the values.
    pub fn args(&self) -> Vec<HookArg> {
        match self {
            HookEvent::AccountFailedLogin { account_id }
            | HookEvent::AccountLogin { account_id } => vec![(*account_id).into()],
            HookEvent::CreatureAddWorld { creature }
            | HookEvent::CreatureRemoveWorld { creature } => vec![creature.clone().into()],
            HookEvent::CreatureGossipHello { player, creature } => {
                vec![player.clone().into(), creature.clone().into()]
            }
            HookEvent::CreatureGossipSelect {
                player,
                creature,
                sender,
                action,
            } => vec![
                player.clone().into(),
                creature.clone().into(),
                (*sender).into(),
                (*action).into(),
            ],
            HookEvent::GameObjectAddWorld { object }
            | HookEvent::GameObjectRemoveWorld { object } => vec![object.clone().into()],
            HookEvent::GameObjectGossipHello { player, object } => {
                vec![player.clone().into(), object.clone().into()]
            }
            HookEvent::GameObjectGossipSelect {
                player,
                object,
                sender,
                action,
            } => vec![
                player.clone().into(),
                object.clone().into(),
                (*sender).into(),
                (*action).into(),
            ],
            HookEvent::PlayerDuelEnd { winner, loser } => {
                vec![winner.clone().into(), loser.clone().into()]
            }
            HookEvent::PlayerDuelRequest { target, challenger } => {
                vec![target.clone().into(), challenger.clone().into()]
            }
            HookEvent::PlayerDuelStart { player1, player2 } => {
                vec![player1.clone().into(), player2.clone().into()]
            }
            HookEvent::PlayerGiveXp {
                player,
                amount,
                victim,
                source,
            } => vec![
                player.clone().into(),
                (*amount).into(),
                victim.clone().into(),
                u32::from(*source).into(),
            ],
            HookEvent::PlayerJustDied { player }
            | HookEvent::PlayerLogin { player }
            | HookEvent::PlayerLogout { player } => vec![player.clone().into()],
            HookEvent::PlayerLevelChanged { player, old_level } => {
                vec![player.clone().into(), u32::from(*old_level).into()]
            }
            HookEvent::PlayerMoneyChanged { player, amount } => {
                vec![player.clone().into(), (*amount).into()]
            }
            HookEvent::PlayerPvpKill { killer, killed } => {
                vec![killer.clone().into(), killed.clone().into()]
            }
        }
    }
}
