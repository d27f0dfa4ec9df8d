use serde::{Deserialize, Serialize};

/// Kind of world object handed to script callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Player,
    Creature,
    GameObject,
}

/// Lightweight handle to a world object.
///
/// The engine forwards these into callbacks as opaque values; the full game
/// classes stay on the host side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub kind: ObjectKind,
    /// Globally unique object id.
    pub guid: u64,
    /// Template entry the object was spawned from (0 for players).
    pub entry: u32,
    pub name: String,
}

impl ObjectRef {
    pub fn player(guid: u64, name: impl Into<String>) -> Self {
        Self {
            kind: ObjectKind::Player,
            guid,
            entry: 0,
            name: name.into(),
        }
    }

    pub fn creature(guid: u64, entry: u32, name: impl Into<String>) -> Self {
        Self {
            kind: ObjectKind::Creature,
            guid,
            entry,
            name: name.into(),
        }
    }

    pub fn game_object(guid: u64, entry: u32, name: impl Into<String>) -> Self {
        Self {
            kind: ObjectKind::GameObject,
            guid,
            entry,
            name: name.into(),
        }
    }
}
