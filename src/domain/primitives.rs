//! Domain primitives: record identifiers and player roles.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                $name(id)
            }

            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Registered user (squad owner or league creator).
    UserId
);
id_type!(
    /// Fantasy league grouping teams and matches.
    LeagueId
);
id_type!(
    /// Real-world team.
    TeamId
);
id_type!(
    /// Real-world player.
    PlayerId
);
id_type!(
    /// Scheduled match between two teams.
    MatchId
);
id_type!(
    /// A player's participation in one match; performances are keyed by it.
    MatchPlayerId
);
id_type!(
    /// A persisted fantasy squad.
    SquadId
);

/// Playing role of a cricketer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Wicket-keeper.
    #[serde(rename = "WK")]
    WicketKeeper,
    /// Batter.
    #[serde(rename = "BAT")]
    Batter,
    /// All-rounder.
    #[serde(rename = "ALL")]
    AllRounder,
    /// Bowler.
    #[serde(rename = "BOWL")]
    Bowler,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::WicketKeeper,
        Role::Batter,
        Role::AllRounder,
        Role::Bowler,
    ];

    /// Short code used in storage and on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Role::WicketKeeper => "WK",
            Role::Batter => "BAT",
            Role::AllRounder => "ALL",
            Role::Bowler => "BOWL",
        }
    }

    /// Plural label used in rejection messages.
    pub fn plural_label(&self) -> &'static str {
        match self {
            Role::WicketKeeper => "wicket keepers",
            Role::Batter => "batters",
            Role::AllRounder => "all-rounders",
            Role::Bowler => "bowlers",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown player role: {0}")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WK" => Ok(Role::WicketKeeper),
            "BAT" => Ok(Role::Batter),
            "ALL" => Ok(Role::AllRounder),
            "BOWL" => Ok(Role::Bowler),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

/// Per-role head count over a set of players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleCounts {
    pub wicket_keepers: usize,
    pub batters: usize,
    pub all_rounders: usize,
    pub bowlers: usize,
}

impl RoleCounts {
    pub fn tally<I: IntoIterator<Item = Role>>(roles: I) -> Self {
        let mut counts = RoleCounts::default();
        for role in roles {
            counts.add(role);
        }
        counts
    }

    pub fn add(&mut self, role: Role) {
        match role {
            Role::WicketKeeper => self.wicket_keepers += 1,
            Role::Batter => self.batters += 1,
            Role::AllRounder => self.all_rounders += 1,
            Role::Bowler => self.bowlers += 1,
        }
    }

    pub fn get(&self, role: Role) -> usize {
        match role {
            Role::WicketKeeper => self.wicket_keepers,
            Role::Batter => self.batters,
            Role::AllRounder => self.all_rounders,
            Role::Bowler => self.bowlers,
        }
    }
}
