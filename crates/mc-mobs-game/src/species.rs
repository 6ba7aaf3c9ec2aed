//! Creature species and their fixed stats.
//!
//! Behavior differences between species live in [`SpeciesTraits`]; the
//! generic movement, targeting and combat code reads these flags instead of
//! branching on the species itself.

use std::fmt;

/// Population category used by the spawn policy and admin commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Animal,
    Monster,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Animal => f.write_str("animal"),
            Category::Monster => f.write_str("monster"),
        }
    }
}

/// When a species chases players it can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggression {
    Never,
    Always,
    /// Only while the angry timer runs (set by being hit).
    WhenAngry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Species {
    Chicken,
    Cow,
    Pig,
    Sheep,
    Zombie,
    Creeper,
    Skeleton,
    Spider,
    PigZombie,
    Enderman,
}

/// Static per-species data.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesTraits {
    pub network_id: u32,
    /// Bedrock identifier, e.g. `"minecraft:zombie"`.
    pub type_id: &'static str,
    pub display_name: &'static str,
    pub category: Category,
    pub max_health: f32,
    /// Walking speed in blocks per tick.
    pub speed: f32,
    /// Walking speed while angry, if the species has an angry state.
    pub angry_speed: Option<f32>,
    pub width: f32,
    pub height: f32,
    /// Melee damage indexed by difficulty (peaceful, easy, normal, hard).
    pub damage: [f32; 4],
    pub aggression: Aggression,
    /// Ignores fire, fire-tick and lava damage.
    pub fire_immune: bool,
    /// Hurt by water contact and teleports away from it.
    pub water_sensitive: bool,
    /// Primes an explosion instead of a melee hit.
    pub explodes: bool,
}

const CHICKEN: SpeciesTraits = SpeciesTraits {
    network_id: 10,
    type_id: "minecraft:chicken",
    display_name: "Chicken",
    category: Category::Animal,
    max_health: 4.0,
    speed: 0.09,
    angry_speed: None,
    width: 0.4,
    height: 0.7,
    damage: [0.0; 4],
    aggression: Aggression::Never,
    fire_immune: false,
    water_sensitive: false,
    explodes: false,
};

const COW: SpeciesTraits = SpeciesTraits {
    network_id: 11,
    type_id: "minecraft:cow",
    display_name: "Cow",
    category: Category::Animal,
    max_health: 10.0,
    speed: 0.1,
    angry_speed: None,
    width: 0.9,
    height: 1.3,
    damage: [0.0; 4],
    aggression: Aggression::Never,
    fire_immune: false,
    water_sensitive: false,
    explodes: false,
};

const PIG: SpeciesTraits = SpeciesTraits {
    network_id: 12,
    type_id: "minecraft:pig",
    display_name: "Pig",
    max_health: 10.0,
    height: 0.9,
    ..COW
};

const SHEEP: SpeciesTraits = SpeciesTraits {
    network_id: 13,
    type_id: "minecraft:sheep",
    display_name: "Sheep",
    max_health: 8.0,
    ..COW
};

const ZOMBIE: SpeciesTraits = SpeciesTraits {
    network_id: 32,
    type_id: "minecraft:zombie",
    display_name: "Zombie",
    category: Category::Monster,
    max_health: 20.0,
    speed: 0.11,
    angry_speed: None,
    width: 0.72,
    height: 1.8,
    damage: [0.0, 3.0, 4.0, 6.0],
    aggression: Aggression::Always,
    fire_immune: false,
    water_sensitive: false,
    explodes: false,
};

const CREEPER: SpeciesTraits = SpeciesTraits {
    network_id: 33,
    type_id: "minecraft:creeper",
    display_name: "Creeper",
    speed: 0.09,
    damage: [0.0; 4],
    explodes: true,
    ..ZOMBIE
};

const SKELETON: SpeciesTraits = SpeciesTraits {
    network_id: 34,
    type_id: "minecraft:skeleton",
    display_name: "Skeleton",
    speed: 0.1,
    width: 0.65,
    damage: [0.0, 2.0, 3.0, 4.0],
    ..ZOMBIE
};

const SPIDER: SpeciesTraits = SpeciesTraits {
    network_id: 35,
    type_id: "minecraft:spider",
    display_name: "Spider",
    max_health: 16.0,
    speed: 0.113,
    width: 1.3,
    height: 1.12,
    damage: [0.0, 2.0, 2.0, 3.0],
    ..ZOMBIE
};

const PIG_ZOMBIE: SpeciesTraits = SpeciesTraits {
    network_id: 36,
    type_id: "minecraft:zombie_pigman",
    display_name: "PigZombie",
    max_health: 22.0,
    speed: 0.115,
    angry_speed: Some(0.132),
    damage: [0.0, 5.0, 9.0, 13.0],
    aggression: Aggression::WhenAngry,
    fire_immune: true,
    ..ZOMBIE
};

const ENDERMAN: SpeciesTraits = SpeciesTraits {
    network_id: 38,
    type_id: "minecraft:enderman",
    display_name: "Enderman",
    max_health: 40.0,
    speed: 0.121,
    height: 2.8,
    damage: [0.0, 4.0, 7.0, 10.0],
    water_sensitive: true,
    ..ZOMBIE
};

/// Natural spawn roster rolled as `[category][slot]`; empty slots spawn nothing.
pub const NATURAL_ROSTER: [[Option<Species>; 6]; 2] = [
    [
        Some(Species::Cow),
        Some(Species::Pig),
        Some(Species::Sheep),
        Some(Species::Chicken),
        None,
        None,
    ],
    [
        Some(Species::Zombie),
        Some(Species::Creeper),
        Some(Species::Skeleton),
        Some(Species::Spider),
        Some(Species::PigZombie),
        Some(Species::Enderman),
    ],
];

impl Species {
    /// Every species, in spawner list order.
    pub const ALL: [Species; 10] = [
        Species::Cow,
        Species::Pig,
        Species::Sheep,
        Species::Chicken,
        Species::Zombie,
        Species::Creeper,
        Species::Skeleton,
        Species::Spider,
        Species::PigZombie,
        Species::Enderman,
    ];

    pub fn traits(self) -> &'static SpeciesTraits {
        match self {
            Species::Chicken => &CHICKEN,
            Species::Cow => &COW,
            Species::Pig => &PIG,
            Species::Sheep => &SHEEP,
            Species::Zombie => &ZOMBIE,
            Species::Creeper => &CREEPER,
            Species::Skeleton => &SKELETON,
            Species::Spider => &SPIDER,
            Species::PigZombie => &PIG_ZOMBIE,
            Species::Enderman => &ENDERMAN,
        }
    }

    pub fn name(self) -> &'static str {
        self.traits().display_name
    }

    pub fn category(self) -> Category {
        self.traits().category
    }

    pub fn from_network_id(id: u32) -> Option<Species> {
        Self::ALL
            .into_iter()
            .find(|s| s.traits().network_id == id)
    }

    /// Resolve a display name, Bedrock identifier or network id.
    ///
    /// Names are matched case-insensitively.
    pub fn parse(input: &str) -> Option<Species> {
        let input = input.trim();
        if let Ok(id) = input.parse::<u32>() {
            return Self::from_network_id(id);
        }
        Self::ALL.into_iter().find(|s| {
            let t = s.traits();
            t.display_name.eq_ignore_ascii_case(input) || t.type_id.eq_ignore_ascii_case(input)
        })
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
