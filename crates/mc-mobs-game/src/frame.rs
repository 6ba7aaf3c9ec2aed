//! Working copy of one creature's components.
//!
//! Updates load a frame, mutate it, and store it back, so the logic never
//! holds a borrow into the ECS world while it queries neighbors.

use bevy_ecs::prelude::{Entity, With, World};

use crate::components::{
    Body, Brain, CombatState, Creature, CreatureId, DamageTable, LastUpdateTick, SpeciesTag, Vitals,
    WorldName,
};
use crate::species::{Species, SpeciesTraits};

#[derive(Debug, Clone, PartialEq)]
pub struct CreatureFrame {
    pub id: CreatureId,
    pub species: Species,
    pub world: String,
    pub body: Body,
    pub vitals: Vitals,
    pub brain: Brain,
    pub combat: CombatState,
    pub damage: DamageTable,
    pub last_update: u64,
}

impl CreatureFrame {
    /// Fresh creature of `species` standing at `body`.
    pub fn spawn(id: CreatureId, species: Species, world: &str, body: Body, tick: u64) -> Self {
        let traits = species.traits();
        Self {
            id,
            species,
            world: world.to_string(),
            body,
            vitals: Vitals::new(traits.max_health),
            brain: Brain::default(),
            combat: CombatState::default(),
            damage: DamageTable(traits.damage),
            last_update: tick,
        }
    }

    pub fn load(world: &World, entity: Entity) -> Option<Self> {
        Some(Self {
            id: *world.get::<CreatureId>(entity)?,
            species: world.get::<SpeciesTag>(entity)?.0,
            world: world.get::<WorldName>(entity)?.0.clone(),
            body: *world.get::<Body>(entity)?,
            vitals: *world.get::<Vitals>(entity)?,
            brain: *world.get::<Brain>(entity)?,
            combat: *world.get::<CombatState>(entity)?,
            damage: *world.get::<DamageTable>(entity)?,
            last_update: world.get::<LastUpdateTick>(entity)?.0,
        })
    }

    /// Every creature entity in `world`, sorted by identity.
    pub fn load_all(world: &mut World) -> Vec<(Entity, Self)> {
        let mut query = world.query_filtered::<(
            Entity,
            &CreatureId,
            &SpeciesTag,
            &WorldName,
            &Body,
            &Vitals,
            &Brain,
            &CombatState,
            &DamageTable,
            &LastUpdateTick,
        ), With<Creature>>();
        let mut frames: Vec<(Entity, Self)> = query
            .iter(world)
            .map(
                |(entity, id, species, name, body, vitals, brain, combat, damage, last)| {
                    let frame = Self {
                        id: *id,
                        species: species.0,
                        world: name.0.clone(),
                        body: *body,
                        vitals: *vitals,
                        brain: *brain,
                        combat: *combat,
                        damage: *damage,
                        last_update: last.0,
                    };
                    (entity, frame)
                },
            )
            .collect();
        frames.sort_by_key(|(_, frame)| frame.id);
        frames
    }

    /// Write the mutable parts back. Does nothing if the entity is gone.
    pub fn store(&self, world: &mut World, entity: Entity) {
        if world.get::<Creature>(entity).is_none() {
            return;
        }
        world.entity_mut(entity).insert((
            self.body,
            self.vitals,
            self.brain,
            self.combat,
            LastUpdateTick(self.last_update),
        ));
    }

    /// Spawn a new ECS entity holding this frame.
    pub fn insert_into(&self, world: &mut World) -> Entity {
        world
            .spawn((
                Creature,
                self.id,
                SpeciesTag(self.species),
                WorldName(self.world.clone()),
                self.body,
                self.vitals,
                self.brain,
                self.combat,
                self.damage,
                LastUpdateTick(self.last_update),
            ))
            .id()
    }

    pub fn traits(&self) -> &'static SpeciesTraits {
        self.species.traits()
    }

    pub fn is_alive(&self) -> bool {
        self.vitals.is_alive()
    }

    /// Chases visible players right now.
    pub fn is_hostile_now(&self) -> bool {
        match self.traits().aggression {
            crate::species::Aggression::Never => false,
            crate::species::Aggression::Always => true,
            crate::species::Aggression::WhenAngry => self.combat.is_angry(),
        }
    }

    /// Walking speed, taking the angry state into account.
    pub fn speed(&self) -> f32 {
        let traits = self.traits();
        match traits.angry_speed {
            Some(angry) if self.combat.is_angry() => angry,
            _ => traits.speed,
        }
    }
}
