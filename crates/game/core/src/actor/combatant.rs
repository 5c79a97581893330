//! The combat actor: stats, attacker, defender, and state machine of one unit.

use tracing::{debug, error};

use crate::combat::{Heal, Hit};
use crate::config::CombatConfig;
use crate::observer::{Observers, SubscriptionId};
use crate::stats::{OperatorKind, StatBlock, StatKind};
use crate::types::{Team, UnitId};
use crate::unit::{Archetype, StateFactory, StateMachineError, UnitHost, UnitState, UnitStateMachine};

use super::attacker::Attacker;
use super::defender::{DamageOutcome, Defender, HealOutcome};

/// Lifecycle of an actor as reported by [`CombatActor::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActorStatus {
    Active,
    /// Dead; despawns after `ticks_left` more ticks.
    Dying { ticks_left: u32 },
    Despawned,
}

/// Integration point for gameplay code.
///
/// Owns its [`StatBlock`], an [`Attacker`] and [`Defender`], and a
/// [`UnitStateMachine`] acting through the host `H`. A killing blow moves the
/// machine into [`UnitState::Death`] and starts the despawn countdown.
#[derive(Debug)]
pub struct CombatActor<H: UnitHost> {
    id: UnitId,
    team: Team,
    archetype: Archetype,
    stats: StatBlock,
    attacker: Attacker,
    defender: Defender,
    machine: UnitStateMachine,
    host: H,
    despawn_delay: u32,
    despawn_in: Option<u32>,
    despawned: bool,
    on_death: Observers<UnitId>,
    on_despawn: Observers<UnitId>,
}

impl<H: UnitHost> CombatActor<H> {
    pub fn new(
        id: UnitId,
        team: Team,
        archetype: Archetype,
        stats: StatBlock,
        host: H,
        config: &CombatConfig,
    ) -> Self {
        let defender = Defender::new(stats.max_hp());
        Self {
            id,
            team,
            archetype,
            stats,
            attacker: Attacker::new(),
            defender,
            machine: UnitStateMachine::new(),
            host,
            despawn_delay: config.despawn_delay_ticks,
            despawn_in: None,
            despawned: false,
            on_death: Observers::new(),
            on_despawn: Observers::new(),
        }
    }

    /// Registers the archetype's states, enters `Idle`, and fills HP.
    pub fn initialize(&mut self, factory: &dyn StateFactory) -> Result<(), StateMachineError> {
        self.machine
            .initialize(self.archetype, factory, &mut self.host)?;
        self.defender.set_max_hp(self.stats.max_hp());
        self.defender.reset_hp();
        self.despawn_in = None;
        self.despawned = false;
        Ok(())
    }

    /// Strikes `target` with this actor's current damage.
    ///
    /// Dead actors cannot attack; the result is then
    /// [`DamageOutcome::Mitigated`] and the target is untouched.
    pub fn attack<T: UnitHost>(&mut self, target: &mut CombatActor<T>) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::Mitigated;
        }
        let hit = self
            .attacker
            .strike(self.id, target.id, self.stats.damage());
        target.receive_hit(hit)
    }

    /// Commits an incoming hit. A killing blow transitions to `Death`.
    pub fn receive_hit(&mut self, hit: Hit) -> DamageOutcome {
        let outcome = self.defender.receive_hit(hit);
        if outcome.is_kill() {
            self.die();
        }
        outcome
    }

    /// Heals `target` for `amount` before its healing modifiers.
    pub fn heal_target<T: UnitHost>(&self, target: &mut CombatActor<T>, amount: f64) -> HealOutcome {
        target.receive_heal(Heal::new(self.id, target.id, amount))
    }

    /// Heals this actor for `amount` before its healing modifiers.
    pub fn heal_self(&mut self, amount: f64) -> HealOutcome {
        self.receive_heal(Heal::new(self.id, self.id, amount))
    }

    pub fn receive_heal(&mut self, heal: Heal) -> HealOutcome {
        self.defender.receive_heal(heal)
    }

    /// Validated transition; see [`UnitStateMachine::change_state`].
    pub fn set_state(&mut self, target: UnitState) -> Result<bool, StateMachineError> {
        self.machine.change_state(target, false, &mut self.host)
    }

    /// Forced transition. Still refused once the actor is dead.
    pub fn force_state(&mut self, target: UnitState) -> Result<bool, StateMachineError> {
        self.machine.change_state(target, true, &mut self.host)
    }

    /// Advances one frame: runs the state update and the despawn countdown.
    pub fn tick(&mut self) -> ActorStatus {
        if self.despawned {
            return ActorStatus::Despawned;
        }

        self.machine.tick(&mut self.host);

        match self.despawn_in {
            None => ActorStatus::Active,
            Some(0) => {
                self.despawned = true;
                debug!(target: "tactics_core::actor", unit = %self.id, "despawned");
                self.on_despawn.notify(&self.id);
                ActorStatus::Despawned
            }
            Some(ticks_left) => {
                self.despawn_in = Some(ticks_left - 1);
                ActorStatus::Dying { ticks_left }
            }
        }
    }

    /// Drops every subscription held by the actor and its components.
    pub fn shutdown(&mut self) {
        self.machine.shutdown();
        self.defender.clear_subscriptions();
        self.on_death.clear();
        self.on_despawn.clear();
    }

    /// Adds a stat contribution, keeping the defender's max HP in sync.
    pub fn add_stat(
        &mut self,
        kind: StatKind,
        id: impl Into<String>,
        value: f64,
        op: OperatorKind,
    ) -> bool {
        let changed = self.stats.add(kind, id, value, op);
        if changed && kind == StatKind::MaxHp {
            self.refresh_max_hp();
        }
        changed
    }

    /// Removes a stat contribution, keeping the defender's max HP in sync.
    pub fn remove_stat(&mut self, kind: StatKind, id: &str) -> bool {
        let removed = self.stats.remove(kind, id);
        if removed && kind == StatKind::MaxHp {
            self.refresh_max_hp();
        }
        removed
    }

    /// Pushes the max HP ledger value into the defender.
    ///
    /// Call after editing the max HP ledger through [`stats_mut`](Self::stats_mut).
    pub fn refresh_max_hp(&mut self) {
        self.defender.set_max_hp(self.stats.max_hp());
    }

    pub fn subscribe_death(
        &mut self,
        callback: impl FnMut(&UnitId) + Send + 'static,
    ) -> SubscriptionId {
        self.on_death.subscribe(callback)
    }

    pub fn unsubscribe_death(&mut self, id: SubscriptionId) -> bool {
        self.on_death.unsubscribe(id)
    }

    pub fn subscribe_despawn(
        &mut self,
        callback: impl FnMut(&UnitId) + Send + 'static,
    ) -> SubscriptionId {
        self.on_despawn.subscribe(callback)
    }

    pub fn unsubscribe_despawn(&mut self, id: SubscriptionId) -> bool {
        self.on_despawn.unsubscribe(id)
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn set_team(&mut self, team: Team) {
        self.team = team;
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn state(&self) -> Option<UnitState> {
        self.machine.current_state()
    }

    pub fn is_dead(&self) -> bool {
        self.defender.is_dead()
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut StatBlock {
        &mut self.stats
    }

    pub fn attacker(&self) -> &Attacker {
        &self.attacker
    }

    pub fn attacker_mut(&mut self) -> &mut Attacker {
        &mut self.attacker
    }

    pub fn defender(&self) -> &Defender {
        &self.defender
    }

    pub fn defender_mut(&mut self) -> &mut Defender {
        &mut self.defender
    }

    pub fn machine(&self) -> &UnitStateMachine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut UnitStateMachine {
        &mut self.machine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn die(&mut self) {
        match self
            .machine
            .change_state(UnitState::Death, false, &mut self.host)
        {
            Ok(true) => {}
            Ok(false) if self.machine.is_in_state(UnitState::Death) => {}
            Ok(false) => error!(
                target: "tactics_core::actor",
                unit = %self.id,
                state = ?self.machine.current_state(),
                "killed unit is stuck in a terminal state"
            ),
            Err(err) => error!(
                target: "tactics_core::actor",
                unit = %self.id,
                error = %err,
                "killed unit could not enter death state"
            ),
        }
        self.despawn_in = Some(self.despawn_delay);
        debug!(target: "tactics_core::actor", unit = %self.id, "unit died");
        self.on_death.notify(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ArmorModifier;
    use crate::stats::BaseStats;
    use crate::unit::{DefaultStateFactory, RecordingHost};
    use std::sync::Arc;

    fn actor(id: u32, damage: f64, max_hp: f64) -> CombatActor<RecordingHost> {
        let stats = StatBlock::from_base(&BaseStats {
            damage,
            max_hp,
            attack_speed: 1.0,
            move_speed: 1.0,
        });
        let mut actor = CombatActor::new(
            UnitId(id),
            Team(id as u8 % 2),
            Archetype::Melee,
            stats,
            RecordingHost::new(format!("unit-{id}")),
            &CombatConfig::new().with_despawn_delay(1),
        );
        actor.initialize(&DefaultStateFactory).unwrap();
        actor
    }

    #[test]
    fn attack_flows_through_both_pipelines() {
        let mut knight = actor(1, 30.0, 100.0);
        let mut orc = actor(2, 10.0, 100.0);
        orc.defender_mut()
            .add_defense_modifier(Arc::new(ArmorModifier::new(5.0)));

        let outcome = knight.attack(&mut orc);
        assert_eq!(
            outcome,
            DamageOutcome::Damaged {
                amount: 25.0,
                remaining_hp: 75.0
            }
        );
    }

    #[test]
    fn killing_blow_enters_death_and_despawns() {
        let mut knight = actor(1, 50.0, 100.0);
        let mut orc = actor(2, 10.0, 40.0);
        knight.set_state(UnitState::Attack).unwrap();

        assert!(knight.attack(&mut orc).is_kill());
        assert_eq!(orc.state(), Some(UnitState::Death));
        assert!(orc.host().collision_disabled);
        assert_eq!(orc.force_state(UnitState::Idle), Ok(false));

        assert_eq!(orc.tick(), ActorStatus::Dying { ticks_left: 1 });
        assert_eq!(orc.tick(), ActorStatus::Despawned);
        assert_eq!(orc.tick(), ActorStatus::Despawned);
        assert_eq!(knight.tick(), ActorStatus::Active);
    }

    #[test]
    fn dead_actor_cannot_attack_or_be_healed() {
        let mut knight = actor(1, 50.0, 100.0);
        let mut orc = actor(2, 10.0, 40.0);
        knight.attack(&mut orc);

        assert_eq!(orc.attack(&mut knight), DamageOutcome::Mitigated);
        assert_eq!(knight.defender().current_hp(), 100.0);
        assert_eq!(knight.heal_target(&mut orc, 10.0), HealOutcome::TargetDead);
    }

    #[test]
    fn max_hp_contributions_sync_to_defender() {
        let mut tank = actor(3, 5.0, 200.0);
        tank.add_stat(StatKind::MaxHp, "gear", 50.0, OperatorKind::AddInitialPercent);
        assert_eq!(tank.defender().max_hp(), 300.0);
        assert_eq!(tank.defender().current_hp(), 200.0);

        tank.remove_stat(StatKind::MaxHp, "gear");
        assert_eq!(tank.defender().max_hp(), 200.0);
    }
}
