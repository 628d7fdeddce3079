//! Session pacing and policy configuration.
use std::env;

use tactics_core::ActionKind;

/// How units without a bound provider decide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AiPolicy {
    /// End the turn immediately.
    #[default]
    Passive,
    /// Attack the first reachable enemy, otherwise end the turn.
    Opportunist,
}

/// Timing of the turn pump, expressed in session steps.
///
/// One step is one call to `Session::step`; a frontend that steps at a fixed
/// rate turns these into durations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Steps between selecting the next unit and granting its turn.
    pub begin_turn_delay_steps: u32,
    /// Playback steps per tile walked.
    pub steps_per_tile: u32,
    pub melee_attack_steps: u32,
    pub ranged_attack_steps: u32,
    pub ground_attack_steps: u32,
    /// Steps a self-cast takes to play out.
    pub self_cast_steps: u32,
    /// Rejected orders tolerated before the session ends the unit's turn.
    pub max_rejections_per_turn: u32,
    /// `Session::run` stops before this round would be exceeded.
    pub max_rounds: u32,
    /// Hard cap on `Session::run` iterations.
    pub max_steps: u64,
    pub ai_policy: AiPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            begin_turn_delay_steps: 2,
            steps_per_tile: 1,
            melee_attack_steps: 8,
            ranged_attack_steps: 4,
            ground_attack_steps: 3,
            self_cast_steps: 2,
            max_rejections_per_turn: 3,
            max_rounds: 50,
            max_steps: 100_000,
            ai_policy: AiPolicy::Passive,
        }
    }
}

impl SessionConfig {
    /// Construct session configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TACTICS_TURN_DELAY_STEPS` - Steps before a turn is granted (default: 2)
    /// - `TACTICS_STEPS_PER_TILE` - Movement playback per tile (default: 1)
    /// - `TACTICS_MELEE_STEPS` / `TACTICS_RANGED_STEPS` / `TACTICS_GROUND_STEPS`
    /// - `TACTICS_MAX_ROUNDS` - Round limit for `run` (default: 50)
    /// - `TACTICS_AI_POLICY` - `passive` or `opportunist` (default: passive)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(steps) = read_env::<u32>("TACTICS_TURN_DELAY_STEPS") {
            config.begin_turn_delay_steps = steps;
        }
        if let Some(steps) = read_env::<u32>("TACTICS_STEPS_PER_TILE") {
            config.steps_per_tile = steps;
        }
        if let Some(steps) = read_env::<u32>("TACTICS_MELEE_STEPS") {
            config.melee_attack_steps = steps;
        }
        if let Some(steps) = read_env::<u32>("TACTICS_RANGED_STEPS") {
            config.ranged_attack_steps = steps;
        }
        if let Some(steps) = read_env::<u32>("TACTICS_GROUND_STEPS") {
            config.ground_attack_steps = steps;
        }
        if let Some(rounds) = read_env::<u32>("TACTICS_MAX_ROUNDS") {
            config.max_rounds = rounds.max(1);
        }
        if let Some(policy) = read_env::<AiPolicy>("TACTICS_AI_POLICY") {
            config.ai_policy = policy;
        }

        config
    }

    /// Playback length of the attack phase for `kind`.
    pub fn attack_steps(&self, kind: ActionKind) -> u32 {
        match kind {
            ActionKind::MeleeAttack | ActionKind::WeaponAttack => self.melee_attack_steps,
            ActionKind::RangedAttack => self.ranged_attack_steps,
            ActionKind::GroundAttack => self.ground_attack_steps,
            ActionKind::SelfCast(_) => self.self_cast_steps,
            ActionKind::Move => 0,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
