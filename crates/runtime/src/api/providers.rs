//! Asynchronous abstraction for sourcing unit intent.
//!
//! Runtime users plug in [`ActionProvider`] implementations so a session can
//! run with human input, scripted fixtures, or AI policies. Providers are only
//! ever asked about the unit that currently holds the turn.
use std::collections::VecDeque;

use async_trait::async_trait;
use tactics_core::{ActionDescriptor, ActionKey, Encounter, Position, UnitId};
use tokio::sync::{Mutex, mpsc};

use super::errors::{Result, RuntimeError};

/// One decision for the active unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Walk to a move destination of the current search.
    Move(Position),
    /// Attack a cell with the selected action.
    Attack(Position),
    /// Cast the selected self-targeted ability.
    SelfCast,
    /// Change the selected action. Does not end the turn.
    Select(ActionKey),
    EndTurn,
}

/// Trait for providing orders based on the current encounter.
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Provide an order for `unit`, which holds the turn.
    async fn provide_order(&self, unit: UnitId, encounter: &Encounter) -> Result<Order>;
}

/// Ends every turn immediately. Stands in for enemy decision-making.
pub struct PassiveProvider;

#[async_trait]
impl ActionProvider for PassiveProvider {
    async fn provide_order(&self, _unit: UnitId, _encounter: &Encounter) -> Result<Order> {
        Ok(Order::EndTurn)
    }
}

/// Attacks the first hostile unit the selected action can reach. Otherwise
/// walks to the move destination closest to the nearest hostile, or ends the
/// turn when no destination gets closer.
pub struct OpportunistProvider;

#[async_trait]
impl ActionProvider for OpportunistProvider {
    async fn provide_order(&self, unit: UnitId, encounter: &Encounter) -> Result<Order> {
        let Some((faction, origin)) = encounter
            .unit(unit)
            .and_then(|state| Some((state.faction, state.position?)))
        else {
            return Ok(Order::EndTurn);
        };
        // Searches cache inside the encounter, so plan on a copy.
        let mut scratch = encounter.clone();
        let reach = scratch.compute_reachable_selected(unit);

        let hostile = |id: UnitId| {
            encounter
                .unit(id)
                .is_some_and(|other| other.is_alive() && faction.is_hostile_to(other.faction))
        };
        if let Some(attack) = reach
            .attacks
            .iter()
            .find(|attack| attack.occupant.is_some_and(hostile))
        {
            return Ok(Order::Attack(attack.cell));
        }

        let hostiles: Vec<Position> = encounter
            .roster()
            .iter_living()
            .filter(|other| faction.is_hostile_to(other.faction))
            .filter_map(|other| other.position)
            .collect();
        let distance = |from: Position| hostiles.iter().map(|h| h.manhattan(from)).min();
        let Some(current) = distance(origin) else {
            return Ok(Order::EndTurn);
        };

        // A ground attack search leaves its target tiles out of the moves.
        let walk = scratch.compute_reachable(unit, Some(&ActionDescriptor::move_only()));
        let closer = walk
            .moves
            .iter()
            .filter_map(|dest| Some((distance(dest.cell)?, dest.cost, dest.cell)))
            .filter(|&(d, _, _)| d < current)
            .min_by_key(|&(d, cost, _)| (d, cost));
        Ok(closer.map_or(Order::EndTurn, |(_, _, cell)| Order::Move(cell)))
    }
}

/// Replays a fixed list of orders, then ends every turn.
///
/// Orders are consumed regardless of which unit asks, so a script is usually
/// bound to a single unit.
pub struct ScriptedProvider {
    orders: Mutex<VecDeque<Order>>,
}

impl ScriptedProvider {
    pub fn new(orders: impl IntoIterator<Item = Order>) -> Self {
        Self {
            orders: Mutex::new(orders.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.orders.lock().await.len()
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn provide_order(&self, _unit: UnitId, _encounter: &Encounter) -> Result<Order> {
        Ok(self.orders.lock().await.pop_front().unwrap_or(Order::EndTurn))
    }
}

/// Waits for orders sent from another task, such as an input loop.
pub struct ChannelProvider {
    rx: Mutex<mpsc::Receiver<Order>>,
}

impl ChannelProvider {
    /// Creates the provider and the sender that feeds it.
    pub fn new(buffer: usize) -> (Self, mpsc::Sender<Order>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { rx: Mutex::new(rx) }, tx)
    }
}

#[async_trait]
impl ActionProvider for ChannelProvider {
    async fn provide_order(&self, _unit: UnitId, _encounter: &Encounter) -> Result<Order> {
        self.rx
            .lock()
            .await
            .recv()
            .await
            .ok_or(RuntimeError::ActionProviderChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{GameConfig, Grid};

    fn encounter() -> Encounter {
        Encounter::new(GameConfig::new(), Grid::open(3, 3))
    }

    #[tokio::test]
    async fn scripted_provider_falls_back_to_end_turn() {
        let provider = ScriptedProvider::new([Order::Move(Position::new(1, 0)), Order::SelfCast]);
        let encounter = encounter();

        assert_eq!(
            provider.provide_order(UnitId(0), &encounter).await.unwrap(),
            Order::Move(Position::new(1, 0))
        );
        assert_eq!(
            provider.provide_order(UnitId(0), &encounter).await.unwrap(),
            Order::SelfCast
        );
        assert_eq!(provider.remaining().await, 0);
        assert_eq!(
            provider.provide_order(UnitId(0), &encounter).await.unwrap(),
            Order::EndTurn
        );
    }

    #[tokio::test]
    async fn opportunist_closes_in_when_nothing_is_in_reach() {
        use tactics_core::{Attributes, Faction, UnitState};

        let config = GameConfig::new().with_grid_size(5, 1);
        let mut encounter = Encounter::new(config.clone(), Grid::open(5, 1));
        let mut hunter = UnitState::new("hunter", Faction::Enemy, Attributes::default(), &config)
            .with_position(Position::new(0, 0));
        hunter.action_points.current = 2;
        let hunter = encounter.spawn(hunter).unwrap();
        encounter
            .spawn(
                UnitState::new("prey", Faction::Player, Attributes::default(), &config)
                    .with_position(Position::new(4, 0)),
            )
            .unwrap();

        assert_eq!(
            OpportunistProvider
                .provide_order(hunter, &encounter)
                .await
                .unwrap(),
            Order::Move(Position::new(2, 0))
        );
    }

    #[tokio::test]
    async fn opportunist_with_a_grenade_still_walks_next_to_its_targets() {
        use tactics_core::{ActionKind, Attributes, Faction, HandSlot, HandheldItem, UnitState};

        let config = GameConfig::new().with_grid_size(12, 1);
        let mut encounter = Encounter::new(config.clone(), Grid::open(12, 1));
        let mut sapper = UnitState::new("sapper", Faction::Enemy, Attributes::default(), &config)
            .with_position(Position::new(0, 0));
        sapper.action_points.current = 21;
        let sapper = encounter.spawn(sapper).unwrap();
        encounter
            .spawn(
                UnitState::new("prey", Faction::Player, Attributes::default(), &config)
                    .with_position(Position::new(11, 0)),
            )
            .unwrap();
        let grenade = HandheldItem::new("Frag Grenade", 8, 20)
            .with_action(ActionKind::GroundAttack)
            .with_range(1, 4);
        encounter.equip(sapper, HandSlot::RightHand, grenade).unwrap();
        assert!(encounter.select_action(
            sapper,
            ActionKey::held(ActionKind::GroundAttack, HandSlot::RightHand)
        ));

        assert_eq!(
            OpportunistProvider
                .provide_order(sapper, &encounter)
                .await
                .unwrap(),
            Order::Move(Position::new(10, 0))
        );
    }

    #[tokio::test]
    async fn channel_provider_reports_closed_senders() {
        let (provider, tx) = ChannelProvider::new(4);
        let encounter = encounter();
        tx.send(Order::EndTurn).await.unwrap();
        drop(tx);

        assert_eq!(
            provider.provide_order(UnitId(0), &encounter).await.unwrap(),
            Order::EndTurn
        );
        assert!(matches!(
            provider.provide_order(UnitId(0), &encounter).await,
            Err(RuntimeError::ActionProviderChannelClosed)
        ));
    }
}
