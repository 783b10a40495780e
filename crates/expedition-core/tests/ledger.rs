use std::collections::BTreeMap;

use expedition_core::engine::ledger::{Rejection, ResourceLedger};
use expedition_core::protocol::{Decision, Heading, ResourceKind};
use expedition_core::world::{Coord, GridIsland, UniformCostPolicy};

fn wood() -> ResourceKind {
    ResourceKind::parse("WOOD").unwrap()
}

fn wood_island() -> GridIsland {
    let mut island = GridIsland::new(10, 10);
    island.add_deposit(Coord::new(1, 1), wood());
    island
}

fn wood_contract(amount: u64) -> BTreeMap<ResourceKind, u64> {
    BTreeMap::from([(wood(), amount)])
}

#[test]
fn accepted_collect_debits_budget_and_credits_collected() {
    let island = wood_island();
    let mut ledger = ResourceLedger::new(100, 15, wood_contract(1000));

    let receipt = ledger
        .try_apply(
            &Decision::Collect { resource: wood() },
            &UniformCostPolicy,
            &island,
            Coord::new(1, 1),
        )
        .unwrap();

    assert_eq!(receipt.cost, 3);
    assert_eq!(receipt.gathered, Some((wood(), 15)));
    assert_eq!(ledger.budget(), 97);
    assert_eq!(ledger.collected_amount(&wood()), 15);
}

#[test]
fn collect_on_a_barren_tile_costs_but_gathers_nothing() {
    let island = wood_island();
    let mut ledger = ResourceLedger::new(100, 15, wood_contract(1000));

    let receipt = ledger
        .try_apply(
            &Decision::Collect { resource: wood() },
            &UniformCostPolicy,
            &island,
            Coord::new(5, 5),
        )
        .unwrap();

    assert_eq!(receipt.gathered, Some((wood(), 0)));
    assert_eq!(ledger.budget(), 97);
    assert_eq!(ledger.collected_amount(&wood()), 0);
}

#[test]
fn insufficient_budget_rejects_without_mutation() {
    let island = wood_island();
    let mut ledger = ResourceLedger::new(2, 15, wood_contract(1000));

    let rejection = ledger
        .try_apply(
            &Decision::Collect { resource: wood() },
            &UniformCostPolicy,
            &island,
            Coord::new(1, 1),
        )
        .unwrap_err();

    assert_eq!(
        rejection,
        Rejection::InsufficientBudget {
            cost: 3,
            remaining: 2
        }
    );
    assert_eq!(ledger.budget(), 2);
    assert!(ledger.collected().is_empty());
}

#[test]
fn unknown_resource_rejects_without_mutation() {
    let island = wood_island();
    let mut ledger = ResourceLedger::new(100, 15, wood_contract(1000));
    let bogus = ResourceKind::parse("UNOBTAINIUM").unwrap();

    let rejection = ledger
        .try_apply(
            &Decision::Collect {
                resource: bogus.clone(),
            },
            &UniformCostPolicy,
            &island,
            Coord::new(1, 1),
        )
        .unwrap_err();

    assert_eq!(rejection, Rejection::UnknownResource(bogus));
    assert_eq!(ledger.budget(), 100);
    assert!(ledger.collected().is_empty());
}

#[test]
fn contract_resource_absent_from_world_is_still_known() {
    // The vocabulary is world deposits plus contract kinds: asking for a
    // contract resource the island lacks is a valid (if fruitless) decision.
    let island = GridIsland::new(10, 10);
    let mut ledger = ResourceLedger::new(100, 15, wood_contract(1000));

    let receipt = ledger
        .try_apply(
            &Decision::Collect { resource: wood() },
            &UniformCostPolicy,
            &island,
            Coord::new(1, 1),
        )
        .unwrap();
    assert_eq!(receipt.gathered, Some((wood(), 0)));
}

#[test]
fn contract_is_satisfied_only_when_every_entry_is_met() {
    let island = wood_island();
    let contract = BTreeMap::from([(wood(), 30), (ResourceKind::parse("QUARTZ").unwrap(), 1)]);
    let mut ledger = ResourceLedger::new(1000, 15, contract);

    // 2 collects x 15 wood meets the wood entry but not quartz.
    for _ in 0..2 {
        ledger
            .try_apply(
                &Decision::Collect { resource: wood() },
                &UniformCostPolicy,
                &island,
                Coord::new(1, 1),
            )
            .unwrap();
    }
    assert_eq!(ledger.collected_amount(&wood()), 30);
    assert!(!ledger.contract_satisfied());
}

#[test]
fn budget_never_increases_and_collected_never_decreases() {
    let island = wood_island();
    let mut ledger = ResourceLedger::new(50, 15, wood_contract(1000));

    let decisions = [
        Decision::Move {
            direction: Heading::East,
        },
        Decision::Collect { resource: wood() },
        Decision::Scout {
            direction: Heading::North,
        },
        Decision::Explore,
        Decision::Collect { resource: wood() },
    ];

    let mut last_budget = ledger.budget();
    let mut last_collected = 0;
    for decision in &decisions {
        ledger
            .try_apply(decision, &UniformCostPolicy, &island, Coord::new(1, 1))
            .unwrap();
        assert!(ledger.budget() <= last_budget);
        assert!(ledger.collected_amount(&wood()) >= last_collected);
        last_budget = ledger.budget();
        last_collected = ledger.collected_amount(&wood());
    }
}
