//! End-to-end session tests against in-memory collaborators.

mod common;

use command_tower::models::{Color, ColorFilter};
use command_tower::{CommandTower, ErrorKind};

use common::{assert_close, deck_text, setup_tower, FakeCatalog, FakeDecklists, FakeImages, FakePrices, Fakes};

fn fakes(names: &[&str]) -> Fakes {
    Fakes {
        catalog: FakeCatalog::new(names),
        decklists: FakeDecklists::new(),
        prices: FakePrices::flat(1.0),
        images: FakeImages::default(),
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[test]
fn builder_rejects_zero_concurrency() {
    let err = CommandTower::builder().concurrency(0).build().err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Invalid);
}

#[test]
fn new_session_has_no_current_visit() {
    let f = fakes(&[]);
    let mut tower = setup_tower(&f, 2);
    assert!(tower.current().is_none());
    assert!(tower.step_back().is_none());
    assert_eq!(tower.decklist(), "");
    assert_eq!(tower.price(), 0.0);
    assert_eq!(f.decklists.calls(), 0);
}

// ---------------------------------------------------------------------------
// Worked example
// ---------------------------------------------------------------------------

#[test]
fn browse_back_and_price_previous_commander() {
    let f = Fakes {
        decklists: FakeDecklists::new().with_deck("Atraxa, Grand Unifier", &deck_text(40)),
        prices: FakePrices::flat(0.5),
        ..fakes(&["Atraxa, Grand Unifier", "Edgar Markov"])
    };
    let mut tower = setup_tower(&f, 2);
    let any = ColorFilter::default();

    let v0 = tower.advance(&any, "").name().to_string();
    assert_eq!(v0, "Atraxa, Grand Unifier");
    assert_eq!(tower.history().count(), 0);
    assert_eq!(tower.history().back_steps(), 0);

    // back on the only visit: no-op
    assert!(tower.step_back().is_none());
    assert_eq!(tower.current().unwrap().name(), "Atraxa, Grand Unifier");

    let v1 = tower.advance(&any, "").name().to_string();
    assert_eq!(v1, "Edgar Markov");
    assert_eq!(tower.history().count(), 1);
    assert_eq!(tower.history().back_steps(), 0);

    assert_eq!(tower.step_back().unwrap().name(), "Atraxa, Grand Unifier");
    assert_eq!(tower.history().back_steps(), 1);

    assert_close(tower.price(), 20.0);
    let batches = f.prices.batches();
    assert_eq!(batches.len(), 2);
    assert!(batches.iter().all(|b| b.len() == 20));
    assert_eq!(f.catalog.calls(), 2);
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[test]
fn forward_inside_history_does_not_hit_catalog() {
    let f = fakes(&["A", "B", "C"]);
    let mut tower = setup_tower(&f, 2);
    let any = ColorFilter::default();

    tower.advance(&any, "");
    tower.advance(&any, "");
    tower.step_back();

    assert_eq!(tower.advance(&any, "").name(), "B");
    assert_eq!(f.catalog.calls(), 2);
    assert_eq!(f.images.resolved().len(), 2);

    assert_eq!(tower.advance(&any, "").name(), "C");
    assert_eq!(f.catalog.calls(), 3);
}

#[test]
fn advance_passes_filter_and_query_to_catalog() {
    let f = fakes(&["A"]);
    let mut tower = setup_tower(&f, 2);
    let filter = ColorFilter::new([Color::Green, Color::White], true);

    tower.advance(&filter, "t:elf");
    let requests = f.catalog.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, filter);
    assert_eq!(requests[0].1, "t:elf");
}

#[test]
fn failed_frontier_fetch_appends_placeholder() {
    let f = fakes(&["A"]);
    f.catalog.fail_next(1);
    let mut tower = setup_tower(&f, 2);
    let any = ColorFilter::default();

    let v = tower.advance(&any, "");
    assert!(v.is_placeholder());
    assert!(v.image().is_placeholder());
    assert_eq!(tower.history().count(), 0);

    // placeholder visits have nothing to fetch
    assert_eq!(tower.decklist(), "");
    assert_eq!(tower.price(), 0.0);
    assert_eq!(f.decklists.calls(), 0);

    assert_eq!(tower.advance(&any, "").name(), "A");
    assert_eq!(tower.history().count(), 1);
    assert_eq!(tower.step_back().unwrap().name(), "");
}

// ---------------------------------------------------------------------------
// Lazy data through the session
// ---------------------------------------------------------------------------

#[test]
fn revisiting_uses_cached_decklist_and_price() {
    let f = Fakes {
        decklists: FakeDecklists::new()
            .with_deck("A", &deck_text(6))
            .with_deck("B", &deck_text(4)),
        ..fakes(&["A", "B"])
    };
    let mut tower = setup_tower(&f, 3);
    let any = ColorFilter::default();

    tower.advance(&any, "");
    assert_close(tower.price(), 6.0);
    tower.advance(&any, "");
    assert_close(tower.price(), 4.0);

    tower.step_back();
    assert_eq!(tower.decklist(), deck_text(6));
    assert_close(tower.price(), 6.0);
    tower.advance(&any, "");
    assert_close(tower.price(), 4.0);

    assert_eq!(f.decklists.requests(), vec!["A".to_string(), "B".to_string()]);
    assert_eq!(f.prices.calls(), 6);
}

#[test]
fn price_is_written_to_current_visit_only() {
    let f = Fakes {
        decklists: FakeDecklists::new()
            .with_deck("A", &deck_text(2))
            .with_deck("B", &deck_text(2)),
        ..fakes(&["A", "B"])
    };
    let mut tower = setup_tower(&f, 2);
    let any = ColorFilter::default();

    tower.advance(&any, "");
    tower.advance(&any, "");
    tower.price();

    let entries = tower.history().entries();
    assert!(entries[0].price().is_none());
    assert!(entries[0].decklist().is_none());
    assert_eq!(entries[1].price(), Some(2.0));
}

#[test]
fn display_summarizes_session() {
    let f = fakes(&["A"]);
    let mut tower = setup_tower(&f, 2);
    tower.advance(&ColorFilter::default(), "");
    assert_eq!(
        tower.to_string(),
        "CommandTower(visits=1, back_steps=0, concurrency=2, currency=EUR)"
    );
}
