use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use synapse::catalog::{Catalog, ConceptItem};
use synapse::config::{ApplyConfig, Rules, RushConfig};
use synapse::engine::deck::build_session;
use synapse::engine::options::options_for;
use synapse::session::{GameMode, Session, SilentFeedback};

fn large_catalog(size: u32) -> Vec<ConceptItem> {
    (0..size)
        .map(|id| ConceptItem {
            id,
            label: format!("concept-{id}"),
            definition: format!("definition of concept {id}"),
            glyph: String::new(),
        })
        .collect()
}

fn bench_deck(c: &mut Criterion) {
    let catalog = large_catalog(1000);
    let mut rng = SmallRng::seed_from_u64(1);

    c.bench_function("build_session (16 of 1000)", |b| {
        b.iter(|| build_session(black_box(&catalog), 16, &mut rng))
    });
}

fn bench_options(c: &mut Criterion) {
    let catalog = large_catalog(1000);
    let target = catalog[500].clone();
    let mut rng = SmallRng::seed_from_u64(2);

    c.bench_function("options_for (4 of 1000)", |b| {
        b.iter(|| options_for(black_box(&target), black_box(&catalog), 4, &mut rng))
    });
}

fn bench_full_games(c: &mut Criterion) {
    let rush = Arc::new(Catalog::builtin(GameMode::Rush));
    let apply = Arc::new(Catalog::builtin(GameMode::Apply));

    c.bench_function("full rush game (12 rounds)", |b| {
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            let mut session = Session::start(
                Arc::clone(&rush),
                Rules::Rush(RushConfig::default()),
                SmallRng::seed_from_u64(seed),
                Box::new(SilentFeedback),
            )
            .unwrap();
            while let Some(round) = session.round().cloned() {
                session.handle_answer(round.target_id);
                session.tick();
                if session.is_over() {
                    break;
                }
                session.advance().unwrap();
            }
            black_box(session.take_events())
        })
    });

    c.bench_function("full apply game with hints (16 rounds)", |b| {
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            let mut session = Session::start(
                Arc::clone(&apply),
                Rules::Apply(ApplyConfig::default()),
                SmallRng::seed_from_u64(seed),
                Box::new(SilentFeedback),
            )
            .unwrap();
            while let Some(round) = session.round().cloned() {
                session.request_hint();
                session.handle_answer(round.target_id);
                if session.is_over() {
                    break;
                }
                session.advance().unwrap();
            }
            black_box(session.finish())
        })
    });
}

criterion_group!(benches, bench_deck, bench_options, bench_full_games);
criterion_main!(benches);
