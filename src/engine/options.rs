use rand::Rng;

use crate::catalog::Identified;
use crate::engine::deck::build_session;
use crate::error::QuizError;

/// Build `size` answer candidates: the target plus `size - 1` distractors drawn
/// without replacement from the rest of `catalog`, in random order.
///
/// The target is matched by id, so a catalog that does not contain the target
/// still works as long as it holds `size - 1` other items.
pub fn options_for<T, R>(target: &T, catalog: &[T], size: usize, rng: &mut R) -> Result<Vec<T>, QuizError>
where
    T: Identified + Clone,
    R: Rng + ?Sized,
{
    if size == 0 {
        return Err(QuizError::config("option set size must be at least 1"));
    }
    if catalog.len() < size {
        return Err(QuizError::config(format!(
            "{size} options requested but catalog only has {} items",
            catalog.len()
        )));
    }

    let others: Vec<T> = catalog
        .iter()
        .filter(|item| item.id() != target.id())
        .cloned()
        .collect();
    let mut options = if size > 1 {
        build_session(&others, size - 1, rng)?
    } else {
        Vec::new()
    };

    let slot = rng.gen_range(0..=options.len());
    options.insert(slot, target.clone());
    Ok(options)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Item(u32);

    impl Identified for Item {
        fn id(&self) -> u32 {
            self.0
        }
    }

    fn catalog(n: u32) -> Vec<Item> {
        (1..=n).map(Item).collect()
    }

    #[test]
    fn target_appears_exactly_once() {
        let items = catalog(12);
        for seed in 0..300 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let target = &items[(seed % 12) as usize];
            let options = options_for(target, &items, 4, &mut rng).unwrap();
            assert_eq!(options.len(), 4);
            assert_eq!(options.iter().filter(|o| o.0 == target.0).count(), 1);
            let ids: HashSet<u32> = options.iter().map(|o| o.0).collect();
            assert_eq!(ids.len(), 4);
        }
    }

    #[test]
    fn target_position_varies() {
        let items = catalog(12);
        let mut rng = SmallRng::seed_from_u64(11);
        let mut positions = HashSet::new();
        for _ in 0..200 {
            let options = options_for(&items[0], &items, 4, &mut rng).unwrap();
            positions.insert(options.iter().position(|o| o.0 == 1).unwrap());
        }
        assert_eq!(positions.len(), 4);
    }

    #[test]
    fn catalog_exactly_option_size_uses_everything() {
        let items = catalog(4);
        let mut rng = SmallRng::seed_from_u64(5);
        let mut ids: Vec<u32> = options_for(&items[2], &items, 4, &mut rng)
            .unwrap()
            .iter()
            .map(|o| o.0)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn rejects_small_catalog() {
        let items = catalog(3);
        let mut rng = SmallRng::seed_from_u64(5);
        assert!(matches!(
            options_for(&items[0], &items, 4, &mut rng),
            Err(QuizError::Configuration(_))
        ));
    }
}
