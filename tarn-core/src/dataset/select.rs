//! Selection of episodes and samples from a dataset.
use super::{episode_ends, parse_dataset, ParsedDataset, Transition};
use crate::error::TarnError;
use log::debug;
use rand::Rng;

/// Returns the first `n_episodes` complete episodes of the dataset.
///
/// The result is the prefix of `dataset` ending at the `n_episodes`-th transition
/// with `last == true`. For `n_episodes == 0`, the result is empty.
/// If the dataset contains fewer episodes, [`TarnError::InsufficientData`] is returned.
pub fn select_episodes(
    dataset: &[Transition],
    n_episodes: usize,
) -> Result<&[Transition], TarnError> {
    if n_episodes == 0 {
        return Ok(&dataset[..0]);
    }

    let ends = episode_ends(dataset);
    let end = ends
        .get(n_episodes - 1)
        .ok_or(TarnError::InsufficientData {
            requested: n_episodes,
            available: ends.len(),
        })?;
    debug!(
        "Selected {} episodes ({} transitions) out of {}",
        n_episodes,
        end + 1,
        ends.len()
    );

    Ok(&dataset[..=*end])
}

/// Same as [`select_episodes`], but the selection is decomposed with [`parse_dataset`].
///
/// For `n_episodes == 0`, the result has no rows.
pub fn select_episodes_parsed(
    dataset: &[Transition],
    n_episodes: usize,
) -> Result<ParsedDataset, TarnError> {
    let sub_dataset = select_episodes(dataset, n_episodes)?;
    if sub_dataset.is_empty() {
        Ok(ParsedDataset::empty_like(dataset.first()))
    } else {
        parse_dataset(sub_dataset)
    }
}

/// Draws `n_samples` transitions uniformly at random with replacement.
///
/// Episode boundaries are not taken into account. The transitions are returned in the
/// order they were drawn. Drawing from an empty dataset fails with
/// [`TarnError::EmptyInput`] unless `n_samples == 0`.
pub fn select_samples<'a, R: Rng + ?Sized>(
    dataset: &'a [Transition],
    n_samples: usize,
    rng: &mut R,
) -> Result<Vec<&'a Transition>, TarnError> {
    if n_samples == 0 {
        return Ok(vec![]);
    }
    if dataset.is_empty() {
        return Err(TarnError::EmptyInput);
    }

    let samples = (0..n_samples)
        .map(|_| &dataset[rng.gen_range(0..dataset.len())])
        .collect();
    debug!("Sampled {} transitions out of {}", n_samples, dataset.len());

    Ok(samples)
}

/// Same as [`select_samples`], but the selection is decomposed with [`parse_dataset`].
///
/// For `n_samples == 0`, the result has no rows.
pub fn select_samples_parsed<R: Rng + ?Sized>(
    dataset: &[Transition],
    n_samples: usize,
    rng: &mut R,
) -> Result<ParsedDataset, TarnError> {
    let samples = select_samples(dataset, n_samples, rng)?;
    if samples.is_empty() {
        Ok(ParsedDataset::empty_like(dataset.first()))
    } else {
        parse_dataset(samples)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dataset::test_util::dataset;
    use rand::{rngs::StdRng, SeedableRng};

    fn five_steps() -> Vec<Transition> {
        dataset(&[1., 1., 1., 2., 3.], &[false, false, true, false, true])
    }

    #[test]
    fn test_select_episodes() -> anyhow::Result<()> {
        let d = five_steps();

        assert!(select_episodes(&d, 0)?.is_empty());
        assert_eq!(select_episodes(&d, 1)?, &d[..3]);
        assert_eq!(select_episodes(&d, 2)?, &d[..]);
        assert_eq!(
            select_episodes(&d, 3),
            Err(TarnError::InsufficientData {
                requested: 3,
                available: 2
            })
        );

        Ok(())
    }

    #[test]
    fn test_select_episodes_ignores_incomplete_tail() -> anyhow::Result<()> {
        let d = dataset(&[1., 1., 1., 2.], &[false, true, false, false]);
        assert_eq!(select_episodes(&d, 1)?.len(), 2);
        assert!(select_episodes(&d, 2).is_err());
        Ok(())
    }

    #[test]
    fn test_select_episodes_parsed() -> anyhow::Result<()> {
        let d = five_steps();

        let p = select_episodes_parsed(&d, 1)?;
        assert_eq!(p.len(), 3);
        assert_eq!(p.rewards.to_vec(), vec![1., 1., 1.]);

        let p = select_episodes_parsed(&d, 0)?;
        assert!(p.is_empty());
        assert_eq!(p.states.shape(), &[0, 2]);

        Ok(())
    }

    #[test]
    fn test_select_samples() -> anyhow::Result<()> {
        let d = five_steps();
        let mut rng = StdRng::seed_from_u64(42);

        assert!(select_samples(&d, 0, &mut rng)?.is_empty());

        let samples = select_samples(&d, 100, &mut rng)?;
        assert_eq!(samples.len(), 100);
        assert!(samples.iter().all(|s| d.contains(s)));

        // Every transition is drawn at least once in 100 draws with a fixed seed
        assert!(d.iter().all(|t| samples.contains(&t)));

        let empty: Vec<Transition> = vec![];
        assert!(select_samples(&empty, 0, &mut rng)?.is_empty());
        assert_eq!(
            select_samples(&empty, 1, &mut rng),
            Err(TarnError::EmptyInput)
        );

        Ok(())
    }

    #[test]
    fn test_select_samples_parsed() -> anyhow::Result<()> {
        let d = five_steps();
        let mut rng = StdRng::seed_from_u64(0);

        let p = select_samples_parsed(&d, 7, &mut rng)?;
        assert_eq!(p.len(), 7);
        assert_eq!(p.states.shape(), &[7, 2]);
        for i in 0..p.len() {
            let row = p.row(i).unwrap();
            assert!(d.contains(&row));
        }

        let p = select_samples_parsed(&d, 0, &mut rng)?;
        assert!(p.is_empty());

        Ok(())
    }
}
