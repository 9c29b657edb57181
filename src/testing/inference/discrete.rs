use crate::testing::{Alternative, TestResult};
use anyhow::{Result, anyhow};
use num_traits::NumCast;
use single_utilities::traits::FloatOps;
use statrs::distribution::{DiscreteCDF, Hypergeometric};

fn cast<T: FloatOps>(value: f64) -> Result<T> {
    <T as NumCast>::from(value).ok_or_else(|| anyhow!("Value {} is not representable", value))
}

/// Hypergeometric test for over- (or under-) representation of successes in a sample.
///
/// X ~ Hypergeometric(N = `population`, K = `successes`, n = `draws`), observed `k`.
/// With `Alternative::Greater` the p-value is P(X >= k), the one-tailed Fisher exact test
/// for enrichment. The statistic is -log10(p) and the effect size is the fold enrichment
/// k / E[X]. Expected overlap and the table margins are kept as metadata.
///
/// # Example
/// ```
/// use single_regulon::testing::Alternative;
/// use single_regulon::testing::inference::discrete::hypergeometric_test;
///
/// // 2 of 3 population genes are hits; a regulon of 2 genes contains both
/// let result = hypergeometric_test::<f64>(2, 2, 2, 3, Alternative::Greater).unwrap();
/// assert!((result.p_value - 1.0 / 3.0).abs() < 1e-9);
/// ```
pub fn hypergeometric_test<T>(
    observed: u64,
    draws: u64,
    successes: u64,
    population: u64,
    alternative: Alternative,
) -> Result<TestResult<T>>
where
    T: FloatOps,
{
    if population == 0 {
        return Err(anyhow!("Population size must be positive"));
    }
    if draws == 0 {
        return Err(anyhow!("Sample size must be positive"));
    }
    if successes > population || draws > population {
        return Err(anyhow!(
            "Successes ({}) and draws ({}) cannot exceed population ({})",
            successes,
            draws,
            population
        ));
    }
    if observed > draws.min(successes) {
        return Err(anyhow!(
            "Observed successes ({}) exceed min(draws, successes) = {}",
            observed,
            draws.min(successes)
        ));
    }

    let dist = Hypergeometric::new(population, successes, draws)
        .map_err(|e| anyhow!("Invalid hypergeometric parameters: {}", e))?;

    // sf(x) is P(X > x); the upper tail must include the observed value
    let upper = if observed == 0 {
        1.0
    } else {
        dist.sf(observed - 1)
    };
    let lower = dist.cdf(observed);

    let p_value = match alternative {
        Alternative::Greater => upper,
        Alternative::Less => lower,
        Alternative::TwoSided => 2.0 * upper.min(lower),
    }
    .clamp(0.0, 1.0);

    let expected = draws as f64 * successes as f64 / population as f64;
    let fold_enrichment = if expected > 0.0 {
        observed as f64 / expected
    } else {
        0.0
    };
    let statistic = -p_value.max(f64::MIN_POSITIVE).log10();

    Ok(
        TestResult::with_effect_size(cast(statistic)?, cast(p_value)?, cast(fold_enrichment)?)
            .with_metadata("expected", cast(expected)?)
            .with_metadata("observed", cast(observed as f64)?)
            .with_metadata("draws", cast(draws as f64)?)
            .with_metadata("successes", cast(successes as f64)?)
            .with_metadata("population", cast(population as f64)?),
    )
}
