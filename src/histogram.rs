//! Frequency distributions over fixed bin edges.

use crate::filters::Field;
use crate::inventory::GlacierRecord;

use ndarray::Array1;

/// Returns `count` evenly spaced bin edges starting at `start`.
pub fn uniform_edges(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + step * i as f64).collect()
}

/// Count values per bin.
///
/// Bins are half-open `[edges[i], edges[i + 1])` except the last, which also includes its right
/// edge. Values outside the edges, and NaN, are not counted. `edges` must be sorted ascending.
pub fn histogram<I>(values: I, edges: &[f64]) -> Array1<u64>
where
    I: IntoIterator<Item = f64>,
{
    let bins = edges.len().saturating_sub(1);
    let mut counts = Array1::<u64>::zeros(bins);
    if bins == 0 {
        return counts;
    }
    let (first, last) = (edges[0], edges[bins]);
    for value in values {
        if !(first..=last).contains(&value) {
            continue;
        }
        let bin = if value == last {
            bins - 1
        } else {
            edges.partition_point(|edge| *edge <= value) - 1
        };
        counts[bin] += 1;
    }
    counts
}

/// Returns the centre of each bin.
pub fn centres(edges: &[f64]) -> Vec<f64> {
    edges.windows(2).map(|pair| (pair[0] + pair[1]) / 2.0).collect()
}

/// Two parallel distributions of one field over the same bins.
#[derive(Clone, Debug, PartialEq)]
pub struct Distributions {
    /// Bin centres
    pub centres: Vec<f64>,
    /// Distribution of the whole population
    pub all: Vec<f64>,
    /// Distribution of the current selection
    pub selection: Vec<f64>,
}

/// Compute the population and selection distributions of `field`.
///
/// Both distributions are divided by the population's binned total, so the population sums to 1
/// and the selection stays on the same scale however small it is. Non-finite values are binned
/// as 0. When nothing falls into any bin both distributions are all zeros.
pub fn distributions(
    population: &[GlacierRecord],
    selection: &[&GlacierRecord],
    field: Field,
    edges: &[f64],
) -> Distributions {
    let value = |record: &GlacierRecord| {
        let value = field.value(record);
        if value.is_finite() {
            value
        } else {
            0.0
        }
    };
    let all = histogram(population.iter().map(&value), edges);
    let selected = histogram(selection.iter().map(|record| value(*record)), edges);
    let scale = all.sum();

    let normalise = |counts: &Array1<u64>| -> Vec<f64> {
        if scale == 0 {
            return vec![0.0; counts.len()];
        }
        counts.mapv(|count| count as f64 / scale as f64).to_vec()
    };

    Distributions {
        centres: centres(edges),
        all: normalise(&all),
        selection: normalise(&selected),
    }
}
