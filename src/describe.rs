use crate::dataset::{Dataset, Split};
use crate::labels::{baseline_accuracy, value_counts};
use crate::opts::DescribeOpts;
use crate::prelude::*;
use crate::report::{DatasetSummary, SplitSummary};

#[instrument(skip_all)]
pub fn run(opts: DescribeOpts) -> Result {
    let dataset = Dataset::load(&opts.dataset)?;
    print!("{}", summarize(&dataset, &opts.dataset.positive_label)?.to_text());
    Ok(())
}

fn summarize<'a>(dataset: &'a Dataset, positive_label: &'a str) -> Result<DatasetSummary<'a>> {
    let train_counts = value_counts(&dataset.train.labels.values);
    let test_counts = value_counts(&dataset.test.labels.values);

    // Training labels first, then the ones seen only in the test split.
    let label_counts = train_counts
        .iter()
        .chain(&test_counts)
        .map(|(label, _)| *label)
        .unique()
        .map(|label| (label, count_of(&train_counts, label), count_of(&test_counts, label)))
        .collect();

    Ok(DatasetSummary {
        positive_label,
        splits: vec![
            split_summary("train", &dataset.train, positive_label),
            split_summary("test", &dataset.test, positive_label),
        ],
        label_counts,
        baseline_accuracy: baseline_accuracy(&dataset.test.target(positive_label))?,
    })
}

fn split_summary(name: &'static str, split: &Split, positive_label: &str) -> SplitSummary {
    let matrix = split.matrix();
    SplitSummary {
        name,
        n_rows: matrix.n_rows(),
        n_cols: matrix.n_cols(),
        nnz: matrix.nnz(),
        density: matrix.density(),
        n_positive: split
            .target(positive_label)
            .into_iter()
            .filter(|is_positive| *is_positive)
            .count(),
    }
}

fn count_of(counts: &[(&str, usize)], label: &str) -> usize {
    counts
        .iter()
        .find(|(other, _)| *other == label)
        .map_or(0, |(_, count)| *count)
}
