//! The complete pipeline: baseline, model selection, evaluation and weight inspection.

use crate::dataset::Dataset;
use crate::helpers::Instant;
use crate::inspector::{bottom_weights, top_weights};
use crate::labels::baseline_accuracy;
use crate::opts::{AnalyzeOpts, Format};
use crate::prelude::*;
use crate::report::Report;
use crate::trainer::{GridSearch, ParamGrid, SolverParams, StratifiedKFold};

#[instrument(skip_all)]
pub fn run(opts: AnalyzeOpts) -> Result {
    let start_instant = Instant::now();
    let dataset = Dataset::load(&opts.dataset)?;
    print!("{}", render(&opts, &dataset)?);
    info!(elapsed = %start_instant.elapsed(), "all done");
    Ok(())
}

/// Runs the pipeline over the loaded dataset and renders the report in the requested format.
fn render(opts: &AnalyzeOpts, dataset: &Dataset) -> Result<String> {
    let positive_label = opts.dataset.positive_label.as_str();
    let y_train = dataset.train.target(positive_label);
    let y_test = dataset.test.target(positive_label);
    let baseline_accuracy =
        baseline_accuracy(&y_test).context("failed to compute the baseline accuracy")?;
    info!(baseline_accuracy, "majority-class baseline");

    let x_train = dataset.train.matrix();
    let x_test = dataset.test.matrix();
    debug!(
        train_density = x_train.density(),
        test_density = x_test.density(),
        "sparsified",
    );

    let mut folds = StratifiedKFold::new(opts.grid.n_folds);
    if opts.grid.shuffle {
        folds = folds.with_shuffle(opts.grid.seed);
    }
    let search = GridSearch {
        grid: ParamGrid::new(opts.grid.penalties.clone(), opts.grid.strengths.clone())?,
        folds,
        solver: SolverParams {
            max_iter: opts.solver.max_iter,
            tol: opts.solver.tol,
        },
    };
    let result = search.fit(&x_train, &y_train).context("the grid search has failed")?;
    let model = &result.best_estimator;
    debug!(
        cv_score = result.best().mean_score,
        n_iter = model.n_iter,
        converged = model.converged,
        "refitted",
    );

    let train_accuracy = model.score(&x_train, &y_train)?;
    let test_accuracy = model.score(&x_test, &y_test)?;
    info!(train_accuracy, test_accuracy, best_params = %model.params, "evaluated");
    if test_accuracy <= baseline_accuracy {
        warn!(test_accuracy, baseline_accuracy, "the model does not beat the baseline");
    }

    let report = Report {
        positive_label,
        baseline_accuracy,
        cv_results: &result.cv_results,
        best_params: model.params,
        train_accuracy,
        test_accuracy,
        intercept: model.intercept,
        converged: model.converged,
        n_iter: model.n_iter,
        top_weights: top_weights(dataset.columns(), &model.weights, opts.top)?,
        bottom_weights: bottom_weights(dataset.columns(), &model.weights, opts.bottom)?,
    };
    match opts.format {
        Format::Text => Ok(report.to_text()),
        Format::Json => Ok(report.to_json()? + "\n"),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::dataset::tests::{dataset_opts, scratch_dir, write_toy_dataset};
    use crate::opts::{Command, Opts};

    fn analyze_opts(args: &[&str]) -> Result<AnalyzeOpts> {
        let opts = Opts::try_parse_from(
            ["fatal-factors", "analyze"].iter().chain(args.iter()).copied(),
        )?;
        match opts.subcommand {
            Command::Analyze(opts) => Ok(opts),
            Command::Describe(_) => bail!("expected the `analyze` subcommand"),
        }
    }

    #[test]
    fn toy_text_ok() -> Result {
        let data_dir = scratch_dir("analyze-toy-text")?;
        write_toy_dataset(&data_dir, vec!["engine", "fire", "taxi"])?;
        let mut opts = analyze_opts(&["--penalty", "l2", "--c", "1", "--n-folds", "2"])?;
        opts.dataset = dataset_opts(data_dir);

        let dataset = Dataset::load(&opts.dataset)?;
        let text = render(&opts, &dataset)?;
        assert!(text.contains("Baseline accuracy (always the majority class): 0.5000"));
        assert!(text.contains("Best parameters: penalty=l2, C=1"));
        assert!(text.contains("Top 3 weights towards «Fatal»"));
        assert!(text.contains("fire"));
        Ok(())
    }

    #[test]
    fn toy_json_ok() -> Result {
        let data_dir = scratch_dir("analyze-toy-json")?;
        write_toy_dataset(&data_dir, vec!["engine", "fire", "taxi"])?;
        let mut opts = analyze_opts(&[
            "--c",
            "0.1,10",
            "--n-folds",
            "2",
            "--shuffle",
            "--top",
            "2",
            "--bottom",
            "1",
            "--format",
            "json",
        ])?;
        opts.dataset = dataset_opts(data_dir);

        let dataset = Dataset::load(&opts.dataset)?;
        let report: serde_json::Value = serde_json::from_str(&render(&opts, &dataset)?)?;
        assert_eq!(report["baseline_accuracy"], 0.5);
        assert_eq!(report["cv_results"].as_array().map(Vec::len), Some(4));
        assert_eq!(report["top_weights"].as_array().map(Vec::len), Some(2));
        assert_eq!(report["bottom_weights"].as_array().map(Vec::len), Some(1));

        // Three grid points separate the toy perfectly, the earliest one wins.
        assert_eq!(report["best_params"]["penalty"], "l1");
        assert_eq!(report["best_params"]["C"], 10.0);

        // L1 zeroes both `engine` and `fire`, the tie keeps the column order.
        assert_eq!(report["top_weights"][0]["feature"], "engine");
        assert_eq!(report["top_weights"][1]["feature"], "fire");
        let top_weight = report["top_weights"][0]["weight"].as_f64();
        assert_eq!(top_weight.map(f64::is_sign_positive), Some(true));
        assert_eq!(report["bottom_weights"][0]["feature"], "taxi");
        assert!(report["bottom_weights"][0]["weight"].as_f64().unwrap() < 0.0);
        Ok(())
    }

    #[test]
    fn too_many_folds_fails() -> Result {
        let data_dir = scratch_dir("analyze-too-many-folds")?;
        write_toy_dataset(&data_dir, vec!["engine", "fire", "taxi"])?;
        let mut opts = analyze_opts(&["--n-folds", "5"])?;
        opts.dataset = dataset_opts(data_dir);

        let dataset = Dataset::load(&opts.dataset)?;
        assert!(render(&opts, &dataset).is_err());
        Ok(())
    }
}
