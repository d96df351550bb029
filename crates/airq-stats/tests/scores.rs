//! Properties of regression scores.

use airq_stats::RegressionScores;
use proptest::prelude::*;

proptest! {
    #[test]
    fn perfect_predictions_score_zero_error(
        truth in prop::collection::vec(0.0f64..500.0, 2..50)
    ) {
        let scores = RegressionScores::evaluate(&truth, &truth).unwrap();
        prop_assert_eq!(scores.mse, 0.0);
        prop_assert_eq!(scores.mae, 0.0);
        prop_assert!(scores.r2.is_nan() || scores.r2 == 1.0);
    }

    #[test]
    fn rmse_is_root_of_mse(
        pairs in prop::collection::vec((0.0f64..500.0, 0.0f64..500.0), 1..50)
    ) {
        let (truth, predicted): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let scores = RegressionScores::evaluate(&truth, &predicted).unwrap();
        prop_assert!((scores.rmse * scores.rmse - scores.mse).abs() <= 1e-6 * scores.mse.max(1.0));
        prop_assert!(scores.mae <= scores.rmse + 1e-9);
    }
}
