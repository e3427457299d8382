//! Plain-text rendering of an [`Evaluation`].

use std::fmt;

use crate::evaluate::Evaluation;

impl fmt::Display for Evaluation {
    /// Rows are true categories and columns predicted ones, both sorted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let matrix = &self.confusion_matrix;
        let labels = matrix.labels();

        writeln!(f, "------- Confusion Matrix -------")?;
        for label in &labels {
            write!(f, "\t{label}")?;
        }
        writeln!(f)?;

        for actual in &labels {
            write!(f, "{actual}")?;
            for predicted in &labels {
                write!(f, "\t{}", matrix.get(actual, predicted))?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Accuracy: {:.4}", self.accuracy)?;
        writeln!(f, "Misclassification rate: {:.4}", self.misclassification_rate)?;
        writeln!(
            f,
            "Confidence interval (95%): [{:.4}, {:.4}]",
            self.confidence_interval.low, self.confidence_interval.high
        )?;
        write!(f, "--------------------------------")
    }
}
