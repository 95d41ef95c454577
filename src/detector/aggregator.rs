// WHY: Document-level verdict from segment verdicts; isolated foreign-variety segments must not flip the label

use super::JudgementLabel;

/// Share of segments (in percent) that must agree for a non-Mixed verdict
const DOMINANCE_PERCENT: usize = 95;

/// Label counts over a run of segment judgements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelCounts {
    pub cantonese: usize,
    pub swc: usize,
    pub neutral: usize,
    pub mixed: usize,
}

impl LabelCounts {
    pub fn tally<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = JudgementLabel>,
    {
        let mut counts = Self::default();
        for label in labels {
            match label {
                JudgementLabel::Cantonese => counts.cantonese += 1,
                JudgementLabel::Swc => counts.swc += 1,
                JudgementLabel::Neutral => counts.neutral += 1,
                // Refined labels never come out of a segment judgement; count them as mixed evidence
                JudgementLabel::Mixed
                | JudgementLabel::CantoneseQuotesInSwc
                | JudgementLabel::MixedQuotesInSwc => counts.mixed += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.cantonese + self.swc + self.neutral + self.mixed
    }
}

/// Fold segment judgements into one of the four segment-level labels.
/// An empty sequence carries no variety signal and is Neutral.
pub fn aggregate<I>(labels: I) -> JudgementLabel
where
    I: IntoIterator<Item = JudgementLabel>,
{
    let counts = LabelCounts::tally(labels);
    let total = counts.total();

    if total == 0 {
        return JudgementLabel::Neutral;
    }

    // ceil(0.95 * n) in integer arithmetic
    let threshold = (DOMINANCE_PERCENT * total).div_ceil(100);

    let neutral_only = counts.neutral >= threshold;
    let cantonese_only = counts.cantonese + counts.neutral >= threshold;
    let swc_only = counts.swc + counts.neutral >= threshold;

    if neutral_only {
        JudgementLabel::Neutral
    } else if cantonese_only {
        JudgementLabel::Cantonese
    } else if swc_only {
        JudgementLabel::Swc
    } else {
        JudgementLabel::Mixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::JudgementLabel::*;

    #[test]
    fn test_empty_is_neutral() {
        assert_eq!(aggregate(Vec::<JudgementLabel>::new()), Neutral);
    }

    #[test]
    fn test_small_documents_need_unanimity() {
        // n = 3: threshold = ceil(2.85) = 3
        assert_eq!(aggregate([Cantonese, Swc, Neutral]), Mixed);
        assert_eq!(aggregate([Cantonese, Neutral, Neutral]), Cantonese);
        assert_eq!(aggregate([Swc, Swc, Neutral]), Swc);
        assert_eq!(aggregate([Neutral, Neutral, Neutral]), Neutral);
    }

    #[test]
    fn test_one_stray_segment_in_twenty() {
        // n = 20: threshold = 19
        let mut labels = vec![Cantonese; 19];
        labels.push(Swc);
        assert_eq!(aggregate(labels), Cantonese);

        let mut labels = vec![Swc; 18];
        labels.extend([Cantonese, Mixed]);
        assert_eq!(aggregate(labels), Mixed);
    }

    #[test]
    fn test_neutral_checked_first() {
        let mut labels = vec![Neutral; 19];
        labels.push(Cantonese);
        assert_eq!(aggregate(labels), Neutral);
    }

    #[test]
    fn test_tally() {
        let counts = LabelCounts::tally([Cantonese, Mixed, MixedQuotesInSwc, Neutral]);
        assert_eq!(counts.cantonese, 1);
        assert_eq!(counts.mixed, 2);
        assert_eq!(counts.neutral, 1);
        assert_eq!(counts.total(), 4);
    }
}
